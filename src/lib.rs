//! imap-inbox reads the `INBOX` of an IMAP account as a list of decoded
//! messages.
//!
//! An [`Inbox`](inbox/struct.Inbox.html) is configured with credentials,
//! opened through a [`Connector`](transport/trait.Connector.html) and then
//! queried page by page:
//!
//! ```no_run
//! use imap_inbox::{ConfigFields, IMAPConnector, Inbox};
//!
//! # fn run() -> imap_inbox::errors::Result<()> {
//! let mut inbox = Inbox::new(IMAPConnector);
//! inbox.configure(ConfigFields {
//!     server: Some("imap.example.com".into()),
//!     user: Some("alice".into()),
//!     password: Some("secret".into()),
//!     ..Default::default()
//! });
//! inbox.open()?;
//! for message in inbox.limit(10).asc().fetch_all()? {
//!     let message = message?;
//!     println!("{} {} {}", message.date, message.from, message.title);
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "serde")]
extern crate serde;

#[macro_use]
extern crate log;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
extern crate base64;
extern crate chrono;
extern crate encoding_rs;
extern crate openssl;
extern crate regex;

#[cfg(test)]
extern crate proptest;

pub mod errors {
    error_chain! {
        foreign_links {
            Io(::std::io::Error);
            SslStack(::openssl::error::ErrorStack);
            SslHandshake(::openssl::ssl::HandshakeError<::std::net::TcpStream>);
            UTF8Error(::std::string::FromUtf8Error);
            RegexError(::regex::Error);
            ParseIntError(::std::num::ParseIntError);
        }

        errors {
            Connect(address: String) {
                description("connect fail")
                display("connect fail: {}", address)
            }
            Fetch(id: i64) {
                description("message could not be fetched")
                display("could not fetch message {}", id)
            }
            NotConnected {
                description("mailbox is not open")
                display("mailbox is not open")
            }
            Protocol(response: String) {
                description("unexpected server response")
                display("unexpected server response: {}", response)
            }
        }
    }

    /// Stable code reported for every failure of `Inbox::open`.
    pub const CONNECT_FAIL: u32 = 5001;

    impl Error {
        /// The stable numeric code of this error, if it has one.
        pub fn code(&self) -> Option<u32> {
            match *self.kind() {
                ErrorKind::Connect(_) => Some(CONNECT_FAIL),
                _ => None,
            }
        }
    }
}

pub mod config;
pub mod content;
pub mod encoded_word;
pub mod header;
pub mod imap;
mod imapresult;
pub mod inbox;
pub mod message;
mod quoted_printable;
pub mod range;
mod tcpstream;
pub mod transport;

pub use config::{AccountConfig, ConfigFields, Security};
pub use content::{Base64Decoder, ContentDecoder, PassThrough, QuotedPrintableDecoder};
pub use header::HeaderMap;
pub use imap::{IMAPConnector, IMAPTransport};
pub use inbox::Inbox;
pub use message::Message;
pub use range::{MessageId, PageSpec};
pub use tcpstream::IMAPStream;
pub use transport::{Connector, MailboxAddress, Transport};
