use std::fmt;

use config::{AccountConfig, Security};
use errors::*;
use range::MessageId;

/// Mailbox opened by a session.
pub const MAILBOX: &str = "INBOX";

/// Where a session connects: server, port, security and mailbox.
///
/// Displays in the `{host:port/flags}MAILBOX` form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailboxAddress {
    pub host: String,
    pub port: u16,
    pub security: Security,
    pub mailbox: String,
}

impl MailboxAddress {
    pub fn inbox(config: &AccountConfig) -> MailboxAddress {
        MailboxAddress {
            host: config.server.clone(),
            port: config.port,
            security: config.security,
            mailbox: MAILBOX.to_string(),
        }
    }
}

impl fmt::Display for MailboxAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.security {
            Security::Plain => write!(f, "{{{}:{}}}{}", self.host, self.port, self.mailbox),
            Security::SSL => write!(f, "{{{}:{}/ssl}}{}", self.host, self.port, self.mailbox),
        }
    }
}

/// Opens sessions against a mailbox.
pub trait Connector {
    type Transport: Transport;

    fn open(&self, address: &MailboxAddress, user: &str, password: &str)
        -> Result<Self::Transport>;
}

/// An open, authenticated session on one mailbox.
pub trait Transport {
    /// Number of messages currently in the mailbox.
    fn message_count(&mut self) -> Result<u32>;

    /// The raw header block of message `id`.
    fn fetch_header(&mut self, id: MessageId) -> Result<Vec<u8>>;

    /// The raw content of body part `part` (1-based) of message `id`.
    fn fetch_body(&mut self, id: MessageId, part: u32) -> Result<Vec<u8>>;

    /// End the session. Must be safe to call again afterwards.
    fn close(&mut self) -> Result<()>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn address_display() {
        let mut config = AccountConfig::default();
        config.server = "imap.example.com".to_string();
        assert_eq!(
            "{imap.example.com:143}INBOX",
            MailboxAddress::inbox(&config).to_string()
        );

        config.port = 993;
        config.security = Security::SSL;
        assert_eq!(
            "{imap.example.com:993/ssl}INBOX",
            MailboxAddress::inbox(&config).to_string()
        );
    }
}
