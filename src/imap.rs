//! A blocking IMAP4rev1 transport, just large enough to read one mailbox.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use openssl::ssl::{SslConnector, SslMethod};

use config::Security;
use errors::*;
use imapresult::{self, IMAPResponse};
use range::MessageId;
use tcpstream::{self, IMAPStream};
use transport::{Connector, MailboxAddress, Transport};

#[derive(PartialEq)]
#[derive(Debug)]
enum IMAPState {
    NOTAUTHENTICATED,
    AUTHENTICATED,
    SELECTED,
    LOGOUT,
}

/// Opens `IMAPTransport`s over TCP, with TLS when the address asks for it.
#[derive(Clone, Copy, Debug, Default)]
pub struct IMAPConnector;

impl Connector for IMAPConnector {
    type Transport = IMAPTransport<IMAPStream>;

    fn open(&self, address: &MailboxAddress, user: &str, password: &str)
        -> Result<IMAPTransport<IMAPStream>> {
        trace!("Initiate IMAP Connection to {}", address);
        let tcp_stream = TcpStream::connect((&address.host[..], address.port))?;
        let stream = match address.security {
            Security::Plain => {
                debug!("Creating a Plain TCP Connection");
                IMAPStream::Plain(BufReader::new(tcp_stream))
            }
            Security::SSL => {
                debug!("Creating a SSL Connection");
                let connector = SslConnector::builder(SslMethod::tls())?.build();
                IMAPStream::SSL(BufReader::new(connector.connect(&address.host, tcp_stream)?))
            }
        };
        IMAPTransport::start(stream, &address.mailbox, user, password)
    }
}

pub struct IMAPTransport<S> {
    stream: S,
    state: IMAPState,
    next_tag: u32,
    exists: u32,
}

impl<S: BufRead + Write> IMAPTransport<S> {
    /// Read the greeting, log in and select `mailbox` on an already
    /// connected stream.
    pub fn start(stream: S, mailbox: &str, user: &str, password: &str)
        -> Result<IMAPTransport<S>> {
        let mut ctx = IMAPTransport {
            stream: stream,
            state: IMAPState::NOTAUTHENTICATED,
            next_tag: 1,
            exists: 0,
        };
        trace!("Connection Established");
        debug!("IMAPState::{:?}", ctx.state);
        if ctx.read_greeting()? {
            ctx.state = IMAPState::AUTHENTICATED;
            debug!("IMAPState::{:?} (PREAUTH)", ctx.state);
        } else {
            ctx.login(user, password)?;
        }
        ctx.select(mailbox)?;
        Ok(ctx)
    }

    /// Returns `true` when the server pre-authenticated the connection.
    fn read_greeting(&mut self) -> Result<bool> {
        trace!("Reading Greeting from Server");
        let greeting = imapresult::read_line(&mut self.stream)?;
        imapresult::parse_greeting(&greeting)
    }

    fn login(&mut self, user: &str, password: &str) -> Result<()> {
        assert!(self.state == IMAPState::NOTAUTHENTICATED);
        trace!("Attempting to Login");
        let user = imapresult::quote(user)?;
        let command = format!("LOGIN {} {}", user, imapresult::quote(password)?);
        let masked = format!("LOGIN {} ****", user);
        self.send_command(&command, Some(&masked))?;
        self.state = IMAPState::AUTHENTICATED;
        debug!("IMAPState::{:?}", self.state);
        Ok(())
    }

    fn select(&mut self, mailbox: &str) -> Result<()> {
        trace!("Cmd: SELECT");
        let command = format!("SELECT {}", imapresult::quote(mailbox)?);
        let response = self.send_command(&command, None)?;
        self.exists = response.exists().unwrap_or(0);
        self.state = IMAPState::SELECTED;
        debug!("IMAPState::{:?}, {} messages", self.state, self.exists);
        Ok(())
    }

    fn fetch_section(&mut self, id: MessageId, section: &str) -> Result<Vec<u8>> {
        if id < 1 {
            return Err(ErrorKind::Protocol(format!("invalid message number {}", id)).into());
        }
        let response = self.send_command(&format!("FETCH {} BODY.PEEK[{}]", id, section), None)?;
        response
            .fetch_data(id, section)
            .ok_or_else(|| ErrorKind::Protocol(format!("no {} data for message {}", section, id)).into())
    }

    fn ensure_selected(&self) -> Result<()> {
        if self.state == IMAPState::SELECTED {
            Ok(())
        } else {
            Err(ErrorKind::NotConnected.into())
        }
    }

    fn send_command(&mut self, command: &str, logged: Option<&str>) -> Result<IMAPResponse> {
        let tag = format!("A{:04}", self.next_tag);
        self.next_tag += 1;

        info!("C: {} {}", tag, logged.unwrap_or(command));
        tcpstream::write_line(&mut self.stream, &format!("{} {}", tag, command))?;

        let response = imapresult::read_response(&mut self.stream, &tag)?;
        debug!("{} OK {}", tag, response.status_text);
        Ok(response)
    }
}

impl<S: BufRead + Write> Transport for IMAPTransport<S> {
    fn message_count(&mut self) -> Result<u32> {
        self.ensure_selected()?;
        trace!("Cmd: NOOP");
        let response = self.send_command("NOOP", None)?;
        if let Some(exists) = response.exists() {
            self.exists = exists;
        }
        Ok(self.exists)
    }

    fn fetch_header(&mut self, id: MessageId) -> Result<Vec<u8>> {
        self.ensure_selected()?;
        trace!("Cmd: FETCH {} header", id);
        self.fetch_section(id, "HEADER")
    }

    fn fetch_body(&mut self, id: MessageId, part: u32) -> Result<Vec<u8>> {
        self.ensure_selected()?;
        trace!("Cmd: FETCH {} body part {}", id, part);
        self.fetch_section(id, &part.to_string())
    }

    fn close(&mut self) -> Result<()> {
        if self.state == IMAPState::LOGOUT {
            return Ok(());
        }
        trace!("Cmd: LOGOUT");
        // The session is over whether or not the server acknowledges.
        self.state = IMAPState::LOGOUT;
        debug!("IMAPState::{:?}", self.state);
        self.send_command("LOGOUT", None)?;
        Ok(())
    }
}
