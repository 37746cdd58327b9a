extern crate imap_inbox;

use imap_inbox::errors::*;
use imap_inbox::{ConfigFields, Connector, Inbox, MailboxAddress, MessageId, PassThrough, Transport};

/// A mailbox held in memory, one `(header, body)` pair per message.
struct Memory {
    messages: Vec<(&'static str, &'static str)>,
}

struct MemoryTransport {
    messages: Vec<(&'static str, &'static str)>,
}

impl Connector for Memory {
    type Transport = MemoryTransport;

    fn open(&self, _address: &MailboxAddress, user: &str, password: &str)
        -> Result<MemoryTransport> {
        if user != "alice" || password != "secret" {
            return Err("authentication failed".into());
        }
        Ok(MemoryTransport {
            messages: self.messages.clone(),
        })
    }
}

impl MemoryTransport {
    fn get(&self, id: MessageId) -> Result<(&'static str, &'static str)> {
        if id < 1 || id as usize > self.messages.len() {
            return Err(format!("no message {}", id).into());
        }
        Ok(self.messages[id as usize - 1])
    }
}

impl Transport for MemoryTransport {
    fn message_count(&mut self) -> Result<u32> {
        Ok(self.messages.len() as u32)
    }

    fn fetch_header(&mut self, id: MessageId) -> Result<Vec<u8>> {
        self.get(id).map(|m| m.0.as_bytes().to_vec())
    }

    fn fetch_body(&mut self, id: MessageId, _part: u32) -> Result<Vec<u8>> {
        self.get(id).map(|m| m.1.as_bytes().to_vec())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

fn mailbox() -> Memory {
    Memory {
        messages: vec![
            (
                "From: Alice <alice@example.com>\r\nSubject: Lunch?\r\n",
                "SG93IGFib3V0IG5vb24/",
            ),
            (
                "From: bob@example.com\r\n\
                 Subject: =?ISO-8859-1?Q?R=E9sum=E9?=\r\n\
                 Received: from mx.example.com by mail.example.com;\r\n\
                 \tWed, 2 Jan 2019 08:30:15 +0000\r\n",
                "Plain text, not base64!\r\n",
            ),
            ("Subject: third\r\nFrom: <carol@example.com>\r\n", "dGhpcmQ="),
        ],
    }
}

fn credentials() -> ConfigFields {
    ConfigFields {
        server: Some("imap.example.com".to_string()),
        user: Some("alice".to_string()),
        password: Some("secret".to_string()),
        ..Default::default()
    }
}

#[test]
fn reads_the_inbox() {
    let mut inbox = Inbox::new(mailbox());
    inbox.configure(credentials()).open().unwrap();

    let messages: Vec<_> = inbox
        .fetch_all()
        .unwrap()
        .into_iter()
        .map(|m| m.unwrap())
        .collect();
    assert_eq!(
        vec![3, 2, 1],
        messages.iter().map(|m| m.id).collect::<Vec<_>>()
    );

    assert_eq!("third", messages[0].title);
    assert_eq!("carol@example.com", messages[0].from);
    assert_eq!("third", messages[0].content);
    assert_eq!("", messages[0].date);

    assert_eq!("Résumé", messages[1].title);
    assert_eq!("bob@example.com", messages[1].from);
    assert_eq!("Plain text, not base64!\r\n", messages[1].content);
    assert_eq!(19, messages[1].date.len());
    assert!(messages[1].date.starts_with("2019-01-0"));

    assert_eq!("Lunch?", messages[2].title);
    assert_eq!("alice@example.com", messages[2].from);
    assert_eq!("How about noon?", messages[2].content);

    assert_eq!(3, inbox.headers().len());
    assert_eq!("Lunch?", inbox.headers()[&1]["subject"]);
}

#[test]
fn pages_through_the_inbox() {
    let mut inbox = Inbox::new(mailbox());
    inbox.configure(credentials()).open().unwrap();

    let ids = |page: Vec<Result<imap_inbox::Message>>| -> Vec<MessageId> {
        page.into_iter().map(|m| m.unwrap().id).collect()
    };
    assert_eq!(vec![1, 2], ids(inbox.asc().limit(2).fetch_all().unwrap()));
    assert_eq!(vec![3, 2], ids(inbox.limit(2).fetch_all().unwrap()));
    assert_eq!(vec![2, 3], ids(inbox.limit_offset(2, 2).asc().fetch_all().unwrap()));
    assert_eq!(Some(3), inbox.fetch().unwrap().map(|m| m.id));
}

#[test]
fn out_of_range_page_reports_missing_messages() {
    let mut inbox = Inbox::new(mailbox());
    inbox.configure(credentials()).open().unwrap();

    let page = inbox.limit_offset(3, 2).asc().fetch_all().unwrap();
    assert_eq!(3, page.len());
    assert!(page[0].is_ok());
    assert!(page[1].is_ok());
    match *page[2].as_ref().unwrap_err().kind() {
        ErrorKind::Fetch(id) => assert_eq!(4, id),
        ref other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn wrong_password_is_connect_fail() {
    let mut inbox = Inbox::new(mailbox());
    let mut fields = credentials();
    fields.password = Some("wrong".to_string());
    let err = inbox.configure(fields).open().err().unwrap();
    assert_eq!(Some(CONNECT_FAIL), err.code());
    assert_eq!("{imap.example.com:143}INBOX", inbox.link());
}

#[test]
fn pass_through_decoder_keeps_base64() {
    let mut inbox = Inbox::with_decoder(mailbox(), PassThrough);
    inbox.configure(credentials()).open().unwrap();
    assert_eq!("dGhpcmQ=", inbox.find(3).unwrap().content);
}
