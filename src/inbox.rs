use std::collections::BTreeMap;

use config::{AccountConfig, ConfigFields};
use content::{Base64Decoder, ContentDecoder};
use errors::*;
use header::{self, HeaderMap};
use message::Message;
use range::{self, MessageId, PageSpec};
use transport::{Connector, MailboxAddress, Transport};

/// Body part fetched for the message content.
const CONTENT_PART: u32 = 1;

/// A session on the `INBOX` of one account.
///
/// Paging options set with `limit`, `asc` and `desc` apply to the next
/// `fetch_all` (or `fetch`) and are reset afterwards. Headers of every
/// fetched message are kept for the lifetime of the session, see `headers`.
pub struct Inbox<C: Connector> {
    connector: C,
    config: AccountConfig,
    decoder: Box<dyn ContentDecoder>,
    transport: Option<C::Transport>,
    page: PageSpec,
    headers: BTreeMap<MessageId, HeaderMap>,
}

impl<C: Connector> Inbox<C> {
    /// A session that decodes bodies with `Base64Decoder`.
    pub fn new(connector: C) -> Inbox<C> {
        Inbox::with_decoder(connector, Base64Decoder)
    }

    pub fn with_decoder<D>(connector: C, decoder: D) -> Inbox<C>
    where
        D: ContentDecoder + 'static,
    {
        Inbox {
            connector: connector,
            config: AccountConfig::default(),
            decoder: Box::new(decoder),
            transport: None,
            page: PageSpec::default(),
            headers: BTreeMap::new(),
        }
    }

    pub fn configure(&mut self, fields: ConfigFields) -> &mut Self {
        self.config.apply(fields);
        self
    }

    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    /// Address of the last `open`, in `{server:port}INBOX` form.
    pub fn link(&self) -> &str {
        &self.config.link
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Connect and log in. Every failure is a `Connect` error, code
    /// `errors::CONNECT_FAIL`.
    pub fn open(&mut self) -> Result<&mut Self> {
        trace!("Opening mailbox");
        if self.transport.is_some() {
            debug!("Closing the previous session first");
            self.close();
        }

        let address = MailboxAddress::inbox(&self.config);
        self.config.link = address.to_string();
        let transport = self
            .connector
            .open(&address, &self.config.user, &self.config.password)
            .chain_err(|| ErrorKind::Connect(address.to_string()))?;
        info!("Opened {}", address);
        self.transport = Some(transport);
        Ok(self)
    }

    /// Fetch `size` messages starting at the newest (or oldest, after
    /// `asc`). A zero size means all of them.
    pub fn limit(&mut self, size: u32) -> &mut Self {
        self.page.size = if size == 0 { None } else { Some(size) };
        self.page.offset = None;
        self
    }

    /// Fetch `size` messages starting at message `offset`.
    pub fn limit_offset(&mut self, size: u32, offset: u32) -> &mut Self {
        self.page.size = Some(size);
        self.page.offset = Some(offset);
        self
    }

    /// Oldest first.
    pub fn asc(&mut self) -> &mut Self {
        self.page.reverse = false;
        self
    }

    /// Newest first, the default.
    pub fn desc(&mut self) -> &mut Self {
        self.page.reverse = true;
        self
    }

    pub fn page(&self) -> &PageSpec {
        &self.page
    }

    pub fn reset(&mut self) {
        self.page = PageSpec::default();
    }

    pub fn find(&mut self, id: MessageId) -> Result<Message> {
        self.fetch_id(id)
    }

    pub fn fetch_id(&mut self, id: MessageId) -> Result<Message> {
        self.fetch_body(id)
    }

    /// The first message of a one-message page, if the mailbox is not
    /// empty.
    pub fn fetch(&mut self) -> Result<Option<Message>> {
        match self.limit(1).fetch_all()?.into_iter().next() {
            Some(message) => message.map(Some),
            None => Ok(None),
        }
    }

    /// Every message of the current page, in page order.
    ///
    /// A message that cannot be fetched shows up as an `Err` in its place
    /// and does not stop the others. Paging options are reset afterwards.
    pub fn fetch_all(&mut self) -> Result<Vec<Result<Message>>> {
        trace!("Fetching page {:?}", self.page);
        let total = self.message_count();
        let page = self.page;
        self.reset();

        let ids = range::resolve(total?, &page);
        let mut messages = Vec::with_capacity(ids.len());
        for id in ids {
            let message = self.fetch_body(id);
            if let Err(ref e) = message {
                warn!("Could not fetch message {}: {}", id, e);
            }
            messages.push(message);
        }
        Ok(messages)
    }

    /// Fetch and normalize message `id`, caching its headers.
    pub fn fetch_body(&mut self, id: MessageId) -> Result<Message> {
        trace!("Fetching message {}", id);
        let (raw_header, raw_body) = {
            let transport = self.transport()?;
            let raw_header = transport.fetch_header(id).chain_err(|| ErrorKind::Fetch(id))?;
            let raw_body = transport
                .fetch_body(id, CONTENT_PART)
                .chain_err(|| ErrorKind::Fetch(id))?;
            (raw_header, raw_body)
        };

        let headers = header::decode(&raw_header);
        let message = Message {
            id: id,
            title: headers.get("subject").cloned().unwrap_or_default(),
            from: header::format_from(headers.get("from").map_or("", String::as_str)),
            content: self.decoder.decode(&raw_body),
            date: header::received_date(headers.get("received").map_or("", String::as_str)),
        };
        self.headers.insert(id, headers);
        Ok(message)
    }

    /// Headers of every message fetched so far, by id.
    pub fn headers(&self) -> &BTreeMap<MessageId, HeaderMap> {
        &self.headers
    }

    pub fn message_count(&mut self) -> Result<u32> {
        self.transport()?.message_count()
    }

    /// End the session. Safe to call when it was never opened or is
    /// already closed.
    pub fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            trace!("Closing mailbox");
            if let Err(e) = transport.close() {
                warn!("Error while closing {}: {}", self.config.link, e);
            }
        }
    }

    fn transport(&mut self) -> Result<&mut C::Transport> {
        self.transport
            .as_mut()
            .ok_or_else(|| ErrorKind::NotConnected.into())
    }
}

impl<C: Connector> Drop for Inbox<C> {
    fn drop(&mut self) {
        self.close();
    }
}
