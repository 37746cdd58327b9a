#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the connection to the server is secured.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Security {
    Plain,
    SSL,
}

impl Default for Security {
    fn default() -> Security {
        Security::Plain
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountConfig {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Mailbox address of the last `open`, e.g. `{imap.example.com:143}INBOX`.
    pub link: String,
    pub security: Security,
}

impl Default for AccountConfig {
    fn default() -> AccountConfig {
        AccountConfig {
            server: String::new(),
            port: 143,
            user: String::new(),
            password: String::new(),
            link: String::new(),
            security: Security::Plain,
        }
    }
}

/// A partial update of an `AccountConfig`. Fields left as `None` keep their
/// current value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigFields {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub link: Option<String>,
    pub security: Option<Security>,
}

impl AccountConfig {
    pub fn apply(&mut self, fields: ConfigFields) {
        if let Some(server) = fields.server {
            self.server = server;
        }
        if let Some(port) = fields.port {
            self.port = port;
        }
        if let Some(user) = fields.user {
            self.user = user;
        }
        if let Some(password) = fields.password {
            self.password = password;
        }
        if let Some(link) = fields.link {
            self.link = link;
        }
        if let Some(security) = fields.security {
            self.security = security;
        }
    }
}
