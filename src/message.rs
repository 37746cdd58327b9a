#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use range::MessageId;

/// One normalized message of the mailbox.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    /// Decoded `Subject`.
    pub title: String,
    /// Bare sender address.
    pub from: String,
    /// Decoded first body part.
    pub content: String,
    /// Time of the last `Received` header, `%Y-%m-%d %H:%M:%S` local time, or
    /// empty.
    pub date: String,
}
