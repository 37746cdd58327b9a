/// Session-local message sequence number, 1-based.
///
/// Signed because a page that runs past either end of the mailbox resolves
/// to numbers outside `[1, total]`; those are still handed to the transport,
/// which rejects them one by one.
pub type MessageId = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSpec {
    pub size: Option<u32>,
    pub offset: Option<u32>,
    /// Newest first when set.
    pub reverse: bool,
}

impl Default for PageSpec {
    fn default() -> PageSpec {
        PageSpec {
            size: None,
            offset: None,
            reverse: true,
        }
    }
}

impl PageSpec {
    /// Fill in the defaults for `total` messages and return the concrete
    /// `(start, end)` pair of the page, both inclusive.
    pub fn bounds(&self, total: u32) -> (MessageId, MessageId) {
        let total = MessageId::from(total);
        let first = if self.reverse { total } else { 1 };
        let (size, offset) = match (self.size, self.offset) {
            (None, _) => (total, first),
            (Some(size), None) => (MessageId::from(size), first),
            (Some(size), Some(offset)) => (MessageId::from(size), MessageId::from(offset)),
        };

        let start = offset;
        let end = if self.reverse {
            start - size + 1
        } else {
            size + start - 1
        };
        (start, end)
    }
}

/// Compute the message ids to fetch, in fetch order.
///
/// Ids are not clamped to `[1, total]`.
pub fn resolve(total: u32, spec: &PageSpec) -> Vec<MessageId> {
    if total == 0 {
        return Vec::new();
    }
    let (start, end) = spec.bounds(total);
    let ids: Vec<MessageId> = if end < start {
        (end..=start).rev().collect()
    } else {
        (start..=end).collect()
    };
    debug!("Resolved {} message ids from {} to {}", ids.len(), start, end);
    ids
}
