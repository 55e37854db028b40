//! Request tagging for staleness filtering.
//!
//! Each asynchronous stream (suggestions, search, related documents) owns a
//! `RequestSequencer`. Every outgoing request gets a `RequestTag` with a
//! monotonically increasing sequence number and the key it was issued for.
//! A response is authoritative only if its tag is still the latest one.

/// Identity of one outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag {
    pub seq: u64,
    /// Query text, or document id for related-document requests
    pub key: String,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    next_seq: u64,
    latest: Option<u64>,
    settled: bool,
}

impl RequestSequencer {
    /// Tag a new request; every previously issued tag becomes stale
    pub fn issue(&mut self, key: impl Into<String>) -> RequestTag {
        self.next_seq += 1;
        self.latest = Some(self.next_seq);
        self.settled = false;
        RequestTag {
            seq: self.next_seq,
            key: key.into(),
        }
    }

    pub fn is_latest(&self, tag: &RequestTag) -> bool {
        self.latest == Some(tag.seq)
    }

    /// Mark the request as resolved. Returns `false` for stale tags, which
    /// leave the sequencer untouched.
    pub fn settle(&mut self, tag: &RequestTag) -> bool {
        if self.is_latest(tag) && !self.settled {
            self.settled = true;
            true
        } else {
            false
        }
    }

    /// Make every outstanding tag stale without issuing a new one
    pub fn invalidate(&mut self) {
        self.latest = None;
        self.settled = false;
    }

    /// Whether the latest issued request has not resolved yet
    pub fn in_flight(&self) -> bool {
        self.latest.is_some() && !self.settled
    }
}
