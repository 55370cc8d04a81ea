//! Transient status-line notices (success and error toasts)
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default lifetime of a notice
pub const DEFAULT_NOTICE_SECS: u64 = 3;

/// Most notices kept on screen at once
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub expires_at: Instant,
}

/// Queue of notices that expire on their own
#[derive(Debug, Clone)]
pub struct Notices {
    ttl: Duration,
    queue: VecDeque<Notice>,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_NOTICE_SECS))
    }
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            queue: VecDeque::new(),
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message.into(), NoticeKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message.into(), NoticeKind::Error);
    }

    fn push(&mut self, message: String, kind: NoticeKind) {
        self.queue.push_back(Notice {
            message,
            kind,
            expires_at: Instant::now() + self.ttl,
        });
        while self.queue.len() > MAX_VISIBLE {
            self.queue.pop_front();
        }
    }

    /// Drop notices that have expired by `now`
    pub fn expire(&mut self, now: Instant) {
        self.queue.retain(|n| n.expires_at > now);
    }

    /// Most recent notice, if any
    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
