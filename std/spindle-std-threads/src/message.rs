///
/// Message Tags and Envelopes
///
/// Tags are plain numbers split into two ranges:
/// - `Tag::EXIT_THREAD` is reserved for the runtime's exit protocol
/// - everything above it up to `Tag::USER_END` belongs to the application
///
/// Anything outside the application range is rejected at post time.
///

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u32);

impl Tag {
    pub const USER_BEGIN: u32 = 0x0400;
    pub const USER_END: u32 = 0x7FFF;

    /// Reserved: asks the receiving thread to leave its run loop
    pub const EXIT_THREAD: Tag = Tag(Self::USER_BEGIN);

    /// The general-purpose application message
    pub const THREAD_MSG: Tag = Tag(Self::USER_BEGIN + 1);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub fn is_control(self) -> bool {
        self == Self::EXIT_THREAD
    }

    pub fn is_application(self) -> bool {
        self.0 > Self::USER_BEGIN && self.0 <= Self::USER_END
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// One queue entry. Application payloads are owned by exactly one side at a
/// time: the poster until enqueue, the queue until dequeue, the worker after.
#[derive(Debug)]
pub enum Message<P> {
    Application { tag: Tag, payload: P },
    ExitRequest,
}

impl<P> Message<P> {
    pub fn tag(&self) -> Tag {
        match self {
            Message::Application { tag, .. } => *tag,
            Message::ExitRequest => Tag::EXIT_THREAD,
        }
    }
}
