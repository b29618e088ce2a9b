//! Single-slot frame handoff between the capture side and the conversion side.
//!
//! The producer always overwrites; the consumer only ever sees the freshest
//! frame. There is no backlog to drain.

use std::sync::Arc;

use cs_core::frame::SourceFrame;
use triple_buffer::TripleBuffer;

type Slot = Option<Arc<SourceFrame>>;

/// Create a connected sender/receiver pair.
///
/// # Example
/// ```
/// use cs_core::frame::SourceFrame;
/// use cs_ascii::mailbox::frame_mailbox;
///
/// let (mut tx, mut rx) = frame_mailbox();
/// assert!(rx.take_latest().is_none());
/// tx.send(SourceFrame::packed(1, 1, vec![1]));
/// tx.send(SourceFrame::packed(1, 1, vec![2]));
/// assert_eq!(rx.take_latest().unwrap().bytes, vec![2]);
/// assert!(rx.take_latest().is_none());
/// ```
#[must_use]
pub fn frame_mailbox() -> (MailboxSender, MailboxReceiver) {
    let (input, output) = TripleBuffer::new(&None).split();
    (MailboxSender { input }, MailboxReceiver { output })
}

/// Capture side. Each `send` replaces any frame not yet taken.
pub struct MailboxSender {
    input: triple_buffer::Input<Slot>,
}

impl MailboxSender {
    /// Overwrite the slot with `frame`.
    pub fn send(&mut self, frame: SourceFrame) {
        self.input.write(Some(Arc::new(frame)));
    }
}

/// Conversion side.
pub struct MailboxReceiver {
    output: triple_buffer::Output<Slot>,
}

impl MailboxReceiver {
    /// Newest frame written since the last call, if any.
    pub fn take_latest(&mut self) -> Option<Arc<SourceFrame>> {
        if self.output.updated() {
            self.output.read().clone()
        } else {
            None
        }
    }
}
