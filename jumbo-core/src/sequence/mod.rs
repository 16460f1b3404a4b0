//! Sequence steps and the queue that buffers them
//!
//! Steps arrive from the producer, wait in a bounded FIFO, and are consumed
//! by the playback controller one at a time.

pub mod feed;
pub mod queue;
pub mod step;

pub use feed::{
    BootPhase, BootProgress, HostFeed, LinkEvent, LinkMonitor, RefillPolicy, RequestKind,
    LINK_LOST_STATUS,
};
pub use queue::{SequenceQueue, QUEUE_CAPACITY};
pub use step::{SequenceStep, MAX_CAPTION_LEN, MAX_EXPRESSION_LEN};
