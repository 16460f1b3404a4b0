//! Inter-task communication
//!
//! The sequence queue is shared between the feed task (producer) and the
//! face task (consumer). Everything else is a one-way signal, channel, or
//! flag.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::String;
use jumbo_core::sequence::SequenceQueue;
use jumbo_protocol::MAX_STATUS_LEN;
use portable_atomic::{AtomicBool, Ordering};

/// Steps waiting to be played
///
/// Only ever locked for a single queue operation, never across an await.
pub static SEQUENCE_QUEUE: Mutex<CriticalSectionRawMutex, RefCell<SequenceQueue>> =
    Mutex::new(RefCell::new(SequenceQueue::new()));

/// Tone requests from the face task to the buzzer task (duration in ms)
pub static TONE_CHANNEL: Channel<CriticalSectionRawMutex, u32, 4> = Channel::new();

/// Standby toggles from the button task (true = entering standby)
pub static STANDBY_SIGNAL: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Current standby state, for tasks that poll rather than wait
static STANDBY: AtomicBool = AtomicBool::new(false);

/// Status line override from the feed task; `None` hands it back to the face
pub static STATUS_NOTICE: Signal<CriticalSectionRawMutex, Option<Notice>> = Signal::new();

/// Text shown in place of the face's own status
pub type Notice = String<MAX_STATUS_LEN>;

/// Notice from a borrowed string, truncated to fit
pub fn notice(text: &str) -> Notice {
    let mut s = String::new();
    for ch in text.chars() {
        if s.push(ch).is_err() {
            break;
        }
    }
    s
}

/// Record and announce a standby change
pub fn set_standby(standby: bool) {
    STANDBY.store(standby, Ordering::Relaxed);
    STANDBY_SIGNAL.signal(standby);
}

pub fn in_standby() -> bool {
    STANDBY.load(Ordering::Relaxed)
}

/// Lock the sequence queue for one operation
pub fn with_queue<R>(f: impl FnOnce(&mut SequenceQueue) -> R) -> R {
    SEQUENCE_QUEUE.lock(|queue| f(&mut queue.borrow_mut()))
}
