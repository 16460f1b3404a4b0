//! Feed task
//!
//! Talks to the host over UART0. Incoming frames fill the sequence queue;
//! outgoing frames acknowledge steps, answer pings and ask for more steps,
//! first through the boot handshake and then whenever the queue runs low.
//! Nothing is requested while the device is in standby. Boot progress and
//! link loss reach the face as status notices.

use core::mem::discriminant;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{Duration, Ticker};
use embedded_io_async::{Read, Write};
use jumbo_core::config::FeedConfig;
use jumbo_core::sequence::{HostFeed, LinkEvent};
use jumbo_core::traits::Clock;
use jumbo_protocol::{DeviceMessage, FrameParser, HostMessage};

use crate::channels::{in_standby, notice, with_queue, Notice, STATUS_NOTICE};
use crate::clock::EmbassyClock;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Period of the boot/refill/link check when the line is quiet
const POLL_MS: u64 = 100;

/// Producer state owned by the feed task
struct FeedState {
    feed: HostFeed,
    /// Text the host asked to show during boot, until the phase moves on
    host_text: Option<Notice>,
}

impl FeedState {
    /// The notice the face should be showing right now
    fn notice(&self) -> Option<Notice> {
        match &self.host_text {
            Some(text) if !self.feed.link().is_lost() && !self.feed.boot().is_complete() => {
                Some(text.clone())
            }
            _ => self.feed.notice().map(notice),
        }
    }
}

/// Feed task - keeps the sequence queue stocked
#[embassy_executor::task]
pub async fn feed_task(
    mut rx: BufferedUartRx,
    mut tx: BufferedUartTx,
    config: &'static FeedConfig,
) {
    info!("Feed task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];
    let mut state = FeedState {
        feed: HostFeed::new(config, EmbassyClock.now_ms()),
        host_text: None,
    };
    let mut phase = state.feed.boot().phase();
    let mut shown = state.notice();
    STATUS_NOTICE.signal(shown.clone());

    let mut ticker = Ticker::every(Duration::from_millis(POLL_MS));

    loop {
        let woke = select(rx.read(&mut buf), ticker.next()).await;
        match woke {
            Either::First(Ok(n)) => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match HostMessage::from_frame(&frame) {
                            Ok(msg) => handle_message(msg, &mut state, &mut tx).await,
                            Err(e) => warn!("Failed to parse host message: {:?}", e),
                        },
                        Ok(None) => {}
                        Err(e) => warn!("Frame parse error: {:?}", e),
                    }
                }
            }
            Either::First(Err(e)) => warn!("UART read error: {:?}", e),
            Either::Second(()) => {}
        }

        let now_ms = EmbassyClock.now_ms();
        if let Some(LinkEvent::Lost) = state.feed.poll_link(now_ms) {
            warn!("Host link lost");
        }

        let queued = with_queue(|queue| queue.len());
        if let Some(kind) = state.feed.poll_requests(now_ms, queued, in_standby()) {
            debug!("Requesting steps: {:?}", kind);
            send(&mut tx, DeviceMessage::Request(kind)).await;
        }

        // Retries restamp the phase; only a new phase drops the host's text
        if discriminant(&state.feed.boot().phase()) != discriminant(&phase) {
            phase = state.feed.boot().phase();
            info!("Boot phase: {:?}", phase);
            state.host_text = None;
        }

        let wanted = state.notice();
        if wanted != shown {
            shown = wanted;
            STATUS_NOTICE.signal(shown.clone());
        }
    }
}

/// Apply one host message and send its reply
async fn handle_message(msg: HostMessage, state: &mut FeedState, tx: &mut BufferedUartTx) {
    let now_ms = EmbassyClock.now_ms();
    if let Some(LinkEvent::Restored) = state.feed.frame_received(now_ms) {
        info!("Host link restored");
    }

    let reply = match msg {
        HostMessage::Step(step) => {
            debug!("Step received: {}", step.expression.as_str());
            let (accepted, queued) = with_queue(|queue| (queue.enqueue(step), queue.len()));
            let queued = queued as u8;
            if accepted {
                state.feed.batch_received(now_ms);
                DeviceMessage::Ack { queued }
            } else {
                warn!("Sequence queue full, step rejected");
                DeviceMessage::Busy { queued }
            }
        }
        HostMessage::EndOfBatch { count } => {
            debug!("Batch complete: {} steps", count);
            state.feed.batch_received(now_ms);
            DeviceMessage::Ack {
                queued: with_queue(|queue| queue.len()) as u8,
            }
        }
        HostMessage::Clear => {
            let queued = with_queue(|queue| {
                queue.clear_pending();
                queue.len()
            });
            info!("Queue cleared");
            DeviceMessage::Ack {
                queued: queued as u8,
            }
        }
        HostMessage::Ping => {
            trace!("PING received");
            DeviceMessage::Pong
        }
        HostMessage::HostStatus(text) => {
            if !state.feed.boot().is_complete() {
                state.host_text = Some(text);
            }
            return;
        }
    };

    send(tx, reply).await;
}

/// Encode and write one message
async fn send(tx: &mut BufferedUartTx, msg: DeviceMessage) {
    let frame = match msg.to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Failed to encode {:?}: {:?}", msg, e);
            return;
        }
    };

    let mut out = [0u8; 16];
    match frame.encode(&mut out) {
        Ok(len) => {
            if let Err(e) = tx.write_all(&out[..len]).await {
                warn!("Failed to send {:?}: {:?}", msg, e);
            } else {
                trace!("Sent {:?}", msg);
            }
        }
        Err(e) => warn!("Failed to frame {:?}: {:?}", msg, e),
    }
}
