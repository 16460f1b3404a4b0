//! Message types for the step feed link
//!
//! Message types are divided into two directions:
//! - Host → device: steps to queue, queue control, liveness, status text
//! - Device → host: step requests, queue acknowledgements, liveness

use heapless::String;
use jumbo_core::sequence::{RequestKind, SequenceStep};

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: host → device
pub const MSG_STEP: u8 = 0x10;
pub const MSG_CLEAR: u8 = 0x11;
pub const MSG_PING: u8 = 0x12;
pub const MSG_HOST_STATUS: u8 = 0x13;
pub const MSG_END_OF_BATCH: u8 = 0x14;

// Message type IDs: device → host
pub const MSG_REQUEST: u8 = 0x20;
pub const MSG_ACK: u8 = 0x21;
pub const MSG_BUSY: u8 = 0x22;
pub const MSG_PONG: u8 = 0x23;

/// Longest host status line kept (bytes)
pub const MAX_STATUS_LEN: usize = 32;

const REQUEST_BOOT: u8 = 0x01;
const REQUEST_REFILL: u8 = 0x02;

/// Messages sent by the host
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage {
    /// Append a step to the queue
    Step(SequenceStep),
    /// Drop queued steps; the one on screen plays out
    Clear,
    /// Reply to a request is complete; `count` steps were sent, possibly 0
    EndOfBatch { count: u8 },
    /// Liveness check; also keeps the link from being reported lost
    Ping,
    /// Text for the status line (shown only while booting)
    HostStatus(String<MAX_STATUS_LEN>),
}

impl HostMessage {
    /// Parse a host message from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.kind {
            MSG_STEP => postcard::from_bytes(&frame.payload)
                .map(HostMessage::Step)
                .map_err(|_| FrameError::BadPayload),
            MSG_CLEAR => Ok(HostMessage::Clear),
            MSG_END_OF_BATCH => frame
                .payload
                .first()
                .map(|&count| HostMessage::EndOfBatch { count })
                .ok_or(FrameError::BadPayload),
            MSG_PING => Ok(HostMessage::Ping),
            MSG_HOST_STATUS => {
                let text =
                    core::str::from_utf8(&frame.payload).map_err(|_| FrameError::BadPayload)?;
                let mut status = String::new();
                for ch in text.chars() {
                    if status.push(ch).is_err() {
                        break;
                    }
                }
                Ok(HostMessage::HostStatus(status))
            }
            other => Err(FrameError::UnknownType(other)),
        }
    }

    /// Encode into a frame (host side and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            HostMessage::Step(step) => {
                let mut buf = [0u8; MAX_PAYLOAD_SIZE];
                let used = postcard::to_slice(step, &mut buf)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Frame::new(MSG_STEP, used)
            }
            HostMessage::Clear => Ok(Frame::empty(MSG_CLEAR)),
            HostMessage::EndOfBatch { count } => Frame::new(MSG_END_OF_BATCH, &[*count]),
            HostMessage::Ping => Ok(Frame::empty(MSG_PING)),
            HostMessage::HostStatus(text) => Frame::new(MSG_HOST_STATUS, text.as_bytes()),
        }
    }
}

/// Messages sent by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// Ask the host for steps
    Request(RequestKind),
    /// Step accepted; queue length afterwards
    Ack { queued: u8 },
    /// Step rejected because the queue is full
    Busy { queued: u8 },
    /// Reply to [`HostMessage::Ping`]
    Pong,
}

impl DeviceMessage {
    /// Encode into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            DeviceMessage::Request(RequestKind::Boot) => Frame::new(MSG_REQUEST, &[REQUEST_BOOT]),
            DeviceMessage::Request(RequestKind::Refill) => {
                Frame::new(MSG_REQUEST, &[REQUEST_REFILL])
            }
            DeviceMessage::Ack { queued } => Frame::new(MSG_ACK, &[*queued]),
            DeviceMessage::Busy { queued } => Frame::new(MSG_BUSY, &[*queued]),
            DeviceMessage::Pong => Ok(Frame::empty(MSG_PONG)),
        }
    }

    /// Parse a device message (host side and tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let first = || frame.payload.first().copied().ok_or(FrameError::BadPayload);
        match frame.kind {
            MSG_REQUEST => match first()? {
                REQUEST_BOOT => Ok(DeviceMessage::Request(RequestKind::Boot)),
                REQUEST_REFILL => Ok(DeviceMessage::Request(RequestKind::Refill)),
                _ => Err(FrameError::BadPayload),
            },
            MSG_ACK => Ok(DeviceMessage::Ack { queued: first()? }),
            MSG_BUSY => Ok(DeviceMessage::Busy { queued: first()? }),
            MSG_PONG => Ok(DeviceMessage::Pong),
            other => Err(FrameError::UnknownType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameParser;

    #[test]
    fn test_step_survives_the_wire() {
        let step = SequenceStep::new("happy", "hello there", 0.25, 2.0);
        let bytes = HostMessage::Step(step.clone())
            .to_frame()
            .unwrap()
            .to_bytes()
            .unwrap();

        let mut parser = FrameParser::new();
        let (frame, _) = parser.feed_slice(&bytes).unwrap();
        let msg = HostMessage::from_frame(&frame.unwrap()).unwrap();
        assert_eq!(msg, HostMessage::Step(step));
    }

    #[test]
    fn test_longest_step_fits_one_frame() {
        let caption: std::string::String = "x".repeat(jumbo_core::sequence::MAX_CAPTION_LEN);
        let step = SequenceStep::new("shocked", &caption, 1.0, 1.0);
        let frame = HostMessage::Step(step).to_frame().unwrap();
        assert!(frame.payload.len() <= MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn test_garbled_step_rejected() {
        let frame = Frame::new(MSG_STEP, &[0xFF]).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame),
            Err(FrameError::BadPayload)
        );
    }

    #[test]
    fn test_host_status_truncated() {
        let text = [b'a'; 40];
        let frame = Frame::new(MSG_HOST_STATUS, &text).unwrap();
        match HostMessage::from_frame(&frame).unwrap() {
            HostMessage::HostStatus(s) => assert_eq!(s.len(), MAX_STATUS_LEN),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_host_status_rejects_invalid_utf8() {
        let frame = Frame::new(MSG_HOST_STATUS, &[0xC3]).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame),
            Err(FrameError::BadPayload)
        );
    }

    #[test]
    fn test_empty_batch_marker() {
        let bytes = HostMessage::EndOfBatch { count: 0 }
            .to_frame()
            .unwrap()
            .to_bytes()
            .unwrap();
        let mut parser = FrameParser::new();
        let (frame, _) = parser.feed_slice(&bytes).unwrap();
        assert_eq!(
            HostMessage::from_frame(&frame.unwrap()),
            Ok(HostMessage::EndOfBatch { count: 0 })
        );

        let bare = Frame::empty(MSG_END_OF_BATCH);
        assert_eq!(HostMessage::from_frame(&bare), Err(FrameError::BadPayload));
    }

    #[test]
    fn test_unknown_host_type() {
        let frame = Frame::empty(0x7F);
        assert_eq!(
            HostMessage::from_frame(&frame),
            Err(FrameError::UnknownType(0x7F))
        );
    }

    #[test]
    fn test_device_messages() {
        let frame = DeviceMessage::Request(RequestKind::Refill).to_frame().unwrap();
        assert_eq!(frame.kind, MSG_REQUEST);
        assert_eq!(&frame.payload[..], &[REQUEST_REFILL]);

        let frame = DeviceMessage::Busy { queued: 20 }.to_frame().unwrap();
        assert_eq!(
            DeviceMessage::from_frame(&frame),
            Ok(DeviceMessage::Busy { queued: 20 })
        );

        let frame = DeviceMessage::Pong.to_frame().unwrap();
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_device_request_needs_payload() {
        let frame = Frame::empty(MSG_ACK);
        assert_eq!(
            DeviceMessage::from_frame(&frame),
            Err(FrameError::BadPayload)
        );
    }
}
