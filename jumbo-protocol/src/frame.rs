//! Byte framing for the step feed link
//!
//! Frame format:
//! - START (1 byte): 0x5A synchronization byte
//! - LEN (1 byte): payload length (0-200)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-200 bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of LEN, TYPE, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x5A;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 200;

/// Bytes around the payload (START, LEN, TYPE, CHECKSUM)
pub const FRAME_OVERHEAD: usize = 4;

/// Largest complete frame on the wire
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

/// Framing and payload errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload longer than [`MAX_PAYLOAD_SIZE`]
    PayloadTooLarge,
    /// LEN byte announced an impossible length
    BadLength,
    /// Checksum did not match the received bytes
    InvalidChecksum,
    /// Output buffer cannot hold the encoded frame
    BufferTooSmall,
    /// TYPE byte not known to this side of the link
    UnknownType(u8),
    /// Payload did not decode for its message type
    BadPayload,
}

/// One framed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub kind: u8,
    /// Raw payload
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Frame carrying `payload`
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { kind, payload })
    }

    /// Frame with no payload
    pub fn empty(kind: u8) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    fn checksum(len: u8, kind: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(len ^ kind, |acc, &b| acc ^ b)
    }

    /// Size of this frame on the wire
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    /// Write the frame into `out`, returning the bytes used
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, FrameError> {
        let total = self.encoded_len();
        if out.len() < total {
            return Err(FrameError::BufferTooSmall);
        }

        let len = self.payload.len() as u8;
        let end = 3 + self.payload.len();
        out[0] = FRAME_START;
        out[1] = len;
        out[2] = self.kind;
        out[3..end].copy_from_slice(&self.payload);
        out[end] = Self::checksum(len, self.kind, &self.payload);

        Ok(total)
    }

    /// Encode into an owned buffer
    pub fn to_bytes(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let used = self.encode(&mut buf)?;
        Vec::from_slice(&buf[..used]).map_err(|_| FrameError::BufferTooSmall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Sync,
    Length,
    Kind,
    Payload,
    Checksum,
}

/// Incremental frame decoder
///
/// Bytes are fed one at a time as they come off the UART. Anything before a
/// START byte is skipped, and after an error the decoder hunts for the next
/// START, so a corrupted frame costs at most that frame.
#[derive(Debug, Clone)]
pub struct FrameParser {
    stage: Stage,
    len: u8,
    kind: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            stage: Stage::Sync,
            len: 0,
            kind: 0,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.stage = Stage::Sync;
        self.len = 0;
        self.kind = 0;
        self.payload.clear();
    }

    /// Feed one byte
    ///
    /// Returns `Ok(Some(frame))` once a frame completes, `Ok(None)` while
    /// more bytes are needed.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.stage {
            Stage::Sync => {
                if byte == FRAME_START {
                    self.stage = Stage::Length;
                }
            }
            Stage::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::BadLength);
                }
                self.len = byte;
                self.stage = Stage::Kind;
            }
            Stage::Kind => {
                self.kind = byte;
                self.payload.clear();
                self.stage = if self.len == 0 {
                    Stage::Checksum
                } else {
                    Stage::Payload
                };
            }
            Stage::Payload => {
                // Length was bounded in Stage::Length
                let _ = self.payload.push(byte);
                if self.payload.len() == self.len as usize {
                    self.stage = Stage::Checksum;
                }
            }
            Stage::Checksum => {
                let expected = Frame::checksum(self.len, self.kind, &self.payload);
                let frame = Frame {
                    kind: self.kind,
                    payload: self.payload.clone(),
                };
                self.reset();
                if byte != expected {
                    return Err(FrameError::InvalidChecksum);
                }
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Feed bytes until a frame completes
    ///
    /// Returns the frame and how many bytes were consumed; bytes after the
    /// frame are left for the next call.
    pub fn feed_slice(&mut self, bytes: &[u8]) -> Result<(Option<Frame>, usize), FrameError> {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(frame) = self.feed(byte)? {
                return Ok((Some(frame), i + 1));
            }
        }
        Ok((None, bytes.len()))
    }
}
