//! SCA animation container.
//!
//! ```text
//! 0   "SCA"
//! 3   version            u8
//! 4   width              u16 LE
//! 6   height             u16 LE
//! 8   frame count        u16 LE
//! 10  payload offset     u16 LE (absolute)
//! 12  border color       u8
//! 13  payload type       u8   0 = full screens, 1 = attributes + pattern
//! 14  delay table        one byte per frame, 20 ms units
//! ```
//!
//! Type 0 payloads are `frame count` 6912-byte screens. Type 1 payloads are
//! an 8-byte fill pattern followed by 768-byte attribute frames.

use std::fmt;

use tracing::{debug, warn};

use super::error::ScaError;
use super::layout::{ATTR_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, SCR_SIZE};

pub const SCA_SIGNATURE: &[u8] = b"SCA";
pub const SCA_HEADER_SIZE: usize = 14;
pub const SCA_VERSION: u8 = 1;
pub const PATTERN_SIZE: usize = 8;
/// Duration of one delay unit.
pub const DELAY_UNIT_MS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaPayload {
    /// Complete screens.
    Full,
    /// Attribute frames drawn over one repeated 8-byte pattern.
    Attributes,
}

impl ScaPayload {
    fn from_byte(byte: u8) -> Result<Self, ScaError> {
        match byte {
            0 => Ok(ScaPayload::Full),
            1 => Ok(ScaPayload::Attributes),
            other => Err(ScaError::UnknownPayloadType(other)),
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            ScaPayload::Full => 0,
            ScaPayload::Attributes => 1,
        }
    }

    /// Bytes per frame.
    pub fn frame_size(self) -> usize {
        match self {
            ScaPayload::Full => SCR_SIZE,
            ScaPayload::Attributes => ATTR_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaHeader {
    pub version: u8,
    pub width: u16,
    pub height: u16,
    pub frame_count: u16,
    pub payload_offset: u16,
    pub border: u8,
    pub payload: ScaPayload,
}

impl ScaHeader {
    fn read(bytes: &[u8]) -> Result<Self, ScaError> {
        if bytes.len() < SCA_HEADER_SIZE {
            return Err(ScaError::Truncated {
                expected: SCA_HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        if !bytes.starts_with(SCA_SIGNATURE) {
            return Err(ScaError::BadSignature);
        }
        let word = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        Ok(Self {
            version: bytes[3],
            width: word(4),
            height: word(6),
            frame_count: word(8),
            payload_offset: word(10),
            border: bytes[12],
            payload: ScaPayload::from_byte(bytes[13])?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(SCA_SIGNATURE);
        out.push(self.version);
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.frame_count.to_le_bytes());
        out.extend_from_slice(&self.payload_offset.to_le_bytes());
        out.push(self.border);
        out.push(self.payload.to_byte());
    }
}

/// Non-fatal irregularities found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaWarning {
    UnsupportedVersion(u8),
    UnexpectedDimensions { width: u16, height: u16 },
}

impl fmt::Display for ScaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaWarning::UnsupportedVersion(v) => {
                write!(f, "SCA version {v} is not supported, decoding anyway")
            }
            ScaWarning::UnexpectedDimensions { width, height } => {
                write!(f, "SCA declares {width}x{height}, frames are read as 256x192")
            }
        }
    }
}

/// A parsed SCA file borrowing its frames from the input bytes.
///
/// ```
/// use zx_screen::format::{ScaFile, ScaWriter};
///
/// let mut writer = ScaWriter::new();
/// writer.add_frame(&[0u8; 6912], 100).unwrap();
/// let bytes = writer.finish().unwrap();
/// assert_eq!(bytes.len(), 6927);
///
/// let file = ScaFile::parse(&bytes).unwrap();
/// assert_eq!(file.frame_count(), 1);
/// assert_eq!(file.delay_ms(0), 100);
/// ```
#[derive(Debug, Clone)]
pub struct ScaFile<'a> {
    header: ScaHeader,
    delays: &'a [u8],
    pattern: Option<[u8; PATTERN_SIZE]>,
    frames: &'a [u8],
    warnings: Vec<ScaWarning>,
}

impl<'a> ScaFile<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ScaError> {
        let header = ScaHeader::read(bytes)?;
        let count = header.frame_count as usize;
        if count == 0 {
            return Err(ScaError::ZeroFrames);
        }

        let mut warnings = Vec::new();
        if header.version != SCA_VERSION {
            warn!(version = header.version, "unsupported SCA version");
            warnings.push(ScaWarning::UnsupportedVersion(header.version));
        }
        if (header.width as usize, header.height as usize) != (SCREEN_WIDTH, SCREEN_HEIGHT) {
            warn!(width = header.width, height = header.height, "unexpected SCA dimensions");
            warnings.push(ScaWarning::UnexpectedDimensions {
                width: header.width,
                height: header.height,
            });
        }

        let delays_end = SCA_HEADER_SIZE + count;
        let offset = header.payload_offset as usize;
        if offset < delays_end {
            return Err(ScaError::PayloadOffset { offset });
        }

        let pattern_size = match header.payload {
            ScaPayload::Full => 0,
            ScaPayload::Attributes => PATTERN_SIZE,
        };
        let frames_start = offset + pattern_size;
        let expected = frames_start + count * header.payload.frame_size();
        if bytes.len() < expected {
            return Err(ScaError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        let pattern = match header.payload {
            ScaPayload::Full => None,
            ScaPayload::Attributes => {
                let mut p = [0u8; PATTERN_SIZE];
                p.copy_from_slice(&bytes[offset..frames_start]);
                Some(p)
            }
        };

        debug!(frames = count, payload = ?header.payload, "parsed SCA header");
        Ok(Self {
            header,
            delays: &bytes[SCA_HEADER_SIZE..delays_end],
            pattern,
            frames: &bytes[frames_start..expected],
            warnings,
        })
    }

    pub fn header(&self) -> &ScaHeader {
        &self.header
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    pub fn payload(&self) -> ScaPayload {
        self.header.payload
    }

    /// Border color index (0..8).
    pub fn border(&self) -> u8 {
        self.header.border & 7
    }

    /// Raw delay table, 20 ms units.
    pub fn delays(&self) -> &'a [u8] {
        self.delays
    }

    pub fn delay_ms(&self, index: usize) -> u32 {
        self.delays.get(index).map_or(0, |&d| d as u32 * DELAY_UNIT_MS)
    }

    /// The fill pattern of attribute-only files.
    pub fn pattern(&self) -> Option<[u8; PATTERN_SIZE]> {
        self.pattern
    }

    /// Bytes of frame `index`: a full screen or a 768-byte attribute block
    /// depending on [`ScaFile::payload`].
    pub fn frame(&self, index: usize) -> Result<&'a [u8], ScaError> {
        let count = self.frame_count();
        if index >= count {
            return Err(ScaError::FrameOutOfRange { index, count });
        }
        let size = self.header.payload.frame_size();
        Ok(&self.frames[index * size..(index + 1) * size])
    }

    pub fn warnings(&self) -> &[ScaWarning] {
        &self.warnings
    }
}

/// Builds an SCA file from already-encoded frames.
#[derive(Debug, Clone)]
pub struct ScaWriter {
    payload: ScaPayload,
    pattern: [u8; PATTERN_SIZE],
    border: u8,
    frames: Vec<u8>,
    delays: Vec<u8>,
}

impl Default for ScaWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaWriter {
    /// Writer for full 6912-byte screens.
    pub fn new() -> Self {
        Self {
            payload: ScaPayload::Full,
            pattern: [0; PATTERN_SIZE],
            border: 0,
            frames: Vec::new(),
            delays: Vec::new(),
        }
    }

    /// Writer for 768-byte attribute frames over `pattern`.
    pub fn attributes(pattern: [u8; PATTERN_SIZE]) -> Self {
        Self {
            payload: ScaPayload::Attributes,
            pattern,
            ..Self::new()
        }
    }

    pub fn border(mut self, color: u8) -> Self {
        self.border = color & 7;
        self
    }

    /// Append a frame shown for `delay_ms`, rounded to 20 ms units and kept
    /// within 1..=255 units.
    pub fn add_frame(&mut self, frame: &[u8], delay_ms: u32) -> Result<(), ScaError> {
        let expected = self.payload.frame_size();
        if frame.len() != expected {
            return Err(ScaError::FrameSize {
                expected,
                actual: frame.len(),
            });
        }
        let units = ((delay_ms + DELAY_UNIT_MS / 2) / DELAY_UNIT_MS).clamp(1, 255);
        self.frames.extend_from_slice(frame);
        self.delays.push(units as u8);
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.delays.len()
    }

    pub fn finish(self) -> Result<Vec<u8>, ScaError> {
        let count = self.delays.len();
        if count == 0 {
            return Err(ScaError::ZeroFrames);
        }
        let frame_count = u16::try_from(count).map_err(|_| ScaError::TooManyFrames(count))?;
        let payload_offset = u16::try_from(SCA_HEADER_SIZE + count)
            .map_err(|_| ScaError::TooManyFrames(count))?;

        let header = ScaHeader {
            version: SCA_VERSION,
            width: SCREEN_WIDTH as u16,
            height: SCREEN_HEIGHT as u16,
            frame_count,
            payload_offset,
            border: self.border,
            payload: self.payload,
        };

        let mut out = Vec::with_capacity(payload_offset as usize + PATTERN_SIZE + self.frames.len());
        header.write(&mut out);
        out.extend_from_slice(&self.delays);
        if self.payload == ScaPayload::Attributes {
            out.extend_from_slice(&self.pattern);
        }
        out.extend_from_slice(&self.frames);
        debug!(frames = count, bytes = out.len(), "wrote SCA file");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header_bytes(version: u8, count: u16, offset: u16, payload: u8) -> Vec<u8> {
        let mut bytes = b"SCA".to_vec();
        bytes.push(version);
        bytes.extend_from_slice(&256u16.to_le_bytes());
        bytes.extend_from_slice(&192u16.to_le_bytes());
        bytes.extend_from_slice(&count.to_le_bytes());
        bytes.extend_from_slice(&offset.to_le_bytes());
        bytes.push(3);
        bytes.push(payload);
        bytes
    }

    #[test]
    fn test_minimal_file() {
        let mut bytes = header_bytes(1, 1, 15, 0);
        bytes.push(5);
        bytes.extend(std::iter::repeat(0xAB).take(SCR_SIZE));
        assert_eq!(bytes.len(), 6927);

        let file = ScaFile::parse(&bytes).unwrap();
        assert_eq!(file.frame_count(), 1);
        assert_eq!(file.border(), 3);
        assert_eq!(file.delay_ms(0), 100);
        assert!(file.warnings().is_empty());
        assert_eq!(file.frame(0).unwrap().len(), SCR_SIZE);
        assert!(matches!(
            file.frame(1),
            Err(ScaError::FrameOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_rejects_zero_frames() {
        let mut bytes = header_bytes(1, 0, 14, 0);
        bytes.extend(std::iter::repeat(0).take(SCR_SIZE));
        assert_eq!(ScaFile::parse(&bytes).unwrap_err(), ScaError::ZeroFrames);
    }

    #[test]
    fn test_rejects_bad_signature_and_payload() {
        let mut bytes = header_bytes(1, 1, 15, 0);
        bytes[0] = b'X';
        assert_eq!(ScaFile::parse(&bytes).unwrap_err(), ScaError::BadSignature);

        let bytes = header_bytes(1, 1, 15, 7);
        assert_eq!(
            ScaFile::parse(&bytes).unwrap_err(),
            ScaError::UnknownPayloadType(7)
        );
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = header_bytes(1, 2, 16, 0);
        bytes.extend_from_slice(&[1, 1]);
        bytes.extend(std::iter::repeat(0).take(SCR_SIZE));
        assert_eq!(
            ScaFile::parse(&bytes).unwrap_err(),
            ScaError::Truncated {
                expected: 16 + 2 * SCR_SIZE,
                actual: 16 + SCR_SIZE,
            }
        );
    }

    #[test]
    fn test_version_mismatch_is_a_warning() {
        let mut bytes = header_bytes(9, 1, 15, 0);
        bytes.push(1);
        bytes.extend(std::iter::repeat(0).take(SCR_SIZE));
        let file = ScaFile::parse(&bytes).unwrap();
        assert_eq!(file.warnings(), &[ScaWarning::UnsupportedVersion(9)]);
    }

    #[test]
    fn test_attribute_payload() {
        let pattern = [0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55];
        let mut writer = ScaWriter::attributes(pattern).border(2);
        writer.add_frame(&[0x38; ATTR_SIZE], 40).unwrap();
        writer.add_frame(&[0x07; ATTR_SIZE], 1).unwrap();
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), SCA_HEADER_SIZE + 2 + PATTERN_SIZE + 2 * ATTR_SIZE);

        let file = ScaFile::parse(&bytes).unwrap();
        assert_eq!(file.payload(), ScaPayload::Attributes);
        assert_eq!(file.pattern(), Some(pattern));
        assert_eq!(file.delays(), &[2, 1]);
        assert_eq!(file.frame(1).unwrap()[0], 0x07);
    }

    #[test]
    fn test_writer_checks_frame_size() {
        let mut writer = ScaWriter::new();
        assert_eq!(
            writer.add_frame(&[0; 100], 20),
            Err(ScaError::FrameSize {
                expected: SCR_SIZE,
                actual: 100
            })
        );
        assert_eq!(writer.finish(), Err(ScaError::ZeroFrames));
    }
}
