//! Serial protocol definitions and encoding.
//!
//! Protocol structure:
//! - Request: 2 opcode bytes, then big-endian 16-bit words, optionally followed
//!   by a NUL-terminated string for text-carrying commands
//! - Response: 1 status byte (0x06 ACK, 0x15 ERR), then 0, 2 or 4 bytes, or a
//!   word-prefixed byte string, depending on the command

use crate::{Error, Result};

/// Acknowledge status byte.
pub const ACK: u8 = 0x06;

/// Reject status byte.
pub const ERR: u8 = 0x15;

/// Longest string accepted by `putstr`, excluding the terminator.
pub const MAX_STRING_LEN: usize = 511;

/// Device baud rate table: (index sent on the wire, bits per second).
pub const BAUD_RATES: [(u16, u32); 20] = [
    (0, 110),
    (1, 300),
    (2, 600),
    (3, 1200),
    (4, 2400),
    (5, 4800),
    (6, 9600),
    (7, 14400),
    (8, 19200),
    (9, 31250),
    (10, 38400),
    (11, 56000),
    (12, 57600),
    (13, 115200),
    (14, 128000),
    (15, 256000),
    (16, 300000),
    (17, 375000),
    (18, 500000),
    (19, 600000),
];

/// Rates the host serial driver can reliably select.
pub const HOST_BAUD_RATES: [u32; 17] = [
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
    115200,
];

/// Returns the device table index for a rate, if the device supports it.
pub fn baud_index(rate: u32) -> Option<u16> {
    BAUD_RATES
        .iter()
        .find(|(_, r)| *r == rate)
        .map(|(index, _)| *index)
}

/// Returns true if the host serial driver supports this rate.
pub fn host_supports(rate: u32) -> bool {
    HOST_BAUD_RATES.contains(&rate)
}

/// Command opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Opcode {
    // Text and string commands
    MoveCursor = 0xFFE9,
    PutChar = 0xFFFE,
    PutStr = 0x0018,
    CharWidth = 0x001E,
    CharHeight = 0x001D,
    TextFgColour = 0xFFE7,
    TextBgColour = 0xFFE6,
    TextFontId = 0xFFE5,
    TextWidth = 0xFFE4,
    TextHeight = 0xFFE3,
    TextXGap = 0xFFE2,
    TextYGap = 0xFFE1,
    TextBold = 0xFFDE,
    TextInverse = 0xFFDC,
    TextItalic = 0xFFDD,
    TextOpacity = 0xFFDF,
    TextUnderline = 0xFFDB,
    TextAttributes = 0xFFDA,

    // Graphics commands
    ClearScreen = 0xFFCD,
    ChangeColour = 0xFFB4,
    Circle = 0xFFC3,
    CircleFilled = 0xFFC2,
    Line = 0xFFC8,
    Rectangle = 0xFFC5,
    RectangleFilled = 0xFFC4,
    Polyline = 0x0015,
    Polygon = 0x0013,
    PolygonFilled = 0x0014,
    Triangle = 0xFFBF,
    TriangleFilled = 0xFFA9,
    Orbit = 0x0012,
    PutPixel = 0xFFC1,
    GetPixel = 0xFFC0,
    MoveTo = 0xFFCC,
    LineTo = 0xFFCA,
    Clipping = 0xFFA2,
    ClipWindow = 0xFFB5,
    SetClipRegion = 0xFFB3,
    Ellipse = 0xFFB2,
    EllipseFilled = 0xFFB1,
    Button = 0x0011,
    Panel = 0xFFAF,
    Slider = 0xFFAE,
    ScreenCopyPaste = 0xFFAD,
    BevelShadow = 0xFF98,
    BevelWidth = 0xFF99,
    BackgroundColour = 0xFFA4,
    OutlineColour = 0xFF9D,
    Contrast = 0xFF9C,
    FrameDelay = 0xFF9F,
    LinePattern = 0xFF9B,
    ScreenMode = 0xFF9E,
    Transparency = 0xFFA0,
    TransparentColour = 0xFFA1,
    GfxSet = 0xFFCE,
    GfxGet = 0xFFA6,

    // Serial commands
    SetBaudRate = 0x0026,

    // Timer commands
    Sleep = 0xFF3B,

    // Touch screen commands
    TouchDetectRegion = 0xFF39,
    TouchSet = 0xFF38,
    TouchGet = 0xFF37,

    // System commands
    GetDisplayModel = 0x001A,
}

impl Opcode {
    /// Returns the two opcode bytes as sent on the wire.
    pub fn to_bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }
}

/// Expected response following the status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Status byte only.
    Ack,
    /// Status byte and one word.
    Word,
    /// Status byte and two words.
    WordPair,
    /// Status byte, a word `N`, then `N` raw bytes.
    CountedBytes,
}

/// Decoded response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ack,
    Word(u16),
    WordPair(u16, u16),
    Bytes(Vec<u8>),
}

impl Response {
    /// Returns the word carried by a [`Response::Word`].
    pub fn into_word(self) -> Result<u16> {
        match self {
            Response::Word(value) => Ok(value),
            other => Err(Error::invalid(format!("expected word response, got {:?}", other))),
        }
    }

    /// Returns the words carried by a [`Response::WordPair`].
    pub fn into_word_pair(self) -> Result<(u16, u16)> {
        match self {
            Response::WordPair(a, b) => Ok((a, b)),
            other => Err(Error::invalid(format!(
                "expected word pair response, got {:?}",
                other
            ))),
        }
    }

    /// Returns the bytes carried by a [`Response::Bytes`].
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Response::Bytes(bytes) => Ok(bytes),
            other => Err(Error::invalid(format!(
                "expected byte string response, got {:?}",
                other
            ))),
        }
    }
}

/// Packs each value big-endian, concatenated in order.
pub fn encode_words(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// Decodes a big-endian word from exactly two bytes.
pub fn decode_word(bytes: &[u8]) -> Result<u16> {
    match bytes {
        [hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(Error::invalid(format!(
            "word needs 2 bytes, got {}",
            bytes.len()
        ))),
    }
}

/// Decodes two big-endian words from exactly four bytes.
pub fn decode_word_pair(bytes: &[u8]) -> Result<(u16, u16)> {
    if bytes.len() != 4 {
        return Err(Error::invalid(format!(
            "word pair needs 4 bytes, got {}",
            bytes.len()
        )));
    }
    Ok((decode_word(&bytes[..2])?, decode_word(&bytes[2..])?))
}

/// One encoded command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Starts a frame with the given opcode.
    pub fn new(opcode: Opcode) -> Self {
        Self {
            bytes: opcode.to_bytes().to_vec(),
        }
    }

    /// Appends one big-endian word.
    pub fn word(mut self, value: u16) -> Self {
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends several big-endian words.
    pub fn words(mut self, values: &[u16]) -> Self {
        self.bytes.extend(encode_words(values));
        self
    }

    /// Appends a single raw byte.
    pub fn byte(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    /// Appends a NUL-terminated string.
    pub fn text(mut self, text: &[u8]) -> Self {
        self.bytes.extend_from_slice(text);
        self.bytes.push(0);
        self
    }

    /// Returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
