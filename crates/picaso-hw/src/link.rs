//! Request/acknowledge link over a serial channel.
//!
//! Every command is a strictly synchronous exchange: write the frame, read one
//! status byte, then read exactly the response bytes the command calls for.
//! Nothing is retried here; every failure goes back to the caller.

use crate::channel::{NativeChannel, SerialChannel};
use crate::protocol::{decode_word, decode_word_pair, Frame, Response, ResponseShape, ACK, ERR};
use crate::{Error, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Normal per-read bound.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum number of stale bytes discarded when opening or resetting.
pub const DRAIN_LIMIT: usize = 1024;

/// Connection state of a [`Link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Unopened,
    Open { rate: u32 },
    Closed,
}

/// Owner of a serial channel speaking the display protocol.
pub struct Link<C> {
    channel: Option<C>,
    state: LinkState,
    timeout: Duration,
}

impl<C> Default for Link<C> {
    fn default() -> Self {
        Self {
            channel: None,
            state: LinkState::Unopened,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Link<NativeChannel> {
    /// Opens a serial port and binds a new link to it.
    pub fn connect(port: &str, rate: u32) -> Result<Self> {
        let mut link = Self::new();
        link.open(NativeChannel::open(port, rate)?)?;
        Ok(link)
    }
}

impl<C: SerialChannel> Link<C> {
    /// Creates an unopened link.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an already opened channel and drains anything stale on it.
    pub fn open(&mut self, mut channel: C) -> Result<()> {
        if let LinkState::Open { .. } = self.state {
            return Err(Error::AlreadyOpen);
        }

        channel.flush_input()?;
        channel.flush_output()?;
        let stale = channel.read(DRAIN_LIMIT, Duration::ZERO)?;
        if !stale.is_empty() {
            debug!("Discarded {} stale bytes on open", stale.len());
        }

        let rate = channel.rate();
        self.channel = Some(channel);
        self.state = LinkState::Open { rate };
        info!("Link open at {} baud", rate);
        Ok(())
    }

    /// Closes the link, dropping the channel.
    pub fn close(&mut self) -> Result<()> {
        self.channel()?;
        self.channel = None;
        self.state = LinkState::Closed;
        info!("Link closed");
        Ok(())
    }

    /// Returns the current state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Returns the active rate, if open.
    pub fn rate(&self) -> Option<u32> {
        match self.state {
            LinkState::Open { rate } => Some(rate),
            _ => None,
        }
    }

    /// Returns the per-read bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the per-read bound.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Returns the underlying channel.
    pub fn channel_mut(&mut self) -> Result<&mut C> {
        self.channel()
    }

    fn channel(&mut self) -> Result<&mut C> {
        match (self.state, self.channel.as_mut()) {
            (LinkState::Open { .. }, Some(channel)) => Ok(channel),
            _ => Err(Error::NotOpen),
        }
    }

    /// Sends a frame and decodes the response of the given shape.
    pub fn execute(&mut self, frame: &Frame, shape: ResponseShape) -> Result<Response> {
        debug!("Executing {:02X?} expecting {:?}", frame.as_bytes(), shape);
        self.send_raw(frame.as_bytes())?;
        self.read_status()?;

        let response = match shape {
            ResponseShape::Ack => Response::Ack,
            ResponseShape::Word => Response::Word(self.read_word()?),
            ResponseShape::WordPair => {
                let bytes = self.read_exact(4)?;
                let (a, b) = decode_word_pair(&bytes)?;
                Response::WordPair(a, b)
            }
            ResponseShape::CountedBytes => {
                let count = self.read_word()?;
                Response::Bytes(self.read_exact(count as usize)?)
            }
        };
        Ok(response)
    }

    /// Writes bytes without waiting for a status byte.
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<()> {
        let channel = self.channel()?;
        let written = channel.write(bytes)?;
        if written != bytes.len() {
            return Err(Error::ShortWrite {
                expected: bytes.len(),
                written,
            });
        }
        channel.flush_output()
    }

    /// Reads and classifies one status byte.
    pub fn read_status(&mut self) -> Result<()> {
        let timeout = self.timeout;
        let channel = self.channel()?;
        let status = channel.read(1, timeout)?;
        match status.first().copied() {
            Some(ACK) => Ok(()),
            Some(ERR) => {
                channel.flush_input()?;
                debug!("Display answered ERR");
                Err(Error::CommandRejected)
            }
            Some(other) => {
                channel.flush_input()?;
                warn!("Unexpected status byte 0x{:02X}", other);
                Err(Error::ProtocolDesync(other))
            }
            None => Err(Error::Timeout),
        }
    }

    /// Reads exactly `n` bytes within the per-read bound.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let timeout = self.timeout;
        let bytes = self.channel()?.read(n, timeout)?;
        if bytes.len() != n {
            debug!("Short read: {} of {} bytes", bytes.len(), n);
            return Err(Error::Timeout);
        }
        Ok(bytes)
    }

    /// Reads one big-endian word.
    pub fn read_word(&mut self) -> Result<u16> {
        decode_word(&self.read_exact(2)?)
    }

    /// Discards any buffered input.
    pub fn flush_input(&mut self) -> Result<()> {
        self.channel()?.flush_input()
    }

    /// Rebinds the host-side decode rate.
    pub(crate) fn set_rate(&mut self, rate: u32) -> Result<()> {
        self.channel()?.set_rate(rate)?;
        self.state = LinkState::Open { rate };
        Ok(())
    }

    /// Out-of-band reset: three zero bytes, then drain.
    ///
    /// Recovers from [`Error::ProtocolDesync`] without reopening the port.
    pub fn reset(&mut self) -> Result<()> {
        let channel = self.channel()?;
        let written = channel.write(&[0x00, 0x00, 0x00])?;
        if written != 3 {
            return Err(Error::ShortWrite {
                expected: 3,
                written,
            });
        }
        channel.flush_output()?;
        let drained = channel.read(DRAIN_LIMIT, Duration::ZERO)?;
        info!("Link reset ({} bytes drained)", drained.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Event, MockChannel, Reply};
    use crate::protocol::Opcode;

    fn open(channel: MockChannel) -> Link<MockChannel> {
        let mut link = Link::new();
        link.open(channel).unwrap();
        link
    }

    fn cls() -> Frame {
        Frame::new(Opcode::ClearScreen)
    }

    #[test]
    fn test_ack_consumes_only_status() {
        let mut link = open(MockChannel::new(9600).reply(Reply::Now(vec![ACK, 0xAA, 0xBB])));
        assert_eq!(link.execute(&cls(), ResponseShape::Ack).unwrap(), Response::Ack);
        assert_eq!(link.channel_mut().unwrap().pending_rx(), 2);
    }

    #[test]
    fn test_word_consumes_exactly_three_bytes() {
        let mut link = open(MockChannel::new(9600).reply(Reply::Now(vec![ACK, 0x01, 0xDF, 0x99])));
        let frame = Frame::new(Opcode::GfxGet).word(0);
        assert_eq!(
            link.execute(&frame, ResponseShape::Word).unwrap(),
            Response::Word(479)
        );
        assert_eq!(link.channel_mut().unwrap().pending_rx(), 1);
    }

    #[test]
    fn test_word_pair_consumes_exactly_five_bytes() {
        let mut link = open(
            MockChannel::new(9600).reply(Reply::Now(vec![ACK, 0, 45, 0, 37, 0xEE, 0xEF])),
        );
        let frame = Frame::new(Opcode::Orbit).words(&[40, 60]);
        assert_eq!(
            link.execute(&frame, ResponseShape::WordPair).unwrap(),
            Response::WordPair(45, 37)
        );
        assert_eq!(link.channel_mut().unwrap().pending_rx(), 2);
    }

    #[test]
    fn test_counted_bytes_consume_exactly_the_count() {
        let mut reply = vec![ACK, 0x00, 0x09];
        reply.extend_from_slice(b"uLCD-43PT");
        reply.push(0x55);
        let mut link = open(MockChannel::new(9600).reply(Reply::Now(reply)));
        let frame = Frame::new(Opcode::GetDisplayModel);
        assert_eq!(
            link.execute(&frame, ResponseShape::CountedBytes).unwrap(),
            Response::Bytes(b"uLCD-43PT".to_vec())
        );
        assert_eq!(link.channel_mut().unwrap().pending_rx(), 1);
    }

    #[test]
    fn test_err_is_rejection_and_flushes() {
        let mut link = open(MockChannel::new(9600).reply(Reply::Now(vec![ERR, 0x01, 0x02])));
        assert!(matches!(
            link.execute(&cls(), ResponseShape::Word),
            Err(Error::CommandRejected)
        ));
        assert_eq!(link.channel_mut().unwrap().pending_rx(), 0);
    }

    #[test]
    fn test_unknown_status_is_desync() {
        for status in 0..=u8::MAX {
            if status == ACK || status == ERR {
                continue;
            }
            let mut link = open(MockChannel::new(9600).reply(Reply::Now(vec![status, 0x00, 0x07])));
            match link.execute(&cls(), ResponseShape::Word) {
                Err(Error::ProtocolDesync(byte)) => assert_eq!(byte, status),
                other => panic!("status 0x{:02X} gave {:?}", status, other),
            }
            assert_eq!(link.channel_mut().unwrap().pending_rx(), 0);
        }
    }

    #[test]
    fn test_silence_times_out() {
        let mut link = open(MockChannel::new(9600));
        assert!(matches!(
            link.execute(&cls(), ResponseShape::Ack),
            Err(Error::Timeout)
        ));
    }

    #[test]
    fn test_truncated_body_times_out() {
        let mut link = open(MockChannel::new(9600).reply(Reply::Now(vec![ACK, 0x01])));
        assert!(matches!(
            link.execute(&cls(), ResponseShape::Word),
            Err(Error::Timeout)
        ));
    }

    #[test]
    fn test_short_write() {
        let mut link = open(MockChannel::new(9600).accept_limit(1).reply(Reply::ack()));
        match link.execute(&cls(), ResponseShape::Ack) {
            Err(Error::ShortWrite { expected, written }) => {
                assert_eq!(expected, 2);
                assert_eq!(written, 1);
            }
            other => panic!("expected short write, got {:?}", other),
        }
    }

    #[test]
    fn test_state_transitions() {
        let mut link: Link<MockChannel> = Link::new();
        assert_eq!(link.state(), LinkState::Unopened);
        assert!(matches!(
            link.execute(&cls(), ResponseShape::Ack),
            Err(Error::NotOpen)
        ));

        link.open(MockChannel::new(115200)).unwrap();
        assert_eq!(link.state(), LinkState::Open { rate: 115200 });
        assert!(matches!(
            link.open(MockChannel::new(9600)),
            Err(Error::AlreadyOpen)
        ));

        link.close().unwrap();
        assert_eq!(link.state(), LinkState::Closed);
        assert!(matches!(link.reset(), Err(Error::NotOpen)));
        assert!(matches!(link.close(), Err(Error::NotOpen)));

        link.open(MockChannel::new(9600)).unwrap();
        assert_eq!(link.rate(), Some(9600));
    }

    #[test]
    fn test_open_drains_stale_input() {
        let mut channel = MockChannel::new(9600);
        channel.push_rx(&[0x42; 10]);
        let mut link = open(channel);
        assert_eq!(link.channel_mut().unwrap().pending_rx(), 0);
    }

    #[test]
    fn test_reset_writes_three_zeros_and_drains() {
        let mut link = open(MockChannel::new(9600));
        link.channel_mut().unwrap().push_rx(&[0x15, 0x06]);
        link.reset().unwrap();

        let channel = link.channel_mut().unwrap();
        assert_eq!(channel.writes(), vec![vec![0x00, 0x00, 0x00]]);
        assert_eq!(channel.pending_rx(), 0);
        assert!(channel
            .events
            .contains(&Event::Read(DRAIN_LIMIT, Duration::ZERO)));
    }

    #[test]
    fn test_reads_use_configured_timeout() {
        let mut link = open(MockChannel::new(9600).reply(Reply::ack()));
        link.set_timeout(Duration::from_millis(250));
        link.execute(&cls(), ResponseShape::Ack).unwrap();
        assert!(link
            .channel_mut()
            .unwrap()
            .events
            .contains(&Event::Read(1, Duration::from_millis(250))));
    }
}
