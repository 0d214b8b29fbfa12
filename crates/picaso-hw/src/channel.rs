//! Byte-stream serial channel.
//!
//! The link layer only needs a handful of operations from the port, so they
//! are gathered behind [`SerialChannel`]. [`NativeChannel`] implements it for
//! real serial ports.

use crate::Result;
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;
use tokio_serial::{ClearBuffer, DataBits, Parity, SerialPort, StopBits};
use tracing::{debug, info, trace};

/// Operations the link layer needs from a serial port.
pub trait SerialChannel {
    /// Writes the buffer, returning how many bytes were accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize>;

    /// Reads up to `n` bytes, waiting at most `timeout` for each chunk.
    ///
    /// Returns fewer than `n` bytes only when the bound elapsed first.
    fn read(&mut self, n: usize, timeout: Duration) -> Result<Vec<u8>>;

    /// Blocks until all written bytes have left the host.
    fn flush_output(&mut self) -> Result<()>;

    /// Discards any buffered input.
    fn flush_input(&mut self) -> Result<()>;

    /// Changes the host-side baud rate.
    fn set_rate(&mut self, rate: u32) -> Result<()>;

    /// Returns the host-side baud rate.
    fn rate(&self) -> u32;
}

/// A serial port opened through the operating system.
pub struct NativeChannel {
    port: Box<dyn SerialPort>,
    path: String,
    rate: u32,
    timeout: Duration,
}

impl NativeChannel {
    /// Opens a serial port at 8N1 with the given rate.
    pub fn open(path: &str, rate: u32) -> Result<Self> {
        let timeout = Duration::from_secs(5);
        let port = tokio_serial::new(path, rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(timeout)
            .open()?;

        info!("Serial port {} opened at {} baud", path, rate);

        Ok(Self {
            port,
            path: path.to_string(),
            rate,
            timeout,
        })
    }

    fn apply_timeout(&mut self, timeout: Duration) -> Result<()> {
        if self.timeout != timeout {
            self.port.set_timeout(timeout)?;
            self.timeout = timeout;
        }
        Ok(())
    }
}

impl SerialChannel for NativeChannel {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        trace!("TX {:02X?}", bytes);
        let mut written = 0;
        while written < bytes.len() {
            match self.port.write(&bytes[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(written)
    }

    fn read(&mut self, n: usize, timeout: Duration) -> Result<Vec<u8>> {
        self.apply_timeout(timeout)?;
        let mut buf = vec![0u8; n];
        let mut filled = 0;
        while filled < n {
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(count) => filled += count,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        buf.truncate(filled);
        trace!("RX {:02X?}", buf);
        Ok(buf)
    }

    fn flush_output(&mut self) -> Result<()> {
        self.port.flush()?;
        Ok(())
    }

    fn flush_input(&mut self) -> Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn set_rate(&mut self, rate: u32) -> Result<()> {
        self.port.set_baud_rate(rate)?;
        self.rate = rate;
        debug!("{} switched to {} baud", self.path, rate);
        Ok(())
    }

    fn rate(&self) -> u32 {
        self.rate
    }
}
