//! Baud rate detection and live renegotiation.
//!
//! Detection walks the device rate table, asking for the display model at each
//! rate until one answers. Switching sends the table index of the new rate,
//! and the module changes speed as soon as the command is received, so the
//! host must rebind its own rate before reading the acknowledgement.

use crate::channel::SerialChannel;
use crate::link::Link;
use crate::protocol::{host_supports, Frame, Opcode, ResponseShape, BAUD_RATES};
use crate::{Error, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-read bound while probing a candidate rate.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(250);

/// Negotiator progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiatorState {
    /// Trying the candidate at this table position.
    Probing(usize),
    /// Host and module agree on this rate.
    Locked(u32),
    /// No candidate answered, or a switch was not acknowledged.
    Failed,
}

/// Finds and changes the module's serial rate.
#[derive(Debug, Clone)]
pub struct BaudNegotiator {
    table: Vec<(u16, u32)>,
    probe_timeout: Duration,
    state: NegotiatorState,
}

impl Default for BaudNegotiator {
    fn default() -> Self {
        Self::with_table(&BAUD_RATES)
    }
}

impl BaudNegotiator {
    /// Creates a negotiator over the device's full rate table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a negotiator over a custom `(index, rate)` table.
    pub fn with_table(table: &[(u16, u32)]) -> Self {
        Self {
            table: table.to_vec(),
            probe_timeout: PROBE_TIMEOUT,
            state: NegotiatorState::Probing(0),
        }
    }

    /// Overrides the per-read bound used while probing.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Returns the current state.
    pub fn state(&self) -> NegotiatorState {
        self.state
    }

    /// Probes each candidate rate in table order and locks onto the first
    /// one at which the module answers.
    ///
    /// The link's normal timeout is restored afterwards whatever the outcome.
    /// If no rate answers, the link is returned to the rate it started at.
    pub fn detect<C: SerialChannel>(&mut self, link: &mut Link<C>) -> Result<u32> {
        // fail fast rather than probing a dead link
        link.channel_mut()?;

        let normal = link.timeout();
        let initial_rate = link.rate();
        link.set_timeout(self.probe_timeout);
        let result = self.probe_all(link);
        link.set_timeout(normal);

        if result.is_err() {
            if let Some(rate) = initial_rate {
                // leave the link where the caller had it
                if let Err(e) = link.set_rate(rate) {
                    warn!("Could not restore {} baud: {}", rate, e);
                }
            }
        }
        result
    }

    fn probe_all<C: SerialChannel>(&mut self, link: &mut Link<C>) -> Result<u32> {
        for i in 0..self.table.len() {
            let (_, rate) = self.table[i];
            self.state = NegotiatorState::Probing(i);
            match probe(link, rate) {
                Ok(model) if model.is_empty() => debug!("Empty model string at {} baud", rate),
                Ok(model) => {
                    info!(
                        "Display answered at {} baud ({})",
                        rate,
                        String::from_utf8_lossy(&model)
                    );
                    self.state = NegotiatorState::Locked(rate);
                    return Ok(rate);
                }
                Err(e) => debug!("No answer at {} baud: {}", rate, e),
            }
        }

        self.state = NegotiatorState::Failed;
        Err(Error::NoMatchingBaudRate)
    }

    /// Switches both ends of the link to `rate`.
    pub fn switch<C: SerialChannel>(&mut self, link: &mut Link<C>, rate: u32) -> Result<()> {
        let index = self
            .table
            .iter()
            .find(|(_, r)| *r == rate)
            .map(|(index, _)| *index)
            .ok_or_else(|| Error::invalid(format!("unsupported baud rate {}", rate)))?;
        if !host_supports(rate) {
            return Err(Error::UnsupportedByHost(rate));
        }

        info!("Switching to {} baud (index {})", rate, index);
        let frame = Frame::new(Opcode::SetBaudRate).word(index);
        link.send_raw(frame.as_bytes())?;

        // the module is already talking at the new rate
        link.set_rate(rate)?;
        link.flush_input()?;

        match link.read_status() {
            Ok(()) => {
                self.state = NegotiatorState::Locked(rate);
                debug!("Baud switch acknowledged at {}", rate);
                Ok(())
            }
            Err(e) => {
                self.state = NegotiatorState::Failed;
                Err(e)
            }
        }
    }
}

fn probe<C: SerialChannel>(link: &mut Link<C>, rate: u32) -> Result<Vec<u8>> {
    link.set_rate(rate)?;
    link.flush_input()?;
    link.execute(
        &Frame::new(Opcode::GetDisplayModel),
        ResponseShape::CountedBytes,
    )?
    .into_bytes()
}
