//! Scripted serial channel standing in for a display module in tests.

use crate::channel::SerialChannel;
use crate::protocol::{ACK, ERR};
use crate::Result;
use std::collections::VecDeque;
use std::time::Duration;

/// What the simulated module sends back after a write.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Bytes arrive immediately at whatever rate the host is using.
    Now(Vec<u8>),
    /// Bytes are transmitted at the given rate; the host reads garbage
    /// unless its own rate matches when it reads.
    AtRate(u32, Vec<u8>),
    /// Nothing comes back.
    Silence,
}

impl Reply {
    pub fn ack() -> Self {
        Reply::Now(vec![ACK])
    }

    pub fn err() -> Self {
        Reply::Now(vec![ERR])
    }

    pub fn ack_word(value: u16) -> Self {
        let mut bytes = vec![ACK];
        bytes.extend_from_slice(&value.to_be_bytes());
        Reply::Now(bytes)
    }

    pub fn ack_counted(data: &[u8]) -> Self {
        let mut bytes = vec![ACK];
        bytes.extend_from_slice(&(data.len() as u16).to_be_bytes());
        bytes.extend_from_slice(data);
        Reply::Now(bytes)
    }
}

/// Everything the host did to the channel, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(Vec<u8>),
    Read(usize, Duration),
    FlushOutput,
    FlushInput,
    SetRate(u32),
}

type Responder = Box<dyn FnMut(&[u8], u32) -> Reply>;

/// In-memory channel with a scripted peer.
pub struct MockChannel {
    rate: u32,
    rx: VecDeque<u8>,
    in_flight: Option<(u32, Vec<u8>)>,
    script: VecDeque<Reply>,
    responder: Option<Responder>,
    accept_limit: Option<usize>,
    pub events: Vec<Event>,
}

impl MockChannel {
    pub fn new(rate: u32) -> Self {
        Self {
            rate,
            rx: VecDeque::new(),
            in_flight: None,
            script: VecDeque::new(),
            responder: None,
            accept_limit: None,
            events: Vec::new(),
        }
    }

    /// Queues a reply released by the next write.
    pub fn reply(mut self, reply: Reply) -> Self {
        self.script.push_back(reply);
        self
    }

    /// Computes replies from the written frame and current host rate.
    pub fn responder(mut self, f: impl FnMut(&[u8], u32) -> Reply + 'static) -> Self {
        self.responder = Some(Box::new(f));
        self
    }

    /// Accept at most this many bytes per write.
    pub fn accept_limit(mut self, limit: usize) -> Self {
        self.accept_limit = Some(limit);
        self
    }

    /// Places bytes in the receive buffer right away.
    pub fn push_rx(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Bytes left unread by the host.
    pub fn pending_rx(&self) -> usize {
        self.rx.len()
    }

    /// All frames written, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    fn land_in_flight(&mut self) {
        if let Some((rate, bytes)) = self.in_flight.take() {
            if rate == self.rate {
                self.rx.extend(bytes);
            } else {
                // framing errors at the wrong rate
                self.rx.extend(bytes.iter().map(|b| !b));
            }
        }
    }
}

impl SerialChannel for MockChannel {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        let accepted = self.accept_limit.map_or(bytes.len(), |l| l.min(bytes.len()));
        self.events.push(Event::Write(bytes[..accepted].to_vec()));

        let reply = match self.responder.as_mut() {
            Some(f) => f(bytes, self.rate),
            None => self.script.pop_front().unwrap_or(Reply::Silence),
        };
        match reply {
            Reply::Now(data) => self.rx.extend(data),
            Reply::AtRate(rate, data) => self.in_flight = Some((rate, data)),
            Reply::Silence => {}
        }
        Ok(accepted)
    }

    fn read(&mut self, n: usize, timeout: Duration) -> Result<Vec<u8>> {
        self.events.push(Event::Read(n, timeout));
        self.land_in_flight();
        let take = n.min(self.rx.len());
        Ok(self.rx.drain(..take).collect())
    }

    fn flush_output(&mut self) -> Result<()> {
        self.events.push(Event::FlushOutput);
        Ok(())
    }

    fn flush_input(&mut self) -> Result<()> {
        self.events.push(Event::FlushInput);
        self.rx.clear();
        Ok(())
    }

    fn set_rate(&mut self, rate: u32) -> Result<()> {
        self.events.push(Event::SetRate(rate));
        self.rate = rate;
        Ok(())
    }

    fn rate(&self) -> u32 {
        self.rate
    }
}
