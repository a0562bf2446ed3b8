//! Store-and-forward session controller
//!
//! One session is exactly `N` bytes:
//!
//! 1. **IdleWaiting** – the first byte to arrive stamps the start time and is
//!    stored at address 0
//! 2. **Accumulating** – every further byte is stored at the next address
//! 3. when the `N`th byte is stored the elapsed time is reported and the
//!    controller enters **Draining**: addresses `0..N` are read back and sent
//!    out in order, then the session resets to **IdleWaiting**
//!
//! The drain runs to completion inside a single `poll()`. The link is not
//! read while draining, so bytes arriving during that window are not
//! buffered here.
//!
//! ## Usage
//! ```ignore
//! let mut controller: SessionController<_, _, _, 1000> =
//!     SessionController::new(link, store, &CLOCK, BenchConfig::default())?;
//! controller.start()?;
//! loop {
//!     if let Ok(Some(report)) = controller.poll() {
//!         info!("{} bytes in {} ms", report.bytes, report.elapsed_ms);
//!     }
//! }
//! ```

use core::fmt;

use linkbench_hal::{ByteLink, ByteStore, Monotonic};

use crate::config::BenchConfig;
use crate::report;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No byte of the current session received yet
    IdleWaiting,
    /// Between the first and the last byte of a session
    Accumulating,
    /// Reading the block back out
    Draining,
}

/// Progress of the session in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    bytes_received: usize,
    start_ms: u64,
}

impl Session {
    pub const fn new() -> Self {
        Self {
            bytes_received: 0,
            start_ms: 0,
        }
    }

    /// Bytes stored so far; also the next free address
    pub fn bytes_received(&self) -> usize {
        self.bytes_received
    }

    /// Clock value when the first byte was consumed
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    fn begin(&mut self, now_ms: u64) {
        self.bytes_received = 0;
        self.start_ms = now_ms;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Summary of one completed session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionReport {
    /// Block size
    pub bytes: usize,
    /// Clock value at the first byte
    pub started_at_ms: u64,
    /// First byte to last byte, in milliseconds
    pub elapsed_ms: u64,
}

/// Session controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError<LE, SE> {
    /// Link send/receive failed
    Link(LE),
    /// Store write/read failed
    Store(SE),
    /// Store is smaller than one session block
    CapacityExceeded { required: usize, available: usize },
}

impl<LE: fmt::Debug, SE: fmt::Debug> fmt::Display for SessionError<LE, SE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "Link error: {:?}", e),
            Self::Store(e) => write!(f, "Store error: {:?}", e),
            Self::CapacityExceeded {
                required,
                available,
            } => write!(
                f,
                "Store holds {} bytes, session needs {}",
                available, required
            ),
        }
    }
}

impl<LE: fmt::Debug, SE: fmt::Debug> core::error::Error for SessionError<LE, SE> {}

type Error<L, S> = SessionError<<L as ByteLink>::Error, <S as ByteStore>::Error>;

/// Receive → measure → drain → reset state machine over an `N` byte block
pub struct SessionController<L, S, C, const N: usize> {
    link: L,
    store: S,
    clock: C,
    config: BenchConfig,
    session: Session,
    phase: Phase,
}

impl<L, S, C, const N: usize> SessionController<L, S, C, N>
where
    L: ByteLink,
    S: ByteStore,
    C: Monotonic,
{
    const NON_EMPTY: () = assert!(N > 0, "session block must hold at least one byte");

    /// Take ownership of the link, store and clock
    ///
    /// Fails if the store cannot hold a whole block.
    pub fn new(link: L, store: S, clock: C, config: BenchConfig) -> Result<Self, Error<L, S>> {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;

        let available = store.capacity();
        if available < N {
            return Err(SessionError::CapacityExceeded {
                required: N,
                available,
            });
        }

        Ok(Self {
            link,
            store,
            clock,
            config,
            session: Session::new(),
            phase: Phase::IdleWaiting,
        })
    }

    /// Announce readiness for the first block
    pub fn start(&mut self) -> Result<(), Error<L, S>> {
        report::ready(&mut self.link, N).map_err(SessionError::Link)
    }

    /// Run one loop iteration
    ///
    /// Returns the report of a session completed (and drained) during this
    /// call, even if the ready banner after it could not be sent. On error
    /// the session in flight is abandoned and the controller is back in
    /// `IdleWaiting`.
    pub fn poll(&mut self) -> Result<Option<SessionReport>, Error<L, S>> {
        let result = self.step();
        if result.is_err() {
            self.abort();
        }
        result
    }

    fn step(&mut self) -> Result<Option<SessionReport>, Error<L, S>> {
        if !self.link.has_data().map_err(SessionError::Link)? {
            return Ok(None);
        }

        if self.phase == Phase::IdleWaiting {
            self.session.begin(self.clock.now_ms());
            #[cfg(feature = "defmt")]
            defmt::debug!("Session started at {} ms", self.session.start_ms);
        }

        let byte = self.link.receive().map_err(SessionError::Link)?;
        self.store
            .write(self.session.bytes_received, byte)
            .map_err(SessionError::Store)?;
        self.session.bytes_received += 1;
        self.phase = Phase::Accumulating;

        if self.session.bytes_received < N {
            return Ok(None);
        }

        let elapsed_ms = self.clock.elapsed_since(self.session.start_ms);
        let summary = SessionReport {
            bytes: N,
            started_at_ms: self.session.start_ms,
            elapsed_ms,
        };
        report::elapsed(&mut self.link, N, elapsed_ms).map_err(SessionError::Link)?;
        report::rate(&mut self.link, self.config.rate_report.value(N, elapsed_ms))
            .map_err(SessionError::Link)?;

        self.phase = Phase::Draining;
        self.drain()?;

        self.session.reset();
        self.phase = Phase::IdleWaiting;
        // The block is already out; a lost banner does not undo the session
        if report::ready(&mut self.link, N).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Ready banner not sent after session");
        }

        Ok(Some(summary))
    }

    /// Send addresses `0..N` back out, ascending
    fn drain(&mut self) -> Result<(), Error<L, S>> {
        report::retransmit_start(&mut self.link).map_err(SessionError::Link)?;
        for address in 0..N {
            let byte = self.store.read(address).map_err(SessionError::Store)?;
            self.link.send(byte).map_err(SessionError::Link)?;
        }
        report::retransmit_done(&mut self.link).map_err(SessionError::Link)?;
        self.link.flush().map_err(SessionError::Link)
    }

    fn abort(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "Abandoning session in {} after {} bytes",
            self.phase,
            self.session.bytes_received
        );
        self.session.reset();
        self.phase = Phase::IdleWaiting;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Bytes per session
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hand back the link, store and clock
    pub fn release(self) -> (L, S, C) {
        (self.link, self.store, self.clock)
    }
}
