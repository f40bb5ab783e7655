//! Per-metric cache of the last polled value.
//!
//! Each metric has its own mutex-guarded cell, so a reader always observes
//! the last fully written reading and no metric contends with another.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::metrics::MetricKind;

/// Lifecycle of a metric's poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No poll scheduled (task not started or shut down).
    Idle,
    /// Waiting on the interval timer.
    Scheduled,
    /// A read is in flight.
    Polling,
}

/// One cached reading. `value` is `None` when the sensor reported
/// unavailable on that cycle.
#[derive(Debug, Clone, Copy)]
pub struct Reading {
    pub value: Option<f32>,
    pub taken_at: Instant,
}

#[derive(Debug)]
struct Cell {
    state: PollState,
    reading: Option<Reading>,
}

impl Cell {
    fn new() -> Self {
        Self {
            state: PollState::Idle,
            reading: None,
        }
    }
}

/// Shared cache holding the freshest reading per metric.
#[derive(Debug)]
pub struct MetricCache {
    cpu: Mutex<Cell>,
    ram: Mutex<Cell>,
    disk: Mutex<Cell>,
    temperature: Mutex<Cell>,
}

impl MetricCache {
    pub fn new() -> Self {
        Self {
            cpu: Mutex::new(Cell::new()),
            ram: Mutex::new(Cell::new()),
            disk: Mutex::new(Cell::new()),
            temperature: Mutex::new(Cell::new()),
        }
    }

    fn cell(&self, kind: MetricKind) -> &Mutex<Cell> {
        match kind {
            MetricKind::Cpu => &self.cpu,
            MetricKind::Ram => &self.ram,
            MetricKind::Disk => &self.disk,
            MetricKind::Temperature => &self.temperature,
        }
    }

    /// Store a reading stamped now.
    pub fn store(&self, kind: MetricKind, value: Option<f32>) {
        self.cell(kind).lock().reading = Some(Reading {
            value,
            taken_at: Instant::now(),
        });
    }

    /// Return the cached reading if it is younger than `ttl`.
    pub fn fresh(&self, kind: MetricKind, ttl: Duration) -> Option<Reading> {
        let cell = self.cell(kind).lock();
        cell.reading.filter(|r| r.taken_at.elapsed() < ttl)
    }

    /// Return the cached reading regardless of age.
    pub fn last(&self, kind: MetricKind) -> Option<Reading> {
        self.cell(kind).lock().reading
    }

    pub fn set_state(&self, kind: MetricKind, state: PollState) {
        self.cell(kind).lock().state = state;
    }

    pub fn state(&self, kind: MetricKind) -> PollState {
        self.cell(kind).lock().state
    }

    /// Drop every cached reading. Poll states are untouched; the next tick
    /// or read request repopulates the cells.
    pub fn clear(&self) {
        for kind in MetricKind::ALL {
            self.cell(kind).lock().reading = None;
        }
    }
}

impl Default for MetricCache {
    fn default() -> Self {
        Self::new()
    }
}
