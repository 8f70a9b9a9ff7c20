//! Pluggable latency and fault policies.
//!
//! Every engine operation passes through a latency policy (artificial delay)
//! and a fault policy (independent per-call transient failure) before
//! touching data. The simulated defaults emulate demo network conditions;
//! the no-op variants are for tests and production ports.

use std::time::Duration;

use rand::Rng;

/// Operation class — each class samples its delay from its own range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    Read,
    Write,
    Aggregate,
}

/// Decides how long an operation is artificially delayed.
pub trait LatencyPolicy: Send + Sync {
    fn delay(&self, class: OpClass) -> Duration;
}

/// Decides whether an operation fails with an injected transient error.
/// Must be independent per call, not correlated across calls.
pub trait FaultPolicy: Send + Sync {
    fn should_fail(&self) -> bool;
}

/// Uniformly sampled delay per operation class, in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedLatency {
    pub read_ms: (u64, u64),
    pub write_ms: (u64, u64),
    pub aggregate_ms: (u64, u64),
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self {
            read_ms: (100, 300),
            write_ms: (400, 1200),
            aggregate_ms: (800, 1400),
        }
    }
}

impl LatencyPolicy for SimulatedLatency {
    fn delay(&self, class: OpClass) -> Duration {
        let (min, max) = match class {
            OpClass::Read => self.read_ms,
            OpClass::Write => self.write_ms,
            OpClass::Aggregate => self.aggregate_ms,
        };
        let ms = rand::thread_rng().gen_range(min..=max.max(min));
        Duration::from_millis(ms)
    }
}

/// Zero delay — tests and production ports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

impl LatencyPolicy for NoLatency {
    fn delay(&self, _class: OpClass) -> Duration {
        Duration::ZERO
    }
}

/// Fails each call independently with the given probability.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedFaults {
    pub probability: f64,
}

impl Default for SimulatedFaults {
    fn default() -> Self {
        Self { probability: 0.01 }
    }
}

impl FaultPolicy for SimulatedFaults {
    fn should_fail(&self) -> bool {
        rand::thread_rng().gen::<f64>() < self.probability
    }
}

/// Never fails — tests and production ports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaults;

impl FaultPolicy for NoFaults {
    fn should_fail(&self) -> bool {
        false
    }
}
