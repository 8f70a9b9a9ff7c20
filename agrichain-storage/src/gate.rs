//! Latency/fault wrapper around every engine operation.
//!
//! Sleeps for the policy's delay, then consults the fault policy. An
//! injected fault surfaces as `AgriError::Network`, exactly like a dropped
//! connection would. Never touches data. Once an operation is admitted it
//! always runs to completion; there is no cancellation.

use std::sync::Arc;

use agrichain_core::errors::{AgriError, AgriResult};
use agrichain_core::policy::{FaultPolicy, LatencyPolicy, OpClass};

#[derive(Clone)]
pub struct Gate {
    latency: Arc<dyn LatencyPolicy>,
    faults: Arc<dyn FaultPolicy>,
}

impl Gate {
    pub fn new(latency: Arc<dyn LatencyPolicy>, faults: Arc<dyn FaultPolicy>) -> Self {
        Self { latency, faults }
    }

    /// Delay, then roll for an injected transient failure.
    pub async fn admit(&self, class: OpClass) -> AgriResult<()> {
        let delay = self.latency.delay(class);
        if !delay.is_zero() {
            tracing::trace!(?class, ?delay, "simulating latency");
            tokio::time::sleep(delay).await;
        }
        if self.faults.should_fail() {
            tracing::debug!(?class, "injecting transient network failure");
            return Err(AgriError::Network);
        }
        Ok(())
    }
}
