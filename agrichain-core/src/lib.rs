//! # agrichain-core
//!
//! Foundation crate for the AgriChain data layer.
//! Defines entity models, errors, the response envelope, pagination,
//! latency/fault policies, id generation, config, and tracing init.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod envelope;
pub mod errors;
pub mod ids;
pub mod models;
pub mod policy;
pub mod telemetry;

// Re-export the most commonly used types at the crate root.
pub use config::EngineConfig;
pub use envelope::{ApiResponse, PageInfo, PageRequest};
pub use errors::{AgriError, AgriResult};
pub use policy::{FaultPolicy, LatencyPolicy, OpClass};
