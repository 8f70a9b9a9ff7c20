//! Error taxonomy for the AgriChain data layer.

mod agri_error;

pub use agri_error::{AgriError, AgriResult};
