//! Entity models for the AgriChain data layer.
//!
//! All entities are plain serde records with no behavior, except `Cart`,
//! which owns its own transition logic.

pub mod cart;
pub mod farmer;
pub mod product;
pub mod scheme;
pub mod trace;
pub mod transaction;
pub mod user;

pub use cart::{Cart, CartItem};
pub use farmer::{Farmer, FarmerContact, FarmerPatch, Location, NewFarmer, VerificationStatus};
pub use product::{NewProduct, Product, ProductPatch, ProductStatus};
pub use scheme::{NewScheme, Scheme, SchemePatch, SchemeStatus};
pub use trace::{LedgerRef, NewTraceStep, StepStatus, Trace, TraceStep};
pub use transaction::{NewTransaction, Transaction, TransactionPatch, TxStatus};
pub use user::{Role, UserRef};
