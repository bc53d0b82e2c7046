//! Approval workflow core: routes a document through the ordered,
//! role-based stage chain configured for its type.
//!
//! Every operation takes a live [`sea_orm::DatabaseConnection`], runs inside
//! a single transaction and either commits the whole transition or none of
//! it. Presentation, identity resolution and one-time-code delivery live in
//! the API layer; this crate only consumes their results.

pub mod chain;
pub mod engine;
pub mod error;
pub mod options;
pub mod rejection;
pub mod role;

pub use chain::materialize_chain;
pub use engine::{advance, current_stage, submit, Actor, StageView};
pub use error::{WorkflowError, WorkflowResult};
pub use options::{evaluate_gate, options_of, GateContext, GateOutcome, StageOption};
pub use rejection::reject;
pub use role::Role;
