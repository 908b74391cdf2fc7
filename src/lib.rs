//! Context Relay: Unified Context Assembly and Progress Fan-out
//!
//! Resolves a primary record and its linked records from an external store
//! into one normalized context artifact for an execution engine, and relays
//! the engine's progress webhooks to live subscribers of the same
//! correlation id.

pub mod aliases;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod lanes;
pub mod logging;
pub mod record;
pub mod relay;
pub mod resolve;
pub mod store;

pub use context::{ContextAssembler, UnifiedContext};
pub use error::{ApiError, StoreError};
pub use events::{ConnectionRegistry, EventBus};
pub use relay::Relay;
