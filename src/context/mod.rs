//! Context domain: unified context model, section composition, and assembly.
//! Owns the output contract consumed by the execution engine; fetching stays behind `RecordStore`.

pub mod assembler;
pub mod idempotency;
pub mod sections;
pub mod settings;
pub mod types;

pub use assembler::{ContextAssembler, LinkedFetch};
pub use idempotency::idempotency_key;
pub use settings::{DefaultsConfig, RoutingConfig};
pub use types::{
    AudienceContext, ContentTypeContract, ContextMeta, EntityContext, Routing, UnifiedContext,
    UserInput, SCHEMA_VERSION,
};
