//! Foundation data types for the conversation-driven action planner.
//!
//! This crate contains pure data structures only: the plan model, the
//! action/parameter descriptors, conversation/working-context state,
//! and the public error taxonomy. It has no business logic beyond small
//! constructors and a single `status()` derivation per plan type —
//! parsing, verification, resolution, and execution all live in sibling
//! crates that depend on this one.

pub mod action;
pub mod collections;
pub mod error;
pub mod param;
pub mod plan;
pub mod value;
pub mod state;

pub use action::{ActionBuilder, ActionDescriptor, ActionHandler, CatalogLookup, Context, HandlerResult, Mutability};
pub use collections::OrderedMap;
pub use error::{
    CatalogConflict, IntegrityError, MigrationError, MigrationRegistryError, PlanParseError,
    ResolutionError, WrongMode,
};
pub use param::{ParamDescriptor, TypeTag};
pub use plan::{Binding, PendingParam, Plan, PlanStatus, ResolvedPlan, ResolvedStep, Step, TypedValue};
pub use state::{ConversationState, WorkingContext};
pub use value::Value;
