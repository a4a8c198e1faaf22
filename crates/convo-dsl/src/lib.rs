//! The Plan Parser and Plan Verifier: turns a raw model response into
//! a structurally valid [`convo_types::Plan`] against an action
//! catalog, without ever throwing a parse failure to the turn
//! boundary.

pub mod format;
pub mod json_parser;
pub mod parser;
pub mod sexpr;
pub mod verifier;

pub use format::Format;
pub use parser::parse_and_verify;
