//! The public error taxonomy.
//!
//! Three tiers:
//! 1. Conversational failures (parse/verify/resolve) never reach this
//!    taxonomy — they are captured as an `ErrorStep` inside the `Plan`
//!    itself and never propagate.
//! 2. Protocol failures (`IntegrityError`, `MigrationError`,
//!    `PlanParseError`, `ResolutionError`) propagate to the caller.
//! 3. Programming errors (`CatalogConflict`, `WrongMode`) are meant to
//!    be unrecoverable misuse and are documented here as such, though
//!    this crate returns them as `Result`s rather than panicking so a
//!    host can choose to `.expect()` at its boundary.

use thiserror::Error;

/// Raised when the Blob Serializer cannot trust the bytes it was
/// given: bad magic, short input, or a SHA-256 mismatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("blob too short: {len} bytes, need at least 38")]
    TooShort { len: usize },
    #[error("bad magic bytes: expected \"CVST\"")]
    BadMagic,
    #[error("hash mismatch: stored blob has been tampered with")]
    HashMismatch,
}

/// Raised when a migration chain cannot carry a blob from its stored
/// version up to the registry's current version.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error("blob version {blob_version} is newer than current version {current_version}")]
    BlobNewerThanCurrent { blob_version: u16, current_version: u16 },
    #[error("no migration for v{from}→v{to}")]
    MissingLink { from: u16, to: u16 },
}

/// Raised by the Migration Registry's `register`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MigrationRegistryError {
    #[error("a migration from version {from} is already registered")]
    DuplicateFrom { from: u16 },
    #[error("migration from {from} must target {expected}, got {actual}")]
    NonSequential { from: u16, expected: u16, actual: u16 },
}

/// Raised when the Plan Parser cannot recover a plan at all. In
/// practice the parser avoids this by emitting an `ErrorStep`-carrying
/// `Plan` instead; this type exists for callers that want the
/// diagnostic without going through a `Plan`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Failed to parse plan: {diagnostic}")]
pub struct PlanParseError {
    pub diagnostic: String,
    /// Truncated (≤800 char) excerpt of the raw model response.
    pub excerpt: String,
}

impl PlanParseError {
    pub fn new(diagnostic: impl Into<String>, raw_response: &str) -> Self {
        const MAX_EXCERPT: usize = 800;
        let excerpt: String = raw_response.chars().take(MAX_EXCERPT).collect();
        Self { diagnostic: diagnostic.into(), excerpt }
    }
}

/// Raised when the resolver cannot bind a structurally valid plan to
/// invocable handlers for a reason outside the normal "demote to
/// ErrorStep" path — e.g. executing a plan that is not `Ready`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("cannot execute a plan with status {status:?}")]
    NotReady { status: &'static str },
}

/// Raised by the Action Catalog on duplicate registration. A
/// programming error: callers should treat this as unrecoverable
/// misconfiguration, not a retry signal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("action id already registered: {id}")]
pub struct CatalogConflict {
    pub id: String,
}

/// Raised when a Conversation Manager configured for one persistence
/// mode (store-backed or opaque-blob) is asked to operate in the
/// other. A programming error: one manager instance is wired to
/// exactly one mode for its lifetime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WrongMode {
    #[error("this conversation manager is store-backed; blob mode was requested")]
    ExpectedStore,
    #[error("this conversation manager is blob-backed; store mode was requested")]
    ExpectedBlob,
}
