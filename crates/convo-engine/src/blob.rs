//! The Blob Serializer + Migration Registry: a versioned,
//! gzip-compressed, hash-checked wire format for `ConversationState`.
//!
//! ```text
//! offset  0..3   magic       = ASCII "CVST"
//! offset  4..5   version     = u16 big-endian
//! offset  6..37  hash        = SHA-256 of bytes [38..]
//! offset 38..EOF compressed  = gzip( utf-8( json( state ) ) )
//! ```

use std::collections::HashMap;
use std::io::{Read, Write};

use convo_types::{ConversationState, IntegrityError, MigrationError, MigrationRegistryError};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};

const MAGIC: &[u8; 4] = b"CVST";
const HEADER_LEN: usize = 4 + 2 + 32;

/// One forward migration step, `fromVersion -> fromVersion + 1`,
/// rewriting the state's JSON representation in place.
pub trait Migration: Send + Sync {
    fn from_version(&self) -> u16;
    fn to_version(&self) -> u16;
    fn migrate(&self, json: serde_json::Value) -> Result<serde_json::Value, String>;
}

/// At most one migration per `fromVersion`; append-only after setup.
#[derive(Default)]
pub struct MigrationRegistry {
    current_version: u16,
    migrations: HashMap<u16, Box<dyn Migration>>,
}

impl MigrationRegistry {
    pub fn new(current_version: u16) -> Self {
        Self { current_version, migrations: HashMap::new() }
    }

    pub fn current_version(&self) -> u16 {
        self.current_version
    }

    pub fn register(&mut self, migration: Box<dyn Migration>) -> Result<(), MigrationRegistryError> {
        let from = migration.from_version();
        let to = migration.to_version();
        if self.migrations.contains_key(&from) {
            return Err(MigrationRegistryError::DuplicateFrom { from });
        }
        if to != from + 1 {
            return Err(MigrationRegistryError::NonSequential { from, expected: from + 1, actual: to });
        }
        self.migrations.insert(from, migration);
        Ok(())
    }

    /// True iff the full chain from `from` to `current_version` is
    /// present.
    pub fn can_migrate(&self, from: u16) -> bool {
        let mut v = from;
        while v < self.current_version {
            if !self.migrations.contains_key(&v) {
                return false;
            }
            v += 1;
        }
        true
    }

    fn apply_chain(&self, mut json: serde_json::Value, from: u16) -> Result<serde_json::Value, MigrationError> {
        let mut v = from;
        while v < self.current_version {
            let migration = self
                .migrations
                .get(&v)
                .ok_or(MigrationError::MissingLink { from: v, to: v + 1 })?;
            json = migration.migrate(json).map_err(|_| MigrationError::MissingLink { from: v, to: v + 1 })?;
            v += 1;
        }
        Ok(json)
    }
}

/// Encode `state` to the versioned, hash-checked, gzip-compressed wire
/// format. The schema version written is `registry.current_version()`,
/// defaulting to 1 when no registry is supplied.
pub fn serialize(state: &ConversationState, registry: Option<&MigrationRegistry>) -> Vec<u8> {
    let version = registry.map(MigrationRegistry::current_version).unwrap_or(1);
    let json = serde_json::to_vec(state).expect("ConversationState always serializes");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json).expect("gzip write never fails on a Vec sink");
    let compressed = encoder.finish().expect("gzip finish never fails on a Vec sink");

    let hash: [u8; 32] = Sha256::digest(&compressed).into();

    let mut out = Vec::with_capacity(HEADER_LEN + compressed.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&version.to_be_bytes());
    out.extend_from_slice(&hash);
    out.extend_from_slice(&compressed);
    out
}

/// Decode a blob produced by [`serialize`], verifying integrity and
/// walking the migration chain if the stored version is behind the
/// registry's current version.
pub fn deserialize(
    bytes: &[u8],
    registry: Option<&MigrationRegistry>,
) -> Result<ConversationState, BlobError> {
    if bytes.len() < HEADER_LEN {
        return Err(BlobError::Integrity(IntegrityError::TooShort { len: bytes.len() }));
    }
    if &bytes[0..4] != MAGIC {
        return Err(BlobError::Integrity(IntegrityError::BadMagic));
    }

    let blob_version = u16::from_be_bytes([bytes[4], bytes[5]]);
    let stored_hash = &bytes[6..38];
    let compressed = &bytes[38..];

    let current_version = registry.map(MigrationRegistry::current_version).unwrap_or(1);
    if blob_version > current_version {
        return Err(BlobError::Migration(MigrationError::BlobNewerThanCurrent { blob_version, current_version }));
    }

    let computed_hash: [u8; 32] = Sha256::digest(compressed).into();
    if computed_hash.as_slice() != stored_hash {
        return Err(BlobError::Integrity(IntegrityError::HashMismatch));
    }

    let mut decoder = GzDecoder::new(compressed);
    let mut json_bytes = Vec::new();
    decoder
        .read_to_end(&mut json_bytes)
        .map_err(|_| BlobError::Integrity(IntegrityError::HashMismatch))?;

    let mut json: serde_json::Value =
        serde_json::from_slice(&json_bytes).map_err(|_| BlobError::Integrity(IntegrityError::HashMismatch))?;

    if blob_version < current_version {
        if let Some(registry) = registry {
            json = registry.apply_chain(json, blob_version).map_err(BlobError::Migration)?;
        } else {
            return Err(BlobError::Migration(MigrationError::MissingLink { from: blob_version, to: current_version }));
        }
    }

    serde_json::from_value(json).map_err(|_| BlobError::Integrity(IntegrityError::HashMismatch))
}

/// `toReadableJson(blob)`: decompresses and pretty-prints without
/// requiring integrity; returns an error object on failure rather than
/// propagating.
pub fn to_readable_json(bytes: &[u8]) -> serde_json::Value {
    let inspect = || -> Result<serde_json::Value, String> {
        if bytes.len() < HEADER_LEN {
            return Err("blob too short".to_string());
        }
        let compressed = &bytes[38..];
        let mut decoder = GzDecoder::new(compressed);
        let mut json_bytes = Vec::new();
        decoder.read_to_end(&mut json_bytes).map_err(|e| e.to_string())?;
        serde_json::from_slice(&json_bytes).map_err(|e| e.to_string())
    };

    match inspect() {
        Ok(v) => v,
        Err(e) => serde_json::json!({ "error": e }),
    }
}

/// Union of the two failure tiers `deserialize` can raise: both
/// propagate rather than auto-replacing the stored blob.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_without_a_registry() {
        let state = ConversationState::initial("do the thing");
        let bytes = serialize(&state, None);
        let decoded = deserialize(&bytes, None).unwrap();
        assert_eq!(decoded.original_instruction, "do the thing");
    }

    #[test]
    fn tampering_a_byte_in_the_body_fails_integrity() {
        let state = ConversationState::initial("do the thing");
        let mut bytes = serialize(&state, None);
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        let err = deserialize(&bytes, None).unwrap_err();
        assert!(matches!(err, BlobError::Integrity(IntegrityError::HashMismatch)));
    }

    #[test]
    fn too_short_input_fails_with_too_short() {
        let err = deserialize(&[0u8; 10], None).unwrap_err();
        assert!(matches!(err, BlobError::Integrity(IntegrityError::TooShort { len: 10 })));
    }

    #[test]
    fn bad_magic_fails() {
        let state = ConversationState::initial("x");
        let mut bytes = serialize(&state, None);
        bytes[0] = b'X';
        let err = deserialize(&bytes, None).unwrap_err();
        assert!(matches!(err, BlobError::Integrity(IntegrityError::BadMagic)));
    }

    struct RenameInstructionMigration;
    impl Migration for RenameInstructionMigration {
        fn from_version(&self) -> u16 {
            1
        }
        fn to_version(&self) -> u16 {
            2
        }
        fn migrate(&self, mut json: serde_json::Value) -> Result<serde_json::Value, String> {
            if let Some(obj) = json.as_object_mut() {
                if let Some(old) = obj.remove("instruction") {
                    obj.insert("originalInstruction".to_string(), old);
                }
            }
            Ok(json)
        }
    }

    /// Build a raw v1-shaped blob using the pre-rename field name
    /// `instruction`, bypassing `serialize` (which always writes the
    /// current field names) — this is what a blob written by an older
    /// build of this system would actually look like on disk.
    fn v1_blob_with_legacy_field_name(instruction: &str) -> Vec<u8> {
        let json = serde_json::json!({
            "instruction": instruction,
            "pendingParams": [],
            "providedParams": {},
            "latestUserMessage": null,
            "workingContext": null,
            "turnHistory": [],
        });
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&serde_json::to_vec(&json).unwrap()).unwrap();
        let compressed = encoder.finish().unwrap();
        let hash: [u8; 32] = Sha256::digest(&compressed).into();

        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&hash);
        out.extend_from_slice(&compressed);
        out
    }

    #[test]
    fn migration_chain_upgrades_a_v1_blob_to_v2() {
        let v1_bytes = v1_blob_with_legacy_field_name("legacy instruction");

        let mut registry_v2 = MigrationRegistry::new(2);
        registry_v2.register(Box::new(RenameInstructionMigration)).unwrap();
        assert!(registry_v2.can_migrate(1));

        let decoded = deserialize(&v1_bytes, Some(&registry_v2)).unwrap();
        assert_eq!(decoded.original_instruction, "legacy instruction");
    }

    #[test]
    fn duplicate_from_version_fails_registration() {
        let mut registry = MigrationRegistry::new(2);
        registry.register(Box::new(RenameInstructionMigration)).unwrap();
        let err = registry.register(Box::new(RenameInstructionMigration)).unwrap_err();
        assert!(matches!(err, MigrationRegistryError::DuplicateFrom { from: 1 }));
    }

    #[test]
    fn non_sequential_migration_is_rejected() {
        struct SkipsAVersion;
        impl Migration for SkipsAVersion {
            fn from_version(&self) -> u16 {
                1
            }
            fn to_version(&self) -> u16 {
                3
            }
            fn migrate(&self, json: serde_json::Value) -> Result<serde_json::Value, String> {
                Ok(json)
            }
        }
        let mut registry = MigrationRegistry::new(3);
        let err = registry.register(Box::new(SkipsAVersion)).unwrap_err();
        assert!(matches!(err, MigrationRegistryError::NonSequential { from: 1, expected: 2, actual: 3 }));
    }

    #[test]
    fn readable_json_reports_error_object_on_garbage_input() {
        let v = to_readable_json(&[0u8; 2]);
        assert!(v.get("error").is_some());
    }
}
