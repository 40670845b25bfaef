/*!
 * Content identity.
 *
 * Each content instance is identified by a short prefix of the SHA-256 digest
 * of its content and hint. Because the prefix is short, two different
 * contents could end up with the same id, so every id handed out during a run
 * is recorded in a `HashRegistry` together with the full digest it was
 * derived from, and a mismatch is reported as a collision.
 */

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::errors::{ConfigError, HashError};

/// Smallest supported hash length
pub const MIN_HASH_LENGTH: usize = 1;

/// Largest supported hash length
pub const MAX_HASH_LENGTH: usize = 32;

/// Ids issued during one run, mapped to the full digest of the content they identify.
///
/// Clones share the same underlying map, so one registry can be handed to
/// every component taking part in a run. Create a new registry for each
/// independent run.
#[derive(Debug, Clone, Default)]
pub struct HashRegistry {
    ids: Arc<Mutex<HashMap<String, String>>>,
}

impl HashRegistry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `id` identifies the content with digest `digest`.
    ///
    /// Fails if the id was already recorded for a different digest.
    pub fn register(&self, id: &str, digest: &str) -> Result<(), HashError> {
        let mut ids = self.ids.lock();
        let recorded = ids
            .entry(id.to_string())
            .or_insert_with(|| digest.to_string());

        if recorded != digest {
            return Err(HashError::Collision { id: id.to_string() });
        }

        Ok(())
    }

    /// Number of recorded ids
    pub fn len(&self) -> usize {
        self.ids.lock().len()
    }

    /// Returns true if no id has been recorded
    pub fn is_empty(&self) -> bool {
        self.ids.lock().is_empty()
    }

    /// Forget all recorded ids
    pub fn clear(&self) {
        self.ids.lock().clear();
    }
}

/// Computes collision-checked content ids
#[derive(Debug, Clone)]
pub struct ContentHash {
    hash_length: usize,
    registry: HashRegistry,
}

impl ContentHash {
    /// Create a content hash producing ids of `hash_length` hex characters
    pub fn new(hash_length: usize, registry: HashRegistry) -> Result<Self, ConfigError> {
        if !(MIN_HASH_LENGTH..=MAX_HASH_LENGTH).contains(&hash_length) {
            return Err(ConfigError::HashLength(hash_length));
        }

        Ok(Self {
            hash_length,
            registry,
        })
    }

    /// Computes the id for the specified content and hint
    pub fn compute(&self, content: &str, hint: Option<&str>) -> Result<String, HashError> {
        let digest = Self::digest(content, hint);
        let short_hash = digest[..self.hash_length].to_string();

        self.registry.register(&short_hash, &digest)?;

        Ok(short_hash)
    }

    /// Records an explicitly specified id for the specified content and hint
    pub fn register_id(&self, id: &str, content: &str, hint: Option<&str>) -> Result<(), HashError> {
        self.registry.register(id, &Self::digest(content, hint))
    }

    /// Full hex digest of the content and hint
    pub fn digest(content: &str, hint: Option<&str>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hasher.update(b":");
        hasher.update(hint.unwrap_or_default().as_bytes());

        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }
}
