//! Short code generation

use std::sync::Arc;

use tracing::{debug, warn};

use super::store::LinkStore;
use crate::errors::{Result, ShortstatError};

/// Symbols a short code is drawn from
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Source of random bytes for code generation
pub trait ByteSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]);
}

/// Thread-local CSPRNG from `rand`
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl ByteSource for ThreadRngSource {
    fn fill(&self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte = rand::random();
        }
    }
}

/// Map each byte onto the alphabet (byte mod 62)
pub fn encode_code(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| ALPHABET[(*b as usize) % ALPHABET.len()] as char)
        .collect()
}

/// Draws random codes until one is unused, up to `max_attempts` draws
#[derive(Clone)]
pub struct CodeGenerator {
    length: usize,
    max_attempts: u32,
    source: Arc<dyn ByteSource>,
}

impl CodeGenerator {
    pub fn new(length: usize, max_attempts: u32) -> Self {
        Self::with_source(length, max_attempts, Arc::new(ThreadRngSource))
    }

    pub fn with_source(length: usize, max_attempts: u32, source: Arc<dyn ByteSource>) -> Self {
        Self {
            length,
            max_attempts: max_attempts.max(1),
            source,
        }
    }

    /// One random candidate; not checked against the store
    pub fn candidate(&self) -> String {
        let mut bytes = vec![0u8; self.length];
        self.source.fill(&mut bytes);
        encode_code(&bytes)
    }

    /// Find a code with no record behind it.
    ///
    /// Uniqueness holds for sequential callers only: the existence check and
    /// the later write are separate round trips.
    pub async fn allocate(&self, links: &LinkStore) -> Result<String> {
        for attempt in 1..=self.max_attempts {
            let code = self.candidate();
            if !links.exists(&code).await? {
                debug!("Allocated code '{}' after {} attempt(s)", code, attempt);
                return Ok(code);
            }
            warn!("Code collision on '{}' (attempt {})", code, attempt);
        }

        Err(ShortstatError::exhausted_keyspace(format!(
            "No free {}-character code found after {} attempts",
            self.length, self.max_attempts
        )))
    }
}
