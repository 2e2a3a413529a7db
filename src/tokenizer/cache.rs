use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{SegmentError, SpTokenizer};

/// Read-mostly cache of decoded tokenizer models, keyed on blob content
///
/// Decoding a serialized model is the expensive step of a tokenize call, so
/// hosts that invoke the operator repeatedly with the same blob can route
/// construction through this cache. Lookups take the lock shared; a miss
/// re-checks under the write lock before decoding, so each distinct blob is
/// decoded at most once even under concurrent first use.
///
/// Failed decodes are not cached: the call is deterministic, so a retry with
/// the same blob fails identically, and a negative entry would pin garbage
/// bytes in the map.
#[derive(Default)]
pub struct ModelCache {
    entries: RwLock<HashMap<Vec<u8>, Arc<SpTokenizer>>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the decoded tokenizer for `blob`, decoding and inserting on miss
    ///
    /// # Errors
    /// Propagates the backend decode error if the blob is not a valid model.
    pub fn get_or_decode(&self, blob: &[u8]) -> Result<Arc<SpTokenizer>, SegmentError> {
        {
            let entries = self.entries.read().unwrap();
            if let Some(tokenizer) = entries.get(blob) {
                debug!("model cache hit ({} byte blob)", blob.len());
                return Ok(Arc::clone(tokenizer));
            }
        }

        let mut entries = self.entries.write().unwrap();
        // Another thread may have decoded the same blob between the read
        // unlock and the write lock.
        if let Some(tokenizer) = entries.get(blob) {
            return Ok(Arc::clone(tokenizer));
        }
        debug!("model cache miss, decoding {} byte blob", blob.len());
        let tokenizer = Arc::new(SpTokenizer::from_bytes(blob)?);
        entries.insert(blob.to_vec(), Arc::clone(&tokenizer));
        Ok(tokenizer)
    }

    /// Number of distinct blobs currently cached
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
