use log::debug;
use sentencepiece::SentencePieceProcessor;
use std::path::Path;

use super::{SegmentError, SegmentMode, Segmenter};

/// SentencePiece-backed segmentation backend
///
/// Wraps `sentencepiece::SentencePieceProcessor` behind the `Segmenter`
/// trait. The model blob is decoded once at construction; after that every
/// call is read-only, so the processor can be shared freely across threads.
///
/// # Thread Safety
/// The underlying processor is `Send + Sync`; concurrent `segment` calls
/// need no locking.
pub struct SpTokenizer {
    inner: SentencePieceProcessor,
}

impl SpTokenizer {
    /// Decode a serialized SentencePiece model from in-memory bytes
    ///
    /// This is the operator path: the blob arrives already base64-decoded
    /// (see `model_loader`) and is treated as opaque protobuf bytes.
    ///
    /// # Errors
    /// Returns the backend error if the bytes are not a valid serialized
    /// model (empty, truncated, or garbage).
    pub fn from_bytes(blob: &[u8]) -> Result<Self, SegmentError> {
        let inner = SentencePieceProcessor::from_serialized_proto(blob)?;
        debug!(
            "decoded sentencepiece model: {} bytes, vocab size {}",
            blob.len(),
            inner.len()
        );
        Ok(Self { inner })
    }

    /// Load a serialized SentencePiece model from a file
    /// (typically `tokenizer.model`)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SegmentError> {
        let inner = SentencePieceProcessor::open(path)?;
        Ok(Self { inner })
    }

    /// Number of pieces in the model's vocabulary
    pub fn vocab_size(&self) -> usize {
        self.inner.len()
    }
}

impl Segmenter for SpTokenizer {
    fn segment(&self, text: &str, mode: SegmentMode) -> Result<Vec<i32>, SegmentError> {
        let pieces = match mode {
            SegmentMode::Greedy => self.inner.encode(text)?,
            SegmentMode::Sample { nbest, alpha } => {
                self.inner.sample_encode(text, nbest, alpha)?
            }
        };
        // Vocabulary ids are bounded by the piece count, which fits in i32.
        Ok(pieces.into_iter().map(|p| p.id as i32).collect())
    }

    fn bos_id(&self) -> Option<i32> {
        self.inner.bos_id().map(|id| id as i32)
    }

    fn eos_id(&self) -> Option<i32> {
        self.inner.eos_id().map(|id| id as i32)
    }
}
