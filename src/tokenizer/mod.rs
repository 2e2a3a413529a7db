/// Tokenizer backends for the tokenizer operator
///
/// The operator logic only needs three things from a backend: segment one row
/// of text into token ids, and report the model's BOS/EOS ids if it defines
/// them. The `Segmenter` trait is that seam; `sentencepiece.rs` is the
/// production implementation and tests plug in a deterministic in-memory one.
pub mod cache;
pub mod sentencepiece;

pub use self::sentencepiece::SpTokenizer;

use thiserror::Error;

/// How a row should be segmented
///
/// `Greedy` is the deterministic Viterbi segmentation. `Sample` enables the
/// backend's n-best subword sampling; `nbest` is the lattice size and `alpha`
/// the smoothing temperature, both already validated by the operator's
/// parameter coercion (nbest >= 2, alpha > 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentMode {
    Greedy,
    Sample { nbest: usize, alpha: f32 },
}

/// Segmentation failure reported by a backend
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("sentencepiece backend error: {0}")]
    Backend(#[from] ::sentencepiece::SentencePieceError),
}

/// A tokenization backend: stateless per call, shareable across threads
pub trait Segmenter: Send + Sync {
    /// Segment one row of text into token ids under the given mode
    ///
    /// Ids are non-negative vocabulary ids, returned as i32 per the operator's
    /// output dtype contract.
    fn segment(&self, text: &str, mode: SegmentMode) -> Result<Vec<i32>, SegmentError>;

    /// Beginning-of-sequence id, if the model defines one
    fn bos_id(&self) -> Option<i32>;

    /// End-of-sequence id, if the model defines one
    fn eos_id(&self) -> Option<i32>;
}
