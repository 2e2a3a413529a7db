/// SentencepieceTokenizer operator
///
/// Architecture:
/// - Input rows are UTF-8-validated first (cheap scan, and it keeps
///   `EncodingError` independent of model decoding)
/// - The model blob is then decoded into a backend, either per call or
///   through the read-mostly `ModelCache`
/// - Each row is segmented and assembled: segment, reverse if requested,
///   then BOS/EOS insertion, so boundary markers are never part of the
///   reversal
///
/// Output contract: flat int32 token ids plus int64 row splits of length
/// batch_size + 1.
use log::debug;
use thiserror::Error;

use crate::core::types::RaggedTensor;
use crate::tokenizer::cache::ModelCache;
use crate::tokenizer::{SegmentError, SegmentMode, Segmenter, SpTokenizer};

/// Largest n-best lattice the sampling backend accepts
const MAX_NBEST: i64 = 512;

/// The five tokenization parameters of the operator contract
///
/// `nbest_size` and `alpha` arrive as floats on the wire; `segment_mode`
/// coerces them into the backend mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenizeParams {
    pub nbest_size: f32,
    pub alpha: f32,
    pub add_bos: bool,
    pub add_eos: bool,
    pub reverse: bool,
}

impl Default for TokenizeParams {
    /// Neutral parameters: deterministic greedy segmentation, no markers,
    /// no reversal
    fn default() -> Self {
        Self {
            nbest_size: 0.0,
            alpha: 0.0,
            add_bos: false,
            add_eos: false,
            reverse: false,
        }
    }
}

impl TokenizeParams {
    /// Coerce the float parameters into a segmentation mode
    ///
    /// `nbest_size` is truncated toward zero; sampling runs only when the
    /// truncated value is >= 2 and `alpha` is a normal positive float.
    /// Everything else (NaN in either field, subnormal alpha) selects greedy
    /// segmentation, so a negative, fractional, or degenerate value never
    /// reaches the backend. The backend caps the lattice at 512 hypotheses,
    /// so larger nbest values are clamped to that bound.
    pub fn segment_mode(&self) -> SegmentMode {
        let nbest = if self.nbest_size.is_nan() {
            0
        } else {
            self.nbest_size.trunc() as i64
        };
        if nbest >= 2 && self.alpha > 0.0 && self.alpha.is_normal() {
            SegmentMode::Sample {
                nbest: nbest.min(MAX_NBEST) as usize,
                alpha: self.alpha,
            }
        } else {
            SegmentMode::Greedy
        }
    }
}

/// Tokenizer operator failures
///
/// Batch policy for `EncodingError`: the whole call fails on the first
/// malformed row (carrying its index) and no partial output is produced.
#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("model blob cannot be decoded into a tokenizer: {source}")]
    InvalidModel { source: SegmentError },

    #[error("input row {row} is not valid UTF-8")]
    EncodingError {
        row: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("row {row} could not be tokenized: {reason}")]
    TokenizationError { row: usize, reason: String },
}

/// Tokenize a batch of rows against a serialized model blob
///
/// # Arguments
/// * `model_blob` - opaque serialized tokenizer model bytes (already
///   base64-decoded if they travelled as text)
/// * `rows` - batch of UTF-8 byte rows, one per input row
/// * `params` - the five tokenization parameters
///
/// # Errors
/// `EncodingError` if any row is not valid UTF-8 (checked before the blob
/// is touched), `InvalidModel` if the blob does not decode,
/// `TokenizationError` if a row cannot be segmented or assembled.
pub fn tokenize<R: AsRef<[u8]>>(
    model_blob: &[u8],
    rows: &[R],
    params: &TokenizeParams,
) -> Result<RaggedTensor<i32>, TokenizeError> {
    let texts = check_rows(rows)?;
    let segmenter = SpTokenizer::from_bytes(model_blob)
        .map_err(|source| TokenizeError::InvalidModel { source })?;
    assemble(&segmenter, &texts, params)
}

/// Like `tokenize`, but the blob decode is memoized in `cache`
pub fn tokenize_cached<R: AsRef<[u8]>>(
    cache: &ModelCache,
    model_blob: &[u8],
    rows: &[R],
    params: &TokenizeParams,
) -> Result<RaggedTensor<i32>, TokenizeError> {
    let texts = check_rows(rows)?;
    let segmenter = cache
        .get_or_decode(model_blob)
        .map_err(|source| TokenizeError::InvalidModel { source })?;
    assemble(segmenter.as_ref(), &texts, params)
}

/// Tokenize against an already-constructed backend
///
/// This is the seam the operator tests use with an in-memory vocabulary;
/// the blob-taking entry points above funnel into it.
pub fn tokenize_with<R: AsRef<[u8]>>(
    segmenter: &dyn Segmenter,
    rows: &[R],
    params: &TokenizeParams,
) -> Result<RaggedTensor<i32>, TokenizeError> {
    let texts = check_rows(rows)?;
    assemble(segmenter, &texts, params)
}

/// UTF-8 gate: the first malformed row fails the whole batch
fn check_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Vec<&str>, TokenizeError> {
    rows.iter()
        .enumerate()
        .map(|(row, bytes)| {
            std::str::from_utf8(bytes.as_ref())
                .map_err(|source| TokenizeError::EncodingError { row, source })
        })
        .collect()
}

fn assemble(
    segmenter: &dyn Segmenter,
    texts: &[&str],
    params: &TokenizeParams,
) -> Result<RaggedTensor<i32>, TokenizeError> {
    let mode = params.segment_mode();
    debug!("tokenizing {} rows, mode {:?}", texts.len(), mode);

    let mut token_rows = Vec::with_capacity(texts.len());
    for (row, text) in texts.iter().enumerate() {
        let mut ids = segmenter
            .segment(text, mode)
            .map_err(|e| TokenizeError::TokenizationError {
                row,
                reason: e.to_string(),
            })?;

        if params.reverse {
            ids.reverse();
        }
        // Markers go in after reversal so they stay at the row boundaries.
        if params.add_bos {
            let bos = marker_id(segmenter.bos_id(), "BOS", row)?;
            ids.insert(0, bos);
        }
        if params.add_eos {
            let eos = marker_id(segmenter.eos_id(), "EOS", row)?;
            ids.push(eos);
        }
        token_rows.push(ids);
    }

    Ok(RaggedTensor::from_rows(token_rows))
}

/// A marker was requested but the model defines no id for it: the request
/// is unassemblable, which is a tokenization failure, not a model failure
fn marker_id(id: Option<i32>, marker: &str, row: usize) -> Result<i32, TokenizeError> {
    id.ok_or_else(|| TokenizeError::TokenizationError {
        row,
        reason: format!("model defines no {marker} id"),
    })
}
