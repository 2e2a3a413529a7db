/// Tokenize-then-sparse composition
///
/// Chains the two operators the way the reference graph wires them: the
/// tokenizer's (values, splits) feed the converter as (splits, values).
use thiserror::Error;

use crate::core::types::{RaggedTensor, SparseTensor};
use crate::ops::ragged_to_sparse::{MalformedRagged, ragged_to_sparse};
use crate::ops::tokenize::{TokenizeError, TokenizeParams, tokenize, tokenize_with};
use crate::tokenizer::Segmenter;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    // Unreachable for any tokenizer output (the ragged invariants hold by
    // construction), kept typed rather than unwrapped.
    #[error(transparent)]
    Convert(#[from] MalformedRagged),
}

/// Both stages' outputs, for callers that want the intermediate form too
#[derive(Debug)]
pub struct PipelineOutput {
    pub ragged: RaggedTensor<i32>,
    pub sparse: SparseTensor<i32>,
}

/// Run tokenizer and converter back to back against a model blob
pub fn tokenize_to_sparse<R: AsRef<[u8]>>(
    model_blob: &[u8],
    rows: &[R],
    params: &TokenizeParams,
) -> Result<PipelineOutput, PipelineError> {
    let ragged = tokenize(model_blob, rows, params)?;
    finish(ragged)
}

/// Same composition against an already-constructed backend
pub fn tokenize_to_sparse_with<R: AsRef<[u8]>>(
    segmenter: &dyn Segmenter,
    rows: &[R],
    params: &TokenizeParams,
) -> Result<PipelineOutput, PipelineError> {
    let ragged = tokenize_with(segmenter, rows, params)?;
    finish(ragged)
}

fn finish(ragged: RaggedTensor<i32>) -> Result<PipelineOutput, PipelineError> {
    let sparse = ragged_to_sparse(ragged.splits(), ragged.values())?;
    Ok(PipelineOutput { ragged, sparse })
}
