/// RaggedTensorToSparse operator
///
/// Converts a ragged tensor (row splits + flat values) into coordinate-list
/// sparse form: (row, col) index pairs, values in index order, and the dense
/// shape (num_rows, max row length).
///
/// Layout note: coordinates are emitted row-major, walking the splits in
/// order, which is already lexicographic - no sort step is needed once the
/// splits have been validated as monotonic.
use thiserror::Error;

use crate::core::types::SparseTensor;

/// Ragged-input violations - each names the evidence, none is repaired
#[derive(Debug, Error, PartialEq)]
pub enum MalformedRagged {
    #[error("row splits are empty; a ragged tensor needs at least the [0] origin")]
    EmptySplits,

    #[error("row splits must start at 0, got {first}")]
    BadOrigin { first: i64 },

    #[error("row splits decrease at position {at}: {prev} -> {next}")]
    Decreasing { at: usize, prev: i64, next: i64 },

    #[error("last row split is {last} but there are {num_values} values")]
    LengthMismatch { last: i64, num_values: usize },
}

/// Convert (splits, values) into sparse coordinate form
///
/// # Arguments
/// * `splits` - int64 row offsets, length = rows + 1, splits[0] = 0,
///   non-decreasing, splits[last] = values.len()
/// * `values` - flat row-major values; any element type, output dtype
///   matches input
///
/// # Errors
/// Returns `MalformedRagged` before producing any output if the splits
/// violate the ragged invariants. Truncated or partial output is never
/// returned.
pub fn ragged_to_sparse<T: Clone>(
    splits: &[i64],
    values: &[T],
) -> Result<SparseTensor<T>, MalformedRagged> {
    validate_splits(splits, values.len())?;

    let num_rows = splits.len() - 1;
    let mut indices = Vec::with_capacity(values.len());
    let mut out_values = Vec::with_capacity(values.len());
    let mut max_row_len: i64 = 0;

    for row in 0..num_rows {
        let start = splits[row];
        let row_len = splits[row + 1] - start;
        max_row_len = max_row_len.max(row_len);
        for col in 0..row_len {
            indices.push([row as i64, col]);
            out_values.push(values[(start + col) as usize].clone());
        }
    }

    Ok(SparseTensor::from_parts(
        indices,
        out_values,
        [num_rows as i64, max_row_len],
    ))
}

/// Check the ragged invariants without converting
///
/// Used by callers that only need to reject bad input (e.g. the pipeline's
/// round-trip assertions).
pub fn validate_splits(splits: &[i64], num_values: usize) -> Result<(), MalformedRagged> {
    let Some(&first) = splits.first() else {
        return Err(MalformedRagged::EmptySplits);
    };
    if first != 0 {
        return Err(MalformedRagged::BadOrigin { first });
    }
    for (at, pair) in splits.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(MalformedRagged::Decreasing {
                at: at + 1,
                prev: pair[0],
                next: pair[1],
            });
        }
    }
    let last = *splits.last().unwrap();
    if last as usize != num_values {
        return Err(MalformedRagged::LengthMismatch { last, num_values });
    }
    Ok(())
}
