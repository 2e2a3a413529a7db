use serde::Serialize;

/// Tensor element type identifier - public for signature declaration and
/// host-side type checking
///
/// Mirrors the wire dtypes the operators are registered with: string tensors
/// carry UTF-8 bytes, token ids are int32, splits/indices/shapes are int64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// UTF-8 byte strings (model blob transport, input rows)
    String,
    /// 32-bit floats (nbest_size, alpha parameters)
    Float32,
    /// Booleans (add_bos, add_eos, reverse parameters)
    Bool,
    /// 32-bit signed integers (token ids, sparse values)
    Int32,
    /// 64-bit signed integers (row splits, sparse indices, dense shape)
    Int64,
}

/// Ragged tensor: variable-length rows stored as one flat value array plus
/// a row-splits offset array
///
/// Invariants (enforced at construction):
/// - `splits.len() == rows + 1`
/// - `splits[0] == 0`
/// - `splits` is monotonically non-decreasing
/// - `splits[last] == values.len()`
///
/// Row i's values are `values[splits[i]..splits[i+1]]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaggedTensor<T> {
    values: Vec<T>,
    splits: Vec<i64>,
}

impl<T> RaggedTensor<T> {
    /// Build a ragged tensor row by row
    ///
    /// The splits array is derived from the row lengths, so the result always
    /// satisfies the ragged invariants.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<T>>,
    {
        let mut values = Vec::new();
        let mut splits = vec![0i64];
        for mut row in rows {
            values.append(&mut row);
            splits.push(values.len() as i64);
        }
        Self { values, splits }
    }

    /// Construct from pre-built parts (constructor for the operator modules,
    /// which validate the parts themselves)
    pub(crate) fn from_parts(values: Vec<T>, splits: Vec<i64>) -> Self {
        debug_assert_eq!(*splits.first().unwrap_or(&0), 0);
        debug_assert_eq!(*splits.last().unwrap_or(&0) as usize, values.len());
        Self { values, splits }
    }

    /// Flat value array, row-major
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Row-splits offsets, length = rows + 1
    pub fn splits(&self) -> &[i64] {
        &self.splits
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.splits.len() - 1
    }

    /// Values of row i
    ///
    /// # Panics
    /// Panics if `i >= num_rows()`
    pub fn row(&self, i: usize) -> &[T] {
        let start = self.splits[i] as usize;
        let end = self.splits[i + 1] as usize;
        &self.values[start..end]
    }

    /// Consume into (values, splits) for callers that hand the parts to a
    /// host engine as two separate output tensors
    pub fn into_parts(self) -> (Vec<T>, Vec<i64>) {
        (self.values, self.splits)
    }
}

/// Sparse tensor in coordinate-list form
///
/// `indices` are (row, col) pairs sorted lexicographically, `values` follow
/// the index order, and `dense_shape` is (num_rows, max row length).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SparseTensor<T> {
    indices: Vec<[i64; 2]>,
    values: Vec<T>,
    dense_shape: [i64; 2],
}

impl<T> SparseTensor<T> {
    pub(crate) fn from_parts(indices: Vec<[i64; 2]>, values: Vec<T>, dense_shape: [i64; 2]) -> Self {
        debug_assert_eq!(indices.len(), values.len());
        Self {
            indices,
            values,
            dense_shape,
        }
    }

    /// Coordinate pairs, lexicographically sorted
    pub fn indices(&self) -> &[[i64; 2]] {
        &self.indices
    }

    /// Values in index order
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// (num_rows, max row length)
    pub fn dense_shape(&self) -> [i64; 2] {
        self.dense_shape
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
