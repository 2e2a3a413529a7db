// Operator kernels (pure per-call transforms)
pub mod ragged_to_sparse;
pub mod tokenize;

// Declared I/O signatures for host-engine type checking
pub mod registry;
