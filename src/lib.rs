//! Native text-preprocessing operators in the shape of ONNX custom ops:
//! a SentencePiece tokenizer producing ragged output (flat int32 token ids
//! plus int64 row splits) and a ragged-to-sparse converter producing
//! coordinate indices, values, and a dense shape.
//!
//! Both operators are pure per-call transforms; graph construction and
//! dispatch belong to a host engine, which checks edges against the
//! signatures in [`ops::registry`].

pub mod core;
pub mod model_loader;
pub mod ops;
pub mod pipeline;
pub mod tokenizer;
