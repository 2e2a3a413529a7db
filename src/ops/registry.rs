/// Operator registry: declared I/O signatures for a host execution engine
///
/// The host owns graph construction, type checking, and dispatch; this
/// registry is the contract it checks against. It is a plain value built at
/// host startup and passed by reference - there is no ambient global
/// registration.
use std::collections::HashMap;
use thiserror::Error;

use crate::core::types::ElementType;

/// Custom-op domain shared by both operators
pub const CONTRIB_DOMAIN: &str = "ai.onnx.contrib";

/// Name of the tokenizer operator
pub const SENTENCEPIECE_TOKENIZER: &str = "SentencepieceTokenizer";

/// Name of the ragged-to-sparse operator
pub const RAGGED_TENSOR_TO_SPARSE: &str = "RaggedTensorToSparse";

/// Declared signature of one operator
#[derive(Debug, Clone, PartialEq)]
pub struct OpSignature {
    pub name: String,
    pub domain: String,
    pub inputs: Vec<ElementType>,
    pub outputs: Vec<ElementType>,
}

impl OpSignature {
    /// Key the registry stores signatures under
    fn key(&self) -> String {
        format!("{}::{}", self.domain, self.name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("operator {domain}::{name} is already registered")]
    Duplicate { domain: String, name: String },

    #[error("operator {domain}::{name} is not registered")]
    Unknown { domain: String, name: String },

    #[error(
        "operator {domain}::{name} expects {expected} inputs, got {got}"
    )]
    InputArity {
        domain: String,
        name: String,
        expected: usize,
        got: usize,
    },

    #[error(
        "operator {domain}::{name} input {position} expects {expected:?}, got {got:?}"
    )]
    InputType {
        domain: String,
        name: String,
        position: usize,
        expected: ElementType,
        got: ElementType,
    },
}

/// Explicit operator registry
#[derive(Debug, Default)]
pub struct OpRegistry {
    ops: HashMap<String, OpSignature>,
}

impl OpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operator signature; double registration is rejected
    pub fn register(&mut self, sig: OpSignature) -> Result<(), RegistryError> {
        let key = sig.key();
        if self.ops.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                domain: sig.domain,
                name: sig.name,
            });
        }
        self.ops.insert(key, sig);
        Ok(())
    }

    /// Look up a registered signature
    pub fn lookup(&self, domain: &str, name: &str) -> Option<&OpSignature> {
        self.ops.get(&format!("{domain}::{name}"))
    }

    /// Check a candidate input type list against a registered signature
    ///
    /// This is the hook a host's graph type-checker calls before wiring an
    /// edge into the operator.
    pub fn check_inputs(
        &self,
        domain: &str,
        name: &str,
        inputs: &[ElementType],
    ) -> Result<(), RegistryError> {
        let sig = self.lookup(domain, name).ok_or_else(|| RegistryError::Unknown {
            domain: domain.to_string(),
            name: name.to_string(),
        })?;
        if inputs.len() != sig.inputs.len() {
            return Err(RegistryError::InputArity {
                domain: domain.to_string(),
                name: name.to_string(),
                expected: sig.inputs.len(),
                got: inputs.len(),
            });
        }
        for (position, (&got, &expected)) in inputs.iter().zip(&sig.inputs).enumerate() {
            if got != expected {
                return Err(RegistryError::InputType {
                    domain: domain.to_string(),
                    name: name.to_string(),
                    position,
                    expected,
                    got,
                });
            }
        }
        Ok(())
    }

    /// Number of registered operators
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Signature of the tokenizer operator: (model, inputs, nbest_size, alpha,
/// add_bos, add_eos, reverse) -> (token ids, row splits)
pub fn sentencepiece_tokenizer_signature() -> OpSignature {
    OpSignature {
        name: SENTENCEPIECE_TOKENIZER.to_string(),
        domain: CONTRIB_DOMAIN.to_string(),
        inputs: vec![
            ElementType::String,
            ElementType::String,
            ElementType::Float32,
            ElementType::Float32,
            ElementType::Bool,
            ElementType::Bool,
            ElementType::Bool,
        ],
        outputs: vec![ElementType::Int32, ElementType::Int64],
    }
}

/// Signature of the converter: (row splits, token ids) -> (indices, values,
/// dense shape)
pub fn ragged_to_sparse_signature() -> OpSignature {
    OpSignature {
        name: RAGGED_TENSOR_TO_SPARSE.to_string(),
        domain: CONTRIB_DOMAIN.to_string(),
        inputs: vec![ElementType::Int64, ElementType::Int32],
        outputs: vec![ElementType::Int64, ElementType::Int32, ElementType::Int64],
    }
}

/// A registry pre-loaded with both operators
pub fn standard_registry() -> OpRegistry {
    let mut registry = OpRegistry::new();
    // Both inserts are into a fresh registry, no duplicates possible.
    registry
        .register(sentencepiece_tokenizer_signature())
        .unwrap();
    registry.register(ragged_to_sparse_signature()).unwrap();
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_holds_both_ops() {
        let registry = standard_registry();
        assert_eq!(registry.len(), 2);

        let tok = registry
            .lookup(CONTRIB_DOMAIN, SENTENCEPIECE_TOKENIZER)
            .unwrap();
        assert_eq!(tok.inputs.len(), 7);
        assert_eq!(
            tok.outputs,
            vec![ElementType::Int32, ElementType::Int64]
        );

        let conv = registry
            .lookup(CONTRIB_DOMAIN, RAGGED_TENSOR_TO_SPARSE)
            .unwrap();
        assert_eq!(
            conv.inputs,
            vec![ElementType::Int64, ElementType::Int32]
        );
        assert_eq!(
            conv.outputs,
            vec![ElementType::Int64, ElementType::Int32, ElementType::Int64]
        );
    }

    #[test]
    fn test_tokenizer_outputs_feed_converter_inputs() {
        // The converter consumes the tokenizer's outputs swapped:
        // (splits, values), i.e. tokout1 before tokout0.
        let tok = sentencepiece_tokenizer_signature();
        let conv = ragged_to_sparse_signature();
        assert_eq!(conv.inputs, vec![tok.outputs[1], tok.outputs[0]]);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = standard_registry();
        let err = registry
            .register(sentencepiece_tokenizer_signature())
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                domain: CONTRIB_DOMAIN.to_string(),
                name: SENTENCEPIECE_TOKENIZER.to_string(),
            }
        );
    }

    #[test]
    fn test_check_inputs_accepts_declared_types() {
        let registry = standard_registry();
        registry
            .check_inputs(
                CONTRIB_DOMAIN,
                RAGGED_TENSOR_TO_SPARSE,
                &[ElementType::Int64, ElementType::Int32],
            )
            .unwrap();
    }

    #[test]
    fn test_check_inputs_rejects_wrong_type_and_arity() {
        let registry = standard_registry();

        let err = registry
            .check_inputs(
                CONTRIB_DOMAIN,
                RAGGED_TENSOR_TO_SPARSE,
                &[ElementType::Int32, ElementType::Int32],
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::InputType { position: 0, .. }));

        let err = registry
            .check_inputs(CONTRIB_DOMAIN, RAGGED_TENSOR_TO_SPARSE, &[ElementType::Int64])
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InputArity {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_op_reported() {
        let registry = standard_registry();
        let err = registry
            .check_inputs(CONTRIB_DOMAIN, "NoSuchOp", &[])
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unknown { .. }));
    }
}
