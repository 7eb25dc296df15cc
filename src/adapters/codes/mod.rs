//! Built-in error-correcting codes and the factory that builds them.
//!
//! | structure    | scaling parameter            | information length |
//! |--------------|------------------------------|--------------------|
//! | `qc-r12`     | lifting size Z (2..=256, 2^n) | 4·Z                |
//! | `qc-r23`     | lifting size Z (2..=256, 2^n) | 6·Z                |
//! | `repetition` | odd repetition factor        | `info_bits` or 64  |
//!
//! A known structure with an unusable scaling parameter, or with a requested
//! message longer than its information length, is reported as
//! [`CodecConstruction::Unsupported`]. An unknown structure is an error.

pub mod qc_ldpc;
pub mod repetition;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::CodeSpec;
use crate::domain::ports::{Codec, CodecConstruction, CodecFactory, StructureInfo};

use qc_ldpc::{BaseGraph, MinSumDecoder, QcLdpcEncoder, QC_R12, QC_R23, SUPPORTED_LIFTING_SIZES};
use repetition::repetition_codec;

/// Input block length of the repetition code when no message length is configured.
pub const DEFAULT_REPETITION_BLOCK: usize = 64;

/// Factory for every code shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCodecs;

impl BuiltinCodecs {
    pub const fn new() -> Self {
        Self
    }

    fn qc_ldpc(graph: &'static BaseGraph, spec: &CodeSpec) -> CodecConstruction {
        if !SUPPORTED_LIFTING_SIZES.contains(&spec.scaling) {
            return CodecConstruction::Unsupported {
                reason: format!(
                    "{} has no lifting size {} (supported: {:?})",
                    graph.name, spec.scaling, SUPPORTED_LIFTING_SIZES
                ),
            };
        }

        let z = spec.scaling as usize;
        let k = graph.info_cols() * z;
        if let Some(reason) = message_too_long(spec, k) {
            return CodecConstruction::Unsupported { reason };
        }

        CodecConstruction::Ready(Codec {
            encoder: Box::new(QcLdpcEncoder::new(graph, z)),
            decoder: Box::new(MinSumDecoder::new(
                graph,
                z,
                spec.max_iterations,
                spec.min_sum_scale,
            )),
        })
    }

    fn repetition(spec: &CodeSpec) -> CodecConstruction {
        if spec.scaling % 2 == 0 {
            return CodecConstruction::Unsupported {
                reason: format!(
                    "repetition factor must be odd, got {}",
                    spec.scaling
                ),
            };
        }
        let k = spec.info_bits.unwrap_or(DEFAULT_REPETITION_BLOCK);
        CodecConstruction::Ready(repetition_codec(k, spec.scaling as usize))
    }
}

fn message_too_long(spec: &CodeSpec, k: usize) -> Option<String> {
    spec.info_bits
        .filter(|&bits| bits > k)
        .map(|bits| format!("{bits} information bits do not fit into K = {k}"))
}

impl CodecFactory for BuiltinCodecs {
    fn build(&self, spec: &CodeSpec) -> DomainResult<CodecConstruction> {
        if spec.max_iterations == 0 {
            return Err(DomainError::InvalidParameters(
                "decoder iteration budget must be at least 1".to_string(),
            ));
        }
        if !(spec.min_sum_scale > 0.0 && spec.min_sum_scale <= 1.0) {
            return Err(DomainError::InvalidParameters(format!(
                "min-sum scale must lie in (0, 1], got {}",
                spec.min_sum_scale
            )));
        }
        if spec.info_bits == Some(0) {
            return Err(DomainError::InvalidParameters(
                "information length must be at least 1".to_string(),
            ));
        }

        match spec.structure.as_str() {
            "qc-r12" => Ok(Self::qc_ldpc(&QC_R12, spec)),
            "qc-r23" => Ok(Self::qc_ldpc(&QC_R23, spec)),
            "repetition" => Ok(Self::repetition(spec)),
            other => Err(DomainError::UnknownStructure(other.to_string())),
        }
    }

    fn structures(&self) -> Vec<StructureInfo> {
        let lifting = format!("{SUPPORTED_LIFTING_SIZES:?}");
        vec![
            StructureInfo {
                name: QC_R12.name,
                rate: Some(QC_R12.rate()),
                scaling_meaning: "lifting size Z",
                supported_scalings: lifting.clone(),
            },
            StructureInfo {
                name: QC_R23.name,
                rate: Some(QC_R23.rate()),
                scaling_meaning: "lifting size Z",
                supported_scalings: lifting,
            },
            StructureInfo {
                name: "repetition",
                rate: None,
                scaling_meaning: "repetition factor (rate 1/factor)",
                supported_scalings: "odd values".to_string(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(structure: &str, scaling: u32, info_bits: Option<usize>) -> CodeSpec {
        CodeSpec {
            structure: structure.to_string(),
            scaling,
            max_iterations: 10,
            min_sum_scale: 0.75,
            info_bits,
        }
    }

    #[test]
    fn test_builds_supported_qc_code() {
        let built = BuiltinCodecs::new().build(&spec("qc-r12", 16, None)).unwrap();
        match built {
            CodecConstruction::Ready(codec) => {
                assert_eq!(codec.encoder.input_len(), 64);
                assert_eq!(codec.encoder.output_len(), 128);
            }
            CodecConstruction::Unsupported { reason } => panic!("unexpected skip: {reason}"),
        }
    }

    #[test]
    fn test_unsupported_lifting_size() {
        let built = BuiltinCodecs::new().build(&spec("qc-r23", 12, None)).unwrap();
        assert!(matches!(built, CodecConstruction::Unsupported { .. }));
    }

    #[test]
    fn test_message_longer_than_k_is_unsupported() {
        let built = BuiltinCodecs::new()
            .build(&spec("qc-r12", 4, Some(17)))
            .unwrap();
        assert!(matches!(built, CodecConstruction::Unsupported { .. }));
    }

    #[test]
    fn test_even_repetition_factor_is_unsupported() {
        for factor in [0, 2, 4] {
            let built = BuiltinCodecs::new()
                .build(&spec("repetition", factor, None))
                .unwrap();
            assert!(matches!(built, CodecConstruction::Unsupported { .. }));
        }
    }

    #[test]
    fn test_unknown_structure_is_fatal() {
        let err = BuiltinCodecs::new()
            .build(&spec("turbo", 8, None))
            .unwrap_err();
        assert!(matches!(err, DomainError::UnknownStructure(name) if name == "turbo"));
    }

    #[test]
    fn test_zero_iteration_budget_is_fatal() {
        let mut s = spec("qc-r12", 8, None);
        s.max_iterations = 0;
        assert!(BuiltinCodecs::new().build(&s).is_err());
    }
}
