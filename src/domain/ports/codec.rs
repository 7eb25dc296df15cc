//! Codec port - encoder/decoder pair for one code configuration.
//!
//! Bits travel as `Option<u8>` slots and soft values as `Option<f64>` slots.
//! `None` is the filler marker: a position that belongs to the code's
//! structural layout but carries no payload. Fillers are known to both ends,
//! are never transmitted, and are excluded from message comparison.

use crate::domain::errors::DomainResult;
use crate::domain::models::CodeSpec;

/// One hard-decision bit position, `None` marking a filler.
pub type CodeBit = Option<u8>;

/// One soft-decision (LLR) position, `None` marking a filler.
///
/// LLRs are `ln(P(b=0)/P(b=1))`: positive values favour a zero bit.
pub type SoftBit = Option<f64>;

/// Deterministic encoder for a fixed code.
pub trait Encoder: Send {
    /// Number of input positions (message plus filler) the encoder expects.
    fn input_len(&self) -> usize;

    /// Number of codeword positions produced, filler markers included.
    fn output_len(&self) -> usize;

    /// Encode an input block of exactly [`input_len`](Self::input_len) slots.
    ///
    /// Filler slots in the input stay filler slots in the codeword.
    fn encode(&self, input: &[CodeBit]) -> DomainResult<Vec<CodeBit>>;
}

/// Soft-input decoder with a bounded iteration budget.
pub trait Decoder: Send {
    /// Decode a full codeword of soft values and return the estimate of the
    /// encoder input, filler markers at the same positions as encoded.
    fn decode(&mut self, soft: &[SoftBit]) -> DomainResult<Vec<CodeBit>>;
}

/// A usable encoder/decoder pair.
pub struct Codec {
    pub encoder: Box<dyn Encoder>,
    pub decoder: Box<dyn Decoder>,
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("input_len", &self.encoder.input_len())
            .field("output_len", &self.encoder.output_len())
            .finish_non_exhaustive()
    }
}

/// Outcome of constructing a codec.
///
/// `Unsupported` is an expected, recoverable answer (the structure exists but
/// cannot be built with the requested scaling parameter or message length);
/// every other construction failure is a [`DomainError`](crate::domain::errors::DomainError).
#[derive(Debug)]
pub enum CodecConstruction {
    Ready(Codec),
    Unsupported { reason: String },
}

/// Static description of a code structure, for listings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StructureInfo {
    pub name: &'static str,
    /// Code rate, or `None` when it depends on the scaling parameter
    pub rate: Option<f64>,
    pub scaling_meaning: &'static str,
    pub supported_scalings: String,
}

/// Builds codecs by (structure, scaling parameter).
pub trait CodecFactory: Send + Sync {
    /// Construct the codec described by `spec`.
    fn build(&self, spec: &CodeSpec) -> DomainResult<CodecConstruction>;

    /// Structures this factory knows about.
    fn structures(&self) -> Vec<StructureInfo>;
}
