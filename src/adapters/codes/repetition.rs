//! Repetition code: the whole input block is sent `factor` times.
//!
//! Decoding adds the LLRs of all copies of a position. Only odd factors are
//! built, so a hard tie between copies cannot occur on a noiseless channel.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{CodeBit, Codec, Decoder, Encoder, SoftBit};

#[derive(Debug, Clone)]
pub struct RepetitionEncoder {
    k: usize,
    factor: usize,
}

impl RepetitionEncoder {
    pub const fn new(k: usize, factor: usize) -> Self {
        Self { k, factor }
    }
}

impl Encoder for RepetitionEncoder {
    fn input_len(&self) -> usize {
        self.k
    }

    fn output_len(&self) -> usize {
        self.k * self.factor
    }

    fn encode(&self, input: &[CodeBit]) -> DomainResult<Vec<CodeBit>> {
        if input.len() != self.k {
            return Err(DomainError::InvalidCodeInput {
                expected: self.k,
                actual: input.len(),
            });
        }
        Ok(input.repeat(self.factor))
    }
}

#[derive(Debug, Clone)]
pub struct RepetitionDecoder {
    k: usize,
    factor: usize,
}

impl RepetitionDecoder {
    pub const fn new(k: usize, factor: usize) -> Self {
        Self { k, factor }
    }
}

impl Decoder for RepetitionDecoder {
    fn decode(&mut self, soft: &[SoftBit]) -> DomainResult<Vec<CodeBit>> {
        let n = self.k * self.factor;
        if soft.len() != n {
            return Err(DomainError::InvalidCodeInput {
                expected: n,
                actual: soft.len(),
            });
        }

        Ok((0..self.k)
            .map(|i| {
                soft[i].map(|_| {
                    let sum: f64 = soft[i..]
                        .iter()
                        .step_by(self.k)
                        .map(|llr| llr.unwrap_or(0.0))
                        .sum();
                    u8::from(sum < 0.0)
                })
            })
            .collect())
    }
}

/// Build a ready repetition codec for `k` input positions.
pub fn repetition_codec(k: usize, factor: usize) -> Codec {
    Codec {
        encoder: Box::new(RepetitionEncoder::new(k, factor)),
        decoder: Box::new(RepetitionDecoder::new(k, factor)),
    }
}
