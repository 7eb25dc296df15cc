//! One end-to-end Monte Carlo trial.
//!
//! generate → pad with fillers → encode → drop fillers → modulate → channel
//! → demodulate → re-insert fillers → decode → compare.
//!
//! Every random draw comes from the runner's own RNG or from the channel's
//! noise generator, so a fixed seed and a fixed call order reproduce the exact
//! same outcomes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::adapters::channel::AwgnChannel;
use crate::adapters::modem::modem_for;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Modulation, TrialOutcome};
use crate::domain::ports::{
    Channel, CodeBit, Codec, Demodulator, Modulator, SoftBit,
};

/// Anything able to produce trial outcomes at a given SNR.
///
/// The sweep controller only depends on this seam, which lets tests script
/// outcome sequences directly.
pub trait TrialSource: Send {
    fn run_trial(&mut self, snr_db: f64) -> DomainResult<TrialOutcome>;
}

/// Runs trials through injected codec, modem and channel collaborators.
pub struct TrialRunner {
    codec: Codec,
    modulator: Box<dyn Modulator>,
    demodulator: Box<dyn Demodulator>,
    channel: Box<dyn Channel>,
    rng: StdRng,
    info_bit_count: usize,
}

impl std::fmt::Debug for TrialRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrialRunner")
            .field("codec", &self.codec)
            .field("info_bit_count", &self.info_bit_count)
            .finish_non_exhaustive()
    }
}

impl TrialRunner {
    /// Assemble a runner from explicit collaborators.
    ///
    /// `info_bit_count` must be between 1 and the encoder's input length; the
    /// remaining input positions are filled with filler markers.
    pub fn new(
        codec: Codec,
        modulator: Box<dyn Modulator>,
        demodulator: Box<dyn Demodulator>,
        channel: Box<dyn Channel>,
        rng: StdRng,
        info_bit_count: usize,
    ) -> DomainResult<Self> {
        let input_len = codec.encoder.input_len();
        if info_bit_count == 0 || info_bit_count > input_len {
            return Err(DomainError::InvalidCodeInput {
                expected: input_len,
                actual: info_bit_count,
            });
        }
        Ok(Self {
            codec,
            modulator,
            demodulator,
            channel,
            rng,
            info_bit_count,
        })
    }

    /// Assemble a runner over an AWGN channel with everything derived from `seed`.
    ///
    /// The message RNG is seeded with `seed`; its first draw seeds the
    /// channel's noise generator.
    pub fn seeded(
        codec: Codec,
        modulation: Modulation,
        seed: u64,
        info_bit_count: usize,
    ) -> DomainResult<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let channel = AwgnChannel::new(rng.gen());
        let (modulator, demodulator) = modem_for(modulation);
        Self::new(
            codec,
            modulator,
            demodulator,
            Box::new(channel),
            rng,
            info_bit_count,
        )
    }

    pub const fn info_bit_count(&self) -> usize {
        self.info_bit_count
    }

    fn random_message(&mut self) -> Vec<u8> {
        (0..self.info_bit_count)
            .map(|_| self.rng.gen_range(0..=1))
            .collect()
    }
}

impl TrialSource for TrialRunner {
    fn run_trial(&mut self, snr_db: f64) -> DomainResult<TrialOutcome> {
        let message = self.random_message();

        let input_len = self.codec.encoder.input_len();
        let input: Vec<CodeBit> = message
            .iter()
            .map(|&bit| Some(bit))
            .chain(std::iter::repeat(None))
            .take(input_len)
            .collect();

        let codeword = self.codec.encoder.encode(&input)?;
        let transmitted: Vec<u8> = codeword.iter().flatten().copied().collect();

        let symbols = self.modulator.modulate(&transmitted);
        let received = self.channel.transmit(&symbols, snr_db);
        let llrs = self
            .demodulator
            .demodulate(&received, self.channel.noise_variance(snr_db));
        if llrs.len() < transmitted.len() {
            return Err(DomainError::InvalidCodeInput {
                expected: transmitted.len(),
                actual: llrs.len(),
            });
        }

        let mut llr_iter = llrs.into_iter();
        let soft: Vec<SoftBit> = codeword
            .iter()
            .map(|slot| slot.and_then(|_| llr_iter.next()))
            .collect();

        let estimate = self.codec.decoder.decode(&soft)?;
        if estimate.len() != input_len {
            return Err(DomainError::InvalidCodeInput {
                expected: input_len,
                actual: estimate.len(),
            });
        }

        let success = estimate
            .iter()
            .zip(&message)
            .all(|(decoded, &sent)| *decoded == Some(sent));
        Ok(TrialOutcome::from(success))
    }
}

#[cfg(test)]
mod tests {
    use num_complex::Complex64;

    use super::*;
    use crate::adapters::codes::repetition::repetition_codec;
    use crate::adapters::modem::Bpsk;

    /// Passes symbols through untouched.
    struct NoiselessChannel;

    impl Channel for NoiselessChannel {
        fn transmit(&mut self, symbols: &[Complex64], _snr_db: f64) -> Vec<Complex64> {
            symbols.to_vec()
        }

        fn noise_variance(&self, _snr_db: f64) -> f64 {
            1.0
        }
    }

    /// Flips the sign of every symbol, guaranteeing decoding failure.
    struct InvertingChannel;

    impl Channel for InvertingChannel {
        fn transmit(&mut self, symbols: &[Complex64], _snr_db: f64) -> Vec<Complex64> {
            symbols.iter().map(|s| -*s).collect()
        }

        fn noise_variance(&self, _snr_db: f64) -> f64 {
            1.0
        }
    }

    fn runner(channel: Box<dyn Channel>, info_bits: usize) -> TrialRunner {
        TrialRunner::new(
            repetition_codec(16, 3),
            Box::new(Bpsk),
            Box::new(Bpsk),
            channel,
            StdRng::seed_from_u64(3),
            info_bits,
        )
        .unwrap()
    }

    #[test]
    fn test_noiseless_channel_always_succeeds() {
        let mut runner = runner(Box::new(NoiselessChannel), 16);
        for _ in 0..20 {
            assert_eq!(runner.run_trial(0.0).unwrap(), TrialOutcome::Success);
        }
    }

    #[test]
    fn test_inverted_channel_always_fails() {
        let mut runner = runner(Box::new(InvertingChannel), 16);
        for _ in 0..20 {
            assert_eq!(runner.run_trial(0.0).unwrap(), TrialOutcome::BlockError);
        }
    }

    #[test]
    fn test_short_message_is_padded_with_fillers() {
        let mut runner = runner(Box::new(NoiselessChannel), 5);
        assert_eq!(runner.info_bit_count(), 5);
        assert_eq!(runner.run_trial(0.0).unwrap(), TrialOutcome::Success);
    }

    #[test]
    fn test_rejects_message_longer_than_code_input() {
        let result = TrialRunner::new(
            repetition_codec(8, 3),
            Box::new(Bpsk),
            Box::new(Bpsk),
            Box::new(NoiselessChannel),
            StdRng::seed_from_u64(0),
            9,
        );
        assert!(matches!(
            result,
            Err(DomainError::InvalidCodeInput { expected: 8, actual: 9 })
        ));
    }

    #[test]
    fn test_seeded_runners_are_deterministic() {
        let outcomes = |seed| {
            let mut runner =
                TrialRunner::seeded(repetition_codec(32, 3), Modulation::Bpsk, seed, 32).unwrap();
            (0..200)
                .map(|_| runner.run_trial(1.0).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(outcomes(11), outcomes(11));
    }
}
