//! Additive white Gaussian noise channel.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::domain::ports::Channel;

/// Complex AWGN for unit-energy symbols.
///
/// At Es/N0 = `snr_db` the complex noise variance is `N0 = 10^(-snr_db/10)`,
/// split evenly between the real and imaginary parts.
#[derive(Debug, Clone)]
pub struct AwgnChannel {
    rng: StdRng,
}

impl AwgnChannel {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn gaussian(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

impl Channel for AwgnChannel {
    fn transmit(&mut self, symbols: &[Complex64], snr_db: f64) -> Vec<Complex64> {
        let sigma = (self.noise_variance(snr_db) / 2.0).sqrt();
        symbols
            .iter()
            .map(|&s| {
                let noise = Complex64::new(self.gaussian(), self.gaussian());
                s + noise * sigma
            })
            .collect()
    }

    fn noise_variance(&self, snr_db: f64) -> f64 {
        10f64.powf(-snr_db / 10.0)
    }
}
