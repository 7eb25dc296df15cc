//! Channel port - noisy transmission at a given operating point.

use num_complex::Complex64;

/// A noisy channel parameterized per call by the operating point's SNR.
///
/// Implementations own their noise generator; given the same seed and the
/// same call sequence they must produce identical output.
pub trait Channel: Send {
    /// Pass `symbols` through the channel at `snr_db` (Es/N0 in dB).
    fn transmit(&mut self, symbols: &[Complex64], snr_db: f64) -> Vec<Complex64>;

    /// Complex noise variance N0 the channel applies at `snr_db`, for soft demapping.
    fn noise_variance(&self, snr_db: f64) -> f64;
}
