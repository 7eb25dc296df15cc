//! Modem port - bit/symbol mapping and soft demapping.

use num_complex::Complex64;

/// Maps bits onto unit-energy complex baseband symbols.
pub trait Modulator: Send {
    fn bits_per_symbol(&self) -> usize;

    /// Modulate `bits` (values 0/1). A trailing partial symbol is padded with zeros.
    fn modulate(&self, bits: &[u8]) -> Vec<Complex64>;
}

/// Produces per-bit LLRs from received symbols.
pub trait Demodulator: Send {
    /// Demodulate `symbols` given the complex noise variance `N0`.
    ///
    /// Returns `symbols.len() * bits_per_symbol` LLRs, positive favouring 0.
    fn demodulate(&self, symbols: &[Complex64], noise_variance: f64) -> Vec<f64>;
}
