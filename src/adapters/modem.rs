//! BPSK and Gray-mapped QPSK with exact max-log soft demapping.
//!
//! Both mappings keep unit symbol energy, so Es/N0 in dB maps directly to the
//! channel's noise variance. LLRs are positive when the bit is more likely 0.

use std::f64::consts::SQRT_2;

use num_complex::Complex64;

use crate::domain::models::Modulation;
use crate::domain::ports::{Demodulator, Modulator};

/// 0 → +1, 1 → -1 on the real axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bpsk;

impl Modulator for Bpsk {
    fn bits_per_symbol(&self) -> usize {
        1
    }

    fn modulate(&self, bits: &[u8]) -> Vec<Complex64> {
        bits.iter()
            .map(|&bit| Complex64::new(antipodal(bit), 0.0))
            .collect()
    }
}

impl Demodulator for Bpsk {
    fn demodulate(&self, symbols: &[Complex64], noise_variance: f64) -> Vec<f64> {
        let gain = 4.0 / noise_variance;
        symbols.iter().map(|y| gain * y.re).collect()
    }
}

/// Gray QPSK: first bit on I, second bit on Q, each scaled by 1/√2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Qpsk;

impl Modulator for Qpsk {
    fn bits_per_symbol(&self) -> usize {
        2
    }

    fn modulate(&self, bits: &[u8]) -> Vec<Complex64> {
        bits.chunks(2)
            .map(|pair| {
                let i = antipodal(pair[0]);
                let q = antipodal(pair.get(1).copied().unwrap_or(0));
                Complex64::new(i, q) / SQRT_2
            })
            .collect()
    }
}

impl Demodulator for Qpsk {
    fn demodulate(&self, symbols: &[Complex64], noise_variance: f64) -> Vec<f64> {
        let gain = 2.0 * SQRT_2 / noise_variance;
        symbols
            .iter()
            .flat_map(|y| [gain * y.re, gain * y.im])
            .collect()
    }
}

fn antipodal(bit: u8) -> f64 {
    if bit == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Modulator/demodulator pair for a configured [`Modulation`].
pub fn modem_for(modulation: Modulation) -> (Box<dyn Modulator>, Box<dyn Demodulator>) {
    match modulation {
        Modulation::Bpsk => (Box::new(Bpsk), Box::new(Bpsk)),
        Modulation::Qpsk => (Box::new(Qpsk), Box::new(Qpsk)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hard(llrs: &[f64]) -> Vec<u8> {
        llrs.iter().map(|&l| u8::from(l < 0.0)).collect()
    }

    #[test]
    fn test_bpsk_hard_decisions_recover_bits() {
        let bits = [0, 1, 1, 0, 1];
        let symbols = Bpsk.modulate(&bits);
        assert_eq!(symbols[1], Complex64::new(-1.0, 0.0));
        assert_eq!(hard(&Bpsk.demodulate(&symbols, 0.5)), bits);
    }

    #[test]
    fn test_bpsk_llr_scales_with_noise() {
        let llr = Bpsk.demodulate(&[Complex64::new(0.5, 0.3)], 0.25);
        assert!((llr[0] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_qpsk_symbols_have_unit_energy() {
        for symbol in Qpsk.modulate(&[0, 0, 0, 1, 1, 0, 1, 1]) {
            assert!((symbol.norm_sqr() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_qpsk_gray_mapping_round_trip() {
        let bits = [0, 1, 1, 1, 1, 0, 0, 0];
        let llrs = Qpsk.demodulate(&Qpsk.modulate(&bits), 1.0);
        assert_eq!(llrs.len(), bits.len());
        assert_eq!(hard(&llrs), bits);
    }

    #[test]
    fn test_qpsk_pads_odd_bit_count() {
        let symbols = Qpsk.modulate(&[1, 0, 1]);
        assert_eq!(symbols.len(), 2);
        assert!(symbols[1].im > 0.0);
    }

    #[test]
    fn test_modem_for_selects_mapping() {
        let (modulator, _) = modem_for(Modulation::Qpsk);
        assert_eq!(modulator.bits_per_symbol(), 2);
    }
}
