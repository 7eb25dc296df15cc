//! Quasi-cyclic LDPC codes built from small protograph base matrices.
//!
//! A base matrix entry `s >= 0` expands into a `Z x Z` identity cyclically
//! shifted by `s mod Z`; `-1` expands into a zero block. The last `m` base
//! columns form the parity part: one column with shifts `(s, 0, s)` in the
//! first, pivot and last rows, followed by a dual-diagonal staircase. That
//! layout allows encoding by back-substitution in linear time.
//!
//! Decoding is flooding normalized min-sum with early exit on a satisfied
//! syndrome.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{CodeBit, Decoder, Encoder, SoftBit};

/// LLR assigned to filler positions: a saturated "known zero".
const KNOWN_ZERO_LLR: f64 = 1.0e4;

/// Lifting sizes accepted for every base graph.
pub const SUPPORTED_LIFTING_SIZES: [u32; 8] = [2, 4, 8, 16, 32, 64, 128, 256];

/// A protograph base matrix.
#[derive(Debug)]
pub struct BaseGraph {
    pub name: &'static str,
    pub rows: usize,
    pub cols: usize,
    /// Row-major shift values, `-1` for an all-zero block.
    shifts: &'static [i16],
}

/// Rate-1/2 graph: 4 information and 4 parity block columns.
pub static QC_R12: BaseGraph = BaseGraph {
    name: "qc-r12",
    rows: 4,
    cols: 8,
    shifts: &[
         0,  5, -1,  3,   1,  0, -1, -1,
         2, -1,  7,  1,  -1,  0,  0, -1,
        -1,  4,  0,  6,   0, -1,  0,  0,
         6,  3,  5, -1,   1, -1, -1,  0,
    ],
};

/// Rate-2/3 graph: 6 information and 3 parity block columns.
pub static QC_R23: BaseGraph = BaseGraph {
    name: "qc-r23",
    rows: 3,
    cols: 9,
    shifts: &[
         0,  3, -1,  5,  1,  2,   1,  0, -1,
         4, -1,  2,  0,  6, -1,   0,  0,  0,
        -1,  1,  7,  3, -1,  4,   1, -1,  0,
    ],
};

impl BaseGraph {
    /// Number of information block columns.
    pub const fn info_cols(&self) -> usize {
        self.cols - self.rows
    }

    pub fn rate(&self) -> f64 {
        self.info_cols() as f64 / self.cols as f64
    }

    fn shift(&self, row: usize, col: usize, z: usize) -> Option<usize> {
        let raw = self.shifts[row * self.cols + col];
        usize::try_from(raw).ok().map(|s| s % z)
    }
}

/// Rotate a length-`Z` block: `out[k] = block[(k + shift) mod Z]`.
fn rotate_xor(acc: &mut [u8], block: &[u8], shift: usize) {
    let z = block.len();
    for (k, bit) in acc.iter_mut().enumerate() {
        *bit ^= block[(k + shift) % z];
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Systematic encoder for a lifted base graph.
#[derive(Debug, Clone)]
pub struct QcLdpcEncoder {
    graph: &'static BaseGraph,
    z: usize,
}

impl QcLdpcEncoder {
    pub const fn new(graph: &'static BaseGraph, z: usize) -> Self {
        Self { graph, z }
    }
}

impl Encoder for QcLdpcEncoder {
    fn input_len(&self) -> usize {
        self.graph.info_cols() * self.z
    }

    fn output_len(&self) -> usize {
        self.graph.cols * self.z
    }

    fn encode(&self, input: &[CodeBit]) -> DomainResult<Vec<CodeBit>> {
        let k = self.input_len();
        if input.len() != k {
            return Err(DomainError::InvalidCodeInput {
                expected: k,
                actual: input.len(),
            });
        }

        let z = self.z;
        let kb = self.graph.info_cols();
        let m = self.graph.rows;
        let bits: Vec<u8> = input.iter().map(|slot| slot.unwrap_or(0) & 1).collect();

        // Per-row contribution of the systematic part.
        let mut lambda = vec![vec![0u8; z]; m];
        for (row, acc) in lambda.iter_mut().enumerate() {
            for col in 0..kb {
                if let Some(s) = self.graph.shift(row, col, z) {
                    rotate_xor(acc, &bits[col * z..(col + 1) * z], s);
                }
            }
        }

        // Summing every row cancels the staircase and the paired shifts of
        // the first parity column, leaving that column alone.
        let mut p0 = vec![0u8; z];
        for acc in &lambda {
            for (p, l) in p0.iter_mut().zip(acc) {
                *p ^= l;
            }
        }

        let mut parity = Vec::with_capacity(m);
        parity.push(p0.clone());
        let mut previous = vec![0u8; z];
        for (row, acc) in lambda.iter().enumerate().take(m - 1) {
            let mut next = acc.clone();
            if let Some(s) = self.graph.shift(row, kb, z) {
                rotate_xor(&mut next, &p0, s);
            }
            for (n, p) in next.iter_mut().zip(&previous) {
                *n ^= p;
            }
            parity.push(next.clone());
            previous = next;
        }

        let mut codeword = Vec::with_capacity(self.output_len());
        codeword.extend_from_slice(input);
        codeword.extend(parity.into_iter().flatten().map(Some));
        Ok(codeword)
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Normalized min-sum decoder over the Tanner graph of a lifted base graph.
#[derive(Debug, Clone)]
pub struct MinSumDecoder {
    n: usize,
    k: usize,
    max_iterations: u32,
    scale: f64,
    /// Edge ids grouped by check node.
    check_edges: Vec<Vec<usize>>,
    /// Variable node of each edge.
    edge_var: Vec<usize>,
    c2v: Vec<f64>,
    v2c: Vec<f64>,
    total: Vec<f64>,
    channel: Vec<f64>,
    hard: Vec<u8>,
    last_iterations: u32,
}

impl MinSumDecoder {
    pub fn new(graph: &'static BaseGraph, z: usize, max_iterations: u32, scale: f64) -> Self {
        let mut check_edges = vec![Vec::new(); graph.rows * z];
        let mut edge_var = Vec::new();

        for row in 0..graph.rows {
            for col in 0..graph.cols {
                let Some(s) = graph.shift(row, col, z) else {
                    continue;
                };
                for k in 0..z {
                    check_edges[row * z + k].push(edge_var.len());
                    edge_var.push(col * z + (k + s) % z);
                }
            }
        }

        let n = graph.cols * z;
        let edges = edge_var.len();
        Self {
            n,
            k: graph.info_cols() * z,
            max_iterations,
            scale,
            check_edges,
            edge_var,
            c2v: vec![0.0; edges],
            v2c: vec![0.0; edges],
            total: vec![0.0; n],
            channel: vec![0.0; n],
            hard: vec![0; n],
            last_iterations: 0,
        }
    }

    /// Iterations spent on the most recent block.
    pub const fn last_iterations(&self) -> u32 {
        self.last_iterations
    }

    fn syndrome_ok(&self) -> bool {
        self.check_edges.iter().all(|edges| {
            edges
                .iter()
                .fold(0u8, |acc, &e| acc ^ self.hard[self.edge_var[e]])
                == 0
        })
    }

    fn update_hard_decisions(&mut self) {
        for (h, &t) in self.hard.iter_mut().zip(&self.total) {
            *h = u8::from(t < 0.0);
        }
    }

    fn check_update(&mut self) {
        for edges in &self.check_edges {
            let mut sign = 1.0_f64;
            let mut min1 = f64::INFINITY;
            let mut min2 = f64::INFINITY;
            let mut min_edge = usize::MAX;

            for &e in edges {
                let msg = self.v2c[e];
                if msg < 0.0 {
                    sign = -sign;
                }
                let mag = msg.abs();
                if mag < min1 {
                    min2 = min1;
                    min1 = mag;
                    min_edge = e;
                } else if mag < min2 {
                    min2 = mag;
                }
            }

            for &e in edges {
                let magnitude = if e == min_edge { min2 } else { min1 };
                let own_sign = if self.v2c[e] < 0.0 { -sign } else { sign };
                self.c2v[e] = self.scale * own_sign * magnitude;
            }
        }
    }
}

impl Decoder for MinSumDecoder {
    fn decode(&mut self, soft: &[SoftBit]) -> DomainResult<Vec<CodeBit>> {
        if soft.len() != self.n {
            return Err(DomainError::InvalidCodeInput {
                expected: self.n,
                actual: soft.len(),
            });
        }

        for (ch, slot) in self.channel.iter_mut().zip(soft) {
            *ch = slot.unwrap_or(KNOWN_ZERO_LLR);
        }
        self.total.copy_from_slice(&self.channel);
        self.c2v.fill(0.0);
        self.update_hard_decisions();

        self.last_iterations = 0;
        while self.last_iterations < self.max_iterations && !self.syndrome_ok() {
            for (e, &v) in self.edge_var.iter().enumerate() {
                self.v2c[e] = self.total[v] - self.c2v[e];
            }
            self.check_update();

            self.total.copy_from_slice(&self.channel);
            for (e, &v) in self.edge_var.iter().enumerate() {
                self.total[v] += self.c2v[e];
            }
            self.update_hard_decisions();
            self.last_iterations += 1;
        }

        Ok(soft[..self.k]
            .iter()
            .zip(&self.hard)
            .map(|(slot, &bit)| slot.map(|_| bit))
            .collect())
    }
}
