//! Avalanche and bit-independence measurements for `mix_input`-shaped
//! functions.

use std::{fmt::Write as _, fs::File, path::Path};

use log::debug;
use nanorand::{Rng, WyRand};

/// Which measurements `compute_stats()` collects.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub avalanche: bool,
    /// Bit independence criterion.  Quadratic in the output size, so off by
    /// default.
    pub bic: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            avalanche: true,
            bic: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl Summary {
    fn of<I: Iterator<Item = f64>>(values: I) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut n = 0usize;
        for v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            n += 1;
        }
        Self {
            min,
            avg: sum / n as f64,
            max,
        }
    }
}

pub struct Stats {
    pub input_bit_len: usize,
    pub output_bit_len: usize,
    pub digest_bit_len: usize,

    // Number of input blocks sampled.
    pub sample_count: usize,

    // `input_bit_len * output_bit_len` flip counts, row-major by input bit.
    pub avalanche_chart: Vec<u32>,

    // Per input bit, and per ordered pair of distinct output bits, counts of
    // [both flipped, neither flipped, only first, only second].
    pub bic_chart: Vec<[u32; 4]>,
}

impl Stats {
    pub fn new(
        input_bit_len: usize,
        output_bit_len: usize,
        digest_bit_len: usize,
        options: Options,
    ) -> Self {
        let pairs = output_bit_len * output_bit_len.saturating_sub(1);
        Self {
            input_bit_len,
            output_bit_len,
            digest_bit_len,
            sample_count: 0,
            avalanche_chart: if options.avalanche {
                vec![0; input_bit_len * output_bit_len]
            } else {
                Vec::new()
            },
            bic_chart: if options.bic {
                vec![[0; 4]; input_bit_len * pairs]
            } else {
                Vec::new()
            },
        }
    }

    fn bic_stride(&self) -> usize {
        self.output_bit_len * (self.output_bit_len - 1)
    }

    pub fn flips(&self, in_bit: usize, out_bit: usize) -> u32 {
        self.avalanche_chart[in_bit * self.output_bit_len + out_bit]
    }

    pub fn row(&self, in_bit: usize) -> &[u32] {
        let start = in_bit * self.output_bit_len;
        &self.avalanche_chart[start..(start + self.output_bit_len)]
    }

    fn probability(&self, flips: u32) -> f64 {
        flips as f64 / self.sample_count as f64
    }

    /// How many output bits an input bit effectively reaches: the sum over
    /// its row of `1 - bias`.
    pub fn row_diffusion(&self, in_bit: usize) -> f64 {
        self.row(in_bit)
            .iter()
            .map(|&flips| 1.0 - p_to_bias(self.probability(flips)))
            .sum()
    }

    pub fn row_entropy(&self, in_bit: usize) -> f64 {
        self.row(in_bit)
            .iter()
            .map(|&flips| p_to_entropy(self.probability(flips)))
            .sum()
    }

    pub fn bias(&self) -> Summary {
        Summary::of(
            self.avalanche_chart
                .iter()
                .map(|&flips| p_to_bias(self.probability(flips))),
        )
    }

    pub fn diffusion(&self) -> Summary {
        Summary::of((0..self.input_bit_len).map(|i| self.row_diffusion(i)))
    }

    pub fn entropy(&self) -> Summary {
        Summary::of((0..self.input_bit_len).map(|i| self.row_entropy(i)))
    }

    fn bic_row(&self, in_bit: usize) -> &[[u32; 4]] {
        let stride = self.bic_stride();
        &self.bic_chart[(in_bit * stride)..((in_bit + 1) * stride)]
    }

    /// Average spread between the most and least populated quadrant, relative
    /// to the most populated one.  Zero means perfectly independent.
    pub fn row_bic_deviation(&self, in_bit: usize) -> f64 {
        let row = self.bic_row(in_bit);
        let sum: f64 = row
            .iter()
            .map(|q| {
                let min = q.iter().min().copied().unwrap_or(0);
                let max = q.iter().max().copied().unwrap_or(0).max(1);
                (max - min) as f64 / max as f64
            })
            .sum();
        sum / row.len() as f64
    }

    pub fn bic_deviation(&self) -> Summary {
        Summary::of((0..self.input_bit_len).map(|i| self.row_bic_deviation(i)))
    }

    /// Quadrant frequencies for one input bit, each pair's quadrants sorted
    /// ascending before averaging.  Ideal is `[0.25; 4]`.
    pub fn row_bic_sorted_quadrants(&self, in_bit: usize) -> [f64; 4] {
        let row = self.bic_row(in_bit);
        let mut sum = [0u64; 4];
        for &quadrants in row {
            let mut q = quadrants;
            q.sort_unstable();
            for (s, n) in sum.iter_mut().zip(q) {
                *s += n as u64;
            }
        }
        let norm = (row.len() * self.sample_count) as f64;
        sum.map(|s| s as f64 / norm)
    }

    /// `(worst, average, best)` sorted quadrants across input bits.
    pub fn bic_sorted_quadrants(&self) -> ([f64; 4], [f64; 4], [f64; 4]) {
        let mut worst = [f64::INFINITY, f64::INFINITY, f64::INFINITY, 0.0];
        let mut avg = [0.0; 4];
        let mut best = [0.0; 4];
        for i in 0..self.input_bit_len {
            let q = self.row_bic_sorted_quadrants(i);
            for k in 0..3 {
                worst[k] = worst[k].min(q[k]);
            }
            worst[3] = worst[3].max(q[3]);
            for k in 0..4 {
                avg[k] += q[k] / self.input_bit_len as f64;
            }
            if q[0] > best[0] {
                best = q;
            }
        }
        (worst, avg, best)
    }

    pub fn report(&self) -> String {
        let mut out = String::new();

        if !self.avalanche_chart.is_empty() {
            let bias = self.bias();
            let diffusion = self.diffusion();
            let entropy = self.entropy();
            let _ = write!(
                out,
                "    Bias:
        Min: {:0.2}
        Avg: {:0.2}
        Max: {:0.2}
    Input Bit Diffusion (digest size = {} bits):
        Min: {:0.1} bits
        Avg: {:0.1} bits
        Max: {:0.1} bits
    Input Bit Diffusion Entropy (digest size = {} bits):
        Min: {:0.1} bits
        Avg: {:0.1} bits
        Max: {:0.1} bits
",
                bias.min,
                bias.avg,
                bias.max,
                self.digest_bit_len,
                diffusion.min,
                diffusion.avg,
                diffusion.max,
                self.digest_bit_len,
                entropy.min,
                entropy.avg,
                entropy.max,
            );
        }

        if !self.bic_chart.is_empty() {
            let (worst, avg, best) = self.bic_sorted_quadrants();
            let fmt = |q: [f64; 4]| format!("[{:0.4}, {:0.4}, {:0.4}, {:0.4}]", q[0], q[1], q[2], q[3]);
            let _ = write!(
                out,
                "    BIC quadrants (sorted):
        Wrst: {}
         Avg: {}
        Best: {}
",
                fmt(worst),
                fmt(avg),
                fmt(best),
            );
        }

        out
    }

    /// Writes the avalanche chart as a grayscale PNG, one row per input bit.
    /// White means the output bit always flips, black that it never does.
    pub fn write_avalanche_png<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut pixels = Vec::with_capacity(self.avalanche_chart.len() * 4);
        for &flips in &self.avalanche_chart {
            let v = (self.probability(flips) * 255.0).round().clamp(0.0, 255.0) as u8;
            pixels.extend_from_slice(&[v, v, v, 255]);
        }

        png_encode_mini::write_rgba_from_u8(
            &mut File::create(path.as_ref())?,
            &pixels,
            self.output_bit_len as u32,
            self.input_bit_len as u32,
        )
    }
}

/// Samples `rounds` inputs from `generate_input` and measures how flipping
/// each input bit changes the output of `mix`.
///
/// - `generate_input`: fills an input block deterministically from the round
///   number, which counts up from zero.
/// - `mix`: writes its whole output buffer; whatever was there before is
///   ignored.
/// - `digest_size` is only carried through to the report.
pub fn compute_stats<F1, F2>(
    generate_input: F1,
    mix: F2,
    input_size: usize,
    output_size: usize,
    digest_size: usize,
    rounds: usize,
    options: Options,
) -> Stats
where
    F1: Fn(usize, &mut [u8]),
    F2: Fn(&[u8], &mut [u8]),
{
    let in_bits = input_size * 8;
    let out_bits = output_size * 8;
    let mut stats = Stats::new(in_bits, out_bits, digest_size * 8, options);

    let mut input = vec![0u8; input_size];
    let mut output = vec![0u8; output_size];
    let mut input_tweaked = vec![0u8; input_size];
    let mut output_tweaked = vec![0u8; output_size];
    let mut flipped = vec![false; out_bits];

    let progress_step = (rounds / 16).max(1);

    for round in 0..rounds {
        if round % progress_step == 0 {
            debug!("round {}/{}", round, rounds);
        }

        generate_input(round, &mut input[..]);
        mix(&input[..], &mut output[..]);

        for in_bit in 0..in_bits {
            input_tweaked.copy_from_slice(&input[..]);
            input_tweaked[in_bit / 8] ^= 1 << (in_bit % 8);
            mix(&input_tweaked[..], &mut output_tweaked[..]);

            for (out_bit, f) in flipped.iter_mut().enumerate() {
                let mask = 1 << (out_bit % 8);
                *f = (output[out_bit / 8] ^ output_tweaked[out_bit / 8]) & mask != 0;
            }

            if options.avalanche {
                let row = in_bit * out_bits;
                for (out_bit, &f) in flipped.iter().enumerate() {
                    stats.avalanche_chart[row + out_bit] += f as u32;
                }
            }

            if options.bic {
                let stride = out_bits * (out_bits - 1);
                for i in 0..out_bits {
                    for j in 0..(out_bits - 1) {
                        let other = (i + j + 1) % out_bits;
                        let (fa, fb) = (flipped[i], flipped[other]);
                        let quadrant = match (fa, fb) {
                            (true, true) => 0,
                            (false, false) => 1,
                            (true, false) => 2,
                            (false, true) => 3,
                        };
                        stats.bic_chart[in_bit * stride + i * (out_bits - 1) + j][quadrant] += 1;
                    }
                }
            }
        }

        stats.sample_count += 1;
    }

    stats
}

/// 0 when a bit flips half the time, 1 when it always or never flips.
pub fn p_to_bias(p: f64) -> f64 {
    (p * 2.0 - 1.0).abs()
}

/// Shannon entropy in bits of a coin with probability `p`.
pub fn p_to_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        0.0
    } else {
        let q = 1.0 - p;
        -(p * p.log2()) - (q * q.log2())
    }
}

//-------------------------------------------------------------

/// Generates a random byte stream.
pub fn generate_random(seed: usize, bytes: &mut [u8]) {
    let mut rng = WyRand::new_seed(mix64(seed as u64));
    rng.fill_bytes(bytes);
}

/// Generates a byte stream with all zero bits except one.
pub fn generate_single_1_bit(index: usize, bytes: &mut [u8]) {
    let bit = index % (bytes.len() * 8);
    bytes.fill(0);
    bytes[bit / 8] = 1 << (bit % 8);
}

/// Generates a byte stream with roughly `n` random bits set to one.
pub fn generate_n_random_bits(seed: usize, bytes: &mut [u8], n: usize) {
    let mut rng = WyRand::new_seed(mix64(seed as u64 ^ mix64(n as u64)));

    bytes.fill(0);
    for _ in 0..n {
        let bit = rng.generate_range(0..(bytes.len() * 8));
        bytes[bit / 8] |= 1 << (bit % 8);
    }
}

pub fn generate_8_random_bits(seed: usize, bytes: &mut [u8]) {
    generate_n_random_bits(seed, bytes, 8);
}

/// Generates a byte stream whose low bytes count up as a little-endian
/// integer.  Lookup3 keys are often short counters or ids.
pub fn generate_counting(index: usize, bytes: &mut [u8]) {
    write_low_u64(index as u64, bytes);
}

/// Like `generate_counting()`, but stepping through gray codes.
pub fn generate_gray_code(index: usize, bytes: &mut [u8]) {
    write_low_u64((index ^ (index >> 1)) as u64, bytes);
}

fn write_low_u64(n: u64, bytes: &mut [u8]) {
    let le = n.to_le_bytes();
    let len = bytes.len().min(le.len());
    bytes[..len].copy_from_slice(&le[..len]);
    bytes[len..].fill(0);
}

/// Enumerates all inputs with zero bits set, then one bit, then two bits,
/// and so on.
pub fn generate_bit_combinations(index: usize, bytes: &mut [u8]) {
    let bit_len = bytes.len() * 8;

    // Find how many bits are set and the index within that group.
    let mut n = if bit_len < usize::BITS as usize {
        index % (1 << bit_len)
    } else {
        index
    };
    let mut bits = 0;
    let mut combos = binomial(bit_len, bits);
    while n >= combos {
        n -= combos;
        bits += 1;
        combos = binomial(bit_len, bits);
    }

    // Unrank the combination, highest bit first.
    bytes.fill(0);
    let mut t = bit_len;
    while t > 0 && bits > 0 {
        let y = if t > bits { binomial(t - 1, bits) } else { 0 };

        if n >= y {
            bytes[(t - 1) / 8] |= 1 << ((t - 1) % 8);
            n -= y;
            bits -= 1;
        }

        t -= 1;
    }
}

const fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        0
    } else if k == 0 {
        1
    } else if k > (n / 2) {
        binomial(n, n - k)
    } else {
        n * binomial(n - 1, k - 1) / k
    }
}

/// 64-bit bijective bit mixer, used to decorrelate generator seeds.
fn mix64(mut n: u64) -> u64 {
    // Break zero sensitivity.
    n ^= 0x7be355f7c2e736d2;

    // "Mix13" from
    // http://zimbry.blogspot.ch/2011/09/better-bit-mixing-improving-on.html
    n ^= n >> 30;
    n = n.wrapping_mul(0xbf58476d1ce4e5b9);
    n ^= n >> 27;
    n = n.wrapping_mul(0x94d049bb133111eb);
    n ^= n >> 31;

    n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(input: &[u8], output: &mut [u8]) {
        output.copy_from_slice(input);
    }

    #[test]
    fn bias_and_entropy() {
        assert_eq!(p_to_bias(0.5), 0.0);
        assert_eq!(p_to_bias(0.0), 1.0);
        assert_eq!(p_to_bias(1.0), 1.0);
        assert_eq!(p_to_entropy(0.5), 1.0);
        assert_eq!(p_to_entropy(0.0), 0.0);
        assert_eq!(p_to_entropy(1.0), 0.0);
    }

    #[test]
    fn binomials() {
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(5, 5), 1);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(binomial(96, 1), 96);
    }

    #[test]
    fn bit_combinations_order() {
        let mut b = [0u8; 1];
        generate_bit_combinations(0, &mut b);
        assert_eq!(b, [0]);

        // The next 8 indices set exactly one bit each.
        let mut seen = 0u8;
        for i in 1..=8 {
            generate_bit_combinations(i, &mut b);
            assert_eq!(b[0].count_ones(), 1);
            seen |= b[0];
        }
        assert_eq!(seen, 0xff);

        generate_bit_combinations(9, &mut b);
        assert_eq!(b[0].count_ones(), 2);

        generate_bit_combinations(255, &mut b);
        assert_eq!(b, [0xff]);
    }

    #[test]
    fn simple_generators() {
        let mut b = [0xaau8; 12];
        generate_single_1_bit(9, &mut b);
        assert_eq!(b, [0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

        generate_counting(0x0102, &mut b);
        assert_eq!(b[..3], [2, 1, 0]);

        generate_gray_code(3, &mut b);
        assert_eq!(b[0], 2);

        let mut short = [0xffu8; 3];
        generate_counting(0x030201, &mut short);
        assert_eq!(short, [1, 2, 3]);
    }

    #[test]
    fn random_generators_are_deterministic() {
        let (mut x, mut y) = ([0u8; 24], [0u8; 24]);
        generate_random(42, &mut x);
        generate_random(42, &mut y);
        assert_eq!(x, y);

        generate_8_random_bits(7, &mut x);
        generate_8_random_bits(7, &mut y);
        assert_eq!(x, y);
        assert!(x.iter().map(|b| b.count_ones()).sum::<u32>() <= 8);
    }

    #[test]
    fn identity_has_no_diffusion() {
        let stats = compute_stats(
            generate_random,
            identity,
            4,
            4,
            4,
            32,
            Options {
                avalanche: true,
                bic: true,
            },
        );

        assert_eq!(stats.sample_count, 32);
        for i in 0..32 {
            for o in 0..32 {
                assert_eq!(stats.flips(i, o), if i == o { 32 } else { 0 });
            }
        }
        assert_eq!(stats.bias(), Summary { min: 1.0, avg: 1.0, max: 1.0 });
        assert_eq!(stats.diffusion().max, 0.0);
        assert_eq!(stats.entropy().max, 0.0);

        // Every pair lands in a single quadrant.
        assert_eq!(stats.bic_deviation().min, 1.0);
        assert!(stats.report().contains("BIC quadrants"));
    }

    #[test]
    fn lookup3_hash_diffuses() {
        use crate::mixers::hash64;

        let stats = compute_stats(
            generate_random,
            hash64::mix_input,
            hash64::IN_SIZE_BYTES,
            hash64::OUT_SIZE_BYTES,
            hash64::DIGEST_SIZE_BYTES,
            512,
            Options::default(),
        );

        assert!(stats.bic_chart.is_empty());
        assert!(stats.bias().avg < 0.2);
        assert!(stats.diffusion().min > 48.0);
    }
}
