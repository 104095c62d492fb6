//! Multiplication strategies. A multiplier consumes two magnitude slices
//! and produces the product magnitude. The classic strategy is schoolbook
//! row accumulation; the fast strategy is a Fourier-transform convolution
//! over 16-bit chunks of the digits, with the digits recovered by rounding
//! the inverse-transform coefficients and propagating carries.

use crate::bits::real_len;
use crate::settings::MultiplyMode;
use crate::{pool, BigInt, Digit, DoubleDigit};

// Fast multiply kicks in when both operands have at least this many digits
// (MultiplyMode::AutoFast only).
pub const FAST_MUL_THRESHOLD: usize = 512;

const CHUNK_BITS: u32 = 16;
const CHUNK_MASK: Digit = (1 << CHUNK_BITS) - 1;

pub fn multiply(a: &BigInt, b: &BigInt, mode: MultiplyMode) -> BigInt {
    let mag = mul_mags(a.digits(), b.digits(), mode);
    let negative = a.negative ^ b.negative;
    BigInt::from_mag(mag, negative)
}

pub fn mul_mags(x: &[Digit], y: &[Digit], mode: MultiplyMode) -> Vec<Digit> {
    let (xl, yl) = (real_len(x), real_len(y));
    let use_fast = mode == MultiplyMode::AutoFast && xl.min(yl) >= FAST_MUL_THRESHOLD;
    if use_fast {
        fast_multiply(&x[..xl], &y[..yl])
    } else {
        classic_multiply(&x[..xl], &y[..yl])
    }
}

// acc[i..i+y.len()] += a * y, returning the carry out of the row.
fn add_mul_row(a: Digit, y: &[Digit], acc: &mut [Digit]) -> Digit {
    debug_assert_eq!(y.len(), acc.len(), "add_mul_row - length mismatch.");
    let mut carry: DoubleDigit = 0;
    for (i, &b) in y.iter().enumerate() {
        let column_sum = a as DoubleDigit * b as DoubleDigit + acc[i] as DoubleDigit + carry;
        acc[i] = column_sum as Digit;
        carry = column_sum >> Digit::BITS;
    }
    carry as Digit
}

// elementary school-book multiplication, O(n*m)
pub fn classic_multiply(x: &[Digit], y: &[Digit]) -> Vec<Digit> {
    let (xl, yl) = (real_len(x), real_len(y));
    if xl == 0 || yl == 0 {
        return Vec::new();
    }
    let mut acc: Vec<Digit> = vec![0; xl + yl];
    for (i, &a) in x[..xl].iter().enumerate() {
        if a == 0 {
            continue;
        }
        let carry = add_mul_row(a, &y[..yl], &mut acc[i..i + yl]);
        acc[i + yl] = carry;
    }
    acc
}

pub fn fast_multiply(x: &[Digit], y: &[Digit]) -> Vec<Digit> {
    fast_multiply_observed(x, y, &mut |e| {
        if e > 0.25 {
            log::warn!("fast_multiply - rounding error {e} approaching 0.5");
        }
    })
}

// Transform-based convolution multiply. The rounding of the inverse
// transform is floating-point based; the maximum observed rounding error is
// reported through `observe` so numerical-stability regressions are
// detectable without global diagnostic state.
pub fn fast_multiply_observed(
    x: &[Digit],
    y: &[Digit],
    observe: &mut dyn FnMut(f64),
) -> Vec<Digit> {
    let (xl, yl) = (real_len(x), real_len(y));
    if xl == 0 || yl == 0 {
        return Vec::new();
    }
    let (cx, cy) = (2 * xl, 2 * yl);
    let n = (cx + cy).next_power_of_two();

    // Pack both operands into one complex signal: x chunks in the real
    // lane, y chunks in the imaginary lane. One forward transform covers
    // both spectra.
    let mut z = vec![Cx::ZERO; n];
    for (i, &d) in x[..xl].iter().enumerate() {
        z[2 * i].re = (d & CHUNK_MASK) as f64;
        z[2 * i + 1].re = (d >> CHUNK_BITS) as f64;
    }
    for (i, &d) in y[..yl].iter().enumerate() {
        z[2 * i].im = (d & CHUNK_MASK) as f64;
        z[2 * i + 1].im = (d >> CHUNK_BITS) as f64;
    }
    fft(&mut z, false);

    // Untangle the two spectra by conjugate symmetry and pointwise multiply.
    let mut c = vec![Cx::ZERO; n];
    for k in 0..n {
        let km = (n - k) & (n - 1);
        let a = Cx {
            re: (z[k].re + z[km].re) * 0.5,
            im: (z[k].im - z[km].im) * 0.5,
        };
        let b = Cx {
            re: (z[k].im + z[km].im) * 0.5,
            im: (z[km].re - z[k].re) * 0.5,
        };
        c[k] = a.mul(&b);
    }
    fft(&mut c, true);

    // Round the real-valued convolution coefficients back to 16-bit chunks,
    // propagating carries in base 2^16.
    let mut out = pool::acquire(xl + yl);
    let mut carry: u64 = 0;
    let mut max_err: f64 = 0.0;
    for i in 0..cx + cy {
        let coeff = c[i].re;
        let rounded = coeff.round();
        let err = (coeff - rounded).abs();
        if err > max_err {
            max_err = err;
        }
        let v = rounded as u64 + carry;
        out[i / 2] |= ((v as Digit) & CHUNK_MASK) << (CHUNK_BITS * (i as u32 & 1));
        carry = v >> CHUNK_BITS;
    }
    debug_assert_eq!(carry, 0, "fast_multiply - carry out of the product");
    observe(max_err);
    out.to_vec()
}

#[derive(Clone, Copy, Debug)]
struct Cx {
    re: f64,
    im: f64,
}

impl Cx {
    const ZERO: Cx = Cx { re: 0.0, im: 0.0 };

    fn mul(&self, o: &Cx) -> Cx {
        Cx {
            re: self.re * o.re - self.im * o.im,
            im: self.re * o.im + self.im * o.re,
        }
    }
}

// Iterative radix-2 Cooley-Tukey transform, in place. z.len() must be a
// power of two. Twiddles are computed from the angle at every butterfly
// rather than by repeated multiplication; this keeps the rounding error of
// large transforms low enough for exact digit recovery.
fn fft(z: &mut [Cx], invert: bool) {
    let n = z.len();
    debug_assert!(n.is_power_of_two());
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            z.swap(i, j);
        }
    }
    let mut len = 2usize;
    while len <= n {
        let ang = if invert {
            std::f64::consts::TAU / len as f64
        } else {
            -std::f64::consts::TAU / len as f64
        };
        let half = len / 2;
        let mut i = 0;
        while i < n {
            for k in 0..half {
                let w = Cx { re: (ang * k as f64).cos(), im: (ang * k as f64).sin() };
                let u = z[i + k];
                let v = z[i + k + half].mul(&w);
                z[i + k] = Cx { re: u.re + v.re, im: u.im + v.im };
                z[i + k + half] = Cx { re: u.re - v.re, im: u.im - v.im };
            }
            i += len;
        }
        len <<= 1;
    }
    if invert {
        let scale = 1.0 / n as f64;
        for v in z.iter_mut() {
            v.re *= scale;
            v.im *= scale;
        }
    }
}
