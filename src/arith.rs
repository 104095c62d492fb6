//! Arithmetic orchestrator: signed add/subtract, total ordering, bit
//! shifts, and exponentiation. Magnitude work happens on unsigned digit
//! slices; sign combination is decided before dispatch.

use std::cmp::Ordering;

use crate::bits::{self, add_with_carry, mag_bit_len, real_len, sub_with_borrow};
use crate::error::{Error, Result};
use crate::settings::MultiplyMode;
use crate::{mul, BigInt, Digit, MAX_BIT_LEN};

// Magnitude order, at decreasing digit index. Real lengths are computed on
// the fly, so non-canonical zero suffixes never change the outcome.
pub(crate) fn cmp_mags(x: &[Digit], y: &[Digit]) -> Ordering {
    let (xl, yl) = (real_len(x), real_len(y));
    if xl != yl {
        return xl.cmp(&yl);
    }
    for i in (0..xl).rev() {
        if x[i] != y[i] {
            return x[i].cmp(&y[i]);
        }
    }
    Ordering::Equal
}

// Ripple-carry sum of two magnitudes. The shorter operand drives the first
// loop; the result is one digit longer than the longer operand to absorb a
// final carry.
pub(crate) fn add_mags(x: &[Digit], y: &[Digit]) -> Vec<Digit> {
    let (xl, yl) = (real_len(x), real_len(y));
    let (short, long) = if xl <= yl { (&x[..xl], &y[..yl]) } else { (&y[..yl], &x[..xl]) };
    let mut mag = vec![0; long.len() + 1];
    let mut carry: Digit = 0;
    for (i, (&s, &l)) in short.iter().zip(long.iter()).enumerate() {
        (mag[i], carry) = add_with_carry(s, l, carry);
    }
    for i in short.len()..long.len() {
        (mag[i], carry) = add_with_carry(long[i], 0, carry);
    }
    mag[long.len()] = carry;
    mag
}

// x - y over magnitudes; requires |x| >= |y|.
pub(crate) fn sub_mags(x: &[Digit], y: &[Digit]) -> Vec<Digit> {
    let (xl, yl) = (real_len(x), real_len(y));
    debug_assert!(cmp_mags(x, y) != Ordering::Less, "sub_mags - |x| < |y|");
    let mut mag = vec![0; xl];
    let mut borrow: Digit = 0;
    for i in 0..yl {
        (mag[i], borrow) = sub_with_borrow(x[i], y[i], borrow);
    }
    for i in yl..xl {
        (mag[i], borrow) = sub_with_borrow(x[i], 0, borrow);
    }
    debug_assert_eq!(borrow, 0, "sub_mags - borrow out of the difference");
    mag
}

// The actual operation and the result sign fall out of the operand signs
// and the requested operator: a - b == a + (-b).
fn add_signed(a: &BigInt, b: &BigInt, flip_b: bool) -> BigInt {
    let b_neg = b.negative ^ flip_b;
    if a.is_zero() {
        return BigInt::from_mag(b.digits().to_vec(), b_neg);
    }
    if b.is_zero() {
        return BigInt::from_mag(a.digits().to_vec(), a.negative);
    }
    if a.negative == b_neg {
        return BigInt::from_mag(add_mags(a.digits(), b.digits()), a.negative);
    }
    // opposite signs: subtract the smaller magnitude from the larger one;
    // the larger magnitude decides the sign
    match cmp_mags(a.digits(), b.digits()) {
        Ordering::Equal => BigInt::zero(),
        Ordering::Greater => BigInt::from_mag(sub_mags(a.digits(), b.digits()), a.negative),
        Ordering::Less => BigInt::from_mag(sub_mags(b.digits(), a.digits()), b_neg),
    }
}

pub fn add(a: &BigInt, b: &BigInt) -> BigInt {
    add_signed(a, b, false)
}

pub fn sub(a: &BigInt, b: &BigInt) -> BigInt {
    add_signed(a, b, true)
}

// Total order: negative < zero < positive, then magnitude.
pub fn compare(a: &BigInt, b: &BigInt) -> Ordering {
    let (sa, sb) = (a.signum(), b.signum());
    if sa != sb {
        return sa.cmp(&sb);
    }
    let mc = cmp_mags(a.digits(), b.digits());
    if sa < 0 { mc.reverse() } else { mc }
}

// Comparison against a possibly absent operand. The strict flavor reports
// the missing operand as an error; the lenient flavor yields None, the
// "incomparable" sentinel. Callers pick one; the two are not unified.
pub fn compare_option(a: &BigInt, b: Option<&BigInt>, strict: bool) -> Result<Option<Ordering>> {
    match b {
        Some(b) => Ok(Some(compare(a, b))),
        None if strict => Err(Error::InvalidArgument("missing comparison operand")),
        None => Ok(None),
    }
}

// Shift by a signed bit count; a negative count flips the direction.
// The sign rides along on the magnitude, which keeps x >> k consistent with
// truncating division by 2^k.
pub fn shift(x: &BigInt, count: i64) -> Result<BigInt> {
    if count == 0 || x.is_zero() {
        return Ok(BigInt::from_mag(x.digits().to_vec(), x.negative));
    }
    if count > 0 {
        shl(x, count as u64)
    } else {
        Ok(shr(x, count.unsigned_abs()))
    }
}

fn shl(x: &BigInt, count: u64) -> Result<BigInt> {
    let bit_len = mag_bit_len(x.digits());
    if bit_len + count > MAX_BIT_LEN {
        return Err(Error::Overflow(bit_len + count, MAX_BIT_LEN));
    }
    let n = x.real_len();
    let words = (count / Digit::BITS as u64) as usize;
    let mut mag = vec![0; n + words + 1];
    bits::shl_into(&mut mag, x.digits(), count);
    Ok(BigInt::from_mag(mag, x.negative))
}

fn shr(x: &BigInt, count: u64) -> BigInt {
    let bit_len = mag_bit_len(x.digits());
    if count >= bit_len {
        return BigInt::zero();
    }
    let n = x.real_len();
    let words = (count / Digit::BITS as u64) as usize;
    let mut mag = vec![0; n - words];
    bits::shr_into(&mut mag, x.digits(), count);
    BigInt::from_mag(mag, x.negative)
}

// Exponentiation by squaring, scanning the exponent's bits from the most
// significant to the least significant one. Every multiply goes through the
// selected multiplier strategy.
pub fn pow(base: &BigInt, exp: u32, mode: MultiplyMode) -> BigInt {
    if exp == 0 {
        return BigInt::one();
    }
    if exp == 1 || base.is_zero() {
        return BigInt::from_mag(base.digits().to_vec(), base.negative);
    }
    let mut acc = BigInt::from_mag(base.digits().to_vec(), base.negative);
    let top = 31 - exp.leading_zeros();
    for bit in (0..top).rev() {
        acc = mul::multiply(&acc, &acc, mode);
        if exp & (1 << bit) != 0 {
            acc = mul::multiply(&acc, base, mode);
        }
    }
    acc
}
