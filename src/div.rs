//! Division strategies. A divider consumes dividend and divisor magnitudes
//! and a result selector, and returns the requested outputs. The classic
//! strategy is Knuth's algorithm D long division; the fast strategy detects
//! shortcut divisors (powers of two, single digits) before falling back to
//! classic. Division by zero is a reported error, never a silent result.
//!
//! Sign convention: truncating division. The quotient rounds toward zero
//! and the remainder carries the dividend's sign: -7 / 2 == -3, -7 % 2 == -1.

use std::cmp::Ordering;

use crate::arith::cmp_mags;
use crate::bits::{self, leading_zeroes_count, real_len};
use crate::error::{Error, Result};
use crate::settings::DivideMode;
use crate::{BigInt, Digit};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DivOutput {
    Quotient,
    Remainder,
    Both,
}

// Quotient and remainder of two signed values.
pub fn div_rem(a: &BigInt, b: &BigInt, mode: DivideMode) -> Result<(BigInt, BigInt)> {
    let (q, r) = div_rem_mags(a.digits(), b.digits(), mode)?;
    Ok((
        BigInt::from_mag(q, a.negative ^ b.negative),
        BigInt::from_mag(r, a.negative),
    ))
}

// Result-selecting entry point; computes only what the caller asked for is
// not worth a second algorithm here, so both are produced and the selector
// picks.
pub fn divide(
    a: &BigInt,
    b: &BigInt,
    mode: DivideMode,
    out: DivOutput,
) -> Result<(Option<BigInt>, Option<BigInt>)> {
    let (q, r) = div_rem(a, b, mode)?;
    Ok(match out {
        DivOutput::Quotient => (Some(q), None),
        DivOutput::Remainder => (None, Some(r)),
        DivOutput::Both => (Some(q), Some(r)),
    })
}

pub fn div_rem_mags(u: &[Digit], v: &[Digit], mode: DivideMode) -> Result<(Vec<Digit>, Vec<Digit>)> {
    let vl = real_len(v);
    if vl == 0 {
        return Err(Error::DivisionByZero);
    }
    Ok(div_mags_nonzero(u, &v[..vl], mode))
}

// pre-condition: v is trimmed and non-zero
pub(crate) fn div_mags_nonzero(u: &[Digit], v: &[Digit], mode: DivideMode) -> (Vec<Digit>, Vec<Digit>) {
    let ul = real_len(u);
    let u = &u[..ul];
    if ul == 0 {
        return (Vec::new(), Vec::new());
    }
    match cmp_mags(u, v) {
        Ordering::Less => return (Vec::new(), u.to_vec()),
        Ordering::Equal => return (vec![1], Vec::new()),
        Ordering::Greater => {}
    }
    if mode == DivideMode::AutoFast {
        // power-of-two divisor: the quotient is a shift, the remainder a mask
        if let Some(l) = pow2_bit(v) {
            return div_by_pow2(u, l);
        }
    }
    if v.len() == 1 {
        let (q, r) = div_by_digit(u, v[0]);
        return (q, if r == 0 { Vec::new() } else { vec![r] });
    }
    knuth_divide(u, v)
}

// Zero-based index of the single set bit, if the divisor is a power of two.
fn pow2_bit(v: &[Digit]) -> Option<u64> {
    let n = v.len();
    if v[n - 1].is_power_of_two() && v[..n - 1].iter().all(|&d| d == 0) {
        Some((n as u64 - 1) * Digit::BITS as u64 + v[n - 1].trailing_zeros() as u64)
    } else {
        None
    }
}

// divisor == 2^l: quotient by shift, remainder by masking the low l bits
fn div_by_pow2(u: &[Digit], l: u64) -> (Vec<Digit>, Vec<Digit>) {
    let ul = u.len();
    let words = (l / Digit::BITS as u64) as usize;
    let b = (l % Digit::BITS as u64) as u32;
    let mut q = vec![0; ul - words];
    bits::shr_into(&mut q, u, l);
    let keep = words + (b > 0) as usize;
    let mut r: Vec<Digit> = u[..keep.min(ul)].to_vec();
    if b > 0 && r.len() == words + 1 {
        r[words] &= (1 << b) - 1;
    }
    (q, r)
}

// single-digit divisor: one linear pass from the most significant digit
pub(crate) fn div_by_digit(u: &[Digit], d: Digit) -> (Vec<Digit>, Digit) {
    debug_assert!(d > 0);
    let len = real_len(u);
    let mut q = vec![0; len];
    let mut r: u64 = 0;
    for i in (0..len).rev() {
        let cur = (r << Digit::BITS) | u[i] as u64;
        q[i] = (cur / d as u64) as Digit;
        r = cur % d as u64;
    }
    (q, r as Digit)
}

// Knuth algorithm D.
// pre-conditions: u, v trimmed; v.len() >= 2; |u| > |v|.
fn knuth_divide(u: &[Digit], v: &[Digit]) -> (/* quotient */ Vec<Digit>, /* remainder */ Vec<Digit>) {
    let m = u.len();
    let n = v.len();
    debug_assert!(n >= 2 && m >= n);
    const BASE: u64 = 1 << Digit::BITS;

    // D1: normalize so the divisor's leading digit has its top bit set
    let s = leading_zeroes_count(v[n - 1]);
    let mut vn = vec![0; n];
    if s == 0 {
        vn.copy_from_slice(v);
    } else {
        for i in (1..n).rev() {
            vn[i] = (v[i] << s) | (v[i - 1] >> (Digit::BITS - s));
        }
        vn[0] = v[0] << s;
    }
    let mut un = vec![0; m + 1];
    bits::shl_into(&mut un, u, s as u64);

    let mut q = vec![0; m - n + 1];
    for j in (0..=m - n).rev() {
        // D3: estimate the quotient digit from the top two dividend digits
        let top = ((un[j + n] as u64) << Digit::BITS) | un[j + n - 1] as u64;
        let mut qhat = top / vn[n - 1] as u64;
        let mut rhat = top % vn[n - 1] as u64;
        while qhat >= BASE
            || qhat * vn[n - 2] as u64 > (rhat << Digit::BITS) + un[j + n - 2] as u64
        {
            qhat -= 1;
            rhat += vn[n - 1] as u64;
            if rhat >= BASE {
                break;
            }
        }
        // D4: multiply and subtract
        let mut k: i64 = 0;
        for i in 0..n {
            let p = qhat * vn[i] as u64;
            let t = un[i + j] as i64 - k - (p & (BASE - 1)) as i64;
            un[i + j] = t as Digit;
            k = (p >> Digit::BITS) as i64 - (t >> Digit::BITS);
        }
        let t = un[j + n] as i64 - k;
        un[j + n] = t as Digit;
        // D5: tentative quotient digit
        q[j] = qhat as Digit;
        // D6: the estimate was one too large; add back
        if t < 0 {
            log::debug!("knuth_divide - add-back at j = {j}");
            q[j] -= 1;
            let mut carry: u64 = 0;
            for i in 0..n {
                let t2 = un[i + j] as u64 + vn[i] as u64 + carry;
                un[i + j] = t2 as Digit;
                carry = t2 >> Digit::BITS;
            }
            un[j + n] = un[j + n].wrapping_add(carry as Digit);
        }
    }

    // denormalize the remainder
    let mut r = vec![0; n];
    if s == 0 {
        r.copy_from_slice(&un[..n]);
    } else {
        for i in 0..n - 1 {
            r[i] = (un[i] >> s) | (un[i + 1] << (Digit::BITS - s));
        }
        r[n - 1] = un[n - 1] >> s;
    }
    (q, r)
}

#[cfg(test)]
mod div_test {
    use super::*;
    use crate::settings::MultiplyMode;

    fn init() {
        crate::init_logger(true)
    }

    fn pseudo_mag(len: usize, seed: u32) -> Vec<Digit> {
        let mut s = seed | 1;
        (0..len)
            .map(|_| {
                s ^= s << 13;
                s ^= s >> 17;
                s ^= s << 5;
                s
            })
            .collect()
    }

    #[test]
    fn divide_by_zero() {
        init();
        let n = BigInt::from_u32(5);
        let z = BigInt::zero();
        assert!(matches!(div_rem(&n, &z, DivideMode::Classic), Err(Error::DivisionByZero)));
        assert!(matches!(
            divide(&n, &z, DivideMode::AutoFast, DivOutput::Quotient),
            Err(Error::DivisionByZero)
        ));
    }

    #[test]
    fn small_cases() {
        init();
        for mode in [DivideMode::Classic, DivideMode::AutoFast] {
            // dividend < divisor
            let (q, r) = div_rem_mags(&[3], &[7], mode).unwrap();
            assert_eq!(q, Vec::<Digit>::new());
            assert_eq!(r, [3]);
            // dividend == divisor
            let (q, r) = div_rem_mags(&[7, 9], &[7, 9], mode).unwrap();
            assert_eq!(q, [1]);
            assert_eq!(r, Vec::<Digit>::new());
            // zero dividend
            let (q, r) = div_rem_mags(&[], &[7], mode).unwrap();
            assert!(q.is_empty() && r.is_empty());
        }
    }

    #[test]
    fn by_digit_and_pow2() {
        init();
        let x: u64 = 99885287135;
        let mag = [x as Digit, (x >> 32) as Digit];
        for mode in [DivideMode::Classic, DivideMode::AutoFast] {
            let (q, r) = div_rem_mags(&mag, &[1024], mode).unwrap();
            assert_eq!(q[..real_len(&q)], [(x / 1024) as Digit]);
            assert_eq!(r[0] as u64, x % 1024);
            let (q, r) = div_rem_mags(&mag, &[7], mode).unwrap();
            let qv = (q[0] as u64) | (q.get(1).copied().unwrap_or(0) as u64) << 32;
            assert_eq!(qv, x / 7);
            assert_eq!(r[0] as u64, x % 7);
            // division by one
            let (q, r) = div_rem_mags(&mag, &[1], mode).unwrap();
            assert_eq!(q, mag);
            assert!(r.is_empty());
        }
        // power-of-two divisor across a word boundary
        let (q, r) = div_rem_mags(&[0xDEADBEEF, 0xCAFE], &[0, 16], DivideMode::AutoFast).unwrap();
        let v = 0xCAFE_DEADBEEFu64;
        assert_eq!(q[0] as u64, v >> 36);
        let rv = (r[0] as u64) | (r.get(1).copied().unwrap_or(0) as u64) << 32;
        assert_eq!(rv, v & ((1 << 36) - 1));
    }

    #[test]
    fn knuth_u128_cross_check() {
        init();
        // dividends and divisors small enough to verify with native u128
        let cases: &[(u128, u128)] = &[
            (0x1_0000_0000_0000_0000, 0x1_0000_0001),
            (u128::MAX, 0xFFFF_FFFF_FFFF_FFFF_0000_0001),
            (0xDEAD_BEEF_CAFE_BABE_1234_5678_9ABC_DEF0, 0x1_0000_0000_0000_0003),
            (0x8000_0000_0000_0000_0000_0000_0000_0000, 0x7FFF_FFFF_FFFF_FFFF_FFFF),
        ];
        for &(uu, vv) in cases {
            let u = [uu as Digit, (uu >> 32) as Digit, (uu >> 64) as Digit, (uu >> 96) as Digit];
            let v = [vv as Digit, (vv >> 32) as Digit, (vv >> 64) as Digit, (vv >> 96) as Digit];
            let (q, r) = div_rem_mags(&u, &v, DivideMode::Classic).unwrap();
            let to_u128 = |w: &[Digit]| -> u128 {
                w.iter().rev().fold(0u128, |acc, &d| (acc << 32) | d as u128)
            };
            assert_eq!(to_u128(&q), uu / vv, "quotient for {uu:#x} / {vv:#x}");
            assert_eq!(to_u128(&r), uu % vv, "remainder for {uu:#x} % {vv:#x}");
        }
    }

    #[test]
    fn multiply_back_property() {
        init();
        for &(ul, vl) in &[(5usize, 2usize), (12, 7), (40, 3), (64, 33), (100, 99)] {
            let u = pseudo_mag(ul, 0xACE1);
            let v = pseudo_mag(vl, 0x1DEA);
            let (q, r) = div_rem_mags(&u, &v, DivideMode::Classic).unwrap();
            assert_eq!(cmp_mags(&r, &v), Ordering::Less, "remainder not reduced at ({ul},{vl})");
            // q*v + r == u
            let qv = crate::mul::mul_mags(&q, &v, MultiplyMode::Classic);
            let back = crate::arith::add_mags(&qv, &r);
            assert_eq!(cmp_mags(&back, &u), Ordering::Equal, "q*v + r != u at ({ul},{vl})");
            // classic and fast agree
            let (qf, rf) = div_rem_mags(&u, &v, DivideMode::AutoFast).unwrap();
            assert_eq!(cmp_mags(&q, &qf), Ordering::Equal);
            assert_eq!(cmp_mags(&r, &rf), Ordering::Equal);
        }
    }

    #[test]
    fn truncating_sign_convention() {
        init();
        let cases: &[(i64, i64, i64, i64)] = &[
            (-7, 2, -3, -1),
            (7, -2, -3, 1),
            (-7, -2, 3, -1),
            (7, 2, 3, 1),
            (-6, 2, -3, 0),
            (1, -2, 0, 1),
        ];
        for &(a, b, eq, er) in cases {
            let (q, r) = div_rem(&BigInt::from_i64(a), &BigInt::from_i64(b), DivideMode::Classic).unwrap();
            assert_eq!(q, BigInt::from_i64(eq), "{a} / {b}");
            assert_eq!(r, BigInt::from_i64(er), "{a} % {b}");
            // remainder of zero carries no sign
            if er == 0 {
                assert!(!r.is_negative());
            }
        }
    }

    #[test]
    fn result_selector() {
        init();
        let a = BigInt::from_u32(17);
        let b = BigInt::from_u32(5);
        let (q, r) = divide(&a, &b, DivideMode::Classic, DivOutput::Quotient).unwrap();
        assert_eq!(q.unwrap(), BigInt::from_u32(3));
        assert!(r.is_none());
        let (q, r) = divide(&a, &b, DivideMode::Classic, DivOutput::Remainder).unwrap();
        assert!(q.is_none());
        assert_eq!(r.unwrap(), BigInt::from_u32(2));
        let (q, r) = divide(&a, &b, DivideMode::Classic, DivOutput::Both).unwrap();
        assert!(q.is_some() && r.is_some());
    }
}
