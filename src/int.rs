//! The public face of BigInt: construction, conversions, normalization,
//! and the convenience methods that read the process-wide settings. Kernel
//! modules never look at the settings; only this surface and `ops` do.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::bits::{mag_bit_len, real_len};
use crate::div::{self, DivOutput};
use crate::error::{Error, Result};
use crate::settings::{self, FormatMode, MultiplyMode, ParseMode};
use crate::{arith, parse, strfmt, BigInt, Digit};

// lo/hi split of a 64-bit quantity into at most two digits
fn split_u64(v: u64) -> Vec<Digit> {
    let (lo, hi) = (v as Digit, (v >> Digit::BITS) as Digit);
    if hi != 0 {
        vec![lo, hi]
    } else if lo != 0 {
        vec![lo]
    } else {
        Vec::new()
    }
}

impl BigInt {
    // Takes ownership of a little-endian magnitude. len excludes trailing
    // zero digits, and a zero magnitude clears the sign.
    pub(crate) fn from_mag(mag: Vec<Digit>, negative: bool) -> BigInt {
        let len = real_len(&mag);
        let mut n = BigInt {
            mag,
            len,
            negative: negative && len > 0,
            auto_norm: settings::get().auto_normalize,
        };
        if n.auto_norm {
            n.normalize();
        }
        n
    }

    pub fn zero() -> BigInt {
        BigInt::from_mag(Vec::new(), false)
    }

    pub fn one() -> BigInt {
        BigInt::from_mag(vec![1], false)
    }

    pub fn from_words(words: &[Digit], negative: bool) -> BigInt {
        BigInt::from_mag(words.to_vec(), negative)
    }

    pub fn from_u32(v: u32) -> BigInt {
        BigInt::from_mag(if v == 0 { Vec::new() } else { vec![v] }, false)
    }

    pub fn from_i32(v: i32) -> BigInt {
        let m = v.unsigned_abs();
        BigInt::from_mag(if m == 0 { Vec::new() } else { vec![m] }, v < 0)
    }

    pub fn from_u64(v: u64) -> BigInt {
        BigInt::from_mag(split_u64(v), false)
    }

    pub fn from_i64(v: i64) -> BigInt {
        BigInt::from_mag(split_u64(v.unsigned_abs()), v < 0)
    }

    pub fn is_zero(&self) -> bool {
        self.real_len() == 0
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    // -1, 0, or 1; zero is neither positive nor negative
    pub fn signum(&self) -> i32 {
        if self.is_zero() {
            0
        } else if self.negative {
            -1
        } else {
            1
        }
    }

    // Count of significant digits, ignoring any zero suffix inside len.
    pub fn real_len(&self) -> usize {
        real_len(&self.mag[..self.len])
    }

    // The canonical magnitude view; never includes a zero suffix.
    pub(crate) fn digits(&self) -> &[Digit] {
        &self.mag[..self.real_len()]
    }

    pub fn bit_len(&self) -> u64 {
        mag_bit_len(self.digits())
    }

    // Drops the allocation slack above the significant digits and clears
    // the sign at zero. Safe to call at any time; a no-op on canonical
    // values without slack.
    pub fn normalize(&mut self) {
        let n = self.real_len();
        self.mag.truncate(n);
        self.mag.shrink_to_fit();
        self.len = n;
        if n == 0 {
            self.negative = false;
        }
    }

    pub fn auto_normalize(&self) -> bool {
        self.auto_norm
    }

    pub fn set_auto_normalize(&mut self, on: bool) {
        self.auto_norm = on;
        if on {
            self.normalize();
        }
    }

    // Canonical digits and sign, for collaborators that serialize.
    pub fn internal_state(&self) -> (&[Digit], bool) {
        (self.digits(), self.negative)
    }

    // Serialization boundary: 4 * real_len bytes, little-endian word order.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let d = self.digits();
        let mut out = Vec::with_capacity(4 * d.len());
        for w in d {
            out.extend_from_slice(&w.to_le_bytes());
        }
        out
    }

    pub fn from_le_bytes(bytes: &[u8], negative: bool) -> Result<BigInt> {
        if bytes.len() % 4 != 0 {
            return Err(Error::InvalidArgument("byte length must be a multiple of 4"));
        }
        let mut mag = Vec::with_capacity(bytes.len() / 4);
        for c in bytes.chunks_exact(4) {
            mag.push(Digit::from_le_bytes([c[0], c[1], c[2], c[3]]));
        }
        Ok(BigInt::from_mag(mag, negative))
    }

    pub fn try_to_u64(&self) -> Result<u64> {
        if self.negative {
            return Err(Error::InvalidArgument("negative value does not fit in u64"));
        }
        let d = self.digits();
        if d.len() > 2 {
            return Err(Error::Overflow(self.bit_len(), 64));
        }
        let lo = *d.first().unwrap_or(&0) as u64;
        let hi = *d.get(1).unwrap_or(&0) as u64;
        Ok(hi << Digit::BITS | lo)
    }

    pub fn try_to_i64(&self) -> Result<i64> {
        let d = self.digits();
        if d.len() > 2 {
            return Err(Error::Overflow(self.bit_len(), 63));
        }
        let lo = *d.first().unwrap_or(&0) as u64;
        let hi = *d.get(1).unwrap_or(&0) as u64;
        let m = hi << Digit::BITS | lo;
        // the magnitude cap is asymmetric around zero
        if self.negative {
            if m > 1u64 << 63 {
                return Err(Error::Overflow(self.bit_len(), 63));
            }
            Ok((m as i64).wrapping_neg())
        } else {
            if m > i64::MAX as u64 {
                return Err(Error::Overflow(self.bit_len(), 63));
            }
            Ok(m as i64)
        }
    }

    // Floating-point interop is intentionally unimplemented; these fail
    // loudly instead of truncating silently.
    pub fn to_f64(&self) -> Result<f64> {
        Err(Error::Unsupported("conversion to f64"))
    }

    pub fn from_f64(_v: f64) -> Result<BigInt> {
        Err(Error::Unsupported("conversion from f64"))
    }

    pub fn abs(&self) -> BigInt {
        BigInt::from_mag(self.digits().to_vec(), false)
    }

    // Auto-detecting convenience: 0x/0X means hex, a leading 0 with more
    // characters means octal, anything else decimal. Strategies come from
    // the process settings.
    pub fn parse(s: &str) -> Result<BigInt> {
        let st = settings::get();
        parse::parse(s, None, None, st.parse, st.multiply)
    }

    // Pinned radix, no prefix detection.
    pub fn parse_radix(s: &str, radix: u32) -> Result<BigInt> {
        let st = settings::get();
        parse::parse(s, Some(radix), None, st.parse, st.multiply)
    }

    pub fn parse_with(
        s: &str,
        radix: Option<u32>,
        alphabet: Option<&str>,
        mode: ParseMode,
    ) -> Result<BigInt> {
        parse::parse(s, radix, alphabet, mode, settings::get().multiply)
    }

    pub fn to_str_radix(&self, radix: u32, upper: bool) -> Result<String> {
        strfmt::format(self, radix, None, upper, settings::get().format)
    }

    pub fn to_str_with(
        &self,
        radix: u32,
        alphabet: Option<&str>,
        upper: bool,
        mode: FormatMode,
    ) -> Result<String> {
        strfmt::format(self, radix, alphabet, upper, mode)
    }

    pub fn pow(&self, exp: u32) -> BigInt {
        arith::pow(self, exp, settings::get().multiply)
    }

    pub fn pow_with(&self, exp: u32, mode: MultiplyMode) -> BigInt {
        arith::pow(self, exp, mode)
    }

    pub fn div_rem(&self, rhs: &BigInt) -> Result<(BigInt, BigInt)> {
        div::div_rem(self, rhs, settings::get().divide)
    }

    pub fn checked_div(&self, rhs: &BigInt) -> Result<BigInt> {
        let (q, _) = div::divide(self, rhs, settings::get().divide, DivOutput::Quotient)?;
        Ok(q.unwrap_or_else(BigInt::zero))
    }

    pub fn checked_rem(&self, rhs: &BigInt) -> Result<BigInt> {
        let (_, r) = div::divide(self, rhs, settings::get().divide, DivOutput::Remainder)?;
        Ok(r.unwrap_or_else(BigInt::zero))
    }

    // Signed bit count; negative flips the direction.
    pub fn shifted(&self, count: i64) -> Result<BigInt> {
        arith::shift(self, count)
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        arith::compare(self, other) == Ordering::Equal
    }
}

impl Eq for BigInt {}

// Hash over the canonical view so padded and normalized twins collide.
impl Hash for BigInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digits().hash(state);
        self.negative.hash(state);
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        arith::compare(self, other)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars: Vec<char> = strfmt::DEFAULT_ALPHABET.chars().collect();
        f.pad(&strfmt::format_digits(self, 10, &chars, settings::get().format))
    }
}

impl fmt::LowerHex for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars: Vec<char> = strfmt::DEFAULT_ALPHABET.chars().collect();
        f.pad(&strfmt::format_digits(self, 16, &chars, settings::get().format))
    }
}

impl fmt::UpperHex for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars: Vec<char> =
            strfmt::DEFAULT_ALPHABET.chars().map(|c| c.to_ascii_uppercase()).collect();
        f.pad(&strfmt::format_digits(self, 16, &chars, settings::get().format))
    }
}
