//! Digits to string, the parsing dual. The classic strategy peels radix^k
//! chunks off the magnitude by repeated single-digit division; the fast
//! strategy splits by precomputed powers R^(2^i) and formats the halves
//! recursively, the low half zero-padded to its block width.

use std::collections::HashSet;

use crate::bits::real_len;
use crate::div;
use crate::error::{Error, Result};
use crate::parse::chunk_of;
use crate::settings::{DivideMode, FormatMode};
use crate::{BigInt, Digit};

pub const DEFAULT_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

// Below this many digits the divide-and-conquer split is pure overhead.
pub const FAST_FORMAT_THRESHOLD: usize = 16;

// An alphabet must cover the radix and must not repeat characters.
pub fn validate_alphabet(alphabet: &str, radix: u32) -> Result<Vec<char>> {
    let chars: Vec<char> = alphabet.chars().collect();
    if (chars.len() as u64) < radix as u64 {
        return Err(Error::InvalidFormat(format!(
            "alphabet holds {} characters, fewer than radix {radix}",
            chars.len()
        )));
    }
    let mut seen = HashSet::new();
    for &c in &chars {
        if !seen.insert(c) {
            return Err(Error::InvalidFormat(format!("duplicate character '{c}' in alphabet")));
        }
    }
    Ok(chars)
}

pub fn format(
    x: &BigInt,
    radix: u32,
    alphabet: Option<&str>,
    upper: bool,
    mode: FormatMode,
) -> Result<String> {
    let chars: Vec<char> = match alphabet {
        None => {
            if !(2..=36).contains(&radix) {
                return Err(Error::InvalidArgument(
                    "radix must be in 2..=36 for the default alphabet",
                ));
            }
            if upper {
                DEFAULT_ALPHABET.chars().map(|c| c.to_ascii_uppercase()).collect()
            } else {
                DEFAULT_ALPHABET.chars().collect()
            }
        }
        Some(a) => {
            if radix < 2 {
                return Err(Error::InvalidArgument("radix must be at least 2"));
            }
            validate_alphabet(a, radix)?
        }
    };
    Ok(format_digits(x, radix, &chars, mode))
}

// pre-condition: alphabet covers the radix
pub(crate) fn format_digits(x: &BigInt, radix: u32, alphabet: &[char], mode: FormatMode) -> String {
    let mag = x.digits();
    let mut s = String::new();
    if mag.is_empty() {
        s.push(alphabet[0]);
        return s;
    }
    if x.is_negative() {
        s.push('-');
    }
    match mode {
        FormatMode::Classic => classic_chars(mag, radix, alphabet, &mut s),
        FormatMode::Fast => fast_chars(mag, radix, alphabet, &mut s),
    }
    s
}

// Repeated division by R = radix^chunk; every round yields chunk
// characters, the last round drops its leading zeroes. Zero emits nothing;
// the caller decides the padding.
fn classic_chars(mag: &[Digit], radix: u32, alphabet: &[char], out: &mut String) {
    let (chunk, big_r) = chunk_of(radix);
    let mut rem: Vec<Digit> = mag[..real_len(mag)].to_vec();
    let mut rev: Vec<char> = Vec::new();
    while real_len(&rem) > 0 {
        let (q, r) = div::div_by_digit(&rem[..real_len(&rem)], big_r);
        let last = real_len(&q) == 0;
        let mut v = r;
        for _ in 0..chunk {
            rev.push(alphabet[(v % radix) as usize]);
            v /= radix;
            if last && v == 0 {
                break;
            }
        }
        rem = q;
    }
    out.extend(rev.iter().rev());
}

// Divide-and-conquer: split by R^(2^(level-1)), format the quotient, then
// the remainder padded to exactly chunk * 2^(level-1) characters. The
// unpadded branch runs down the leading spine only.
fn fast_chars(mag: &[Digit], radix: u32, alphabet: &[char], out: &mut String) {
    let (chunk, big_r) = chunk_of(radix);
    if real_len(mag) < FAST_FORMAT_THRESHOLD {
        return classic_chars(mag, radix, alphabet, out);
    }
    // powers[l] = R^(2^l); grow until the value fits below the last entry
    let mut powers: Vec<Vec<Digit>> = vec![vec![big_r]];
    loop {
        let p = &powers[powers.len() - 1];
        if crate::arith::cmp_mags(p, mag) == std::cmp::Ordering::Greater {
            break;
        }
        let mut sq = crate::mul::classic_multiply(p, p);
        sq.truncate(real_len(&sq));
        powers.push(sq);
    }
    rec(mag.to_vec(), powers.len() - 1, false, &powers, chunk, radix, alphabet, out);
}

// invariant: value < R^(2^level); when pad is set, emits exactly
// chunk * 2^level characters.
#[allow(clippy::too_many_arguments)]
fn rec(
    v: Vec<Digit>,
    level: usize,
    pad: bool,
    powers: &[Vec<Digit>],
    chunk: usize,
    radix: u32,
    alphabet: &[char],
    out: &mut String,
) {
    if level == 0 || real_len(&v) < FAST_FORMAT_THRESHOLD {
        if pad {
            let width = chunk << level;
            let mut tmp = String::new();
            classic_chars(&v, radix, alphabet, &mut tmp);
            for _ in tmp.chars().count()..width {
                out.push(alphabet[0]);
            }
            out.push_str(&tmp);
        } else {
            classic_chars(&v, radix, alphabet, out);
        }
        return;
    }
    let (q, r) = div::div_mags_nonzero(&v, &powers[level - 1], DivideMode::Classic);
    // a zero quotient on the leading spine keeps the spine in the low half;
    // padding starts only below the first nonzero quotient digit
    if !pad && real_len(&q) == 0 {
        return rec(r, level - 1, false, powers, chunk, radix, alphabet, out);
    }
    rec(q, level - 1, pad, powers, chunk, radix, alphabet, out);
    rec(r, level - 1, true, powers, chunk, radix, alphabet, out);
}

#[cfg(test)]
mod strfmt_test {
    use super::*;
    use crate::settings::ParseMode;

    fn init() {
        crate::init_logger(true)
    }

    #[test]
    fn known_values() {
        init();
        let n255 = BigInt::from_u32(255);
        assert_eq!(format(&n255, 16, None, false, FormatMode::Classic).unwrap(), "ff");
        assert_eq!(format(&n255, 16, None, true, FormatMode::Classic).unwrap(), "FF");
        assert_eq!(format(&n255, 10, None, false, FormatMode::Classic).unwrap(), "255");
        assert_eq!(format(&n255, 2, None, false, FormatMode::Classic).unwrap(), "11111111");
        assert_eq!(format(&BigInt::zero(), 10, None, false, FormatMode::Fast).unwrap(), "0");
        assert_eq!(
            format(&BigInt::from_i64(-1000), 10, None, false, FormatMode::Classic).unwrap(),
            "-1000"
        );
        let p = BigInt::from_words(&[0, 0, 1], false); // 2^64
        assert_eq!(
            format(&p, 10, None, false, FormatMode::Classic).unwrap(),
            "18446744073709551616"
        );
    }

    #[test]
    fn alphabet_validation() {
        init();
        assert!(matches!(
            format(&BigInt::one(), 16, Some("0123456789abcde"), false, FormatMode::Classic),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            format(&BigInt::one(), 3, Some("aba"), false, FormatMode::Classic),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            format(&BigInt::one(), 1, Some("a"), false, FormatMode::Classic),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            format(&BigInt::one(), 37, None, false, FormatMode::Classic),
            Err(Error::InvalidArgument(_))
        ));
        // a custom alphabet may push the radix past 36
        let a: String = ('\u{21}'..'\u{46}').collect(); // 37 distinct chars
        assert!(format(&BigInt::from_u32(1000), 37, Some(&a), false, FormatMode::Classic).is_ok());
    }

    #[test]
    fn fast_matches_classic() {
        init();
        // a few hundred digits straddle the recursion levels
        let mut x = BigInt::one();
        let m = BigInt::from_u64(0xDEADBEEFCAFEBABE);
        for _ in 0..40 {
            x = crate::arith::add(
                &crate::mul::multiply(&x, &m, crate::MultiplyMode::Classic),
                &BigInt::from_u32(0x12345),
            );
        }
        for radix in [2u32, 7, 10, 16, 33, 36] {
            let c = format(&x, radix, None, false, FormatMode::Classic).unwrap();
            let f = format(&x, radix, None, false, FormatMode::Fast).unwrap();
            assert_eq!(c, f, "radix {radix}");
        }
    }

    #[test]
    fn fast_skips_zero_leading_quotients() {
        init();
        // widths where the value falls below a split power, so the top-level
        // quotient is zero and the spine must continue unpadded
        for exp in [512u32, 720, 724, 725, 730, 1024] {
            let x = BigInt::from_u32(10).pow_with(exp, crate::MultiplyMode::Classic);
            let c = format(&x, 10, None, false, FormatMode::Classic).unwrap();
            let f = format(&x, 10, None, false, FormatMode::Fast).unwrap();
            assert_eq!(c, f, "10^{exp}");
            assert_eq!(f.len(), exp as usize + 1, "10^{exp}");
            assert!(!f.starts_with('0'), "10^{exp}");
        }
        // same shape in binary: a single set bit high up
        let b = BigInt::one().shifted(2401).unwrap();
        let c = format(&b, 2, None, false, FormatMode::Classic).unwrap();
        let f = format(&b, 2, None, false, FormatMode::Fast).unwrap();
        assert_eq!(c, f);
        assert_eq!(f.len(), 2402);
    }

    #[test]
    fn round_trip_both_ways() {
        init();
        let mut x = BigInt::from_u32(7);
        let m = BigInt::from_u64(0x1000000007);
        for _ in 0..25 {
            x = crate::mul::multiply(&x, &m, crate::MultiplyMode::Classic);
        }
        let neg = crate::arith::sub(&BigInt::zero(), &x);
        for v in [&x, &neg] {
            for radix in [2u32, 8, 10, 16, 36] {
                for fm in [FormatMode::Classic, FormatMode::Fast] {
                    let s = format(v, radix, None, false, fm).unwrap();
                    for pm in [ParseMode::Classic, ParseMode::Fast] {
                        let back =
                            crate::parse::parse(&s, Some(radix), None, pm, crate::MultiplyMode::Classic)
                                .unwrap();
                        assert_eq!(&back, v, "radix {radix} {fm:?} {pm:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn custom_alphabet_round_trip() {
        init();
        let a = "abcdefghij"; // radix 10 with letters
        let x = BigInt::from_u64(9876543210123456789);
        let s = format(&x, 10, Some(a), false, FormatMode::Classic).unwrap();
        assert!(s.chars().all(|c| a.contains(c)));
        let back =
            crate::parse::parse(&s, Some(10), Some(a), ParseMode::Classic, crate::MultiplyMode::Classic)
                .unwrap();
        assert_eq!(back, x);
    }
}
