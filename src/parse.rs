//! String to digits. Three strategies share one front door: a linear
//! bit-packing pass for power-of-two radices, a classic O(n^2)
//! multiply-accumulate, and a divide-and-conquer doubling combine that packs
//! characters into radix^k super-digits and merges blocks of doubling size
//! as high * R^block + low, using pooled scratch buffers and the selected
//! multiplier.

use std::collections::HashMap;

use crate::bits::real_len;
use crate::error::{Error, Result};
use crate::settings::{MultiplyMode, ParseMode};
use crate::{mul, pool, strfmt, BigInt, Digit};

// Outside this range the doubling combine is not worth its overhead (or not
// supported); the classic strategy takes over.
pub const FAST_PARSE_MIN_LEN: usize = 64;
pub const FAST_PARSE_MAX_LEN: usize = 4_000_000;

// Character to digit-value mapping for one radix: either the built-in
// 0-9a-z alphabet (case-insensitive) or a caller-supplied one.
pub(crate) enum DigitMap {
    Default { radix: u32 },
    Custom { map: HashMap<char, Digit> },
}

impl DigitMap {
    pub(crate) fn new(radix: u32, alphabet: Option<&str>) -> Result<Self> {
        match alphabet {
            None => {
                if !(2..=36).contains(&radix) {
                    return Err(Error::InvalidArgument(
                        "radix must be in 2..=36 for the default alphabet",
                    ));
                }
                Ok(DigitMap::Default { radix })
            }
            Some(a) => {
                if radix < 2 {
                    return Err(Error::InvalidArgument("radix must be at least 2"));
                }
                let chars = strfmt::validate_alphabet(a, radix)?;
                let map = chars[..radix as usize]
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| (c, i as Digit))
                    .collect();
                Ok(DigitMap::Custom { map })
            }
        }
    }

    fn value_of(&self, c: char) -> Result<Digit> {
        let v = match self {
            DigitMap::Default { radix } => {
                c.to_digit(36).filter(|v| v < radix)
            }
            DigitMap::Custom { map } => map.get(&c).copied(),
        };
        v.ok_or_else(|| Error::InvalidFormat(format!("'{c}' is not a valid digit")))
    }
}

// Front door shared by all strategies: trims whitespace, reads the sign,
// handles the 0/0x prefix (implying octal/hex) when the radix is not pinned,
// skips leading zero digits, and routes power-of-two radices to the linear
// strategy. An explicit radix with a 0x prefix in the input is a format
// error: prefix auto-detection was disallowed. mul_mode selects the
// multiplier the doubling combine uses.
pub fn parse(
    s: &str,
    radix: Option<u32>,
    alphabet: Option<&str>,
    mode: ParseMode,
    mul_mode: MultiplyMode,
) -> Result<BigInt> {
    let t = s.trim();
    let cs: Vec<char> = t.chars().collect();
    let mut i = 0;
    let mut negative = false;
    match cs.first() {
        Some('+') => i += 1,
        Some('-') => {
            negative = true;
            i += 1;
        }
        _ => {}
    }
    let has_0x = cs[i..].starts_with(&['0', 'x']) || cs[i..].starts_with(&['0', 'X']);
    let radix = match radix {
        Some(r) => {
            if has_0x {
                return Err(Error::InvalidFormat(
                    "radix prefix not allowed when format auto-detection is disabled".into(),
                ));
            }
            r
        }
        None => {
            if alphabet.is_some() {
                return Err(Error::InvalidArgument(
                    "a custom alphabet requires an explicit radix",
                ));
            }
            if has_0x {
                i += 2;
                16
            } else if cs.get(i) == Some(&'0') && i + 1 < cs.len() {
                i += 1;
                8
            } else {
                10
            }
        }
    };
    let map = DigitMap::new(radix, alphabet)?;
    if i >= cs.len() {
        return Err(Error::InvalidFormat("no digits in the input".into()));
    }
    let mut vals = Vec::with_capacity(cs.len() - i);
    for &c in &cs[i..] {
        vals.push(map.value_of(c)?);
    }
    // leading zero digits are insignificant
    let lead = vals.iter().take_while(|&&v| v == 0).count();
    let vals = &vals[lead..];
    if vals.is_empty() {
        return Ok(BigInt::zero());
    }
    let mag = if radix.is_power_of_two() {
        pow2_parse(vals, radix)
    } else {
        match mode {
            ParseMode::Classic => classic_parse(vals, radix),
            ParseMode::Fast => fast_parse(vals, radix, mul_mode),
        }
    };
    Ok(BigInt::from_mag(mag, negative))
}

// O(n) bit packing: each character contributes log2(radix) bits at a
// running bit offset. No multiplication needed.
pub fn pow2_parse(vals: &[Digit], radix: u32) -> Vec<Digit> {
    debug_assert!(radix.is_power_of_two());
    let bits_per = radix.trailing_zeros();
    let total_bits = vals.len() as u64 * bits_per as u64;
    let mut out = vec![0; total_bits.div_ceil(Digit::BITS as u64) as usize];
    let mut off: u64 = 0;
    for &v in vals.iter().rev() {
        let w = (off / Digit::BITS as u64) as usize;
        let b = (off % Digit::BITS as u64) as u32;
        out[w] |= v << b;
        if b + bits_per > Digit::BITS {
            out[w + 1] |= v >> (Digit::BITS - b);
        }
        off += bits_per as u64;
    }
    out
}

// O(n^2) multiply-accumulate: mag = mag * radix + v, per character.
pub fn classic_parse(vals: &[Digit], radix: u32) -> Vec<Digit> {
    let mut mag: Vec<Digit> = Vec::new();
    for &v in vals {
        let mut carry = v as u64;
        for d in mag.iter_mut() {
            let t = *d as u64 * radix as u64 + carry;
            *d = t as Digit;
            carry = t >> Digit::BITS;
        }
        if carry > 0 {
            mag.push(carry as Digit);
        }
    }
    mag
}

// Largest k and R = radix^k with R <= Digit::MAX: k characters pack into
// one super-digit of base R.
pub(crate) fn chunk_of(radix: u32) -> (usize, Digit) {
    let mut chunk = 1usize;
    let mut r = radix as u64;
    while r * radix as u64 <= Digit::MAX as u64 {
        r *= radix as u64;
        chunk += 1;
    }
    (chunk, r as Digit)
}

// Divide-and-conquer doubling combine. Characters pack into radix^k
// super-digits first; blocks then merge pairwise over doubling sizes, the
// high half scaled by R^block with the selected multiplier. A block of
// 2^l super-digits always fits 2^l digits, so the two interleaved pooled
// buffers need exactly one digit per super-digit slot.
pub fn fast_parse(vals: &[Digit], radix: u32, mul_mode: MultiplyMode) -> Vec<Digit> {
    if vals.len() < FAST_PARSE_MIN_LEN || vals.len() > FAST_PARSE_MAX_LEN {
        if vals.len() > FAST_PARSE_MAX_LEN {
            log::warn!("fast_parse - {} characters exceed the supported range", vals.len());
        }
        return classic_parse(vals, radix);
    }
    let (chunk, big_r) = chunk_of(radix);
    let n_super = vals.len().div_ceil(chunk);
    let blocks = n_super.next_power_of_two();
    let mut cur = pool::acquire(blocks);
    let mut nxt = pool::acquire(blocks);
    for i in 0..n_super {
        let hi_ix = vals.len() - i * chunk;
        let lo_ix = hi_ix.saturating_sub(chunk);
        let mut v: Digit = 0;
        for &c in &vals[lo_ix..hi_ix] {
            v = v * radix + c;
        }
        cur[i] = v;
    }

    let mut power: Vec<Digit> = vec![big_r];
    let mut stride = 1usize;
    let mut nb = blocks;
    while nb > 1 {
        for pair in 0..nb / 2 {
            let lo_at = 2 * pair * stride;
            let hi_at = lo_at + stride;
            let prod = mul::mul_mags(&cur[hi_at..hi_at + stride], &power, mul_mode);
            let dst = &mut nxt[lo_at..lo_at + 2 * stride];
            dst.fill(0);
            let pl = real_len(&prod).min(dst.len());
            dst[..pl].copy_from_slice(&prod[..pl]);
            let mut carry: Digit = 0;
            for (i, &d) in cur[lo_at..hi_at].iter().enumerate() {
                (dst[i], carry) = crate::bits::add_with_carry(dst[i], d, carry);
            }
            let mut i = stride;
            while carry > 0 && i < dst.len() {
                (dst[i], carry) = crate::bits::add_with_carry(dst[i], 0, carry);
                i += 1;
            }
            debug_assert_eq!(carry, 0, "fast_parse - carry out of a combined block");
        }
        std::mem::swap(&mut cur, &mut nxt);
        stride *= 2;
        nb /= 2;
        if nb > 1 {
            power = mul::mul_mags(&power, &power, mul_mode);
        }
    }
    cur[..stride.min(cur.len())].to_vec()
}

#[cfg(test)]
mod parse_test {
    use super::*;

    fn init() {
        crate::init_logger(true)
    }

    #[test]
    fn decimal_and_hex() {
        init();
        assert_eq!(parse("255", Some(10), None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(255));
        assert_eq!(parse("FF", Some(16), None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(255));
        assert_eq!(parse("ff", Some(16), None, ParseMode::Fast, MultiplyMode::Classic).unwrap(), BigInt::from_u32(255));
        assert_eq!(parse("-42", Some(10), None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_i64(-42));
        assert_eq!(parse("+42", Some(10), None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(42));
        assert_eq!(parse("  1001 ", Some(2), None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(9));
        assert_eq!(
            parse("18446744073709551616", Some(10), None, ParseMode::Classic, MultiplyMode::Classic).unwrap().digits(),
            [0, 0, 1]
        );
    }

    #[test]
    fn auto_detection() {
        init();
        assert_eq!(parse("0x1A", None, None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(26));
        assert_eq!(parse("-0X1a", None, None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_i64(-26));
        assert_eq!(parse("017", None, None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(15));
        assert_eq!(parse("17", None, None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(17));
        assert_eq!(parse("0", None, None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::zero());
        // a prefix with auto-detection disabled is a format error
        assert!(matches!(
            parse("0x1A", Some(16), None, ParseMode::Classic, MultiplyMode::Classic),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_garbage() {
        init();
        assert!(matches!(parse("", Some(10), None, ParseMode::Classic, MultiplyMode::Classic), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse("   ", Some(10), None, ParseMode::Classic, MultiplyMode::Classic), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse("-", Some(10), None, ParseMode::Classic, MultiplyMode::Classic), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse("12a3", Some(10), None, ParseMode::Classic, MultiplyMode::Classic), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse("G", Some(16), None, ParseMode::Classic, MultiplyMode::Classic), Err(Error::InvalidFormat(_))));
        assert!(matches!(parse("12", Some(40), None, ParseMode::Classic, MultiplyMode::Classic), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn leading_zeroes_and_case() {
        init();
        assert_eq!(parse("000255", Some(10), None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(255));
        assert_eq!(parse("0000", Some(10), None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::zero());
        assert_eq!(parse("DeadBeef", Some(16), None, ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(0xDEADBEEF));
    }

    #[test]
    fn pow2_matches_classic() {
        init();
        for radix in [2u32, 4, 8, 16, 32] {
            let s: String = (0..200).map(|i| {
                let v = (i * 7 + 3) % radix;
                char::from_digit(v, 36).unwrap()
            }).collect();
            let linear = parse(&s, Some(radix), None, ParseMode::Classic, MultiplyMode::Classic).unwrap();
            // route around the pow2 shortcut by mapping to values manually
            let vals: Vec<Digit> = s.chars().map(|c| c.to_digit(36).unwrap()).collect();
            let lead = vals.iter().take_while(|&&v| v == 0).count();
            let general = classic_parse(&vals[lead..], radix);
            assert_eq!(linear.digits(), &general[..real_len(&general)], "radix {radix}");
        }
    }

    #[test]
    fn fast_matches_classic() {
        init();
        // a 2500-character decimal straddles every doubling level
        let s: String = (0..2500).map(|i| char::from_digit((i * 13 + 5) % 10, 10).unwrap()).collect();
        let classic = parse(&s, Some(10), None, ParseMode::Classic, MultiplyMode::Classic).unwrap();
        let fast = parse(&s, Some(10), None, ParseMode::Fast, MultiplyMode::Classic).unwrap();
        assert_eq!(classic, fast);
        // below the fast threshold both still agree
        let short = "123456789123456789";
        assert_eq!(
            parse(short, Some(10), None, ParseMode::Classic, MultiplyMode::Classic).unwrap(),
            parse(short, Some(10), None, ParseMode::Fast, MultiplyMode::Classic).unwrap()
        );
        // odd radix, long input
        let s3: String = (0..1000).map(|i| char::from_digit((i * 5 + 2) % 7, 10).unwrap()).collect();
        assert_eq!(
            parse(&s3, Some(7), None, ParseMode::Classic, MultiplyMode::Classic).unwrap(),
            parse(&s3, Some(7), None, ParseMode::Fast, MultiplyMode::Classic).unwrap()
        );
    }

    #[test]
    fn combine_multiplier_is_explicit() {
        init();
        // the doubling combine honors the multiplier it is handed; both
        // choices agree, and no process-wide state is consulted
        let s: String = (0..400).map(|i| char::from_digit((i * 3 + 1) % 10, 10).unwrap()).collect();
        let a = parse(&s, Some(10), None, ParseMode::Fast, MultiplyMode::Classic).unwrap();
        let b = parse(&s, Some(10), None, ParseMode::Fast, MultiplyMode::AutoFast).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, parse(&s, Some(10), None, ParseMode::Classic, MultiplyMode::Classic).unwrap());
    }

    #[test]
    fn custom_alphabet() {
        init();
        // '.' is 0, '!' is 1, '?' is 2
        let a = ".!?";
        assert_eq!(parse("!.", Some(3), Some(a), ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(3));
        assert_eq!(parse("?!", Some(3), Some(a), ParseMode::Classic, MultiplyMode::Classic).unwrap(), BigInt::from_u32(7));
        assert!(matches!(parse("x", Some(3), Some(a), ParseMode::Classic, MultiplyMode::Classic), Err(Error::InvalidFormat(_))));
        // alphabet shorter than the radix
        assert!(matches!(parse("!.", Some(4), Some(a), ParseMode::Classic, MultiplyMode::Classic), Err(Error::InvalidFormat(_))));
    }
}
