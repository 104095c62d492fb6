use crate::{Digit, DoubleDigit};

// add_with_carry calculates: sum = x + y + carry.
// The carry input must be 0 or 1. The carry_out is guaranteed to be 0 or 1.
pub fn add_with_carry(x: Digit, y: Digit, carry: Digit) -> (/* sum */ Digit, /* carry_out */ Digit) {
    debug_assert!(carry <= 1);
    let (sum, o1) = x.overflowing_add(y);
    let (sum, o2) = sum.overflowing_add(carry);
    (sum, o1 as Digit | o2 as Digit)
}

// sub_with_borrow calculates: diff = x - y - borrow.
// The borrow input must be 0 or 1. The borrow_out is guaranteed to be 0 or 1.
pub fn sub_with_borrow(x: Digit, y: Digit, borrow: Digit) -> (/* diff */ Digit, /* borrow_out */ Digit) {
    debug_assert!(borrow <= 1);
    let (diff, o1) = x.overflowing_sub(y);
    let (diff, o2) = diff.overflowing_sub(borrow);
    (diff, o1 as Digit | o2 as Digit)
}

pub fn mul32(x: Digit, y: Digit) -> DoubleDigit {
    x as DoubleDigit * y as DoubleDigit
}

pub fn leading_zeroes_count(x: Digit) -> u32 {
    Digit::BITS - bit_width(x)
}

// "length" of a digit in binary representation; bit_width(0) == 0.
pub fn bit_width(a: Digit) -> u32 {
    let mut len = 0;
    let mut x = a as usize;
    if x >= 1 << 16 {
        x >>= 16;
        len += 16;
    }
    if x >= 1 << 8 {
        x >>= 8;
        len += 8;
    }
    len + LEN_8[x] as u32
}

// Count of significant digits, ignoring the insignificant zero suffix.
pub fn real_len(w: &[Digit]) -> usize {
    let mut n = w.len();
    while n > 0 && w[n - 1] == 0 {
        n -= 1;
    }
    n
}

// Total bit length of the magnitude: 32 * (real_len - 1) + bit_width(lnzd).
pub fn mag_bit_len(w: &[Digit]) -> u64 {
    let n = real_len(w);
    if n == 0 {
        0
    } else {
        (n as u64 - 1) * Digit::BITS as u64 + bit_width(w[n - 1]) as u64
    }
}

// dst = src << count, where count = 32*words + bits (bits < 32).
// dst must hold real_len(src) + words + 1 digits; filled with zeroes upfront.
// The sub-word rotation merges carry bits from digit i into digit i+1.
pub fn shl_into(dst: &mut [Digit], src: &[Digit], count: u64) {
    let n = real_len(src);
    let words = (count / Digit::BITS as u64) as usize;
    let bits = (count % Digit::BITS as u64) as u32;
    assert!(dst.len() >= n + words + 1, "shl_into - destination too short");
    dst.fill(0);
    if bits == 0 {
        dst[words..words + n].copy_from_slice(&src[..n]);
    } else {
        for i in 0..n {
            dst[i + words] |= src[i] << bits;
            dst[i + words + 1] = src[i] >> (Digit::BITS - bits);
        }
    }
}

// dst = src >> count. dst must hold real_len(src) - words digits.
pub fn shr_into(dst: &mut [Digit], src: &[Digit], count: u64) {
    let n = real_len(src);
    let words = (count / Digit::BITS as u64) as usize;
    let bits = (count % Digit::BITS as u64) as u32;
    assert!(words <= n && dst.len() >= n - words, "shr_into - destination too short");
    dst.fill(0);
    if bits == 0 {
        dst[..n - words].copy_from_slice(&src[words..n]);
    } else {
        for i in words..n {
            dst[i - words] = src[i] >> bits;
            if i + 1 < n {
                dst[i - words] |= src[i + 1] << (Digit::BITS - bits);
            }
        }
    }
}

// "length" of a 8-bit value in binary representation.
pub const LEN_8: [u8; 256] = [
    0, 1, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4,
    5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8,
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8
];
