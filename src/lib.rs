use std::io::Write;

use chrono::Local;
use env_logger::Builder;
use log::LevelFilter;

pub fn init_logger(is_test: bool) {
    let _ = Builder::new()
        .format(|buf, record| {
            writeln!(buf,
                     "{} [{}] - {}",
                     Local::now().format("%Y-%m-%dT%H:%M:%S"),
                     record.level(),
                     record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .is_test(is_test)
        .format_timestamp_secs()
        .try_init();
}

// A digit aka 'limb' is a 32-bit quantity. Digits are stored in
// little-endian order: mag[0] is the least significant digit.
pub type Digit = u32;
// Intermediate products and column sums need twice the digit width.
pub type DoubleDigit = u64;

// Hard cap on the total bit length of a magnitude. Left shifts that would
// push a number past this cap report Error::Overflow.
pub const MAX_BIT_LEN: u64 = 1 << 31;

#[derive(Clone, Debug)]
pub struct BigInt {
    // The magnitude of the integer; only mag[0..len] is significant.
    // Digits at index >= len are don't-care.
    pub(crate) mag: Vec<Digit>,
    // Count of semantically significant digits. The value is canonical when
    // len == 0 or mag[len-1] != 0; trailing zero digits inside len are
    // tolerated transiently, and comparisons compute the real length on
    // the fly. len == 0 is the unique representation of zero.
    pub(crate) len: usize,
    // Sign is tracked out-of-band; arithmetic runs on unsigned magnitudes.
    // Zero forces negative == false. There is no negative zero.
    pub(crate) negative: bool,
    // When set, operations that mutate this value's own buffer call
    // normalize() afterwards.
    pub(crate) auto_norm: bool,
}

pub mod arith;
pub mod bits;
pub mod div;
pub mod error;
pub mod int;
pub mod mul;
pub mod ops;
pub mod parse;
pub mod pool;
pub mod settings;
pub mod strfmt;

pub use div::DivOutput;
pub use error::{Error, Result};
pub use settings::{DivideMode, FormatMode, MultiplyMode, ParseMode, Settings};
