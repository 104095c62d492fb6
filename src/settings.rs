//! Default strategy selection. Every kernel takes its strategy as an
//! explicit parameter; the process-wide settings are consulted only by the
//! outermost convenience APIs (`BigInt::parse`, `Display`, operator impls).

use std::sync::{OnceLock, RwLock};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MultiplyMode {
    // schoolbook O(n*m) accumulation; always correct
    Classic,
    // transform-based convolution above FAST_MUL_THRESHOLD digits
    AutoFast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DivideMode {
    // Knuth algorithm D long division
    Classic,
    // shortcut ladder (power-of-two, single-digit) with classic fallback
    AutoFast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    // per-character multiply-accumulate, O(n^2)
    Classic,
    // divide-and-conquer doubling combine
    Fast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatMode {
    // repeated division by radix^k
    Classic,
    // divide-and-conquer by precomputed powers
    Fast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub multiply: MultiplyMode,
    pub divide: DivideMode,
    pub parse: ParseMode,
    pub format: FormatMode,
    // default for BigInt::auto_norm on freshly constructed values
    pub auto_normalize: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            multiply: MultiplyMode::AutoFast,
            divide: DivideMode::AutoFast,
            parse: ParseMode::Fast,
            format: FormatMode::Fast,
            auto_normalize: false,
        }
    }
}

fn handle() -> &'static RwLock<Settings> {
    static SETTINGS: OnceLock<RwLock<Settings>> = OnceLock::new();
    SETTINGS.get_or_init(|| RwLock::new(Settings::default()))
}

pub fn get() -> Settings {
    *handle().read().unwrap_or_else(|e| e.into_inner())
}

pub fn set(s: Settings) {
    *handle().write().unwrap_or_else(|e| e.into_inner()) = s;
}

pub fn update(f: impl FnOnce(&mut Settings)) {
    f(&mut handle().write().unwrap_or_else(|e| e.into_inner()))
}

#[cfg(test)]
mod settings_test {
    use super::*;

    #[test]
    fn defaults_and_update() {
        crate::init_logger(true);
        let d = Settings::default();
        assert_eq!(d.multiply, MultiplyMode::AutoFast);
        assert_eq!(d.parse, ParseMode::Fast);
        assert!(!d.auto_normalize);

        let before = get();
        update(|s| s.multiply = MultiplyMode::Classic);
        assert_eq!(get().multiply, MultiplyMode::Classic);
        set(before);
        assert_eq!(get(), before);
    }
}
