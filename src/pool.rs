//! Process-wide pool of scratch digit buffers used by the fast multiply,
//! parse, and format paths. A buffer is borrowed for exactly one operation:
//! `acquire` hands out a zeroed buffer, and dropping the lease returns it
//! to the free-list. The free-list is mutex-guarded, so concurrent fast-path
//! operations on different values are safe.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, OnceLock};

use crate::Digit;

// Retention cap; buffers beyond this many are simply dropped on release.
const POOL_CAP: usize = 16;

struct Pool {
    free: Mutex<Vec<Vec<Digit>>>,
}

fn pool() -> &'static Pool {
    static POOL: OnceLock<Pool> = OnceLock::new();
    POOL.get_or_init(|| Pool { free: Mutex::new(Vec::new()) })
}

pub struct Lease {
    buf: Vec<Digit>,
}

impl Deref for Lease {
    type Target = [Digit];
    fn deref(&self) -> &[Digit] {
        &self.buf
    }
}

impl DerefMut for Lease {
    fn deref_mut(&mut self) -> &mut [Digit] {
        &mut self.buf
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        let mut free = pool().free.lock().unwrap_or_else(|e| e.into_inner());
        if free.len() < POOL_CAP {
            free.push(std::mem::take(&mut self.buf));
        }
    }
}

// Borrow a zeroed scratch buffer of exactly min_len digits.
pub fn acquire(min_len: usize) -> Lease {
    let reused = {
        let mut free = pool().free.lock().unwrap_or_else(|e| e.into_inner());
        // prefer a buffer that already has the capacity
        match free.iter().position(|b| b.capacity() >= min_len) {
            Some(i) => Some(free.swap_remove(i)),
            None => free.pop(),
        }
    };
    let mut buf = reused.unwrap_or_default();
    buf.clear();
    buf.resize(min_len, 0);
    Lease { buf }
}
