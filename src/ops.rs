//! Operator sugar over the arithmetic modules. The infallible operators
//! panic with the library error message on a zero divisor or an overflowing
//! shift; the checked methods on BigInt return Result instead. Strategy
//! selection comes from the process-wide settings.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Rem, Shl, Shr, Sub, SubAssign};

use crate::settings;
use crate::{arith, div, mul, BigInt};

// the four owned/borrowed operand combinations share one reference impl
macro_rules! forward_binop {
    ($trait:ident, $method:ident, $imp:expr) => {
        impl $trait<&BigInt> for &BigInt {
            type Output = BigInt;
            fn $method(self, rhs: &BigInt) -> BigInt {
                $imp(self, rhs)
            }
        }
        impl $trait<BigInt> for &BigInt {
            type Output = BigInt;
            fn $method(self, rhs: BigInt) -> BigInt {
                $trait::$method(self, &rhs)
            }
        }
        impl $trait<&BigInt> for BigInt {
            type Output = BigInt;
            fn $method(self, rhs: &BigInt) -> BigInt {
                $trait::$method(&self, rhs)
            }
        }
        impl $trait<BigInt> for BigInt {
            type Output = BigInt;
            fn $method(self, rhs: BigInt) -> BigInt {
                $trait::$method(&self, &rhs)
            }
        }
    };
}

forward_binop!(Add, add, |a, b| arith::add(a, b));
forward_binop!(Sub, sub, |a, b| arith::sub(a, b));
forward_binop!(Mul, mul, |a, b| mul::multiply(a, b, settings::get().multiply));
forward_binop!(Div, div, |a, b| {
    match div::div_rem(a, b, settings::get().divide) {
        Ok((q, _)) => q,
        Err(e) => panic!("{e}"),
    }
});
forward_binop!(Rem, rem, |a, b| {
    match div::div_rem(a, b, settings::get().divide) {
        Ok((_, r)) => r,
        Err(e) => panic!("{e}"),
    }
});

impl Neg for &BigInt {
    type Output = BigInt;
    fn neg(self) -> BigInt {
        arith::sub(&BigInt::zero(), self)
    }
}

impl Neg for BigInt {
    type Output = BigInt;
    fn neg(self) -> BigInt {
        -&self
    }
}

impl Shl<u32> for &BigInt {
    type Output = BigInt;
    fn shl(self, count: u32) -> BigInt {
        match arith::shift(self, count as i64) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Shl<u32> for BigInt {
    type Output = BigInt;
    fn shl(self, count: u32) -> BigInt {
        &self << count
    }
}

impl Shr<u32> for &BigInt {
    type Output = BigInt;
    fn shr(self, count: u32) -> BigInt {
        match arith::shift(self, -(count as i64)) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Shr<u32> for BigInt {
    type Output = BigInt;
    fn shr(self, count: u32) -> BigInt {
        &self >> count
    }
}

impl AddAssign<&BigInt> for BigInt {
    fn add_assign(&mut self, rhs: &BigInt) {
        *self = arith::add(self, rhs);
    }
}

impl AddAssign<BigInt> for BigInt {
    fn add_assign(&mut self, rhs: BigInt) {
        *self += &rhs;
    }
}

impl SubAssign<&BigInt> for BigInt {
    fn sub_assign(&mut self, rhs: &BigInt) {
        *self = arith::sub(self, rhs);
    }
}

impl SubAssign<BigInt> for BigInt {
    fn sub_assign(&mut self, rhs: BigInt) {
        *self -= &rhs;
    }
}

macro_rules! primitive_binop {
    ($t:ty, $trait:ident, $method:ident) => {
        impl $trait<$t> for &BigInt {
            type Output = BigInt;
            fn $method(self, rhs: $t) -> BigInt {
                $trait::$method(self, &BigInt::from(rhs))
            }
        }
        impl $trait<$t> for BigInt {
            type Output = BigInt;
            fn $method(self, rhs: $t) -> BigInt {
                $trait::$method(&self, &BigInt::from(rhs))
            }
        }
        impl $trait<&BigInt> for $t {
            type Output = BigInt;
            fn $method(self, rhs: &BigInt) -> BigInt {
                $trait::$method(&BigInt::from(self), rhs)
            }
        }
        impl $trait<BigInt> for $t {
            type Output = BigInt;
            fn $method(self, rhs: BigInt) -> BigInt {
                $trait::$method(&BigInt::from(self), &rhs)
            }
        }
    };
}

// primitives ride along by conversion; both operand orders work
macro_rules! primitive_interop {
    ($t:ty, $ctor:path) => {
        impl From<$t> for BigInt {
            fn from(v: $t) -> BigInt {
                $ctor(v)
            }
        }
        primitive_binop!($t, Add, add);
        primitive_binop!($t, Sub, sub);
        primitive_binop!($t, Mul, mul);
        primitive_binop!($t, Div, div);
        primitive_binop!($t, Rem, rem);
        impl PartialEq<$t> for BigInt {
            fn eq(&self, rhs: &$t) -> bool {
                arith::compare(self, &BigInt::from(*rhs)) == Ordering::Equal
            }
        }
        impl PartialEq<BigInt> for $t {
            fn eq(&self, rhs: &BigInt) -> bool {
                rhs == self
            }
        }
        impl PartialOrd<$t> for BigInt {
            fn partial_cmp(&self, rhs: &$t) -> Option<Ordering> {
                Some(arith::compare(self, &BigInt::from(*rhs)))
            }
        }
        impl PartialOrd<BigInt> for $t {
            fn partial_cmp(&self, rhs: &BigInt) -> Option<Ordering> {
                Some(arith::compare(&BigInt::from(*self), rhs))
            }
        }
    };
}

primitive_interop!(u32, BigInt::from_u32);
primitive_interop!(i32, BigInt::from_i32);
primitive_interop!(u64, BigInt::from_u64);
primitive_interop!(i64, BigInt::from_i64);
