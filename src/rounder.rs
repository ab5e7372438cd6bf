//! Single-pass bit-level re-rounding of a host double.
//!
//! [`round`] takes a finite `f64` (typically a 54-bit round-to-odd result
//! from the engine), a target precision `p`, an optional minimum exponent
//! `n`, and a rounding mode, and returns the correctly rounded double. It
//! works directly on the bit pattern: no splitting, one increment, one
//! repack. Subnormal targets are handled by narrowing the effective
//! precision, and severe underflow is mapped onto the minimum subnormal
//! slot so directed modes land where they should.

use crate::format::{Double, ExpInt, MantInt};
use crate::round::{RoundingDirection, RoundingMode};
use crate::utils::bitmask;

fn bit_width(v: MantInt) -> usize {
    (MantInt::BITS - v.leading_zeros()) as usize
}

/// Rounds `x` to `p` significant bits, keeping no digit at or below
/// position `n` when one is given. Assumes `x` carries at least `p + 2`
/// bits of round-to-odd information when it is inexact.
pub fn round(x: f64, p: usize, n: Option<ExpInt>, rm: RoundingMode) -> f64 {
    type FP = Double;

    // Fast path: at full precision there is nothing to do.
    if p >= FP::P {
        return x;
    }

    // Fast path: special values (infinity, NaN, zero).
    if !x.is_finite() || x == 0.0 {
        return x;
    }

    // Load the floating-point data as an integer.
    let b = x.to_bits();
    let s = (b & FP::SMASK) != 0;
    let ebits = (b & FP::EMASK) >> FP::M;
    let mbits = b & FP::MMASK;

    // Decode into a full-width significand and normalized exponent.
    let mut e: ExpInt;
    let mut c: MantInt;
    if ebits == 0 {
        // Subnormal.
        let lz = FP::P - bit_width(mbits);
        e = FP::EMIN - lz as ExpInt;
        c = mbits << lz;
    } else {
        // Normal (infinity and NaN are already gone).
        e = ebits as ExpInt - FP::BIAS;
        c = FP::IMPLICIT1 | mbits;
    }

    // The effective precision may be narrowed by subnormalization. When the
    // cutoff swallows the entire significand ("overshift"), the precision
    // bottoms out at zero and `e` is pinned to `n` so that an increment
    // lands exactly on the minimum subnormal slot.
    let mut p = p;
    let mut overshift = false;
    if let Some(n) = n {
        let nx = e - p as ExpInt;
        let offset = n - nx;
        if offset > 0 {
            overshift = offset as usize > p;
            p = if overshift { 0 } else { p - offset as usize };
            if overshift {
                e = n;
            }
        }
    }

    // Split off the discarded bits.
    let p_lost = FP::P - p;
    let c_mask = bitmask(p_lost);
    let c_lost = c & c_mask;

    // Fast path: the value is already representable.
    if c_lost == 0 {
        return x;
    }

    // Clear the discarded bits; `one` is the ULP at precision `p`.
    c &= !c_mask;
    let one: MantInt = 1 << p_lost;

    let resolve = |dir: RoundingDirection| match dir {
        RoundingDirection::ToZero => false,
        RoundingDirection::AwayZero => true,
        RoundingDirection::ToEven => c & one != 0,
        RoundingDirection::ToOdd => c & one == 0,
    };

    let increment = if rm.is_nearest() {
        // Compare the lost bits against the halfway point:
        // -1 below, 0 exactly halfway, +1 above.
        let halfway: MantInt = 1 << (p_lost - 1);
        let cmp = (c_lost > halfway) as i8 - (c_lost < halfway) as i8;
        // Overshift implies the whole value sits below halfway.
        let rb = if overshift { -1 } else { cmp };
        if rb == 0 {
            resolve(rm.direction(s))
        } else {
            rb > 0
        }
    } else {
        resolve(rm.direction(s))
    };

    // Apply the increment and normalize the single possible carry.
    if increment {
        c += one;
    }
    if c >= (FP::IMPLICIT1 << 1) {
        c >>= 1;
        e += 1;
    }

    // Encode the exponent and mantissa fields.
    let (ebits2, mbits2) = if c == 0 {
        // Subnormalization underflowed to zero; `e` may be arbitrary here.
        (0, 0)
    } else if e < FP::EMIN {
        // Subnormal result.
        (0, c >> ((FP::EMIN - e) as usize))
    } else {
        // Normal result.
        ((e + FP::BIAS) as MantInt, c & FP::MMASK)
    };

    // Repack.
    let sbits2 = if s { FP::SMASK } else { 0 };
    f64::from_bits(sbits2 | (ebits2 << FP::M) | mbits2)
}
