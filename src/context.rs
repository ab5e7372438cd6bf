//! Rounding contexts.
//!
//! A context encapsulates one rounding operation from real numbers to a
//! floating-point representation: a target precision, optionally a
//! subnormal cutoff, and optionally a largest finite value with an
//! IEEE-style overflow-to-infinity policy. Contexts also state the minimum
//! round-to-odd precision the engine must deliver to drive them safely.

use crate::format::{Double, ExpInt};
use crate::round::{RoundingDirection, RoundingMode};
use crate::rounder;

/// A rounding operation from real numbers to a floating-point format.
pub trait Context {
    /// Minimum precision using round-to-odd required for safe re-rounding
    /// under this context.
    fn round_prec(&self) -> usize;

    /// Rounds `x` according to this context.
    fn round(&self, x: f64) -> f64;
}

/// Rounds to a fixed precision with an unbounded exponent range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionCtx {
    prec: usize,
    rm: RoundingMode,
}

impl PrecisionCtx {
    /// Creates a context rounding to `prec` significant bits.
    pub fn new(prec: usize, rm: RoundingMode) -> Self {
        assert!(prec > 0, "precision must be positive");
        PrecisionCtx { prec, rm }
    }

    /// The maximum precision of this context.
    pub fn prec(&self) -> usize {
        self.prec
    }

    /// The rounding mode of this context.
    pub fn rm(&self) -> RoundingMode {
        self.rm
    }
}

impl Context for PrecisionCtx {
    fn round_prec(&self) -> usize {
        self.prec
    }

    fn round(&self, x: f64) -> f64 {
        rounder::round(x, self.prec, None, self.rm)
    }
}

/// Rounds to a fixed precision with a minimum exponent: values whose
/// leading digit falls below `emin` lose precision gradually, the way IEEE
/// subnormals do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnormalCtx {
    prec: usize,
    emin: ExpInt,
    rm: RoundingMode,
}

impl SubnormalCtx {
    /// Creates a context rounding to `prec` significant bits with minimum
    /// normalized exponent `emin`.
    pub fn new(prec: usize, emin: ExpInt, rm: RoundingMode) -> Self {
        assert!(prec > 0, "precision must be positive");
        assert!(emin <= Double::EMAX, "emin exceeds the exponent range");
        SubnormalCtx { prec, emin, rm }
    }

    /// The maximum precision of this context.
    pub fn prec(&self) -> usize {
        self.prec
    }

    /// The minimum normalized exponent of this context.
    pub fn emin(&self) -> ExpInt {
        self.emin
    }

    /// The rounding mode of this context.
    pub fn rm(&self) -> RoundingMode {
        self.rm
    }

    /// The first unrepresentable digit position: one below the minimum
    /// subnormal digit.
    pub fn n(&self) -> ExpInt {
        self.emin - self.prec as ExpInt
    }
}

impl Context for SubnormalCtx {
    fn round_prec(&self) -> usize {
        self.prec
    }

    fn round(&self, x: f64) -> f64 {
        rounder::round(x, self.prec, Some(self.n()), self.rm)
    }
}

/// Should an overflowing magnitude round to infinity rather than saturate
/// at the largest finite value?
fn overflow_to_infinity(rm: RoundingMode, s: bool, maxval_odd: bool) -> bool {
    match rm.direction(s) {
        RoundingDirection::ToZero => false,
        RoundingDirection::AwayZero => true,
        // The parity modes pick whichever neighbour matches; infinity
        // plays the even role just past an odd maxval.
        RoundingDirection::ToEven => maxval_odd,
        RoundingDirection::ToOdd => !maxval_odd,
    }
}

/// A [`SubnormalCtx`] bounded above by a largest finite value, with the
/// IEEE-style overflow-to-infinity decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedCtx {
    inner: SubnormalCtx,
    maxval: f64,
    maxval_odd: bool,
}

impl BoundedCtx {
    /// Creates a bounded context. `maxval` must be finite and exactly
    /// representable at `(prec, emin)`.
    pub fn new(prec: usize, emin: ExpInt, rm: RoundingMode, maxval: f64) -> Self {
        let inner = SubnormalCtx::new(prec, emin, rm);
        assert!(maxval.is_finite(), "maxval must be finite");
        assert!(
            maxval == inner.round(maxval),
            "maxval must be exactly representable in this context"
        );

        // Cache the parity of maxval's LSB at the target precision.
        let bits = maxval.to_bits();
        let pth_bit_pos = Double::M as i64 - prec as i64 + 1;
        let maxval_odd = pth_bit_pos >= 0 && (bits >> pth_bit_pos) & 1 != 0;

        BoundedCtx {
            inner,
            maxval,
            maxval_odd,
        }
    }

    /// The maximum precision of this context.
    pub fn prec(&self) -> usize {
        self.inner.prec()
    }

    /// The minimum normalized exponent of this context.
    pub fn emin(&self) -> ExpInt {
        self.inner.emin()
    }

    /// The rounding mode of this context.
    pub fn rm(&self) -> RoundingMode {
        self.inner.rm()
    }

    /// The largest finite value of this context.
    pub fn maxval(&self) -> f64 {
        self.maxval
    }
}

impl Context for BoundedCtx {
    fn round_prec(&self) -> usize {
        self.inner.round_prec()
    }

    fn round(&self, x: f64) -> f64 {
        // Round without overflow handling first.
        let x = self.inner.round(x);

        // NaN and exact infinities pass through.
        if !x.is_finite() {
            return x;
        }

        if x.abs() > self.maxval {
            let s = x.is_sign_negative();
            if overflow_to_infinity(self.inner.rm(), s, self.maxval_odd) {
                f64::INFINITY.copysign(x)
            } else {
                self.maxval.copysign(x)
            }
        } else {
            x
        }
    }
}
