//! Correctly rounded operations over a rounding context.
//!
//! Each arithmetic operation runs once on the hardware through the
//! round-to-odd engine, at two bits above the context's stated rounding
//! precision, and the context then re-rounds the intermediate. The two
//! extra bits make the final rounding exact for every mode, so the whole
//! pipeline behaves as if the operation had been computed in unbounded
//! precision and rounded once.
//!
//! Engine-backed operations require `ctx.round_prec() <= 51` so the margin
//! fits in the double format; `round`, `neg` and `abs` only require
//! `ctx.round_prec() <= 53`.

use crate::context::Context;
use crate::engine;

/// Rounds `x` according to `ctx`.
pub fn round<C: Context>(x: f64, ctx: &C) -> f64 {
    ctx.round(x)
}

/// Computes `-x`, rounded by `ctx`. Negation itself is exact.
pub fn neg<C: Context>(x: f64, ctx: &C) -> f64 {
    ctx.round(-x)
}

/// Computes `|x|`, rounded by `ctx`. The magnitude itself is exact.
pub fn abs<C: Context>(x: f64, ctx: &C) -> f64 {
    ctx.round(x.abs())
}

/// Computes `x + y`, correctly rounded by `ctx`.
pub fn add<C: Context>(x: f64, y: f64, ctx: &C) -> f64 {
    let r = engine::add(x, y, ctx.round_prec() + 2);
    ctx.round(r)
}

/// Computes `x - y`, correctly rounded by `ctx`.
pub fn sub<C: Context>(x: f64, y: f64, ctx: &C) -> f64 {
    let r = engine::sub(x, y, ctx.round_prec() + 2);
    ctx.round(r)
}

/// Computes `x * y`, correctly rounded by `ctx`.
pub fn mul<C: Context>(x: f64, y: f64, ctx: &C) -> f64 {
    let r = engine::mul(x, y, ctx.round_prec() + 2);
    ctx.round(r)
}

/// Computes `x / y`, correctly rounded by `ctx`.
pub fn div<C: Context>(x: f64, y: f64, ctx: &C) -> f64 {
    let r = engine::div(x, y, ctx.round_prec() + 2);
    ctx.round(r)
}

/// Computes `sqrt(x)`, correctly rounded by `ctx`.
pub fn sqrt<C: Context>(x: f64, ctx: &C) -> f64 {
    let r = engine::sqrt(x, ctx.round_prec() + 2);
    ctx.round(r)
}

/// Computes `x * y + z` with a single rounding by `ctx`.
pub fn fma<C: Context>(x: f64, y: f64, z: f64, ctx: &C) -> f64 {
    let r = engine::fma(x, y, z, ctx.round_prec() + 2);
    ctx.round(r)
}

/// Computes `x + y` through the exact engine: the caller asserts the sum
/// is exactly representable in double precision.
pub fn add_exact<C: Context>(x: f64, y: f64, ctx: &C) -> f64 {
    let r = engine::add_exact(x, y, ctx.round_prec());
    ctx.round(r)
}

/// Computes `x - y` through the exact engine: the caller asserts the
/// difference is exactly representable in double precision.
pub fn sub_exact<C: Context>(x: f64, y: f64, ctx: &C) -> f64 {
    let r = engine::sub_exact(x, y, ctx.round_prec());
    ctx.round(r)
}

/// Computes `x * y` through the exact engine: the caller asserts the
/// product is exactly representable in double precision.
pub fn mul_exact<C: Context>(x: f64, y: f64, ctx: &C) -> f64 {
    let r = engine::mul_exact(x, y, ctx.round_prec());
    ctx.round(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BoundedCtx, Context, PrecisionCtx, SubnormalCtx};
    use crate::round::{RoundingMode, ALL_MODES};
    use crate::utils;

    // Binary32 as a context: precision 24, emin -126, bounded by the
    // largest finite f32. Together with the engine this must reproduce
    // hardware single-precision arithmetic bit for bit.
    fn f32_ctx(rm: RoundingMode) -> BoundedCtx {
        BoundedCtx::new(24, -126, rm, f32::MAX as f64)
    }

    fn check_f32(got: f64, want: f32) {
        let want = want as f64;
        if want.is_nan() {
            assert!(got.is_nan());
        } else {
            assert_eq!(got.to_bits(), want.to_bits());
        }
    }

    #[test]
    fn test_round_matches_f32_cast() {
        let ctx = f32_ctx(RoundingMode::NearestEven);
        let mut lfsr = utils::Lfsr::new();
        let mut values: Vec<f64> = utils::get_special_test_values().to_vec();
        for _ in 0..2000 {
            values.push(lfsr.get_f64());
        }
        for v in values {
            if v.is_nan() {
                continue;
            }
            // The cast is itself a correctly rounded nearest-even
            // conversion, overflow and subnormals included.
            check_f32(round(v, &ctx), v as f32);
        }
    }

    #[test]
    fn test_arithmetic_matches_f32_hardware() {
        let ctx = f32_ctx(RoundingMode::NearestEven);
        let mut lfsr = utils::Lfsr::new_with_seed(9);

        for _ in 0..2000 {
            let a = lfsr.get_f32();
            let b = lfsr.get_f32();
            let (x, y) = (a as f64, b as f64);

            check_f32(add(x, y, &ctx), a + b);
            check_f32(sub(x, y, &ctx), a - b);
            check_f32(mul(x, y, &ctx), a * b);
            if b != 0.0 {
                check_f32(div(x, y, &ctx), a / b);
            }
            if a >= 0.0 {
                check_f32(sqrt(x, &ctx), a.sqrt());
            }
        }
    }

    #[test]
    fn test_fma_matches_f32_hardware() {
        let ctx = f32_ctx(RoundingMode::NearestEven);
        let mut lfsr = utils::Lfsr::new_with_seed(21);

        for _ in 0..500 {
            let a = lfsr.get_f32();
            let b = lfsr.get_f32();
            let c = lfsr.get_f32();
            check_f32(
                fma(a as f64, b as f64, c as f64, &ctx),
                a.mul_add(b, c),
            );
        }
    }

    #[test]
    fn test_simple_ops() {
        let ctx = PrecisionCtx::new(5, RoundingMode::NearestEven);
        // The sum is exact in double precision, then re-rounded to five
        // bits: 33 ties down to 32.
        assert_eq!(add(32.0, 1.0, &ctx), 32.0);
        assert_eq!(add(32.0, 3.0, &ctx), 36.0);
        assert_eq!(mul(6.0, 6.0, &ctx), 36.0);
        assert_eq!(div(1.0, 4.0, &ctx), 0.25);
        assert_eq!(sqrt(625.0, &ctx), 25.0);
        // 5 * 6 + 3 = 33, which ties down to 32 at five bits.
        assert_eq!(fma(5.0, 6.0, 3.0, &ctx), 32.0);
    }

    #[test]
    fn test_neg_abs() {
        let ctx = PrecisionCtx::new(5, RoundingMode::NearestEven);
        assert_eq!(neg(33.0, &ctx), -32.0);
        assert_eq!(abs(-33.0, &ctx), 32.0);

        // NaN and infinities pass through untouched.
        assert!(neg(f64::NAN, &ctx).is_nan());
        assert_eq!(neg(f64::INFINITY, &ctx), f64::NEG_INFINITY);
        assert_eq!(abs(f64::NEG_INFINITY, &ctx), f64::INFINITY);

        // Zero signs follow the exact operation.
        assert_eq!(neg(0.0, &ctx).to_bits(), (-0.0f64).to_bits());
        assert_eq!(abs(-0.0, &ctx).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn test_exact_ops() {
        let ctx = PrecisionCtx::new(12, RoundingMode::NearestEven);
        assert_eq!(add_exact(1.0, 2.0, &ctx), 3.0);
        assert_eq!(sub_exact(10.0, 2.5, &ctx), 7.5);
        assert_eq!(mul_exact(1.5, 2.0, &ctx), 3.0);
    }

    #[test]
    fn test_directed_ops_bracket() {
        // Division at a reduced precision under the four directed modes
        // brackets the infinitely precise quotient.
        let s_up = SubnormalCtx::new(12, -126, RoundingMode::ToPositive);
        let s_down = SubnormalCtx::new(12, -126, RoundingMode::ToNegative);

        let mut lfsr = utils::Lfsr::new_with_seed(17);
        for _ in 0..500 {
            let a = lfsr.get_f32() as f64;
            let b = lfsr.get_f32() as f64;
            if b == 0.0 {
                continue;
            }
            let up = div(a, b, &s_up);
            let down = div(a, b, &s_down);
            let exact = a / b;
            assert!(down <= exact && exact <= up, "{} / {}", a, b);
        }
    }

    #[test]
    fn test_engine_context_agreement() {
        // The pipeline is exactly engine-at-margin followed by the
        // context rounder.
        for rm in ALL_MODES {
            let ctx = SubnormalCtx::new(24, -126, rm);
            let mut lfsr = utils::Lfsr::new_with_seed(29);
            for _ in 0..200 {
                let x = lfsr.get_f32() as f64;
                let y = lfsr.get_f32() as f64;
                let direct = mul(x, y, &ctx);
                let staged =
                    ctx.round(crate::engine::mul(x, y, ctx.round_prec() + 2));
                assert_eq!(direct.to_bits(), staged.to_bits());
            }
        }
    }
}
