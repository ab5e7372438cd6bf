//!
//! RTOFloat implements correctly rounded multi-precision arithmetic over
//! IEEE-754 [double-precision](https://en.wikipedia.org/wiki/IEEE_754)
//! values. Each operation runs exactly once on the host FPU with the
//! rounding direction forced to truncation; the hardware inexact flag is
//! folded into the result's last bit (round-to-odd), and that intermediate
//! is re-rounded to the requested precision under any of eight rounding
//! modes without double-rounding error.

//!### Example
//!```
//!  use rtofloat::{ops, PrecisionCtx, RoundingMode};
//!
//!  // A context that keeps 5 significant bits, rounding to nearest-even.
//!  let ctx = PrecisionCtx::new(5, RoundingMode::NearestEven);
//!
//!  // 33 sits halfway between 32 and 34; the tie goes to even.
//!  assert_eq!(ops::round(33.0, &ctx), 32.0);
//!
//!  // 6 * 6 runs on the hardware and is re-rounded by the context.
//!  assert_eq!(ops::mul(6.0, 6.0, &ctx), 36.0);
//!```
//!
//! Contexts can bound the exponent range and the largest finite value,
//! which is enough to emulate a whole IEEE format. Single precision,
//! subnormals and overflow included:
//!```
//!  use rtofloat::{ops, BoundedCtx, RoundingMode};
//!
//!  let binary32 =
//!      BoundedCtx::new(24, -126, RoundingMode::NearestEven, f32::MAX as f64);
//!
//!  let (x, y) = (0.1f32, 0.3f32);
//!  let r = ops::add(x as f64, y as f64, &binary32);
//!  assert_eq!(r, (x + y) as f64);
//!```
//!
//! The low-level layers are exposed directly: the bit-level rounder for
//! finished doubles, and the round-to-odd engine for single hardware
//! operations.
//!```
//!  use rtofloat::{engine, rounder, RoundingMode};
//!
//!  // Round 1.125 up to two significant bits.
//!  let r = rounder::round(1.125, 2, None, RoundingMode::ToPositive);
//!  assert_eq!(r, 1.5);
//!
//!  // An inexact engine result always carries an odd last bit.
//!  let r = engine::add(1.0, 2f64.powi(-60), 53);
//!  assert_eq!(r.to_bits(), 1f64.to_bits() | 1);
//!```

mod context;
mod format;
mod real;
mod round;

pub mod arch;
pub mod engine;
pub mod ops;
pub mod rounder;
pub mod utils;

pub use self::context::{BoundedCtx, Context, PrecisionCtx, SubnormalCtx};
pub use self::format::{Double, ExpInt, Ieee754, MantInt, Single};
pub use self::real::RealFloat;
pub use self::round::{RoundingDirection, RoundingMode};
