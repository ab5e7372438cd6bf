//! Scalar aliases and compile-time IEEE-754 format descriptors.

/// Signed exponent scalar. Wide enough for every intermediate exponent,
/// including the integer-significand view of subnormals.
pub type ExpInt = i64;

/// Unsigned significand scalar. Every producer in this crate fits a
/// significand in 64 bits.
pub type MantInt = u64;

/// Compile-time IEEE-754 binary interchange format descriptor,
/// parameterised by the exponent field width `E` and the total width `N`.
///
/// See IEEE 754-2019, Table 3.5 — Binary interchange format parameters.
pub struct Ieee754<const E: usize, const N: usize>;

impl<const E: usize, const N: usize> Ieee754<E, N> {
    /// Width of the mantissa field in bits.
    pub const M: usize = N - E - 1;
    /// Precision of the significand (mantissa field plus the implicit bit).
    pub const P: usize = Self::M + 1;
    /// Exponent bias.
    pub const BIAS: ExpInt = (1 << (E - 1)) - 1;
    /// Minimum normalized exponent.
    pub const EMIN: ExpInt = 1 - Self::BIAS;
    /// Maximum normalized exponent.
    pub const EMAX: ExpInt = Self::BIAS;
    /// Exponent floor in the integer-significand view, where the value is
    /// `c * 2^exp` with `c` held as a `P`-bit integer.
    pub const EXPMIN: ExpInt = Self::EMIN - Self::M as ExpInt;
    /// Exponent ceiling in the integer-significand view.
    pub const EXPMAX: ExpInt = Self::EMAX - Self::M as ExpInt;
    /// All-ones biased exponent field (infinity and NaN encodings).
    pub const EONES: MantInt = (1 << E) - 1;
    /// Mask of the sign bit.
    pub const SMASK: MantInt = 1 << (N - 1);
    /// Mask of the biased exponent field.
    pub const EMASK: MantInt = Self::EONES << Self::M;
    /// Mask of the mantissa field.
    pub const MMASK: MantInt = (1 << Self::M) - 1;
    /// The implicit leading bit of a normal significand.
    pub const IMPLICIT1: MantInt = 1 << Self::M;
}

/// IEEE-754 binary64 (the host `f64`).
pub type Double = Ieee754<11, 64>;

/// IEEE-754 binary32 (the host `f32`).
pub type Single = Ieee754<8, 32>;

#[test]
fn test_double_constants() {
    assert_eq!(Double::M, 52);
    assert_eq!(Double::P, 53);
    assert_eq!(Double::BIAS, 1023);
    assert_eq!(Double::EMIN, -1022);
    assert_eq!(Double::EMAX, 1023);
    assert_eq!(Double::EXPMIN, -1074);
    assert_eq!(Double::EXPMAX, 971);
    assert_eq!(Double::EONES, 0x7ff);
    assert_eq!(Double::IMPLICIT1, 1 << 52);
}

#[test]
fn test_single_constants() {
    assert_eq!(Single::M, 23);
    assert_eq!(Single::P, 24);
    assert_eq!(Single::BIAS, 127);
    assert_eq!(Single::EMIN, -126);
    assert_eq!(Single::EXPMIN, -149);
    assert_eq!(Single::EONES, 0xff);
}

#[test]
fn test_fields_disjoint() {
    // The three fields partition the full width.
    assert_eq!(Double::SMASK & Double::EMASK, 0);
    assert_eq!(Double::EMASK & Double::MMASK, 0);
    assert_eq!(Double::SMASK | Double::EMASK | Double::MMASK, u64::MAX);
    assert_eq!(
        Single::SMASK | Single::EMASK | Single::MMASK,
        u32::MAX as u64
    );
}
