//! Access to the host floating-point environment.
//!
//! The round-to-odd engine needs three capabilities from the hardware: set
//! the rounding direction to truncation, clear the accrued exception flags,
//! and read them back after a single operation. Each supported ISA provides
//! the same function set; the register primitives are forced inline so they
//! do not perturb the floating-point code between them.
//!
//! The caller must not re-enter a `prepare_rto`..`rto_status` window from a
//! signal handler, and must not run foreign floating-point code inside the
//! window that depends on the ambient rounding direction.

#[cfg(any(
    target_arch = "x86_64",
    all(target_arch = "x86", target_feature = "sse")
))]
mod imp {
    use bitflags::bitflags;
    use core::arch::asm;

    bitflags! {
        /// Exception flags in the MXCSR status field (bits 0-5).
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct Except: u32 {
            const INVALID = 0x01;
            const DENORMAL = 0x02;
            const DIVZERO = 0x04;
            const OVERFLOW = 0x08;
            const UNDERFLOW = 0x10;
            const INEXACT = 0x20;
        }
    }

    const EXCEPT_MASK: u32 = 0x3f;
    /// Rounding-control field, MXCSR bits 13-14.
    const RC_MASK: u32 = 0x3 << RC_SHIFT;
    const RC_SHIFT: u32 = 13;
    /// Direction code for truncation (round toward zero).
    const RC_RTZ: u32 = 0x3;

    /// Reads the MXCSR control and status register.
    #[inline(always)]
    pub fn get_csr() -> u32 {
        let mut csr: u32 = 0;
        // stmxcsr takes a memory operand.
        unsafe {
            asm!(
                "stmxcsr [{addr}]",
                addr = in(reg) &mut csr as *mut u32,
                options(nostack, preserves_flags)
            );
        }
        csr
    }

    /// Writes the MXCSR control and status register.
    #[inline(always)]
    pub fn set_csr(csr: u32) {
        unsafe {
            asm!(
                "ldmxcsr [{addr}]",
                addr = in(reg) &csr as *const u32,
                options(nostack, preserves_flags, readonly)
            );
        }
    }

    /// Clears all accrued exception flags.
    #[inline(always)]
    pub fn clear_exceptions() {
        set_csr(get_csr() & !EXCEPT_MASK);
    }

    /// Returns the accrued exception flags.
    #[inline(always)]
    pub fn exceptions() -> Except {
        Except::from_bits_truncate(get_csr() & EXCEPT_MASK)
    }

    /// Sets the rounding direction to truncation and clears the exception
    /// flags. Returns the prior direction code.
    #[inline(always)]
    pub fn prepare_rto() -> u32 {
        let csr = get_csr();
        let old_mode = (csr & RC_MASK) >> RC_SHIFT;
        set_csr((csr & !(RC_MASK | EXCEPT_MASK)) | (RC_RTZ << RC_SHIFT));
        old_mode
    }

    /// Snapshots the exception flags raised since `prepare_rto`, clears
    /// them, and restores the saved rounding direction.
    #[inline(always)]
    pub fn rto_status(old_mode: u32) -> Except {
        let csr = get_csr();
        let flags = Except::from_bits_truncate(csr & EXCEPT_MASK);
        set_csr((csr & !(RC_MASK | EXCEPT_MASK)) | ((old_mode & 0x3) << RC_SHIFT));
        flags
    }
}

#[cfg(target_arch = "aarch64")]
mod imp {
    use bitflags::bitflags;
    use core::arch::asm;

    bitflags! {
        /// Exception flags in the FPSR (bits 0-4).
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct Except: u32 {
            const INVALID = 0x01;
            const DIVZERO = 0x02;
            const OVERFLOW = 0x04;
            const UNDERFLOW = 0x08;
            const INEXACT = 0x10;
        }
    }

    const EXCEPT_MASK: u64 = 0x1f;
    /// RMode field, FPCR bits 22-23.
    const RMODE_MASK: u64 = 0x3 << RMODE_SHIFT;
    const RMODE_SHIFT: u64 = 22;
    /// RMode code for truncation (round toward zero).
    const RMODE_RTZ: u64 = 0x3;

    /// Reads the floating-point control register.
    #[inline(always)]
    pub fn get_csr() -> u64 {
        let fpcr: u64;
        unsafe {
            asm!("mrs {}, fpcr", out(reg) fpcr, options(nomem, nostack, preserves_flags));
        }
        fpcr
    }

    /// Writes the floating-point control register.
    #[inline(always)]
    pub fn set_csr(fpcr: u64) {
        unsafe {
            asm!("msr fpcr, {}", in(reg) fpcr, options(nomem, nostack, preserves_flags));
        }
    }

    #[inline(always)]
    fn get_fpsr() -> u64 {
        let fpsr: u64;
        unsafe {
            asm!("mrs {}, fpsr", out(reg) fpsr, options(nomem, nostack, preserves_flags));
        }
        fpsr
    }

    #[inline(always)]
    fn set_fpsr(fpsr: u64) {
        unsafe {
            asm!("msr fpsr, {}", in(reg) fpsr, options(nomem, nostack, preserves_flags));
        }
    }

    /// Clears all accrued exception flags.
    #[inline(always)]
    pub fn clear_exceptions() {
        set_fpsr(0);
    }

    /// Returns the accrued exception flags.
    #[inline(always)]
    pub fn exceptions() -> Except {
        Except::from_bits_truncate((get_fpsr() & EXCEPT_MASK) as u32)
    }

    /// Sets the rounding direction to truncation and clears the exception
    /// flags. Returns the prior direction code.
    #[inline(always)]
    pub fn prepare_rto() -> u32 {
        let fpcr = get_csr();
        let old_mode = ((fpcr & RMODE_MASK) >> RMODE_SHIFT) as u32;
        set_csr((fpcr & !RMODE_MASK) | (RMODE_RTZ << RMODE_SHIFT));
        set_fpsr(0);
        old_mode
    }

    /// Snapshots the exception flags raised since `prepare_rto`, clears
    /// them, and restores the saved rounding direction.
    #[inline(always)]
    pub fn rto_status(old_mode: u32) -> Except {
        let flags = exceptions();
        set_fpsr(0);
        let fpcr = get_csr();
        set_csr((fpcr & !RMODE_MASK) | (((old_mode as u64) & 0x3) << RMODE_SHIFT));
        flags
    }
}

#[cfg(not(any(
    target_arch = "x86_64",
    all(target_arch = "x86", target_feature = "sse"),
    target_arch = "aarch64"
)))]
mod imp {
    //! Portable fallback through the C library's floating-point
    //! environment.

    use bitflags::bitflags;
    use core::ffi::c_int;

    extern "C" {
        fn fegetround() -> c_int;
        fn fesetround(round: c_int) -> c_int;
        fn feclearexcept(excepts: c_int) -> c_int;
        fn fetestexcept(excepts: c_int) -> c_int;
    }

    // fenv.h layout constants. These are not specified by C; the values
    // below cover RISC-V explicitly and default to the layout shared by
    // most other C library ports. Audit before enabling a new target.
    #[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
    mod fe {
        pub const INEXACT: i32 = 0x01;
        pub const UNDERFLOW: i32 = 0x02;
        pub const OVERFLOW: i32 = 0x04;
        pub const DIVZERO: i32 = 0x08;
        pub const INVALID: i32 = 0x10;
        pub const ALL_EXCEPT: i32 = 0x1f;
        pub const TOWARDZERO: i32 = 0x1;
    }

    #[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
    mod fe {
        pub const INVALID: i32 = 0x01;
        pub const DIVZERO: i32 = 0x04;
        pub const OVERFLOW: i32 = 0x08;
        pub const UNDERFLOW: i32 = 0x10;
        pub const INEXACT: i32 = 0x20;
        pub const ALL_EXCEPT: i32 = 0x3f;
        pub const TOWARDZERO: i32 = 0xc00;
    }

    bitflags! {
        /// Exception flags, reusing the C library's own bit values.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct Except: u32 {
            const INVALID = fe::INVALID as u32;
            const DIVZERO = fe::DIVZERO as u32;
            const OVERFLOW = fe::OVERFLOW as u32;
            const UNDERFLOW = fe::UNDERFLOW as u32;
            const INEXACT = fe::INEXACT as u32;
        }
    }

    /// Reads the rounding direction (the only portable control state).
    #[inline(always)]
    pub fn get_csr() -> u32 {
        unsafe { fegetround() as u32 }
    }

    /// Writes the rounding direction.
    #[inline(always)]
    pub fn set_csr(round: u32) {
        unsafe {
            fesetround(round as c_int);
        }
    }

    /// Clears all accrued exception flags.
    #[inline(always)]
    pub fn clear_exceptions() {
        unsafe {
            feclearexcept(fe::ALL_EXCEPT);
        }
    }

    /// Returns the accrued exception flags.
    #[inline(always)]
    pub fn exceptions() -> Except {
        Except::from_bits_truncate(unsafe { fetestexcept(fe::ALL_EXCEPT) } as u32)
    }

    /// Sets the rounding direction to truncation and clears the exception
    /// flags. Returns the prior direction.
    #[inline(always)]
    pub fn prepare_rto() -> u32 {
        let old_mode = unsafe { fegetround() };
        unsafe {
            fesetround(fe::TOWARDZERO);
            feclearexcept(fe::ALL_EXCEPT);
        }
        old_mode as u32
    }

    /// Snapshots the exception flags raised since `prepare_rto`, clears
    /// them, and restores the saved rounding direction.
    #[inline(always)]
    pub fn rto_status(old_mode: u32) -> Except {
        let flags = exceptions();
        unsafe {
            feclearexcept(fe::ALL_EXCEPT);
            fesetround(old_mode as c_int);
        }
        flags
    }
}

pub use imp::{clear_exceptions, exceptions, get_csr, prepare_rto, rto_status, set_csr, Except};
