//! Board generic stuff

use sbi_platform_types::{
    platform_name, version, PlatformFeatures, PlatformOperations, SbiPlatform,
};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Number of harts on the SoC.
pub const HART_COUNT: usize = 4;

/// Stack the runtime reserves for each hart.
pub const HART_STACK_SIZE: usize = 8192;

/// All harts are enabled.
pub const DISABLED_HART_MASK: u64 = 0;

/// `major.minor` of this platform.
pub const PLATFORM_VERSION: (u16, u16) = (0, 1);

/// `major.minor` of the runtime this platform is built against.
pub const RUNTIME_VERSION: (u16, u16) = (0, 5);

/// Physical layout, relative to the PLIC base reported by `Hart::plic_base`.
pub mod map {
    /// PLIC control register; bit 0 hands enable programming to S-mode.
    pub const PLIC_CTRL_OFFSET: usize = 0x001f_fffc;

    /// The CLINT sits at a fixed distance above the PLIC.
    pub const CLINT_OFFSET: usize = 0x0400_0000;

    /// `mtimecmp` table inside the CLINT.
    pub const CLINT_MTIMECMP_OFFSET: usize = 0x4000;
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Board identification.
pub const fn board_name() -> &'static str {
    "Thead C910"
}

/// Version string.
pub fn version_string() -> &'static str {
    concat!(
        env!("CARGO_PKG_NAME"),
        " version ",
        env!("CARGO_PKG_VERSION")
    )
}

/// Build the descriptor the runtime reads.
pub const fn descriptor(ops: &'static PlatformOperations) -> SbiPlatform {
    SbiPlatform {
        opensbi_version: version(RUNTIME_VERSION.0, RUNTIME_VERSION.1),
        platform_version: version(PLATFORM_VERSION.0, PLATFORM_VERSION.1),
        name: platform_name(board_name()),
        features: PlatformFeatures::DEFAULT.bits(),
        hart_count: HART_COUNT as u32,
        hart_stack_size: HART_STACK_SIZE as u32,
        disabled_hart_mask: DISABLED_HART_MASK,
        platform_ops_addr: ops,
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn ok(_cold_boot: bool) -> i32 {
        0
    }

    static OPS: PlatformOperations = PlatformOperations {
        early_init: Some(ok),
        ..PlatformOperations::EMPTY
    };

    static DESCRIPTOR: SbiPlatform = descriptor(&OPS);

    #[test]
    fn descriptor_carries_board_values() {
        assert_eq!(DESCRIPTOR.name(), b"Thead C910");
        assert_eq!(DESCRIPTOR.platform_version, 0x0000_0001);
        assert_eq!(DESCRIPTOR.opensbi_version, 0x0000_0005);
        assert_eq!(DESCRIPTOR.hart_count, 4);
        assert_eq!(DESCRIPTOR.hart_stack_size, 8192);
        assert_eq!(DESCRIPTOR.disabled_hart_mask, 0);
        assert_eq!(DESCRIPTOR.features, PlatformFeatures::DEFAULT.bits());
        assert!((0..4).all(|hart| !DESCRIPTOR.hart_disabled(hart)));
    }

    #[test]
    fn descriptor_points_at_operation_table() {
        let ops = DESCRIPTOR.operations().unwrap();

        assert!(core::ptr::eq(ops, &OPS));
        assert_eq!(ops.early_init.map(|f| f(true)), Some(0));
        assert!(ops.timer_value.is_none());
    }
}
