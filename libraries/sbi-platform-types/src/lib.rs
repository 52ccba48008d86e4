// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2022 Andre Richter <andre.o.richter@gmail.com>

//! Types shared between a platform and the generic firmware runtime that loads it.
//!
//! The layout of [`SbiPlatform`] and [`PlatformOperations`] is the C ABI the runtime reads, so
//! both are `#[repr(C)]` and must not be reordered.

#![cfg_attr(not(test), no_std)]

use bitflags::bitflags;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Completed successfully.
pub const SBI_SUCCESS: i32 = 0;
/// Failed.
pub const SBI_ERR_FAILED: i32 = -1;
/// Not supported.
pub const SBI_ERR_NOT_SUPPORTED: i32 = -2;
/// Invalid parameter(s).
pub const SBI_ERR_INVALID_PARAM: i32 = -3;

/// Length of the NUL padded platform name.
pub const PLATFORM_NAME_LEN: usize = 64;

bitflags! {
    /// Optional platform capabilities advertised to the runtime.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct PlatformFeatures: u64 {
        const HAS_TIMER_VALUE = 1 << 0;
        const HAS_HART_HOTPLUG = 1 << 1;
        const HAS_PMP = 1 << 2;
        const HAS_SCOUNTEREN = 1 << 3;
        const HAS_MCOUNTEREN = 1 << 4;
        const HAS_MFAULTS_DELEGATION = 1 << 5;
    }
}

impl PlatformFeatures {
    /// The set every platform gets unless it opts out.
    pub const DEFAULT: Self = Self::HAS_TIMER_VALUE
        .union(Self::HAS_PMP)
        .union(Self::HAS_SCOUNTEREN)
        .union(Self::HAS_MCOUNTEREN)
        .union(Self::HAS_MFAULTS_DELEGATION);
}

/// `int (*)(bool cold_boot)`, the shape of every init hook.
pub type InitFn = extern "C" fn(cold_boot: bool) -> i32;

/// Vendor extension handler: raw `extid`, `funcid`, the argument registers `a0..a5` and the out
/// pointers `out_value`, `out_trap_cause` and `out_trap_val`.
pub type VendorExtProviderFn = extern "C" fn(
    extid: isize,
    funcid: isize,
    args: *const usize,
    out_value: *mut usize,
    out_trap_cause: *mut usize,
    out_trap_val: *mut usize,
) -> i32;

/// Platform hooks called by the runtime, slot for slot as the runtime declares them.
///
/// Every slot is a nullable function pointer. The runtime falls back to its own behaviour for a
/// `None` slot, so a platform only fills in the hooks it implements and takes the rest from
/// [`PlatformOperations::EMPTY`].
#[repr(C)]
pub struct PlatformOperations {
    pub early_init: Option<InitFn>,
    pub final_init: Option<InitFn>,
    pub pmp_region_count: Option<extern "C" fn(hartid: u32) -> u32>,
    pub pmp_region_info: Option<
        extern "C" fn(
            hartid: u32,
            index: u32,
            prot: *mut usize,
            addr: *mut usize,
            log2size: *mut usize,
        ) -> i32,
    >,
    pub console_putc: Option<extern "C" fn(ch: u8)>,
    pub console_getc: Option<extern "C" fn() -> i32>,
    pub console_init: Option<extern "C" fn() -> i32>,
    pub irqchip_init: Option<InitFn>,
    pub ipi_send: Option<extern "C" fn(target_hart: u32)>,
    pub ipi_clear: Option<extern "C" fn(target_hart: u32)>,
    pub ipi_init: Option<InitFn>,
    pub timer_value: Option<extern "C" fn() -> u64>,
    pub timer_event_stop: Option<extern "C" fn()>,
    pub timer_event_start: Option<extern "C" fn(next_event: u64)>,
    pub timer_init: Option<InitFn>,
    pub system_reboot: Option<extern "C" fn(kind: u32) -> i32>,
    pub system_shutdown: Option<extern "C" fn(kind: u32) -> i32>,
    pub vendor_ext_check: Option<extern "C" fn(extid: isize) -> i32>,
    pub vendor_ext_provider: Option<VendorExtProviderFn>,
}

impl PlatformOperations {
    /// A table with no hooks at all.
    pub const EMPTY: Self = Self {
        early_init: None,
        final_init: None,
        pmp_region_count: None,
        pmp_region_info: None,
        console_putc: None,
        console_getc: None,
        console_init: None,
        irqchip_init: None,
        ipi_send: None,
        ipi_clear: None,
        ipi_init: None,
        timer_value: None,
        timer_event_stop: None,
        timer_event_start: None,
        timer_init: None,
        system_reboot: None,
        system_shutdown: None,
        vendor_ext_check: None,
        vendor_ext_provider: None,
    };
}

/// Static platform descriptor.
#[repr(C)]
pub struct SbiPlatform {
    pub opensbi_version: u32,
    pub platform_version: u32,
    pub name: [u8; PLATFORM_NAME_LEN],
    pub features: u64,
    pub hart_count: u32,
    pub hart_stack_size: u32,
    pub disabled_hart_mask: u64,
    pub platform_ops_addr: *const PlatformOperations,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Pack a `major.minor` version the way the runtime compares them.
pub const fn version(major: u16, minor: u16) -> u32 {
    ((major as u32) << 16) | minor as u32
}

/// Copy `name` into a NUL padded buffer. The last byte always stays NUL.
pub const fn platform_name(name: &str) -> [u8; PLATFORM_NAME_LEN] {
    let bytes = name.as_bytes();
    let mut out = [0u8; PLATFORM_NAME_LEN];
    let mut i = 0;

    while i < bytes.len() && i < PLATFORM_NAME_LEN - 1 {
        out[i] = bytes[i];
        i += 1;
    }

    out
}

impl SbiPlatform {
    /// The name up to the first NUL.
    pub fn name(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(PLATFORM_NAME_LEN);

        &self.name[..end]
    }

    /// The operation table the descriptor points at.
    pub fn operations(&self) -> Option<&PlatformOperations> {
        // Descriptors are only ever built from a `&'static PlatformOperations`.
        unsafe { self.platform_ops_addr.as_ref() }
    }

    /// Whether `hart` is listed in the disabled mask.
    pub fn hart_disabled(&self, hart: u32) -> bool {
        hart < u64::BITS && self.disabled_hart_mask & (1u64 << hart) != 0
    }
}

// The runtime only ever reads the descriptor after the link.
unsafe impl Sync for SbiPlatform {}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_features_match_runtime_value() {
        assert_eq!(PlatformFeatures::DEFAULT.bits(), 0x3d);
        assert!(!PlatformFeatures::DEFAULT.contains(PlatformFeatures::HAS_HART_HOTPLUG));
    }

    #[test]
    fn version_packs_major_high() {
        assert_eq!(version(0, 1), 0x0000_0001);
        assert_eq!(version(2, 3), 0x0002_0003);
    }

    #[test]
    fn operation_slots_follow_runtime_order() {
        use core::mem::{offset_of, size_of};

        let slot = |n: usize| n * size_of::<usize>();

        assert_eq!(offset_of!(PlatformOperations, early_init), slot(0));
        assert_eq!(offset_of!(PlatformOperations, final_init), slot(1));
        assert_eq!(offset_of!(PlatformOperations, pmp_region_count), slot(2));
        assert_eq!(offset_of!(PlatformOperations, pmp_region_info), slot(3));
        assert_eq!(offset_of!(PlatformOperations, console_putc), slot(4));
        assert_eq!(offset_of!(PlatformOperations, console_getc), slot(5));
        assert_eq!(offset_of!(PlatformOperations, console_init), slot(6));
        assert_eq!(offset_of!(PlatformOperations, irqchip_init), slot(7));
        assert_eq!(offset_of!(PlatformOperations, ipi_send), slot(8));
        assert_eq!(offset_of!(PlatformOperations, ipi_clear), slot(9));
        assert_eq!(offset_of!(PlatformOperations, ipi_init), slot(10));
        assert_eq!(offset_of!(PlatformOperations, timer_value), slot(11));
        assert_eq!(offset_of!(PlatformOperations, timer_event_stop), slot(12));
        assert_eq!(offset_of!(PlatformOperations, timer_event_start), slot(13));
        assert_eq!(offset_of!(PlatformOperations, timer_init), slot(14));
        assert_eq!(offset_of!(PlatformOperations, system_reboot), slot(15));
        assert_eq!(offset_of!(PlatformOperations, system_shutdown), slot(16));
        assert_eq!(offset_of!(PlatformOperations, vendor_ext_check), slot(17));
        assert_eq!(offset_of!(PlatformOperations, vendor_ext_provider), slot(18));
        assert_eq!(size_of::<PlatformOperations>(), slot(19));
    }

    #[test]
    fn descriptor_fields_have_no_padding() {
        use core::mem::offset_of;

        assert_eq!(offset_of!(SbiPlatform, name), 8);
        assert_eq!(offset_of!(SbiPlatform, features), 72);
        assert_eq!(offset_of!(SbiPlatform, hart_count), 80);
        assert_eq!(offset_of!(SbiPlatform, hart_stack_size), 84);
        assert_eq!(offset_of!(SbiPlatform, disabled_hart_mask), 88);
        assert_eq!(offset_of!(SbiPlatform, platform_ops_addr), 96);
    }

    #[test]
    fn long_names_keep_terminator() {
        let name = platform_name(
            "a name that is deliberately much longer than sixty four bytes, to be cut short",
        );

        assert_eq!(name[PLATFORM_NAME_LEN - 1], 0);
        assert_eq!(name[0], b'a');
    }
}
