// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2022 Andre Richter <andre.o.richter@gmail.com>

//! CLINT Driver - Core-Local Interruptor, software interrupt part.
//!
//! Each hart owns one MSIP word. Writing 1 raises its machine software interrupt, writing 0
//! clears it. The store itself is the atomic unit, so any hart may set or clear any word without
//! further locking.

use super::common::MMIODerefWrapper;
use crate::{board::HART_COUNT, cpu::HartId, driver};
use spin::Once;
use tock_registers::{
    interfaces::Writeable, register_bitfields, register_structs, registers::ReadWrite,
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_bitfields! {
    u32,

    /// Machine Software Interrupt Pending
    MSIP [
        PENDING OFFSET(0) NUMBITS(1) []
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    RegisterBlock {
        (0x00 => MSIP: [ReadWrite<u32, MSIP::Register>; HART_COUNT]),
        (0x10 => @END),
    }
}

/// Abstraction for the associated MMIO registers.
type Registers = MMIODerefWrapper<RegisterBlock>;

struct ClintInner {
    registers: Registers,
    hart_count: usize,
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Representation of the CLINT.
pub struct Clint {
    inner: Once<ClintInner>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl Clint {
    pub const COMPATIBLE: &'static str = "T-Head CLINT";

    /// Create an unregistered instance. Nothing is delivered before `cold_init`.
    pub const fn new() -> Self {
        Self { inner: Once::new() }
    }

    fn target(&self, target_hart: usize) -> Option<&ReadWrite<u32, MSIP::Register>> {
        let inner = self.inner.get()?;

        if target_hart >= inner.hart_count {
            return None;
        }

        Some(&inner.registers.MSIP[target_hart])
    }
}

impl Default for Clint {
    fn default() -> Self {
        Self::new()
    }
}

//------------------------------------------------------------------------------
// OS Interface Code
//------------------------------------------------------------------------------

impl driver::interface::DeviceDriver for Clint {
    fn compatible(&self) -> &'static str {
        Self::COMPATIBLE
    }
}

impl driver::interface::IpiDevice for Clint {
    unsafe fn cold_init(
        &self,
        mmio_start_addr: usize,
        hart_count: usize,
    ) -> Result<(), &'static str> {
        if hart_count == 0 || hart_count > HART_COUNT {
            return Err("CLINT hart count outside of the board range");
        }

        let mut fresh = false;
        self.inner.call_once(|| {
            fresh = true;
            ClintInner {
                registers: Registers::new(mmio_start_addr),
                hart_count,
            }
        });

        if !fresh {
            return Err("CLINT already registered");
        }

        Ok(())
    }

    fn warm_init(&self, hart: HartId) -> Result<(), &'static str> {
        if self.inner.get().is_none() {
            return Err("CLINT used before cold init");
        }

        // Drop whatever was pending from before this hart came up.
        self.clear(hart.get());

        Ok(())
    }

    fn send(&self, target_hart: usize) {
        if let Some(msip) = self.target(target_hart) {
            msip.write(MSIP::PENDING::SET);
        }
    }

    fn clear(&self, target_hart: usize) {
        if let Some(msip) = self.target(target_hart) {
            msip.write(MSIP::PENDING::CLEAR);
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{driver::interface::IpiDevice, test_support::DeviceWindow};

    #[test]
    fn send_and_clear_touch_only_the_target_word() {
        let window = DeviceWindow::with_size(0x100);
        let clint = Clint::new();
        unsafe { clint.cold_init(window.base(), HART_COUNT) }.unwrap();

        clint.send(2);
        assert_eq!(window.nonzero(), vec![(8, 1)]);

        clint.clear(2);
        assert!(window.nonzero().is_empty());
    }

    #[test]
    fn out_of_range_targets_are_ignored() {
        let window = DeviceWindow::with_size(0x100);
        let clint = Clint::new();
        unsafe { clint.cold_init(window.base(), 2) }.unwrap();

        clint.send(2);
        clint.send(HART_COUNT);
        clint.send(usize::MAX);

        assert!(window.nonzero().is_empty());
    }

    #[test]
    fn registration_happens_once() {
        let window = DeviceWindow::with_size(0x100);
        let clint = Clint::new();

        assert!(clint.warm_init(HartId::new(0)).is_err());
        assert!(unsafe { clint.cold_init(window.base(), 0) }.is_err());
        assert!(unsafe { clint.cold_init(window.base(), HART_COUNT) }.is_ok());
        assert!(unsafe { clint.cold_init(window.base(), HART_COUNT) }.is_err());
        assert!(clint.warm_init(HartId::new(3)).is_ok());
    }

    #[test]
    fn warm_init_clears_stale_pending_bit() {
        let window = DeviceWindow::with_size(0x100);
        let clint = Clint::new();
        unsafe { clint.cold_init(window.base(), HART_COUNT) }.unwrap();

        window.write(4, 1);
        clint.warm_init(HartId::new(1)).unwrap();

        assert_eq!(window.read(4), 0);
    }
}
