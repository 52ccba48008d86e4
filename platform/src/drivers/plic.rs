// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2022 Andre Richter <andre.o.richter@gmail.com>

//! PLIC Driver - T-Head Platform-Level Interrupt Controller.
//!
//! Only the control register is modelled. Priorities, enables and claim/complete are programmed
//! by the supervisor once the control register hands them over.

use super::common::MMIODerefWrapper;
use crate::driver;
use tock_registers::{
    interfaces::Writeable, register_bitfields, register_structs, registers::ReadWrite,
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_bitfields! {
    u32,

    /// PLIC Control Register
    CTRL [
        /// Supervisor permission. When set, S-mode may program the interrupt enables.
        S_PER OFFSET(0) NUMBITS(1) [
            MachineOnly = 0,
            Supervisor = 1
        ]
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    RegisterBlock {
        (0x000000 => _reserved1),
        (0x1ffffc => CTRL: ReadWrite<u32, CTRL::Register>),
        (0x200000 => @END),
    }
}

/// Abstraction for the associated MMIO registers.
type Registers = MMIODerefWrapper<RegisterBlock>;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Representation of the PLIC.
pub struct Plic {
    registers: Registers,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl Plic {
    pub const COMPATIBLE: &'static str = "T-Head PLIC";

    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide a correct MMIO start address.
    pub const unsafe fn new(mmio_start_addr: usize) -> Self {
        Self {
            registers: Registers::new(mmio_start_addr),
        }
    }

    /// Let S-mode program the interrupt enables.
    ///
    /// A single write with no read-back. Repeating it leaves the same state behind.
    pub fn delegate_to_supervisor(&self) {
        self.registers.CTRL.write(CTRL::S_PER::Supervisor);
    }
}

//------------------------------------------------------------------------------
// OS Interface Code
//------------------------------------------------------------------------------

impl driver::interface::DeviceDriver for Plic {
    fn compatible(&self) -> &'static str {
        Self::COMPATIBLE
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
