// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2022 Andre Richter <andre.o.richter@gmail.com>

//! Timer compare table.
//!
//! The CLINT holds one 64-bit `mtimecmp` per hart. The bus only takes 32-bit stores there, so a
//! deadline goes out as two words, low first. Between the two stores the slot holds the new low
//! word next to the previous high word. If that mix is already below `mtime` the timer fires
//! once, early. Callers are expected to tolerate the extra interrupt.

use crate::{board::HART_COUNT, cpu::HartId, drivers::common::MMIODerefWrapper};
use tock_registers::{
    interfaces::{Readable, Writeable},
    register_structs,
    registers::ReadWrite,
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_structs! {
    #[allow(non_snake_case)]
    TimerCompareSlot {
        (0x00 => LO: ReadWrite<u32>),
        (0x04 => HI: ReadWrite<u32>),
        (0x08 => @END),
    }
}

type Registers = MMIODerefWrapper<[TimerCompareSlot; HART_COUNT]>;

impl TimerCompareSlot {
    fn write_low(&self, deadline: u64) {
        self.LO.set(deadline as u32);
    }

    fn write_high(&self, deadline: u64) {
        self.HI.set((deadline >> 32) as u32);
    }

    fn deadline(&self) -> u64 {
        (u64::from(self.HI.get()) << 32) | u64::from(self.LO.get())
    }
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// The per-hart deadline slots.
pub struct TimerCompareTable {
    registers: Registers,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl TimerCompareTable {
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

    /// Where the table lives.
    pub const fn start_addr(&self) -> usize {
        self.registers.start_addr()
    }

    /// Program the next deadline of `hart`. Only that hart's slot is written.
    pub fn arm(&self, hart: HartId, next_event: u64) {
        let slot = &self.registers[hart.get()];

        slot.write_low(next_event);
        slot.write_high(next_event);
    }

    /// The deadline currently held by the slot of `hart`.
    pub fn deadline(&self, hart: HartId) -> u64 {
        self.registers[hart.get()].deadline()
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
