// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2022 Andre Richter <andre.o.richter@gmail.com>

//! Architectural processor code.
//!
//! # Orientation
//!
//! Since arch modules are imported into generic modules using the path attribute, the path of this
//! file is:
//!
//! crate::cpu::arch_cpu

use super::{Csr, Hart};
use core::arch::asm;

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

// Read-only, so it has no `Csr` variant.
const PLIC_BASE_CSR: u16 = 0xfc1;

macro_rules! csr_read {
    ($csr:expr) => {{
        let value: usize;
        unsafe {
            asm!("csrr {0}, {csr}", out(reg) value, csr = const $csr as u16, options(nomem, nostack));
        }
        value
    }};
}

macro_rules! csr_write {
    ($csr:expr, $value:expr) => {{
        unsafe {
            asm!("csrw {csr}, {0}", in(reg) $value, csr = const $csr as u16, options(nostack));
        }
    }};
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// The hart executing this code, in machine mode.
pub struct MachineHart;

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Pause execution on the core.
#[inline(always)]
pub fn wait_forever() -> ! {
    loop {
        unsafe { asm!("wfi", options(nomem, nostack)) }
    }
}

impl Hart for MachineHart {
    fn csr_read(&self, csr: Csr) -> usize {
        match csr {
            Csr::Pmpcfg0 => csr_read!(Csr::Pmpcfg0),
            Csr::Pmpaddr0 => csr_read!(Csr::Pmpaddr0),
            Csr::Pmpaddr1 => csr_read!(Csr::Pmpaddr1),
            Csr::Pmpaddr2 => csr_read!(Csr::Pmpaddr2),
            Csr::Pmpaddr3 => csr_read!(Csr::Pmpaddr3),
            Csr::Pmpaddr4 => csr_read!(Csr::Pmpaddr4),
            Csr::Pmpaddr5 => csr_read!(Csr::Pmpaddr5),
            Csr::Pmpaddr6 => csr_read!(Csr::Pmpaddr6),
            Csr::Pmpaddr7 => csr_read!(Csr::Pmpaddr7),
            Csr::Mxstatus => csr_read!(Csr::Mxstatus),
            Csr::Mhcr => csr_read!(Csr::Mhcr),
            Csr::Mcor => csr_read!(Csr::Mcor),
            Csr::Mccr2 => csr_read!(Csr::Mccr2),
            Csr::Mhint => csr_read!(Csr::Mhint),
            Csr::Mrmr => csr_read!(Csr::Mrmr),
            Csr::Mrvbr => csr_read!(Csr::Mrvbr),
        }
    }

    fn csr_write(&self, csr: Csr, value: usize) {
        match csr {
            Csr::Pmpcfg0 => csr_write!(Csr::Pmpcfg0, value),
            Csr::Pmpaddr0 => csr_write!(Csr::Pmpaddr0, value),
            Csr::Pmpaddr1 => csr_write!(Csr::Pmpaddr1, value),
            Csr::Pmpaddr2 => csr_write!(Csr::Pmpaddr2, value),
            Csr::Pmpaddr3 => csr_write!(Csr::Pmpaddr3, value),
            Csr::Pmpaddr4 => csr_write!(Csr::Pmpaddr4, value),
            Csr::Pmpaddr5 => csr_write!(Csr::Pmpaddr5, value),
            Csr::Pmpaddr6 => csr_write!(Csr::Pmpaddr6, value),
            Csr::Pmpaddr7 => csr_write!(Csr::Pmpaddr7, value),
            Csr::Mxstatus => csr_write!(Csr::Mxstatus, value),
            Csr::Mhcr => csr_write!(Csr::Mhcr, value),
            Csr::Mcor => csr_write!(Csr::Mcor, value),
            Csr::Mccr2 => csr_write!(Csr::Mccr2, value),
            Csr::Mhint => csr_write!(Csr::Mhint, value),
            Csr::Mrmr => csr_write!(Csr::Mrmr, value),
            Csr::Mrvbr => csr_write!(Csr::Mrvbr, value),
        }
    }

    fn plic_base(&self) -> usize {
        csr_read!(PLIC_BASE_CSR)
    }

    fn hart_id(&self) -> usize {
        riscv::register::mhartid::read()
    }

    fn halt(&self) -> ! {
        unsafe { asm!("ebreak", options(nomem, nostack)) }

        wait_forever()
    }
}
