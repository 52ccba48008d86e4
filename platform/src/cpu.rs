// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2022 Andre Richter <andre.o.richter@gmail.com>

//! Processor code.

#[cfg(all(target_arch = "riscv64", target_os = "none"))]
#[path = "riscv64/cpu.rs"]
mod arch_cpu;

use crate::{board, drivers::common::BoundedUsize};

//--------------------------------------------------------------------------------------------------
// Architectural Public Reexports
//--------------------------------------------------------------------------------------------------
#[cfg(all(target_arch = "riscv64", target_os = "none"))]
pub use arch_cpu::{wait_forever, MachineHart};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// A hart number that is known to be addressable on this board.
pub type HartId = BoundedUsize<{ board::HART_COUNT - 1 }>;

/// The read-write control and status registers this platform touches.
///
/// The discriminant is the CSR number used as the instruction immediate.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u16)]
pub enum Csr {
    Pmpcfg0 = 0x3a0,
    Pmpaddr0 = 0x3b0,
    Pmpaddr1 = 0x3b1,
    Pmpaddr2 = 0x3b2,
    Pmpaddr3 = 0x3b3,
    Pmpaddr4 = 0x3b4,
    Pmpaddr5 = 0x3b5,
    Pmpaddr6 = 0x3b6,
    Pmpaddr7 = 0x3b7,

    /// Extended status.
    Mxstatus = 0x7c0,
    /// Hardware configuration (caches, branch prediction).
    Mhcr = 0x7c1,
    /// Cache operations.
    Mcor = 0x7c2,
    /// L2 cache control.
    Mccr2 = 0x7c3,
    /// Implicit operation control (prefetch, memory ordering).
    Mhint = 0x7c5,
    /// Reset mask. Setting bit N releases hart N from reset.
    Mrmr = 0x7c6,
    /// Reset vector base shared by the harts released through `Mrmr`.
    Mrvbr = 0x7c7,
}

impl Csr {
    /// The CSR number.
    pub const fn number(self) -> u16 {
        self as u16
    }
}

/// The hart that is currently executing platform code.
///
/// Implementations access the registers of the calling hart only; nothing here addresses another
/// hart's CSRs.
pub trait Hart {
    /// Read a CSR of the current hart.
    fn csr_read(&self, csr: Csr) -> usize;

    /// Write a CSR of the current hart.
    fn csr_write(&self, csr: Csr, value: usize);

    /// Physical base of the PLIC, from the read-only vendor CSR `0xfc1`.
    fn plic_base(&self) -> usize;

    /// The raw `mhartid` of the current hart. Not necessarily in range.
    fn hart_id(&self) -> usize;

    /// Stop the current hart through a breakpoint trap. Never returns.
    fn halt(&self) -> !;
}
