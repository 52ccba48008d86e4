// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2021-2022 Andre Richter <andre.o.richter@gmail.com>

//! Boot-time CPU state.
//!
//! The cold boot hart comes out of reset with PMP and the vendor cache/ordering CSRs already set
//! up by the boot ROM. The other harts do not, so the cold boot hart records them once and every
//! warm boot hart copies them in before doing anything else.

use crate::{
    board::{self, HART_COUNT},
    cpu::{Csr, Hart, HartId},
};
use spin::Once;

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

/// Region protection: `pmpaddr0..=7`, then `pmpcfg0`.
const PMP_CSRS: [Csr; 9] = [
    Csr::Pmpaddr0,
    Csr::Pmpaddr1,
    Csr::Pmpaddr2,
    Csr::Pmpaddr3,
    Csr::Pmpaddr4,
    Csr::Pmpaddr5,
    Csr::Pmpaddr6,
    Csr::Pmpaddr7,
    Csr::Pmpcfg0,
];

/// Vendor configuration. `mxstatus` goes last.
const EXTENDED_CSRS: [Csr; 5] = [Csr::Mcor, Csr::Mhcr, Csr::Mccr2, Csr::Mhint, Csr::Mxstatus];

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// CSR values taken from the cold boot hart.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CsrSnapshot {
    pmp: [usize; PMP_CSRS.len()],
    extended: [usize; EXTENDED_CSRS.len()],
}

/// Device bases as seen by one hart.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BaseAddressSet {
    /// PLIC base, straight from the hart.
    pub interrupt_base: usize,
    /// CLINT base, derived from the PLIC base.
    pub timer_base: usize,
}

/// State that outlives a single boot step.
///
/// The snapshot is written once and then only read. Publication goes through `Once`, so a hart
/// that observes the snapshot also observes all of its values.
pub struct BootContext {
    snapshot: Once<CsrSnapshot>,
    bases: [Once<BaseAddressSet>; HART_COUNT],
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl CsrSnapshot {
    /// Read every snapshot CSR of the current hart.
    pub fn capture(hart: &impl Hart) -> Self {
        Self {
            pmp: PMP_CSRS.map(|csr| hart.csr_read(csr)),
            extended: EXTENDED_CSRS.map(|csr| hart.csr_read(csr)),
        }
    }

    /// Write every snapshot CSR of the current hart, in capture order.
    pub fn apply(&self, hart: &impl Hart) {
        for (csr, value) in self.iter() {
            hart.csr_write(csr, value);
        }
    }

    /// `(register, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (Csr, usize)> + '_ {
        PMP_CSRS
            .iter()
            .copied()
            .zip(self.pmp.iter().copied())
            .chain(EXTENDED_CSRS.iter().copied().zip(self.extended.iter().copied()))
    }

    /// The captured value of `csr`, if it is part of the snapshot.
    pub fn get(&self, csr: Csr) -> Option<usize> {
        self.iter().find(|(c, _)| *c == csr).map(|(_, value)| value)
    }
}

impl BaseAddressSet {
    /// Read the PLIC base of the current hart and derive the rest.
    pub fn discover(hart: &impl Hart) -> Self {
        let interrupt_base = hart.plic_base();

        Self {
            interrupt_base,
            timer_base: interrupt_base + board::map::CLINT_OFFSET,
        }
    }
}

impl BootContext {
    /// Create an instance.
    pub const fn new() -> Self {
        Self {
            snapshot: Once::new(),
            bases: [const { Once::new() }; HART_COUNT],
        }
    }

    /// First platform step on every hart.
    ///
    /// Cold boot captures the snapshot, warm boot applies it. Both then record the device bases
    /// for the calling hart. The runtime must not start any warm boot before the cold boot call
    /// has returned.
    pub fn early_init(&self, hart: &impl Hart, cold_boot: bool) -> Result<(), &'static str> {
        let id = HartId::try_new(hart.hart_id()).ok_or("Hart id outside of the board range")?;

        if cold_boot {
            let mut captured = false;
            self.snapshot.call_once(|| {
                captured = true;
                CsrSnapshot::capture(hart)
            });

            if !captured {
                return Err("CSR snapshot already captured");
            }
        } else {
            self.snapshot
                .get()
                .ok_or("Warm boot before the CSR snapshot was captured")?
                .apply(hart);
        }

        let bases = BaseAddressSet::discover(hart);
        if *self.bases[id.get()].call_once(|| bases) != bases {
            return Err("PLIC base differs from the one seen on the previous boot");
        }

        Ok(())
    }

    /// The snapshot, once captured.
    pub fn snapshot(&self) -> Option<&CsrSnapshot> {
        self.snapshot.get()
    }

    /// The bases recorded by `hart` during its early init.
    pub fn bases(&self, hart: HartId) -> Option<&BaseAddressSet> {
        self.bases[hart.get()].get()
    }
}

impl Default for BootContext {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
