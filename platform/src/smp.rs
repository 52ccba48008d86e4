//! Secondary hart start through the vendor SBI extension.
//!
//! Harts other than the cold boot hart sit in reset until their bit in `Csr::Mrmr` is set. They
//! then fetch from the address in `Csr::Mrvbr`, which is always the firmware entry, so they run
//! the regular warm boot path.

use crate::{
    cpu::{Csr, Hart, HartId},
    debug,
};
use core::fmt;
use spin::mutex::SpinMutex;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Vendor extension id of the "boot other core" call. `a0` holds the target hart.
pub const SBI_EXT_BOOT_OTHER_CORE: usize = 0x0900_0003;

/// Why a recognised vendor call was refused.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VendorCallError {
    /// The call needs more argument registers than were passed.
    MissingArgument,
    /// `a0` does not name a hart of this board.
    HartOutOfRange(usize),
}

/// Diagnostic for a vendor extension id this platform does not implement.
///
/// The id is shown as the signed value the caller passed in `a7`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UnsupportedCall(pub usize);

/// Owner of the reset vector and reset mask registers.
pub struct ResetController {
    /// Serialises the read-modify-write of the reset mask between harts.
    lock: SpinMutex<()>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl fmt::Display for VendorCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument => write!(f, "missing argument"),
            Self::HartOutOfRange(hart) => write!(f, "hart {} is not on this board", hart),
        }
    }
}

impl fmt::Display for UnsupportedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsupported private SBI call: {}", self.0 as isize)
    }
}

impl ResetController {
    /// Create an instance.
    pub const fn new() -> Self {
        Self {
            lock: SpinMutex::new(()),
        }
    }

    /// Release `target` from reset at `entry`.
    ///
    /// The vector is written before the mask bit, so the target never fetches from a stale
    /// vector. Bits of other harts are preserved.
    pub fn boot_other_core(&self, hart: &impl Hart, target: HartId, entry: usize) {
        let _guard = self.lock.lock();

        hart.csr_write(Csr::Mrvbr, entry);

        let mask = hart.csr_read(Csr::Mrmr);
        hart.csr_write(Csr::Mrmr, mask | (1 << target.get()));

        debug!("Released hart {} at {:#x}", target, entry);
    }
}

impl Default for ResetController {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the target hart out of the argument registers.
pub fn target_hart(args: &[usize]) -> Result<HartId, VendorCallError> {
    let raw = *args.first().ok_or(VendorCallError::MissingArgument)?;

    HartId::try_new(raw).ok_or(VendorCallError::HartOutOfRange(raw))
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
