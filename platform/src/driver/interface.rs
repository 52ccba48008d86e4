use crate::cpu::HartId;

/// Device Driver functions.
pub trait DeviceDriver {
    /// Return a compatibility string for identifying the driver.
    fn compatible(&self) -> &'static str;
}

/// Inter-processor interrupt delivery.
///
/// The platform registers the device exactly once on the cold boot path and then runs the warm
/// setup on every hart. Send and clear may be called from any hart at any time after that.
pub trait IpiDevice: DeviceDriver {
    /// Fleet-wide registration.
    ///
    /// Only the first call may succeed. Every later call returns an error and leaves the first
    /// registration in place.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide a correct MMIO start address.
    unsafe fn cold_init(&self, mmio_start_addr: usize, hart_count: usize)
        -> Result<(), &'static str>;

    /// Per-hart setup, run by `hart` itself.
    fn warm_init(&self, hart: HartId) -> Result<(), &'static str>;

    /// Raise the software interrupt pending bit of `target_hart`.
    fn send(&self, target_hart: usize);

    /// Clear the software interrupt pending bit of `target_hart`.
    fn clear(&self, target_hart: usize);
}
