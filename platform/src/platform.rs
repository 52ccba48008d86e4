//! The C910 platform hooks.
//!
//! The runtime calls `early_init`, `irqchip_init`, `ipi_init` and `timer_init` in that order on
//! every hart, cold and warm. Every init step returns an error for the runtime to abort the boot
//! on. The vendor call and shutdown come in at any time after that.

use crate::{
    board::{self, HART_COUNT},
    boot::{BaseAddressSet, BootContext},
    cpu::{Hart, HartId},
    debug,
    driver::interface::IpiDevice,
    drivers::Plic,
    info,
    smp::{self, ResetController, UnsupportedCall, VendorCallError, SBI_EXT_BOOT_OTHER_CORE},
    time::TimerCompareTable,
    warn,
};
use spin::Once;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Platform state, shared by all harts.
pub struct C910<H, I> {
    hart: H,
    ipi: I,
    fw_start: fn() -> usize,
    boot: BootContext,
    timer: Once<TimerCompareTable>,
    reset: ResetController,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl<H, I> C910<H, I> {
    /// Create an instance.
    ///
    /// `fw_start` yields the address secondary harts start fetching from.
    pub const fn new(hart: H, ipi: I, fw_start: fn() -> usize) -> Self {
        Self {
            hart,
            ipi,
            fw_start,
            boot: BootContext::new(),
            timer: Once::new(),
            reset: ResetController::new(),
        }
    }

    /// The hart accessor.
    pub fn hart(&self) -> &H {
        &self.hart
    }

    /// The IPI device.
    pub fn ipi(&self) -> &I {
        &self.ipi
    }

    /// The boot state.
    pub fn boot_context(&self) -> &BootContext {
        &self.boot
    }
}

impl<H: Hart, I: IpiDevice> C910<H, I> {
    fn current_hart(&self) -> Result<HartId, &'static str> {
        HartId::try_new(self.hart.hart_id()).ok_or("Hart id outside of the board range")
    }

    fn current_bases(&self) -> Result<&BaseAddressSet, &'static str> {
        self.boot
            .bases(self.current_hart()?)
            .ok_or("Device bases used before early init")
    }

    /// Replicate boot CSR state and record the device bases.
    pub fn early_init(&self, cold_boot: bool) -> Result<(), &'static str> {
        self.boot.early_init(&self.hart, cold_boot)?;

        debug!(
            "Hart {} early init done ({} boot)",
            self.hart.hart_id(),
            if cold_boot { "cold" } else { "warm" }
        );

        Ok(())
    }

    /// Last platform step before the runtime hands over to the next stage.
    pub fn final_init(&self, cold_boot: bool) -> Result<(), &'static str> {
        if cold_boot {
            info!("{}", board::version_string());
            info!("Booting on: {}", board::board_name());
        }

        Ok(())
    }

    /// Hand the PLIC enables over to S-mode.
    pub fn irqchip_init(&self, _cold_boot: bool) -> Result<(), &'static str> {
        let bases = self.current_bases()?;
        let plic = unsafe { Plic::new(bases.interrupt_base) };

        plic.delegate_to_supervisor();

        Ok(())
    }

    /// Register the IPI device on the cold boot path, then set up the calling hart.
    ///
    /// The device rejects a second registration.
    pub fn ipi_init(&self, cold_boot: bool) -> Result<(), &'static str> {
        let hart = self.current_hart()?;

        if cold_boot {
            let bases = self.current_bases()?;

            unsafe { self.ipi.cold_init(bases.timer_base, HART_COUNT)? };
            debug!("{} registered at {:#x}", self.ipi.compatible(), bases.timer_base);
        }

        self.ipi.warm_init(hart)
    }

    /// Raise the software interrupt of `target_hart`.
    pub fn ipi_send(&self, target_hart: usize) {
        self.ipi.send(target_hart);
    }

    /// Clear the software interrupt of `target_hart`.
    pub fn ipi_clear(&self, target_hart: usize) {
        self.ipi.clear(target_hart);
    }

    /// Locate the timer compare table.
    pub fn timer_init(&self, _cold_boot: bool) -> Result<(), &'static str> {
        let start = self.current_bases()?.timer_base + board::map::CLINT_MTIMECMP_OFFSET;
        let table = self
            .timer
            .call_once(|| unsafe { TimerCompareTable::new(start) });

        if table.start_addr() != start {
            return Err("Timer compare table differs between harts");
        }

        Ok(())
    }

    /// Arm the calling hart's next timer interrupt.
    ///
    /// Harts outside the board range and calls before `timer_init` are ignored without a trace.
    pub fn timer_event_start(&self, next_event: u64) {
        let Some(hart) = HartId::try_new(self.hart.hart_id()) else {
            return;
        };
        let Some(table) = self.timer.get() else {
            return;
        };

        table.arm(hart, next_event);
    }

    /// Halt. Reset and power-off are not distinguished.
    pub fn system_shutdown(&self, _kind: u32) -> ! {
        self.hart.halt()
    }

    /// Dispatch a vendor SBI call.
    ///
    /// An unknown extension is an integration bug: it is reported and the hart halts without
    /// touching anything else. The function id is not used by any supported extension.
    pub fn vendor_ext_provider(
        &self,
        extid: usize,
        _funcid: usize,
        args: &[usize],
    ) -> Result<(), VendorCallError> {
        match extid {
            SBI_EXT_BOOT_OTHER_CORE => {
                let target = smp::target_hart(args)?;

                self.reset
                    .boot_other_core(&self.hart, target, (self.fw_start)());

                Ok(())
            }
            _ => {
                warn!("{}", UnsupportedCall(extid));
                self.hart.halt()
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
