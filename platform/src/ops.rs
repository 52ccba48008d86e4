//! The symbols the runtime links against.
//!
//! One global [`C910`] drives the real hart and the CLINT. Results are turned into runtime status
//! codes here and nowhere else.

use crate::{
    board, console,
    cpu::MachineHart,
    drivers::Clint,
    platform::C910,
    warn,
};
use sbi_platform_types::{
    PlatformOperations, SbiPlatform, SBI_ERR_FAILED, SBI_ERR_INVALID_PARAM, SBI_SUCCESS,
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

/// Argument registers `a0..a5` saved by the runtime's ecall handler.
const VENDOR_CALL_ARGS: usize = 6;

extern "C" {
    // Start of the firmware image, provided by the runtime's linker script.
    static _fw_start: u8;
}

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

static C910_PLATFORM: C910<MachineHart, Clint> = C910::new(MachineHart, Clint::new(), fw_text_start);

#[no_mangle]
#[allow(non_upper_case_globals)]
pub static platform_ops: PlatformOperations = PlatformOperations {
    early_init: Some(early_init),
    final_init: Some(final_init),
    irqchip_init: Some(irqchip_init),
    ipi_init: Some(ipi_init),
    ipi_send: Some(ipi_send),
    ipi_clear: Some(ipi_clear),
    timer_init: Some(timer_init),
    timer_event_start: Some(timer_event_start),
    system_shutdown: Some(system_shutdown),
    vendor_ext_provider: Some(vendor_ext_provider),
    ..PlatformOperations::EMPTY
};

#[no_mangle]
#[allow(non_upper_case_globals)]
pub static platform: SbiPlatform = board::descriptor(&platform_ops);

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

fn fw_text_start() -> usize {
    unsafe { core::ptr::addr_of!(_fw_start) as usize }
}

fn status(hook: &str, result: Result<(), &'static str>) -> i32 {
    match result {
        Ok(()) => SBI_SUCCESS,
        Err(x) => {
            warn!("{} failed: {}", hook, x);
            SBI_ERR_FAILED
        }
    }
}

extern "C" fn early_init(cold_boot: bool) -> i32 {
    status("early_init", C910_PLATFORM.early_init(cold_boot))
}

extern "C" fn final_init(cold_boot: bool) -> i32 {
    // The runtime console is up by now.
    if cold_boot {
        console::register_console(&console::sbi::SBI_CONSOLE);
    }

    status("final_init", C910_PLATFORM.final_init(cold_boot))
}

extern "C" fn irqchip_init(cold_boot: bool) -> i32 {
    status("irqchip_init", C910_PLATFORM.irqchip_init(cold_boot))
}

extern "C" fn ipi_init(cold_boot: bool) -> i32 {
    status("ipi_init", C910_PLATFORM.ipi_init(cold_boot))
}

extern "C" fn ipi_send(target_hart: u32) {
    C910_PLATFORM.ipi_send(target_hart as usize)
}

extern "C" fn ipi_clear(target_hart: u32) {
    C910_PLATFORM.ipi_clear(target_hart as usize)
}

extern "C" fn timer_init(cold_boot: bool) -> i32 {
    status("timer_init", C910_PLATFORM.timer_init(cold_boot))
}

extern "C" fn timer_event_start(next_event: u64) {
    C910_PLATFORM.timer_event_start(next_event)
}

extern "C" fn system_shutdown(kind: u32) -> i32 {
    C910_PLATFORM.system_shutdown(kind)
}

extern "C" fn vendor_ext_provider(
    extid: isize,
    funcid: isize,
    args: *const usize,
    _out_value: *mut usize,
    _out_trap_cause: *mut usize,
    _out_trap_val: *mut usize,
) -> i32 {
    let args: &[usize] = if args.is_null() {
        &[]
    } else {
        unsafe { core::slice::from_raw_parts(args, VENDOR_CALL_ARGS) }
    };

    match C910_PLATFORM.vendor_ext_provider(extid as usize, funcid as usize, args) {
        Ok(()) => SBI_SUCCESS,
        Err(e) => {
            warn!("Vendor call {:#x} refused: {}", extid, e);
            SBI_ERR_INVALID_PARAM
        }
    }
}
