// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2022 Andre Richter <andre.o.richter@gmail.com>

//! A panic handler that halts the hart.

use crate::{cpu, warn};
use core::panic::PanicInfo;

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    let (location, line, column) = match info.location() {
        Some(loc) => (loc.file(), loc.line(), loc.column()),
        _ => ("???", 0, 0),
    };

    warn!(
        "Firmware panic!\n\nPanic location:\n      File '{}', line {}, column {}\n\n{}",
        location,
        line,
        column,
        info.message(),
    );

    cpu::wait_forever()
}
