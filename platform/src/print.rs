// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2022 Andre Richter <andre.o.richter@gmail.com>

//! Printing.

use crate::console;
use core::fmt;

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    // Nothing sensible to do about a console that fails mid-boot.
    let _ = console::console().write_fmt(args);
}

/// Prints an info, with a newline.
#[macro_export]
macro_rules! info {
    ($string:expr) => ({
        $crate::print::_print(format_args!(concat!("[I] ", $string, "\n")));
    });
    ($format_string:expr, $($arg:tt)*) => ({
        $crate::print::_print(format_args!(concat!("[I] ", $format_string, "\n"), $($arg)*));
    })
}

/// Prints a warning, with a newline.
#[macro_export]
macro_rules! warn {
    ($string:expr) => ({
        $crate::print::_print(format_args!(concat!("[W] ", $string, "\n")));
    });
    ($format_string:expr, $($arg:tt)*) => ({
        $crate::print::_print(format_args!(concat!("[W] ", $format_string, "\n"), $($arg)*));
    })
}

/// Debug print, with a newline. Compiled in with the `debug_prints` feature only.
#[macro_export]
macro_rules! debug {
    ($string:expr) => ({
        if cfg!(feature = "debug_prints") {
            $crate::print::_print(format_args!(concat!("[D] ", $string, "\n")));
        }
    });
    ($format_string:expr, $($arg:tt)*) => ({
        if cfg!(feature = "debug_prints") {
            $crate::print::_print(format_args!(concat!("[D] ", $format_string, "\n"), $($arg)*));
        }
    })
}
