// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2022 Andre Richter <andre.o.richter@gmail.com>

//! System console.
//!
//! The serial driver belongs to the runtime. Until it is up, output collects in a buffer that is
//! replayed on the first registration.

mod buffer_console {
    // SPDX-License-Identifier: MIT OR Apache-2.0
    //
    // Copyright (c) 2022 Andre Richter <andre.o.richter@gmail.com>

    //! A console that buffers output during the early init phase.

    use super::interface;
    use crate::{console, info};
    use core::fmt;
    use spin::mutex::SpinMutex;

    //--------------------------------------------------------------------------------------------------
    // Private Definitions
    //--------------------------------------------------------------------------------------------------

    const BUF_SIZE: usize = 1024 * 4;

    pub struct BufferConsoleInner {
        buf: [u8; BUF_SIZE],
        write_ptr: usize,
    }

    //--------------------------------------------------------------------------------------------------
    // Public Definitions
    //--------------------------------------------------------------------------------------------------

    pub struct BufferConsole {
        inner: SpinMutex<BufferConsoleInner>,
    }

    //--------------------------------------------------------------------------------------------------
    // Global instances
    //--------------------------------------------------------------------------------------------------

    pub static BUFFER_CONSOLE: BufferConsole = BufferConsole {
        inner: SpinMutex::new(BufferConsoleInner {
            buf: [0; BUF_SIZE],
            write_ptr: 0,
        }),
    };

    //--------------------------------------------------------------------------------------------------
    // Private Code
    //--------------------------------------------------------------------------------------------------

    impl BufferConsoleInner {
        fn write_byte(&mut self, b: u8) {
            if self.write_ptr < BUF_SIZE {
                self.buf[self.write_ptr] = b;
                self.write_ptr += 1;
            }
        }

        fn contents(&self) -> &str {
            let written = &self.buf[..self.write_ptr];

            match core::str::from_utf8(written) {
                Ok(s) => s,
                // A multi-byte character cut off by the end of the buffer.
                Err(e) => core::str::from_utf8(&written[..e.valid_up_to()]).unwrap_or_default(),
            }
        }
    }

    impl fmt::Write for BufferConsoleInner {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            s.bytes().for_each(|b| self.write_byte(b));

            Ok(())
        }
    }

    //--------------------------------------------------------------------------------------------------
    // Public Code
    //--------------------------------------------------------------------------------------------------

    impl BufferConsole {
        /// Dump the buffer.
        ///
        /// # Invariant
        ///
        /// It is expected that this is only called when self != crate::console::console().
        pub fn dump(&self) {
            let inner = self.inner.lock();
            let _ = console::console().write_fmt(format_args!("{}", inner.contents()));

            if inner.write_ptr == BUF_SIZE {
                info!("Pre-console buffer overflowed");
            }
        }
    }

    impl interface::Write for BufferConsole {
        fn write_char(&self, c: char) {
            let mut tmp = [0u8; 4];
            let mut inner = self.inner.lock();

            c.encode_utf8(&mut tmp).bytes().for_each(|b| inner.write_byte(b));
        }

        fn write_fmt(&self, args: fmt::Arguments) -> fmt::Result {
            fmt::Write::write_fmt(&mut *self.inner.lock(), args)
        }
    }
}

/// Console backed by the runtime's `sbi_putc`.
#[cfg(all(target_arch = "riscv64", target_os = "none"))]
pub mod sbi {
    use super::interface;
    use core::fmt;

    extern "C" {
        fn sbi_putc(ch: u8);
    }

    struct Writer;

    impl fmt::Write for Writer {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            s.bytes().for_each(|b| unsafe { sbi_putc(b) });

            Ok(())
        }
    }

    pub struct SbiConsole;

    pub static SBI_CONSOLE: SbiConsole = SbiConsole;

    impl interface::Write for SbiConsole {
        fn write_char(&self, c: char) {
            let _ = fmt::Write::write_char(&mut Writer, c);
        }

        fn write_fmt(&self, args: fmt::Arguments) -> fmt::Result {
            fmt::Write::write_fmt(&mut Writer, args)
        }
    }
}

use core::sync::atomic::{AtomicBool, Ordering};
use spin::RwLock;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Console interfaces.
pub mod interface {
    use core::fmt;

    /// Console write functions.
    pub trait Write {
        /// Write a single character.
        fn write_char(&self, c: char);

        /// Write a Rust format string.
        fn write_fmt(&self, args: fmt::Arguments) -> fmt::Result;

        /// Block until the last buffered character has been physically put on the TX wire.
        fn flush(&self) {}
    }
}

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

static CUR_CONSOLE: RwLock<&'static (dyn interface::Write + Sync)> =
    RwLock::new(&buffer_console::BUFFER_CONSOLE);

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Register a new console.
pub fn register_console(new_console: &'static (dyn interface::Write + Sync)) {
    *CUR_CONSOLE.write() = new_console;

    static FIRST_SWITCH: AtomicBool = AtomicBool::new(true);
    if FIRST_SWITCH.swap(false, Ordering::AcqRel) {
        buffer_console::BUFFER_CONSOLE.dump();
    }
}

/// Return a reference to the currently registered console.
///
/// This is the global console used by all printing macros.
pub fn console() -> &'static dyn interface::Write {
    *CUR_CONSOLE.read()
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
