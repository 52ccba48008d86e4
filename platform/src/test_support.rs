//! Host stand-ins for the hart and for device memory.

use crate::{
    cpu::{Csr, Hart, HartId},
    driver::interface::{DeviceDriver, IpiDevice},
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    panic::{self, AssertUnwindSafe},
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

/// Harts the mock keeps register files for, including some past the board range.
const MOCK_HARTS: usize = 8;

/// A CSR file per hart plus an ordered log of every write.
pub struct MockHart {
    current: Cell<usize>,
    files: RefCell<Vec<BTreeMap<Csr, usize>>>,
    plic_bases: RefCell<[usize; MOCK_HARTS]>,
    writes: RefCell<Vec<(usize, Csr, usize)>>,
}

impl MockHart {
    pub fn new() -> Self {
        Self {
            current: Cell::new(0),
            files: RefCell::new(vec![BTreeMap::new(); MOCK_HARTS]),
            plic_bases: RefCell::new([0; MOCK_HARTS]),
            writes: RefCell::new(Vec::new()),
        }
    }

    /// Every hart reports `base` as its PLIC base.
    pub fn with_plic_base(self, base: usize) -> Self {
        *self.plic_bases.borrow_mut() = [base; MOCK_HARTS];
        self
    }

    pub fn set_plic_base(&self, hart: usize, base: usize) {
        self.plic_bases.borrow_mut()[hart] = base;
    }

    /// Continue as `hart`.
    pub fn switch_to(&self, hart: usize) {
        self.current.set(hart);
    }

    /// Preload a register without logging a write.
    pub fn set(&self, hart: usize, csr: Csr, value: usize) {
        self.files.borrow_mut()[hart].insert(csr, value);
    }

    pub fn get(&self, hart: usize, csr: Csr) -> usize {
        self.files.borrow()[hart].get(&csr).copied().unwrap_or(0)
    }

    /// `(hart, register, value)` in the order they happened.
    pub fn writes(&self) -> Vec<(usize, Csr, usize)> {
        self.writes.borrow().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl Hart for MockHart {
    fn csr_read(&self, csr: Csr) -> usize {
        self.get(self.current.get(), csr)
    }

    fn csr_write(&self, csr: Csr, value: usize) {
        let hart = self.current.get();

        self.writes.borrow_mut().push((hart, csr, value));
        self.set(hart, csr, value);
    }

    fn plic_base(&self) -> usize {
        self.plic_bases.borrow()[self.current.get()]
    }

    fn hart_id(&self) -> usize {
        self.current.get()
    }

    fn halt(&self) -> ! {
        panic!("hart {} halted", self.current.get())
    }
}

/// The reset registers shared by all harts, usable from several threads at once.
///
/// Every read yields before returning, so unserialised read-modify-write sequences on different
/// threads interleave and lose updates.
#[derive(Default)]
pub struct SharedResetHart {
    mrmr: AtomicUsize,
    mrvbr: AtomicUsize,
}

impl SharedResetHart {
    fn register(&self, csr: Csr) -> &AtomicUsize {
        match csr {
            Csr::Mrmr => &self.mrmr,
            Csr::Mrvbr => &self.mrvbr,
            _ => panic!("{:?} is not a shared reset register", csr),
        }
    }
}

impl Hart for SharedResetHart {
    fn csr_read(&self, csr: Csr) -> usize {
        let value = self.register(csr).load(Ordering::SeqCst);

        thread::yield_now();
        value
    }

    fn csr_write(&self, csr: Csr, value: usize) {
        self.register(csr).store(value, Ordering::SeqCst);
    }

    fn plic_base(&self) -> usize {
        0
    }

    fn hart_id(&self) -> usize {
        0
    }

    fn halt(&self) -> ! {
        panic!("shared hart halted")
    }
}

/// Zeroed host memory standing in for a physical device range.
///
/// The default size spans the PLIC and the CLINT above it. Pages that are never touched are never
/// backed, so the size costs nothing.
pub struct DeviceWindow {
    ptr: *mut u32,
    words: usize,
    _backing: Vec<u32>,
}

impl DeviceWindow {
    pub const PLATFORM_SIZE: usize = crate::board::map::CLINT_OFFSET + 0x1_0000;

    pub fn new() -> Self {
        Self::with_size(Self::PLATFORM_SIZE)
    }

    pub fn with_size(bytes: usize) -> Self {
        let mut backing = vec![0u32; bytes / 4];

        Self {
            ptr: backing.as_mut_ptr(),
            words: backing.len(),
            _backing: backing,
        }
    }

    pub fn base(&self) -> usize {
        self.ptr as usize
    }

    pub fn read(&self, offset: usize) -> u32 {
        assert!(offset / 4 < self.words);
        unsafe { self.ptr.add(offset / 4).read_volatile() }
    }

    pub fn write(&self, offset: usize, value: u32) {
        assert!(offset / 4 < self.words);
        unsafe { self.ptr.add(offset / 4).write_volatile(value) }
    }

    /// Byte offset and value of every word that is not zero.
    pub fn nonzero(&self) -> Vec<(usize, u32)> {
        let words = unsafe { std::slice::from_raw_parts(self.ptr, self.words) };

        words
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0)
            .map(|(i, w)| (i * 4, *w))
            .collect()
    }
}

/// IPI device that records what it was asked to do.
#[derive(Default)]
pub struct MockIpi {
    pub cold: RefCell<Vec<(usize, usize)>>,
    pub warm: RefCell<Vec<usize>>,
    pub sent: RefCell<Vec<usize>>,
    pub cleared: RefCell<Vec<usize>>,
    pub fail_warm: Cell<bool>,
}

impl DeviceDriver for MockIpi {
    fn compatible(&self) -> &'static str {
        "mock IPI"
    }
}

impl IpiDevice for MockIpi {
    unsafe fn cold_init(
        &self,
        mmio_start_addr: usize,
        hart_count: usize,
    ) -> Result<(), &'static str> {
        let mut cold = self.cold.borrow_mut();

        if !cold.is_empty() {
            return Err("mock IPI already registered");
        }

        cold.push((mmio_start_addr, hart_count));
        Ok(())
    }

    fn warm_init(&self, hart: HartId) -> Result<(), &'static str> {
        if self.fail_warm.get() {
            return Err("mock warm init failure");
        }

        self.warm.borrow_mut().push(hart.get());
        Ok(())
    }

    fn send(&self, target_hart: usize) {
        self.sent.borrow_mut().push(target_hart);
    }

    fn clear(&self, target_hart: usize) {
        self.cleared.borrow_mut().push(target_hart);
    }
}

/// Whether `f` ends in a halt instead of returning.
pub fn halts(f: impl FnOnce()) -> bool {
    panic::catch_unwind(AssertUnwindSafe(f)).is_err()
}
