//! Host hart for driving the platform from outside the crate.

#![allow(dead_code)]

use c910_platform::{
    board,
    cpu::{Csr, Hart},
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    panic::{self, AssertUnwindSafe},
};

/// Per-hart CSR files with a switchable "current" hart.
pub struct HostHart {
    current: Cell<usize>,
    plic_base: usize,
    files: RefCell<Vec<BTreeMap<Csr, usize>>>,
}

impl HostHart {
    pub fn new(plic_base: usize) -> Self {
        Self {
            current: Cell::new(0),
            plic_base,
            files: RefCell::new(vec![BTreeMap::new(); board::HART_COUNT + 1]),
        }
    }

    pub fn switch_to(&self, hart: usize) {
        self.current.set(hart);
    }

    pub fn set(&self, hart: usize, csr: Csr, value: usize) {
        self.files.borrow_mut()[hart].insert(csr, value);
    }

    pub fn get(&self, hart: usize, csr: Csr) -> usize {
        self.files.borrow()[hart].get(&csr).copied().unwrap_or(0)
    }
}

impl Hart for HostHart {
    fn csr_read(&self, csr: Csr) -> usize {
        self.get(self.current.get(), csr)
    }

    fn csr_write(&self, csr: Csr, value: usize) {
        self.set(self.current.get(), csr, value);
    }

    fn plic_base(&self) -> usize {
        self.plic_base
    }

    fn hart_id(&self) -> usize {
        self.current.get()
    }

    fn halt(&self) -> ! {
        panic!("hart {} halted", self.current.get())
    }
}

/// Zeroed memory covering the PLIC and the CLINT above it.
pub struct Devices {
    ptr: *mut u32,
    _backing: Vec<u32>,
}

impl Devices {
    pub fn new() -> Self {
        let mut backing = vec![0u32; (board::map::CLINT_OFFSET + 0x1_0000) / 4];

        Self {
            ptr: backing.as_mut_ptr(),
            _backing: backing,
        }
    }

    pub fn base(&self) -> usize {
        self.ptr as usize
    }

    pub fn read(&self, offset: usize) -> u32 {
        unsafe { self.ptr.add(offset / 4).read_volatile() }
    }

    pub fn clint(&self, offset: usize) -> u32 {
        self.read(board::map::CLINT_OFFSET + offset)
    }
}

pub fn halts(f: impl FnOnce()) -> bool {
    panic::catch_unwind(AssertUnwindSafe(f)).is_err()
}
