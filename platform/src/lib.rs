// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2022 Andre Richter <andre.o.richter@gmail.com>

//! Platform support for the T-Head C910 cluster.
//!
//! The generic SBI runtime links this crate and calls into it through the descriptor exported by
//! `ops`. Everything below `ops` is target independent and is exercised on the host against
//! recorded CSRs and plain memory standing in for the devices.

#![cfg_attr(target_os = "none", no_std)]
#![allow(clippy::upper_case_acronyms)]

#[cfg(all(target_arch = "riscv64", target_os = "none"))]
mod ops;
#[cfg(all(target_arch = "riscv64", target_os = "none"))]
mod panic_wait;
#[cfg(test)]
mod test_support;

pub mod board;
pub mod boot;
pub mod console;
pub mod cpu;
pub mod driver;
pub mod drivers;
pub mod platform;
pub mod print;
pub mod smp;
pub mod time;

pub use platform::C910;
