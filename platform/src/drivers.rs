// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2022 Andre Richter <andre.o.richter@gmail.com>

//! Device drivers.

pub mod common;

mod clint;
mod plic;

pub use clint::*;
pub use plic::*;
