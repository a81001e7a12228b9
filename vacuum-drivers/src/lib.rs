//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the interfaces the
//! vacuum-core control logic consumes:
//!
//! - Timed digital outputs with max-duration fallback (pump, valve)
//! - Oversampling filter for the analog pressure sensor

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod output;
pub mod sensor;
