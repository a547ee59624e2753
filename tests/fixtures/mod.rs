//! Test fixtures for drt-replay.
//!
//! A small morning scenario around Wirye new town, in the raw payload shapes
//! the simulator exports.

pub mod wirye;

pub use wirye::*;
