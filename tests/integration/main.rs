//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the simulated board.  All tests run on the host (x86_64) with
//! no real hardware required.

mod animation_tests;
mod controller_tests;
