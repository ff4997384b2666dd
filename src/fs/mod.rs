//! Filesystem utilities for tintforge.
//!
//! Atomic writes keep artifacts and config files from ever being observed in
//! a partial state.

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_file};
