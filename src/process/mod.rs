//! Target-side register machinery for the traced process.
//!
//! Layering, leaves first: `register_info` owns the logical namespace,
//! `registers` owns the regset maps and the transfer engine, `debugreg`
//! owns the watchpoint comparator file, and `inferior` owns thread
//! addressing plus the OS transport seam they all go through. `tdep` is the
//! immutable per-session architecture record.

pub mod debugreg;
pub mod inferior;
pub mod register_info;
pub mod registers;
pub mod tdep;

pub use debugreg::DebugRegisters;
pub use inferior::{InferiorId, RegsetOps};
pub use registers::{RegisterFile, RegisterTransfer};
