//! rvdb: the register access layer of a riscv64 GNU/Linux debugger.
//!
//! The crate covers four things: the stable logical register namespace
//! (GP, pc, FP, CSRs, privilege), the per-regset descriptor tables, the
//! ptrace-backed transfer engine, and the hardware debug register
//! controller. Symbols, the remote protocol, disassembly, and session
//! handling all live elsewhere and call in through
//! [`process::RegisterTransfer`] and [`process::DebugRegisters`].

pub mod process;
