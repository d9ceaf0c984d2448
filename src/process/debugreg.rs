//! Hardware debug register controller.
//!
//! The debug register file is a small fixed block in the per-thread user
//! area: four address comparators, a status word, and a control word. It is
//! reached through the narrow peek/poke primitive, not the bulk regset
//! calls, and this module only relays reads and writes; the kernel owns the
//! state for the thread's lifetime.
//!
//! Failure policy is deliberately asymmetric. Reads degrade to zero because
//! probing for the feature must not kill a session on transports that lack
//! it. Writes are fatal because an unacknowledged watchpoint write leaves
//! our model of the hardware wrong, which corrupts the watchpoint
//! abstraction above this layer.

use anyhow::{Context, Result};
use nix::unistd::Pid;
use tracing::trace;

use crate::process::inferior::{InferiorId, RegsetOps};

/// Number of address comparators.
pub const DR_NADDR: usize = 4;
/// Slot of the first address comparator.
pub const DR_FIRSTADDR: usize = 0;
/// Slot of the last address comparator.
pub const DR_LASTADDR: usize = 3;
/// Slot of the status word (which comparators fired since last read).
pub const DR_STATUS: usize = 6;
/// Slot of the control word (arming, trigger mode, operand size).
pub const DR_CONTROL: usize = 7;
/// Total slots in the debug register file.
pub const DR_NREGS: usize = 8;

const DR_WORD_SIZE: usize = 8;

/// Byte offset of the debug register block in the per-thread user area.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub fn debug_area_offset() -> usize {
    memoffset::offset_of!(libc::user, u_debugreg)
}

/// Targets whose libc does not describe a debug area in the user struct
/// still get stable block-relative offsets, so non-ptrace transports (and
/// tests) can address the slots.
#[cfg(not(all(target_os = "linux", target_arch = "x86_64")))]
pub fn debug_area_offset() -> usize {
    0
}

fn dr_offset(slot: usize) -> usize {
    debug_area_offset() + slot * DR_WORD_SIZE
}

/// Trigger condition for one comparator (control-word R/W field encoding).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u64)]
pub enum TriggerMode {
    Execute = 0b00,
    Write = 0b01,
    ReadWrite = 0b11,
}

/// Watched operand size (control-word LEN field encoding).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u64)]
pub enum WatchSize {
    One = 0b00,
    Two = 0b01,
    Eight = 0b10,
    Four = 0b11,
}

/// Control-word bits arming comparator `index` with the given trigger mode
/// and operand size.
pub fn control_bits(index: usize, mode: TriggerMode, size: WatchSize) -> u64 {
    assert!(index < DR_NADDR, "comparator index {index} out of range");
    let enable = 1u64 << (index * 2);
    let rw = (mode as u64) << (16 + index * 4);
    let len = (size as u64) << (18 + index * 4);
    enable | rw | len
}

/// Mask covering every control-word bit [`control_bits`] can set for
/// comparator `index`; AND with the complement to disarm it.
pub fn control_mask(index: usize) -> u64 {
    assert!(index < DR_NADDR, "comparator index {index} out of range");
    (0b11u64 << (index * 2)) | (0b1111u64 << (16 + index * 4))
}

/// Word-granularity access to one thread's debug register file.
pub struct DebugRegisters<'a, T: RegsetOps> {
    ops: &'a T,
    inferior: InferiorId,
}

impl<'a, T: RegsetOps> DebugRegisters<'a, T> {
    pub fn new(ops: &'a T, inferior: InferiorId) -> Self {
        Self { ops, inferior }
    }

    fn tid(&self) -> Pid {
        self.inferior.ptrace_id()
    }

    /// Read one debug register. A transport read failure supplies zero:
    /// probing is best-effort across heterogeneous transports.
    pub fn get(&self, slot: usize) -> u64 {
        assert!(slot < DR_NREGS, "debug register slot {slot} out of range");
        match self.ops.peek_user(self.tid(), dr_offset(slot)) {
            Ok(value) => value,
            Err(e) => {
                trace!("debug register {slot} read failed, supplying zero: {e}");
                0
            }
        }
    }

    /// Write one debug register. Failures are fatal and surfaced.
    pub fn set(&self, slot: usize, value: u64) -> Result<()> {
        assert!(slot < DR_NREGS, "debug register slot {slot} out of range");
        self.ops
            .poke_user(self.tid(), dr_offset(slot), value)
            .with_context(|| format!("Couldn't write debug register {slot}"))
    }

    /// Write the control word arming/disarming the comparators.
    pub fn set_control(&self, control: u64) -> Result<()> {
        self.set(DR_CONTROL, control)
    }

    /// Write one comparator's address register. `index` counts comparators,
    /// not slots; out of range is a caller-contract violation and panics
    /// rather than clamping.
    pub fn set_addr(&self, index: usize, addr: u64) -> Result<()> {
        assert!(
            index <= DR_LASTADDR - DR_FIRSTADDR,
            "comparator index {index} out of range"
        );
        self.set(DR_FIRSTADDR + index, addr)
    }

    /// Clear one comparator's address register.
    pub fn reset_addr(&self, index: usize) -> Result<()> {
        assert!(
            index <= DR_LASTADDR - DR_FIRSTADDR,
            "comparator index {index} out of range"
        );
        self.set(DR_FIRSTADDR + index, 0)
    }

    /// Read the status word: which comparators fired since the last read.
    pub fn get_status(&self) -> u64 {
        self.get(DR_STATUS)
    }
}
