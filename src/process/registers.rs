//! Regset descriptor tables and the register transfer engine.
//!
//! The kernel moves registers in whole fixed-layout sets; this module owns
//! the maps from buffer position to logical index and the fetch/store
//! machinery built on them. Buffer order is authoritative and is not
//! monotonic in logical index (`pc` sits at position 0), so every loop here
//! walks the buffer, never the namespace.

use anyhow::{Context, Result};
use nix::unistd::Pid;
use tracing::trace;

use crate::process::inferior::{InferiorId, RegsetOps};
use crate::process::register_info::{
    FIRST_FP_REGNUM, LAST_FP_REGNUM, PC_REGNUM, REG_COUNT, RegNum, ZERO_REGNUM, csr,
};

/// Number of words in the NT_PRSTATUS regset.
pub const NGREG: usize = 32;

/// Byte size of the NT_PRFPREG regset: 32 double-width registers, a 32-bit
/// fcsr, and 4 bytes of trailing padding.
pub const FPREGS_SIZE: usize = 264;
const FCSR_OFFSET: usize = 256;

/// Buffer-position -> logical-index map for the general regset.
///
/// The kernel layout puts `pc` first, then x1..x31 in order. x0 has no
/// buffer position: it reads as a constant zero and ignores stores.
pub static GREGS_MAP: [RegNum; NGREG] = [
    PC_REGNUM, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
    24, 25, 26, 27, 28, 29, 30, 31,
];

/// Whether the general regset carries this logical index.
pub fn gregs_supplies(regnum: RegNum) -> bool {
    regnum <= PC_REGNUM
}

/// Whether the floating point regset carries this logical index. Besides
/// f0..f31 the set carries fcsr, which lives in the CSR block of the
/// namespace.
pub fn fpregs_supplies(regnum: RegNum) -> bool {
    (FIRST_FP_REGNUM..=LAST_FP_REGNUM).contains(&regnum) || regnum == csr::FCSR_REGNUM
}

/// The logical register file: one 64-bit slot per namespace index. FP
/// values are stored as their bit patterns; fcsr occupies the low 32 bits
/// of its CSR slot.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    regs: Box<[u64]>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            regs: vec![0; REG_COUNT].into_boxed_slice(),
        }
    }

    pub fn read(&self, regnum: RegNum) -> u64 {
        assert!(
            usize::from(regnum) < REG_COUNT,
            "logical register {regnum} out of range"
        );
        self.regs[usize::from(regnum)]
    }

    pub fn write(&mut self, regnum: RegNum, value: u64) {
        assert!(
            usize::from(regnum) < REG_COUNT,
            "logical register {regnum} out of range"
        );
        self.regs[usize::from(regnum)] = value;
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy a general regset buffer into the logical file, position by position.
pub fn supply_gregs(file: &mut RegisterFile, buf: &[u64; NGREG]) {
    for (i, &word) in buf.iter().enumerate() {
        file.write(GREGS_MAP[i], word);
    }
    // x0 is hardwired; the buffer never carries it
    file.write(ZERO_REGNUM, 0);
}

/// Overwrite the buffer positions mapped to `regnum` (all of them for
/// `None`) from the logical file, leaving sibling positions untouched.
pub fn fill_gregs(file: &RegisterFile, buf: &mut [u64; NGREG], regnum: Option<RegNum>) {
    for (i, slot) in buf.iter_mut().enumerate() {
        let mapped = GREGS_MAP[i];
        if regnum.is_none() || regnum == Some(mapped) {
            *slot = file.read(mapped);
        }
    }
}

/// Unpack the floating point regset bytes into the logical file. The set
/// mixes 64-bit f-registers with the 32-bit fcsr, so this is byte-exact
/// field work rather than a word map.
pub fn supply_fpregs(file: &mut RegisterFile, buf: &[u8; FPREGS_SIZE]) {
    for i in 0..32 {
        let start = i * 8;
        let mut word = [0u8; 8];
        word.copy_from_slice(&buf[start..start + 8]);
        file.write(FIRST_FP_REGNUM + i as RegNum, u64::from_le_bytes(word));
    }
    let mut fcsr = [0u8; 4];
    fcsr.copy_from_slice(&buf[FCSR_OFFSET..FCSR_OFFSET + 4]);
    file.write(csr::FCSR_REGNUM, u64::from(u32::from_le_bytes(fcsr)));
}

/// Pack logical values back into the floating point regset bytes, limited
/// to `regnum` when given.
pub fn fill_fpregs(file: &RegisterFile, buf: &mut [u8; FPREGS_SIZE], regnum: Option<RegNum>) {
    for i in 0..32 {
        let mapped = FIRST_FP_REGNUM + i as RegNum;
        if regnum.is_none() || regnum == Some(mapped) {
            let start = i * 8;
            buf[start..start + 8].copy_from_slice(&file.read(mapped).to_le_bytes());
        }
    }
    if regnum.is_none() || regnum == Some(csr::FCSR_REGNUM) {
        let fcsr = file.read(csr::FCSR_REGNUM) as u32;
        buf[FCSR_OFFSET..FCSR_OFFSET + 4].copy_from_slice(&fcsr.to_le_bytes());
    }
}

/// Moves register values between the logical file and one traced thread.
///
/// Synchronous throughout: every call runs one or two ptrace transfers to
/// completion. The inferior is assumed stopped for the duration; the
/// read-modify-write store is not atomic against its execution.
pub struct RegisterTransfer<'a, T: RegsetOps> {
    ops: &'a T,
    inferior: InferiorId,
}

impl<'a, T: RegsetOps> RegisterTransfer<'a, T> {
    pub fn new(ops: &'a T, inferior: InferiorId) -> Self {
        Self { ops, inferior }
    }

    fn tid(&self) -> Pid {
        self.inferior.ptrace_id()
    }

    /// Fetch the whole general regset into the logical file.
    pub fn fetch_gregs(&self, file: &mut RegisterFile) -> Result<()> {
        let buf = self
            .ops
            .get_gregs(self.tid())
            .context("Couldn't get registers")?;
        supply_gregs(file, &buf);
        Ok(())
    }

    /// Store `regnum` (or every general register for `None`) from the
    /// logical file. The regset call moves whole sets only, so the buffer
    /// is rebuilt from a fresh baseline before the write.
    pub fn store_gregs(&self, file: &RegisterFile, regnum: Option<RegNum>) -> Result<()> {
        let mut buf = self
            .ops
            .get_gregs(self.tid())
            .context("Couldn't get registers")?;
        fill_gregs(file, &mut buf, regnum);
        self.ops
            .set_gregs(self.tid(), &buf)
            .context("Couldn't write registers")?;
        Ok(())
    }

    /// Fetch the whole floating point regset into the logical file.
    pub fn fetch_fpregs(&self, file: &mut RegisterFile) -> Result<()> {
        let buf = self
            .ops
            .get_fpregs(self.tid())
            .context("Couldn't get floating point status")?;
        supply_fpregs(file, &buf);
        Ok(())
    }

    /// Floating point counterpart of [`Self::store_gregs`], with the same
    /// read-modify-write protocol.
    pub fn store_fpregs(&self, file: &RegisterFile, regnum: Option<RegNum>) -> Result<()> {
        let mut buf = self
            .ops
            .get_fpregs(self.tid())
            .context("Couldn't get floating point status")?;
        fill_fpregs(file, &mut buf, regnum);
        self.ops
            .set_fpregs(self.tid(), &buf)
            .context("Couldn't write floating point status")?;
        Ok(())
    }

    /// Fetch `regnum`, or every transferable register for `None` (general
    /// set first, then floating point).
    ///
    /// Panics on a logical index no regset supplies: that is a caller bug,
    /// never silently ignored.
    pub fn fetch(&self, file: &mut RegisterFile, regnum: Option<RegNum>) -> Result<()> {
        match regnum {
            None => {
                trace!(inferior = ?self.inferior, "fetching all registers");
                self.fetch_gregs(file)?;
                self.fetch_fpregs(file)
            }
            Some(r) if gregs_supplies(r) => self.fetch_gregs(file),
            Some(r) if fpregs_supplies(r) => self.fetch_fpregs(file),
            Some(r) => panic!("got request for bad register number {r}"),
        }
    }

    /// Store counterpart of [`Self::fetch`], with the same dispatch and the
    /// same panic contract.
    pub fn store(&self, file: &RegisterFile, regnum: Option<RegNum>) -> Result<()> {
        match regnum {
            None => {
                trace!(inferior = ?self.inferior, "storing all registers");
                self.store_gregs(file, None)?;
                self.store_fpregs(file, None)
            }
            Some(r) if gregs_supplies(r) => self.store_gregs(file, regnum),
            Some(r) if fpregs_supplies(r) => self.store_fpregs(file, regnum),
            Some(r) => panic!("got request to store bad register number {r}"),
        }
    }
}
