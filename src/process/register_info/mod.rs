//! The logical register namespace for riscv64.
//!
//! Every hardware-visible register gets exactly one stable index, laid out
//! in fixed category order: general purpose, program counter, floating
//! point, CSRs, then the privilege pseudo-register. Session code uses these
//! indices everywhere (display, caching, transfer requests); only the
//! regset code in [`crate::process::registers`] knows how they map onto the
//! kernel's buffer layouts.

use std::collections::HashMap;
use std::sync::LazyLock;

use strum::Display;

pub mod csr;

/// Stable logical index naming a register independent of physical storage.
pub type RegNum = u16;

pub const ZERO_REGNUM: RegNum = 0;
pub const RA_REGNUM: RegNum = 1;
pub const SP_REGNUM: RegNum = 2;
pub const GP_REGNUM: RegNum = 3;
pub const TP_REGNUM: RegNum = 4;
/// s0 doubles as the frame pointer under the standard ABI.
pub const FP_REGNUM: RegNum = 8;
pub const A0_REGNUM: RegNum = 10;
pub const LAST_GP_REGNUM: RegNum = 31;
pub const PC_REGNUM: RegNum = 32;
pub const FIRST_FP_REGNUM: RegNum = 33;
pub const LAST_FP_REGNUM: RegNum = 64;
pub const FIRST_CSR_REGNUM: RegNum = 65;
pub const LAST_CSR_REGNUM: RegNum = 4160;
/// Current privilege level, synthesized by the target rather than read from
/// any regset.
pub const PRIV_REGNUM: RegNum = 4161;

/// Total size of the logical namespace.
pub const REG_COUNT: usize = PRIV_REGNUM as usize + 1;

/// Broad grouping for registers, used for display and filtering.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash)]
pub enum RegisterCategory {
    GeneralPurpose,
    ProgramCounter,
    FloatingPoint,
    Csr,
    Privilege,
}

/// Category of a logical index, or `None` for indices outside the namespace.
pub fn category(regnum: RegNum) -> Option<RegisterCategory> {
    match regnum {
        ZERO_REGNUM..=LAST_GP_REGNUM => Some(RegisterCategory::GeneralPurpose),
        PC_REGNUM => Some(RegisterCategory::ProgramCounter),
        FIRST_FP_REGNUM..=LAST_FP_REGNUM => Some(RegisterCategory::FloatingPoint),
        FIRST_CSR_REGNUM..=LAST_CSR_REGNUM => Some(RegisterCategory::Csr),
        PRIV_REGNUM => Some(RegisterCategory::Privilege),
        _ => None,
    }
}

/// ABI names for x0..x31, in logical-index order.
static GP_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// ABI names for f0..f31, in logical-index order.
static FP_NAMES: [&str; 32] = [
    "ft0", "ft1", "ft2", "ft3", "ft4", "ft5", "ft6", "ft7", "fs0", "fs1", "fa0", "fa1", "fa2",
    "fa3", "fa4", "fa5", "fa6", "fa7", "fs2", "fs3", "fs4", "fs5", "fs6", "fs7", "fs8", "fs9",
    "fs10", "fs11", "ft8", "ft9", "ft10", "ft11",
];

/// Display name for a logical index. CSR slots without an entry in the
/// canonical table have no name.
pub fn register_name(regnum: RegNum) -> Option<&'static str> {
    match category(regnum)? {
        RegisterCategory::GeneralPurpose => Some(GP_NAMES[usize::from(regnum)]),
        RegisterCategory::ProgramCounter => Some("pc"),
        RegisterCategory::FloatingPoint => Some(FP_NAMES[usize::from(regnum - FIRST_FP_REGNUM)]),
        RegisterCategory::Csr => csr::csr_name(regnum - FIRST_CSR_REGNUM),
        RegisterCategory::Privilege => Some("priv"),
    }
}

static NAME_TO_REGNUM: LazyLock<HashMap<&'static str, RegNum>> = LazyLock::new(|| {
    let mut names = HashMap::new();
    for (i, name) in GP_NAMES.iter().enumerate() {
        names.insert(*name, i as RegNum);
    }
    for (i, name) in FP_NAMES.iter().enumerate() {
        names.insert(*name, FIRST_FP_REGNUM + i as RegNum);
    }
    names.insert("pc", PC_REGNUM);
    names.insert("priv", PRIV_REGNUM);
    for (name, number) in csr::entries() {
        names.insert(name, csr::csr_regnum(number));
    }
    names
});

/// Reverse lookup from an ABI or CSR name to its logical index.
pub fn lookup_regnum(name: &str) -> Option<RegNum> {
    NAME_TO_REGNUM.get(name).copied()
}
