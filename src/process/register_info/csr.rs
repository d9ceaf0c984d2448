//! Canonical control/status register table.
//!
//! One data-driven table replaces per-CSR named constants: each entry is a
//! `(name, hardware_number)` pair, and the logical index for a CSR is always
//! `FIRST_CSR_REGNUM + hardware_number`, densely reserving one slot per
//! encodable number whether or not it is named here.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{FIRST_CSR_REGNUM, RegNum};

/// Largest hardware-encodable CSR number (12-bit address space).
pub const CSR_NUMBER_MAX: u16 = 0xfff;

// Numbers referenced from outside the table.
pub const CSR_FFLAGS: u16 = 0x001;
pub const CSR_FRM: u16 = 0x002;
pub const CSR_FCSR: u16 = 0x003;
pub const CSR_MISA: u16 = 0x301;
/// Pre-ratification encoding of misa, still reported by some targets.
pub const CSR_LEGACY_MISA: u16 = 0xf10;

/// Logical index of the floating point control/status register.
pub const FCSR_REGNUM: RegNum = FIRST_CSR_REGNUM + CSR_FCSR;

/// The canonical name -> number table.
static CSR_TABLE: phf::Map<&'static str, u16> = phf::phf_map! {
    // user trap / floating point
    "ustatus" => 0x000,
    "fflags" => 0x001,
    "frm" => 0x002,
    "fcsr" => 0x003,
    "uie" => 0x004,
    "utvec" => 0x005,
    "uscratch" => 0x040,
    "uepc" => 0x041,
    "ucause" => 0x042,
    "utval" => 0x043,
    "uip" => 0x044,

    // supervisor
    "sstatus" => 0x100,
    "sedeleg" => 0x102,
    "sideleg" => 0x103,
    "sie" => 0x104,
    "stvec" => 0x105,
    "scounteren" => 0x106,
    "sscratch" => 0x140,
    "sepc" => 0x141,
    "scause" => 0x142,
    "stval" => 0x143,
    "sip" => 0x144,
    "satp" => 0x180,

    // machine
    "mstatus" => 0x300,
    "misa" => 0x301,
    "medeleg" => 0x302,
    "mideleg" => 0x303,
    "mie" => 0x304,
    "mtvec" => 0x305,
    "mcounteren" => 0x306,
    "mscratch" => 0x340,
    "mepc" => 0x341,
    "mcause" => 0x342,
    "mtval" => 0x343,
    "mip" => 0x344,

    // physical memory protection
    "pmpcfg0" => 0x3a0,
    "pmpcfg1" => 0x3a1,
    "pmpcfg2" => 0x3a2,
    "pmpcfg3" => 0x3a3,
    "pmpaddr0" => 0x3b0,
    "pmpaddr1" => 0x3b1,
    "pmpaddr2" => 0x3b2,
    "pmpaddr3" => 0x3b3,
    "pmpaddr4" => 0x3b4,
    "pmpaddr5" => 0x3b5,
    "pmpaddr6" => 0x3b6,
    "pmpaddr7" => 0x3b7,
    "pmpaddr8" => 0x3b8,
    "pmpaddr9" => 0x3b9,
    "pmpaddr10" => 0x3ba,
    "pmpaddr11" => 0x3bb,
    "pmpaddr12" => 0x3bc,
    "pmpaddr13" => 0x3bd,
    "pmpaddr14" => 0x3be,
    "pmpaddr15" => 0x3bf,

    // debug/trace
    "tselect" => 0x7a0,
    "tdata1" => 0x7a1,
    "tdata2" => 0x7a2,
    "tdata3" => 0x7a3,
    "dcsr" => 0x7b0,
    "dpc" => 0x7b1,
    "dscratch" => 0x7b2,

    // counters
    "mcycle" => 0xb00,
    "minstret" => 0xb02,
    "cycle" => 0xc00,
    "time" => 0xc01,
    "instret" => 0xc02,
    "cycleh" => 0xc80,
    "timeh" => 0xc81,
    "instreth" => 0xc82,

    // machine information
    "legacy_misa" => 0xf10,
    "mvendorid" => 0xf11,
    "marchid" => 0xf12,
    "mimpid" => 0xf13,
    "mhartid" => 0xf14,
};

static CSR_NAMES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    let mut names = HashMap::with_capacity(CSR_TABLE.len());
    for (name, number) in CSR_TABLE.entries() {
        assert!(
            *number <= CSR_NUMBER_MAX,
            "CSR {name} number {number:#x} exceeds the 12-bit encoding"
        );
        let prev = names.insert(*number, *name);
        assert!(
            prev.is_none(),
            "CSR number {number:#x} listed twice ({name} and {})",
            prev.unwrap_or_default()
        );
    }
    names
});

/// Logical index of a CSR from its hardware-encoded number.
///
/// The dense generation can never escape the reserved CSR block; a number
/// past the 12-bit encoding is a configuration defect, not target data.
pub fn csr_regnum(number: u16) -> RegNum {
    assert!(
        number <= CSR_NUMBER_MAX,
        "CSR number {number:#x} outside the reserved logical range"
    );
    FIRST_CSR_REGNUM + number
}

/// Canonical name for a CSR number, if the table knows one.
pub fn csr_name(number: u16) -> Option<&'static str> {
    CSR_NAMES.get(&number).copied()
}

/// Hardware number for a canonical CSR name.
pub fn csr_number(name: &str) -> Option<u16> {
    CSR_TABLE.get(name).copied()
}

/// All canonical `(name, number)` pairs, in table order.
pub fn entries() -> impl Iterator<Item = (&'static str, u16)> {
    CSR_TABLE.entries().map(|(name, number)| (*name, *number))
}
