//! Per-session architecture record.
//!
//! One `ArchTdep` is built when a session starts (from target probing or
//! from ELF headers) and never mutated afterwards.

use anyhow::{Result, anyhow, ensure};
use strum::FromRepr;

/// Base integer register width, using the misa MXL encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum BaseLen {
    Rv32 = 1,
    Rv64 = 2,
    Rv128 = 3,
}

/// Floating point calling convention, using the ELF `e_flags` encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum FloatAbi {
    Soft = 0,
    Single = 1,
    Double = 2,
    Quad = 3,
}

/// The ABI descriptor: register width class plus float ABI class, packed
/// into one composite value with both fields individually addressable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Abi {
    pub base_len: BaseLen,
    pub float_abi: FloatAbi,
}

impl Abi {
    /// The whole descriptor as one value: base length in bits 0..2, float
    /// ABI in bits 2..4.
    pub fn value(&self) -> u32 {
        (self.base_len as u32) | ((self.float_abi as u32) << 2)
    }

    pub fn from_value(value: u32) -> Result<Self> {
        ensure!(value >> 4 == 0, "stray high bits in ABI descriptor {value:#x}");
        let base_len = BaseLen::from_repr(value & 0b11)
            .ok_or_else(|| anyhow!("invalid base length in ABI descriptor {value:#x}"))?;
        let float_abi = FloatAbi::from_repr((value >> 2) & 0b11)
            .ok_or_else(|| anyhow!("invalid float ABI in ABI descriptor {value:#x}"))?;
        Ok(Self {
            base_len,
            float_abi,
        })
    }

    /// Width of an x-register in bytes.
    pub fn xlen_bytes(&self) -> usize {
        match self.base_len {
            BaseLen::Rv32 => 4,
            BaseLen::Rv64 => 8,
            BaseLen::Rv128 => 16,
        }
    }
}

/// Only the low 26 bits of the feature word are significant, one bit per
/// single-letter ISA extension ('a' at bit 0).
pub const CORE_FEATURE_MASK: u32 = (1 << 26) - 1;

/// Immutable per-architecture information for one debug session.
#[derive(Clone, Copy, Debug)]
pub struct ArchTdep {
    abi: Abi,
    core_features: u32,
}

impl ArchTdep {
    pub fn new(abi: Abi, core_features: u32) -> Self {
        Self {
            abi,
            core_features: core_features & CORE_FEATURE_MASK,
        }
    }

    pub fn abi(&self) -> Abi {
        self.abi
    }

    pub fn core_features(&self) -> u32 {
        self.core_features
    }

    /// Whether the target reported the single-letter extension, e.g. 'c'
    /// for compressed instructions.
    pub fn has_extension(&self, letter: char) -> bool {
        let letter = letter.to_ascii_lowercase();
        assert!(
            letter.is_ascii_lowercase(),
            "extension must be a single letter, got {letter:?}"
        );
        let bit = (letter as u32) - ('a' as u32);
        bit < 26 && self.core_features & (1 << bit) != 0
    }
}
