//! Namespace layout, CSR generation, and tdep descriptor tests.

use std::collections::HashSet;

use rvdb::process::register_info::{
    self, A0_REGNUM, FIRST_CSR_REGNUM, FIRST_FP_REGNUM, FP_REGNUM, LAST_CSR_REGNUM,
    LAST_FP_REGNUM, LAST_GP_REGNUM, PC_REGNUM, PRIV_REGNUM, REG_COUNT, RegisterCategory,
    SP_REGNUM, ZERO_REGNUM, category, csr, lookup_regnum, register_name,
};
use rvdb::process::tdep::{Abi, ArchTdep, BaseLen, CORE_FEATURE_MASK, FloatAbi};

#[test]
fn categories_at_range_boundaries() {
    assert_eq!(category(ZERO_REGNUM), Some(RegisterCategory::GeneralPurpose));
    assert_eq!(category(LAST_GP_REGNUM), Some(RegisterCategory::GeneralPurpose));
    assert_eq!(category(PC_REGNUM), Some(RegisterCategory::ProgramCounter));
    assert_eq!(category(FIRST_FP_REGNUM), Some(RegisterCategory::FloatingPoint));
    assert_eq!(category(LAST_FP_REGNUM), Some(RegisterCategory::FloatingPoint));
    assert_eq!(category(FIRST_CSR_REGNUM), Some(RegisterCategory::Csr));
    assert_eq!(category(LAST_CSR_REGNUM), Some(RegisterCategory::Csr));
    assert_eq!(category(PRIV_REGNUM), Some(RegisterCategory::Privilege));
    assert_eq!(category(PRIV_REGNUM + 1), None);
}

#[test]
fn ranges_are_contiguous_and_counted() {
    // every index below the total count belongs to exactly one category
    for regnum in 0..REG_COUNT as u16 {
        assert!(category(regnum).is_some(), "unassigned index {regnum}");
    }
    assert_eq!(REG_COUNT, 4162);
    assert_eq!(PC_REGNUM, LAST_GP_REGNUM + 1);
    assert_eq!(FIRST_FP_REGNUM, PC_REGNUM + 1);
    assert_eq!(FIRST_CSR_REGNUM, LAST_FP_REGNUM + 1);
    assert_eq!(PRIV_REGNUM, LAST_CSR_REGNUM + 1);
}

#[test]
fn csr_generation_is_dense_and_in_range() {
    let mut seen = HashSet::new();
    for (name, number) in csr::entries() {
        let regnum = csr::csr_regnum(number);
        assert_eq!(regnum, FIRST_CSR_REGNUM + number, "wrong slot for {name}");
        assert!(
            (FIRST_CSR_REGNUM..=LAST_CSR_REGNUM).contains(&regnum),
            "{name} generated outside the CSR block"
        );
        assert!(seen.insert(regnum), "{name} collides at index {regnum}");
    }
}

#[test]
fn csr_lookups_round_trip() {
    assert_eq!(csr::csr_number("mepc"), Some(0x341));
    assert_eq!(csr::csr_name(0x341), Some("mepc"));
    assert_eq!(csr::csr_regnum(0x342), FIRST_CSR_REGNUM + 0x342);
    assert_eq!(csr::FCSR_REGNUM, FIRST_CSR_REGNUM + 0x003);

    // the legacy misa encoding keeps its own slot next to the modern one
    assert_eq!(csr::csr_number("legacy_misa"), Some(csr::CSR_LEGACY_MISA));
    assert_ne!(csr::CSR_LEGACY_MISA, csr::CSR_MISA);
}

#[test]
#[should_panic(expected = "outside the reserved logical range")]
fn csr_number_past_encoding_panics() {
    csr::csr_regnum(0x1000);
}

#[test]
fn names_cover_all_categories() {
    assert_eq!(register_name(ZERO_REGNUM), Some("zero"));
    assert_eq!(register_name(SP_REGNUM), Some("sp"));
    assert_eq!(register_name(FP_REGNUM), Some("s0"));
    assert_eq!(register_name(PC_REGNUM), Some("pc"));
    assert_eq!(register_name(FIRST_FP_REGNUM), Some("ft0"));
    assert_eq!(register_name(LAST_FP_REGNUM), Some("ft11"));
    assert_eq!(register_name(csr::FCSR_REGNUM), Some("fcsr"));
    assert_eq!(register_name(PRIV_REGNUM), Some("priv"));
    // unnamed CSR slots exist but have no display name
    assert_eq!(register_name(FIRST_CSR_REGNUM + 0x006), None);
}

#[test]
fn name_lookup_inverts_display_names() {
    assert_eq!(lookup_regnum("a0"), Some(A0_REGNUM));
    assert_eq!(lookup_regnum("pc"), Some(PC_REGNUM));
    assert_eq!(lookup_regnum("fa0"), Some(FIRST_FP_REGNUM + 10));
    assert_eq!(lookup_regnum("mhartid"), Some(csr::csr_regnum(0xf14)));
    assert_eq!(lookup_regnum("priv"), Some(PRIV_REGNUM));
    assert_eq!(lookup_regnum("nonesuch"), None);
    assert_eq!(register_info::lookup_regnum("zero"), Some(0));
}

#[test]
fn abi_descriptor_packs_and_unpacks() {
    for base_len in [BaseLen::Rv32, BaseLen::Rv64, BaseLen::Rv128] {
        for float_abi in [FloatAbi::Soft, FloatAbi::Single, FloatAbi::Double, FloatAbi::Quad] {
            let abi = Abi { base_len, float_abi };
            let unpacked = Abi::from_value(abi.value()).expect("packed value should decode");
            assert_eq!(unpacked, abi);
        }
    }

    // base length 0 is not a valid misa encoding
    assert!(Abi::from_value(0b0000).is_err());
    // bits above the two packed fields are a decoding error, not ignored
    assert!(Abi::from_value(0b1_0110).is_err());

    let abi = Abi {
        base_len: BaseLen::Rv64,
        float_abi: FloatAbi::Double,
    };
    assert_eq!(abi.value(), 0b1010);
    assert_eq!(abi.xlen_bytes(), 8);
}

#[test]
fn tdep_masks_and_queries_features() {
    let abi = Abi {
        base_len: BaseLen::Rv64,
        float_abi: FloatAbi::Double,
    };
    // i, m, a, f, d, c
    let imafdc = (1 << 8) | (1 << 12) | (1 << 0) | (1 << 5) | (1 << 3) | (1 << 2);
    let tdep = ArchTdep::new(abi, imafdc | 0xfc00_0000);

    // anything above the 26 significant bits is dropped at construction
    assert_eq!(tdep.core_features(), imafdc);
    assert!(tdep.has_extension('d'));
    assert!(tdep.has_extension('C'));
    assert!(!tdep.has_extension('q'));
    assert_eq!(tdep.abi().float_abi, FloatAbi::Double);
    assert_eq!(CORE_FEATURE_MASK.count_ones(), 26);
}
