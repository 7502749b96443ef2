use super::AbbreviationTable;
use crate::consts::*;

#[test]
fn parses_a_two_entry_table() {
    #[rustfmt::skip]
    let section = [
        // entry 1: DW_TAG_compile_unit, has children,
        //   DW_AT_name:DW_FORM_string, DW_AT_low_pc:DW_FORM_addr
        0x01, 0x11, 0x01,
        0x03, 0x08,
        0x11, 0x01,
        0x00, 0x00,
        // entry 2: DW_TAG_subprogram, no children, DW_AT_name:DW_FORM_string
        0x02, 0x2e, 0x00,
        0x03, 0x08,
        0x00, 0x00,
        // null entry terminates the table
        0x00,
    ];

    let table = AbbreviationTable::parse(&section, 0).unwrap();

    let mut entry = table.entry(1).unwrap();
    assert_eq!(entry.tag(), DW_TAG_compile_unit);
    assert!(entry.has_children());
    let spec = entry.next_attribute().unwrap().unwrap();
    assert_eq!((spec.name, spec.form), (DW_AT_name, DW_FORM_string));
    let spec = entry.next_attribute().unwrap().unwrap();
    assert_eq!((spec.name, spec.form), (DW_AT_low_pc, DW_FORM_addr));
    assert!(entry.next_attribute().unwrap().is_none());

    let mut entry = table.entry(2).unwrap();
    assert_eq!(entry.tag(), DW_TAG_subprogram);
    assert!(!entry.has_children());
    assert!(entry.next_attribute().unwrap().is_some());

    assert!(table.entry(3).is_none());
}

#[test]
fn implicit_const_operand_lives_in_the_table() {
    #[rustfmt::skip]
    let section = [
        // DW_TAG_variable, no children, DW_AT_decl_file:DW_FORM_implicit_const(-2)
        0x01, 0x34, 0x00,
        0x3a, 0x21, 0x7e,
        0x00, 0x00,
        0x00,
    ];

    let table = AbbreviationTable::parse(&section, 0).unwrap();
    let mut entry = table.entry(1).unwrap();
    let spec = entry.next_attribute().unwrap().unwrap();
    assert_eq!(spec.form, DW_FORM_implicit_const);
    assert_eq!(spec.implicit_const, -2);
}

#[test]
fn tables_are_found_by_section_offset() {
    #[rustfmt::skip]
    let section = [
        // table at offset 0: one entry
        0x01, 0x34, 0x00, 0x00, 0x00, 0x00,
        // table at offset 6: one entry with a different tag
        0x01, 0x2e, 0x00, 0x00, 0x00, 0x00,
    ];

    let first = AbbreviationTable::parse(&section, 0).unwrap();
    let second = AbbreviationTable::parse(&section, 6).unwrap();

    assert_eq!(first.entry(1).unwrap().tag(), DW_TAG_variable);
    assert_eq!(second.entry(1).unwrap().tag(), DW_TAG_subprogram);
    assert_eq!(first.offset(), 0);
    assert_eq!(second.offset(), 6);
}

#[test]
fn truncated_tables_are_bad_data() {
    // entry starts but the spec list never terminates
    let section = [0x01, 0x34, 0x00, 0x03];
    assert!(AbbreviationTable::parse(&section, 0).is_err());

    // offset outside the section
    let section = [0x00];
    assert!(AbbreviationTable::parse(&section, 8).is_err());
}
