use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::DwarfFile;
use crate::cfi::CfaContext;
use crate::error::{Error, Result};
use crate::test_image::{sleb, uleb, ImageBuilder};
use crate::types::{TargetAddr, ValueType, Variant};

// ---- test doubles -------------------------------------------------------

#[derive(Default)]
struct TestTarget {
    registers: HashMap<u32, u64>,
    memory: BTreeMap<u64, u8>,
    written_registers: HashMap<u32, u64>,
}

impl TestTarget {
    fn with_register(mut self, index: u32, value: u64) -> TestTarget {
        self.registers.insert(index, value);
        self
    }

    fn with_memory_word(mut self, address: u64, value: u64) -> TestTarget {
        for (i, byte) in value.to_le_bytes().iter().enumerate() {
            self.memory.insert(address + i as u64, *byte);
        }
        self
    }
}

impl crate::target::DwarfTargetInterface for TestTarget {
    fn count_registers(&self) -> u32 {
        16
    }

    fn register_value_type(&self, _index: u32) -> Option<ValueType> {
        Some(ValueType::U64)
    }

    fn register_value(&self, index: u32) -> Option<Variant> {
        self.registers.get(&index).map(|&value| Variant::Unsigned(value))
    }

    fn set_register_value(&mut self, index: u32, value: &Variant) -> bool {
        self.written_registers.insert(index, value.to_u64());
        true
    }

    fn is_callee_preserved_register(&self, _index: u32) -> bool {
        true
    }

    fn init_register_rules(&self, _context: &mut CfaContext<'_>) -> Result<()> {
        Ok(())
    }

    fn read_memory(&self, address: TargetAddr, buffer: &mut [u8]) -> Result<usize> {
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = *self
                .memory
                .get(&(address + i as u64))
                .ok_or(Error::EntryNotFound)?;
        }
        Ok(buffer.len())
    }

    fn read_value_from_memory(&self, address: TargetAddr, value_type: ValueType) -> Option<Variant> {
        let mut buffer = vec![0u8; value_type.byte_size() as usize];
        self.read_memory(address, &mut buffer).ok()?;
        let mut value = 0u64;
        for (i, byte) in buffer.iter().enumerate() {
            value |= (*byte as u64) << (8 * i);
        }
        Some(Variant::Unsigned(value))
    }

    fn read_value_from_indexed_memory(
        &self,
        address_space: TargetAddr,
        address: TargetAddr,
        value_type: ValueType,
    ) -> Option<Variant> {
        self.read_value_from_memory(address_space + address, value_type)
    }
}

// ---- fixture assembly ---------------------------------------------------

/// An abbreviation table with:
///   1: compile_unit (children) name:string low_pc:addr high_pc:addr
///                              stmt_list:sec_offset
///   2: subprogram (no children) name:string low_pc:addr high_pc:addr
///   3: base_type (no children)  name:string
///   4: variable (no children)   name:string type:ref_addr
#[rustfmt::skip]
fn test_abbrev_table() -> Vec<u8> {
    vec![
        0x01, 0x11, 0x01,
            0x03, 0x08,
            0x11, 0x01,
            0x12, 0x01,
            0x10, 0x17,
            0x00, 0x00,
        0x02, 0x2e, 0x00,
            0x03, 0x08,
            0x11, 0x01,
            0x12, 0x01,
            0x00, 0x00,
        0x03, 0x24, 0x00,
            0x03, 0x08,
            0x00, 0x00,
        0x04, 0x34, 0x00,
            0x03, 0x08,
            0x49, 0x10,
            0x00, 0x00,
        0x00,
    ]
}

/// One DWARF32 v4 compilation unit. The caller provides the content (DIE
/// bytes); the header is prepended and the length patched.
fn build_unit(content: &[u8]) -> Vec<u8> {
    let mut unit = Vec::new();
    let length = 2 + 4 + 1 + content.len() as u32; // version..content
    unit.extend_from_slice(&length.to_le_bytes());
    unit.extend_from_slice(&4u16.to_le_bytes()); // version
    unit.extend_from_slice(&0u32.to_le_bytes()); // abbrev offset
    unit.push(8); // address size
    unit.extend_from_slice(content);
    unit
}

fn string_attr(value: &str) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

/// A `.debug_info` with one unit: a CU spanning [0x1000, 0x1040) with a
/// `main` subprogram at [0x1010, 0x1020). `stmt_list` points at offset 0.
fn simple_info_section() -> Vec<u8> {
    let mut content = Vec::new();
    content.push(0x01); // compile_unit
    content.extend_from_slice(&string_attr("test.c"));
    content.extend_from_slice(&0x1000u64.to_le_bytes());
    content.extend_from_slice(&0x1040u64.to_le_bytes());
    content.extend_from_slice(&0u32.to_le_bytes()); // stmt_list
    content.push(0x02); // subprogram
    content.extend_from_slice(&string_attr("main"));
    content.extend_from_slice(&0x1010u64.to_le_bytes());
    content.extend_from_slice(&0x1020u64.to_le_bytes());
    content.push(0x00); // end of children
    build_unit(&content)
}

/// A v2 `.debug_line` for `main.c`: line 5 at 0x1010, line 5 at 0x1018,
/// end of sequence at 0x1020.
fn simple_line_section() -> Vec<u8> {
    let mut header = Vec::new();
    header.push(1); // min instruction length
    header.push(1); // default is_stmt
    header.push(0xfb); // line base -5
    header.push(14); // line range
    header.push(13); // opcode base
    header.extend_from_slice(&[0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1]);
    header.push(0); // end of include directories
    header.extend_from_slice(&string_attr("main.c"));
    header.extend_from_slice(&uleb(0)); // directory index
    header.extend_from_slice(&uleb(0)); // mtime
    header.extend_from_slice(&uleb(0)); // length
    header.push(0); // end of files

    #[rustfmt::skip]
    let mut program = vec![
        0x00, 0x09, 0x02, 0x10, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // set_address 0x1010
        0x03, 0x04, // advance_line +4
        0x01,       // copy
        0x02, 0x08, // advance_pc 8
        0x01,       // copy
        0x02, 0x08, // advance_pc 8
        0x00, 0x01, 0x01, // end_sequence
    ];

    let mut section = Vec::new();
    let unit_length = 2 + 4 + header.len() as u32 + program.len() as u32;
    section.extend_from_slice(&unit_length.to_le_bytes());
    section.extend_from_slice(&2u16.to_le_bytes()); // version
    section.extend_from_slice(&(header.len() as u32).to_le_bytes());
    section.append(&mut header);
    section.append(&mut program);
    section
}

fn load_file(image: Vec<u8>) -> DwarfFile {
    let path = write_temp_image(image);
    let mut file = DwarfFile::new();
    file.start_loading(&path).unwrap();
    file.load(8, None).unwrap();
    file.finish_loading().unwrap();
    std::fs::remove_file(&path).ok();
    file
}

fn write_temp_image(image: Vec<u8>) -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let path = std::env::temp_dir().join(format!(
        "dwarven-test-{}-{}.elf",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&path, image).unwrap();
    path
}

// ---- tests --------------------------------------------------------------

#[test]
fn loads_functions_with_address_and_size() {
    let image = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .section(".debug_line", simple_line_section())
        .build();
    let file = load_file(image);

    assert_eq!(file.count_compilation_units(), 1);

    let functions = file.load_functions(0).unwrap();
    assert_eq!(functions.len(), 1);
    let function = &functions[0];
    assert_eq!(function.name, "main");
    assert_eq!(function.address(), 0x1010);
    assert_eq!(function.size(), 0x10);
}

#[test]
fn resolves_statements_by_address_and_by_source_location() {
    let image = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .section(".debug_line", simple_line_section())
        .build();
    let file = load_file(image);
    let functions = file.load_functions(0).unwrap();
    let function = &functions[0];

    let statement = file.resolve_statement(function, 0x1012).unwrap();
    assert_eq!(statement.start.line, 5);
    assert_eq!(statement.range.start(), 0x1010);
    assert_eq!(statement.range.size(), 8);
    assert!(statement.file.as_deref().unwrap().ends_with("main.c"));

    // the second row of the same line
    let statement = file.resolve_statement(function, 0x1019).unwrap();
    assert_eq!(statement.range.start(), 0x1018);

    // outside the function
    assert!(matches!(
        file.resolve_statement(function, 0x2000),
        Err(Error::EntryNotFound)
    ));

    let statement = file
        .resolve_statement_for_source_location(function, "main.c", 5, 0)
        .unwrap();
    assert_eq!(statement.range.start(), 0x1010);

    assert!(file
        .resolve_statement_for_source_location(function, "main.c", 99, 0)
        .is_err());
}

#[test]
fn global_references_resolve_across_units() {
    // unit A: a CU holding a base type; unit B: a CU with a variable whose
    // type is a DW_FORM_ref_addr into unit A
    let mut unit_a_content = Vec::new();
    unit_a_content.push(0x01);
    unit_a_content.extend_from_slice(&string_attr("a.c"));
    unit_a_content.extend_from_slice(&0u64.to_le_bytes());
    unit_a_content.extend_from_slice(&0u64.to_le_bytes());
    unit_a_content.extend_from_slice(&0u32.to_le_bytes());
    let base_type_offset = 11 + unit_a_content.len() as u32;
    unit_a_content.push(0x03); // base_type
    unit_a_content.extend_from_slice(&string_attr("int"));
    unit_a_content.push(0x00);
    let unit_a = build_unit(&unit_a_content);

    let mut unit_b_content = Vec::new();
    unit_b_content.push(0x01);
    unit_b_content.extend_from_slice(&string_attr("b.c"));
    unit_b_content.extend_from_slice(&0u64.to_le_bytes());
    unit_b_content.extend_from_slice(&0u64.to_le_bytes());
    unit_b_content.extend_from_slice(&0u32.to_le_bytes());
    unit_b_content.push(0x04); // variable
    unit_b_content.extend_from_slice(&string_attr("v"));
    unit_b_content.extend_from_slice(&base_type_offset.to_le_bytes()); // ref_addr
    unit_b_content.push(0x00);
    let unit_b = build_unit(&unit_b_content);

    let mut info = unit_a;
    info.extend_from_slice(&unit_b);

    let image = ImageBuilder::new()
        .section(".debug_info", info)
        .section(".debug_abbrev", test_abbrev_table())
        .build();
    let file = load_file(image);

    assert_eq!(file.count_compilation_units(), 2);

    // find the variable in unit B
    let unit_b = file.compilation_unit_at(1).unwrap();
    let root = unit_b.base().root_entry().unwrap();
    let root_entry = unit_b.base().entry(root).unwrap();
    let variable_ref = root_entry.children()[0];
    let variable = file.entry(variable_ref).unwrap();
    assert_eq!(variable.name(), Some("v"));

    // its type must be unit A's base type
    let type_ref = variable.type_ref().unwrap();
    assert_eq!(type_ref.unit, crate::entries::UnitId::Compilation(0));
    let base_type = file.entry(type_ref).unwrap();
    assert_eq!(base_type.tag(), crate::consts::DW_TAG_base_type);
    assert_eq!(base_type.name(), Some("int"));
}

#[test]
fn unresolved_references_fail_finish_loading_and_stick() {
    // a variable whose type points nowhere
    let mut content = Vec::new();
    content.push(0x01);
    content.extend_from_slice(&string_attr("a.c"));
    content.extend_from_slice(&0u64.to_le_bytes());
    content.extend_from_slice(&0u64.to_le_bytes());
    content.extend_from_slice(&0u32.to_le_bytes());
    content.push(0x04);
    content.extend_from_slice(&string_attr("v"));
    content.extend_from_slice(&0xdeadu32.to_le_bytes()); // bogus ref_addr
    content.push(0x00);

    let image = ImageBuilder::new()
        .section(".debug_info", build_unit(&content))
        .section(".debug_abbrev", test_abbrev_table())
        .build();

    let path = write_temp_image(image);
    let mut file = DwarfFile::new();
    file.start_loading(&path).unwrap();
    file.load(8, None).unwrap();

    assert!(matches!(file.finish_loading(), Err(Error::EntryNotFound)));
    // the error is sticky
    assert!(matches!(file.finish_loading(), Err(Error::EntryNotFound)));
    std::fs::remove_file(&path).ok();
}

#[test]
fn finish_loading_is_idempotent() {
    let image = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .build();

    let path = write_temp_image(image);
    let mut file = DwarfFile::new();
    file.start_loading(&path).unwrap();
    file.load(8, None).unwrap();
    file.finish_loading().unwrap();
    file.finish_loading().unwrap();
    std::fs::remove_file(&path).ok();
}

/// A `.debug_frame` with one CIE (data alignment -4, return-address
/// register 8) and one FDE for [0x1000, 0x1100) whose instructions are
/// `def_cfa r4+16; offset r8, 1`.
fn simple_debug_frame() -> Vec<u8> {
    let mut cie = Vec::new();
    cie.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // CIE id
    cie.push(1); // version
    cie.push(0); // augmentation ""
    cie.extend_from_slice(&uleb(1)); // code alignment
    cie.extend_from_slice(&sleb(-4)); // data alignment
    cie.extend_from_slice(&uleb(8)); // return address register

    let mut fde = Vec::new();
    fde.extend_from_slice(&0u32.to_le_bytes()); // CIE offset
    fde.extend_from_slice(&0x1000u64.to_le_bytes()); // initial location
    fde.extend_from_slice(&0x100u64.to_le_bytes()); // address range
    fde.extend_from_slice(&[0x0c, 0x04, 0x10]); // def_cfa r4+16
    fde.extend_from_slice(&[0x80 | 0x08, 0x01]); // offset r8, 1

    let mut section = Vec::new();
    section.extend_from_slice(&(cie.len() as u32).to_le_bytes());
    section.extend_from_slice(&cie);
    section.extend_from_slice(&(fde.len() as u32).to_le_bytes());
    section.extend_from_slice(&fde);
    section
}

#[test]
fn unwinds_a_frame_from_debug_frame() {
    let image = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .section(".debug_frame", simple_debug_frame())
        .build();
    let file = load_file(image);

    let input = TestTarget::default()
        .with_register(4, 0x7fff_0000)
        .with_memory_word(0x7fff_000c, 0xdead_beef); // CFA - 4
    let mut output = TestTarget::default();

    let frame_address = file
        .unwind_call_frame(Some(0), 8, None, 0x1010, &input, &mut output)
        .unwrap();

    // CFA = r4 + 16
    assert_eq!(frame_address, 0x7fff_0010);
    // r8 was read from memory at CFA + 1 * -4
    assert_eq!(output.written_registers.get(&8), Some(&0xdead_beef));
}

#[test]
fn unwinding_outside_any_fde_is_entry_not_found() {
    let image = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .section(".debug_frame", simple_debug_frame())
        .build();
    let file = load_file(image);

    let input = TestTarget::default();
    let mut output = TestTarget::default();
    assert!(matches!(
        file.unwind_call_frame(Some(0), 8, None, 0x9000, &input, &mut output),
        Err(Error::EntryNotFound)
    ));
}

#[test]
fn eh_frame_cie_sentinel_and_relative_cie_pointer() {
    // the same CIE/FDE pair in .eh_frame flavor: CIE id 0, the FDE's CIE
    // pointer is a back-offset from the field itself
    let mut cie = Vec::new();
    cie.extend_from_slice(&0u32.to_le_bytes()); // CIE id (eh_frame)
    cie.push(1);
    cie.push(0);
    cie.extend_from_slice(&uleb(1));
    cie.extend_from_slice(&sleb(-8));
    cie.extend_from_slice(&uleb(16));

    let cie_total = 4 + cie.len() as u32;

    let mut fde = Vec::new();
    // the CIE pointer field sits at cie_total + 4; its value is the
    // distance back to the CIE's start
    fde.extend_from_slice(&(cie_total + 4).to_le_bytes());
    fde.extend_from_slice(&0x2000u64.to_le_bytes());
    fde.extend_from_slice(&0x40u64.to_le_bytes());
    fde.extend_from_slice(&[0x0c, 0x07, 0x08]); // def_cfa r7+8

    let mut section = Vec::new();
    section.extend_from_slice(&(cie.len() as u32).to_le_bytes());
    section.extend_from_slice(&cie);
    section.extend_from_slice(&(fde.len() as u32).to_le_bytes());
    section.extend_from_slice(&fde);

    let image = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .section(".eh_frame", section)
        .build();
    let file = load_file(image);

    let input = TestTarget::default().with_register(7, 0x5000_0000);
    let mut output = TestTarget::default();

    let frame_address = file
        .unwind_call_frame(Some(0), 8, None, 0x2010, &input, &mut output)
        .unwrap();
    assert_eq!(frame_address, 0x5000_0008);
}

#[test]
fn eh_frame_alone_is_enough_to_load() {
    let mut cie = Vec::new();
    cie.extend_from_slice(&0u32.to_le_bytes());
    cie.push(1);
    cie.push(0);
    cie.extend_from_slice(&uleb(1));
    cie.extend_from_slice(&sleb(-8));
    cie.extend_from_slice(&uleb(16));

    let mut section = Vec::new();
    section.extend_from_slice(&(cie.len() as u32).to_le_bytes());
    section.extend_from_slice(&cie);

    let image = ImageBuilder::new().section(".eh_frame", section).build();

    let path = write_temp_image(image);
    let mut file = DwarfFile::new();
    file.start_loading(&path).unwrap();
    file.load(8, None).unwrap();
    file.finish_loading().unwrap();
    assert_eq!(file.count_compilation_units(), 0);
    std::fs::remove_file(&path).ok();
}

#[test]
fn resolves_variable_locations() {
    // a variable located by the expression `DW_OP_fbreg -8` would need a
    // frame base; use a plain `DW_OP_addr` here
    let mut expression = vec![0x03];
    expression.extend_from_slice(&0x6000u64.to_le_bytes());

    let location = crate::attributes::LocationDescription::Expression(expression.into());

    let image = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .build();
    let file = load_file(image);

    let target = TestTarget::default();
    let result = file
        .resolve_location(Some(0), 8, None, &location, &target, 0x1010, None, 0, 0)
        .unwrap();

    assert_eq!(result.count_pieces(), 1);
    assert_eq!(
        result.piece_at(0).unwrap().storage,
        crate::location::PieceStorage::Memory(0x6000)
    );
}

#[test]
fn evaluates_constant_and_dynamic_values() {
    let image = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .build();
    let file = load_file(image);
    let target = TestTarget::default();

    let value = file
        .evaluate_constant_value(
            Some(0),
            8,
            None,
            &crate::attributes::ConstantValue::Constant(42),
            &target,
            0,
            0,
        )
        .unwrap();
    assert_eq!(value, Variant::Unsigned(42));

    let value = file
        .evaluate_constant_value(
            Some(0),
            8,
            None,
            &crate::attributes::ConstantValue::String("hello".into()),
            &target,
            0,
            0,
        )
        .unwrap();
    assert_eq!(value, Variant::String("hello".to_string()));

    // a block is evaluated as an expression: constu 7; lit1; plus
    let value = file
        .evaluate_dynamic_value(
            Some(0),
            8,
            None,
            &crate::attributes::DynamicValue::Expression(vec![0x10, 0x07, 0x31, 0x22].into()),
            &target,
            0,
            0,
        )
        .unwrap();
    assert_eq!(value.0, Variant::Unsigned(8));
}

#[test]
fn missing_companion_file_is_reported_with_its_name() {
    let mut link = b"missing.debug\0\0\0".to_vec(); // padded to 4 bytes
    link.extend_from_slice(&0u32.to_le_bytes()); // CRC
    let image = ImageBuilder::new()
        .section(".gnu_debuglink", link)
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .build();

    let path = write_temp_image(image);
    let mut file = DwarfFile::new();
    match file.start_loading(&path) {
        Err(Error::MissingDebugInfoFile(name)) => {
            assert_eq!(name, Path::new("missing.debug"));
        }
        other => panic!("expected MissingDebugInfoFile, got {other:?}"),
    }
    std::fs::remove_file(&path).ok();
}

#[test]
fn companion_file_is_found_next_to_the_image() {
    // image with a debug link and no debug sections of its own, companion
    // under <dir>/debug/<name>
    let mut link = b"companion.debug\0".to_vec();
    link.extend_from_slice(&0u32.to_le_bytes());
    let image = ImageBuilder::new().section(".gnu_debuglink", link).build();

    let companion = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .build();

    let base = std::env::temp_dir().join(format!("dwarven-link-{}", std::process::id()));
    let debug_dir = base.join("debug");
    std::fs::create_dir_all(&debug_dir).unwrap();
    let image_path = base.join("binary");
    std::fs::write(&image_path, image).unwrap();
    std::fs::write(debug_dir.join("companion.debug"), companion).unwrap();

    let mut file = DwarfFile::new();
    file.start_loading(&image_path).unwrap();
    file.load(8, None).unwrap();
    file.finish_loading().unwrap();

    assert!(file
        .alternate_name()
        .unwrap()
        .ends_with("debug/companion.debug"));
    assert_eq!(file.count_compilation_units(), 1);
    assert_eq!(file.load_functions(0).unwrap()[0].name, "main");

    std::fs::remove_dir_all(&base).ok();
}

#[test]
fn range_lists_honor_base_address_selection() {
    // ranges at offset 0: base selection to 0x5000, then [0x10, 0x20) and
    // [0x30, 0x38), terminator
    let mut ranges = Vec::new();
    ranges.extend_from_slice(&u64::MAX.to_le_bytes());
    ranges.extend_from_slice(&0x5000u64.to_le_bytes());
    ranges.extend_from_slice(&0x10u64.to_le_bytes());
    ranges.extend_from_slice(&0x20u64.to_le_bytes());
    // an empty range is dropped
    ranges.extend_from_slice(&0x28u64.to_le_bytes());
    ranges.extend_from_slice(&0x28u64.to_le_bytes());
    ranges.extend_from_slice(&0x30u64.to_le_bytes());
    ranges.extend_from_slice(&0x38u64.to_le_bytes());
    ranges.extend_from_slice(&[0u8; 16]);

    let image = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .section(".debug_ranges", ranges)
        .build();
    let file = load_file(image);

    let list = file.resolve_range_list(0, 0).unwrap();
    assert_eq!(list.count_ranges(), 2);
    assert_eq!(list.range_at(0).unwrap().start(), 0x5010);
    assert_eq!(list.range_at(0).unwrap().size(), 0x10);
    assert_eq!(list.range_at(1).unwrap().start(), 0x5030);

    // total length covered matches the emitted ranges, none empty
    let total: u64 = list.ranges().iter().map(|range| range.size()).sum();
    assert_eq!(total, 0x18);
    assert!(list.ranges().iter().all(|range| range.size() > 0));
}

#[test]
fn entry_offsets_are_strictly_ascending() {
    let image = ImageBuilder::new()
        .section(".debug_info", simple_info_section())
        .section(".debug_abbrev", test_abbrev_table())
        .build();
    let file = load_file(image);

    let unit = file.compilation_unit_at(0).unwrap();
    let base = unit.base();
    let offsets: Vec<u64> = (0..base.entry_count()).map(|i| base.entry_offset(i)).collect();
    assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));

    // each offset finds exactly its entry
    for (index, &offset) in offsets.iter().enumerate() {
        assert_eq!(base.entry_index_for_offset(offset), Some(index));
    }
    assert_eq!(base.entry_index_for_offset(1), None);
}
