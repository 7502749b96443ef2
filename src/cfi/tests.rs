use super::*;
use crate::elf::ElfFile;
use crate::test_image::ImageBuilder;

fn with_section(data: Vec<u8>, test: impl for<'a> FnOnce(&ElfFile, &ElfSection<'a>, DataReader<'a>)) {
    let image = ImageBuilder::new().section(".eh_frame", data).build();
    let elf = ElfFile::from_bytes(image).unwrap();
    let section = elf.section(".eh_frame").unwrap();
    let reader = DataReader::new(section.data, 8);
    test(&elf, &section, reader);
}

#[test]
fn augmentation_z_r_block() {
    // augmentation string "zR", data block of one byte: encoding 0x1b
    // (pcrel | sdata4), as emitted by gcc for .eh_frame
    #[rustfmt::skip]
    let data = [
        b'z', b'R', 0x00,
        // alignment fields would sit here in a real CIE; the augmentation
        // block parser only sees the block itself
        0x01, 0x1b,
    ];
    let mut reader = DataReader::new(&data, 8);

    let mut augmentation = CieAugmentation::default();
    augmentation.init(&mut reader);
    assert_eq!(augmentation.string(), "zR");

    augmentation.read(&mut reader).unwrap();
    assert!(augmentation.has_data());
    assert!(augmentation.has_fde_address_format());
    assert_eq!(augmentation.fde_address_type(), CFI_ADDRESS_TYPE_PC_RELATIVE);
}

#[test]
fn augmentation_eh_and_empty() {
    let mut reader = DataReader::new(b"eh\0", 8);
    let mut augmentation = CieAugmentation::default();
    augmentation.init(&mut reader);
    augmentation.read(&mut reader).unwrap();
    assert!(!augmentation.has_data());

    let mut reader = DataReader::new(b"\0", 8);
    let mut augmentation = CieAugmentation::default();
    augmentation.init(&mut reader);
    augmentation.read(&mut reader).unwrap();
    assert_eq!(augmentation.string(), "");
}

#[test]
fn unknown_augmentation_is_unsupported() {
    let mut reader = DataReader::new(b"zX\0\x00", 8);
    let mut augmentation = CieAugmentation::default();
    augmentation.init(&mut reader);
    assert!(matches!(
        augmentation.read(&mut reader),
        Err(Error::Unsupported(_))
    ));

    let mut reader = DataReader::new(b"weird\0", 8);
    let mut augmentation = CieAugmentation::default();
    augmentation.init(&mut reader);
    assert!(augmentation.read(&mut reader).is_err());
}

#[test]
fn encoded_addresses_cover_all_value_formats() {
    let mut augmentation = CieAugmentation::default();

    // default: absolute target-address word
    let mut reader = DataReader::new(&[0x00, 0x10, 0, 0, 0, 0, 0, 0], 8);
    assert_eq!(
        augmentation.read_encoded_address(&mut reader, None, None, true),
        0x1000
    );

    // udata2 / sdata4 via the "R" byte
    let data = [b'z', b'R', 0x00, 0x01, 0x02];
    let mut reader = DataReader::new(&data, 8);
    augmentation.init(&mut reader);
    augmentation.read(&mut reader).unwrap();
    let mut reader = DataReader::new(&[0x34, 0x12], 8);
    assert_eq!(
        augmentation.read_encoded_address(&mut reader, None, None, true),
        0x1234
    );

    let data = [b'z', b'R', 0x00, 0x01, 0x0b];
    let mut reader = DataReader::new(&data, 8);
    augmentation.init(&mut reader);
    augmentation.read(&mut reader).unwrap();
    let bytes = (-8i32).to_le_bytes();
    let mut reader = DataReader::new(&bytes, 8);
    assert_eq!(
        augmentation.read_encoded_address(&mut reader, None, None, true),
        (-8i64) as u64
    );

    // uleb128
    let data = [b'z', b'R', 0x00, 0x01, 0x01];
    let mut reader = DataReader::new(&data, 8);
    augmentation.init(&mut reader);
    augmentation.read(&mut reader).unwrap();
    let mut reader = DataReader::new(&[0xe5, 0x8e, 0x26], 8);
    assert_eq!(
        augmentation.read_encoded_address(&mut reader, None, None, true),
        624485
    );
}

#[test]
fn fde_index_lookup_is_binary_search_with_interval_test() {
    let infos = vec![
        FdeLookupInfo { start: 0x1000, end: 0x1100, fde_offset: 0, cie_offset: 0, eh_frame: false },
        FdeLookupInfo { start: 0x2000, end: 0x2100, fde_offset: 24, cie_offset: 0, eh_frame: false },
        FdeLookupInfo { start: 0x3000, end: 0x3100, fde_offset: 48, cie_offset: 0, eh_frame: false },
    ];

    assert_eq!(lookup_fde(&infos, 0x1000).unwrap().fde_offset, 0);
    assert_eq!(lookup_fde(&infos, 0x20ff).unwrap().fde_offset, 24);
    assert_eq!(lookup_fde(&infos, 0x3080).unwrap().fde_offset, 48);
    assert!(lookup_fde(&infos, 0x1500).is_none());
    assert!(lookup_fde(&infos, 0x0fff).is_none());
    assert!(lookup_fde(&[], 0x1000).is_none());

    // ranges are half-open: the end address itself is not covered
    assert!(lookup_fde(&infos, 0x1100).is_none());

    // a single-byte range covers exactly its start
    let tiny =
        [FdeLookupInfo { start: 0x4000, end: 0x4001, fde_offset: 0, cie_offset: 0, eh_frame: false }];
    assert_eq!(lookup_fde(&tiny, 0x4000).unwrap().start, 0x4000);
    assert!(lookup_fde(&tiny, 0x4001).is_none());

    // an empty range covers nothing
    let empty =
        [FdeLookupInfo { start: 0x5000, end: 0x5000, fde_offset: 0, cie_offset: 0, eh_frame: false }];
    assert!(lookup_fde(&empty, 0x5000).is_none());
}

#[test]
fn def_cfa_and_offset_rules() {
    // def_cfa r4+16; offset r8 at cfa + 1 * data_alignment
    #[rustfmt::skip]
    let instructions = vec![
        0x0c, 0x04, 0x10,   // DW_CFA_def_cfa
        0x80 | 0x08, 0x01,  // DW_CFA_offset r8, factored offset 1
    ];

    with_section(instructions, |elf, section, mut reader| {
        let mut context = CfaContext::new(16);
        context.set_location(0x1010, 0x1000);
        context.set_code_alignment(1);
        context.set_data_alignment(-4);

        let augmentation = CieAugmentation::default();
        parse_frame_instructions(&mut context, &mut reader, &augmentation, elf, section)
            .unwrap();

        assert_eq!(
            *context.cfa_rule(),
            CfaCfaRule::RegisterOffset { register: 4, offset: 16 }
        );
        assert_eq!(*context.register_rule(8).unwrap(), CfaRule::LocationOffset(-4));
    });
}

#[test]
fn advance_loc_stops_at_the_target_location() {
    // advance_loc 4; def_cfa r5+8  -- the def_cfa lies beyond the target
    #[rustfmt::skip]
    let instructions = vec![
        0x40 | 0x04,
        0x0c, 0x05, 0x08,
    ];

    with_section(instructions, |elf, section, mut reader| {
        let mut context = CfaContext::new(16);
        context.set_location(0x1002, 0x1000);
        context.set_code_alignment(1);

        parse_frame_instructions(
            &mut context,
            &mut reader,
            &CieAugmentation::default(),
            elf,
            section,
        )
        .unwrap();

        // the rule beyond the PC was never applied
        assert_eq!(*context.cfa_rule(), CfaCfaRule::Undefined);
    });
}

#[test]
fn remember_and_restore_deep_copy_rule_sets() {
    #[rustfmt::skip]
    let instructions = vec![
        0x80 | 0x03, 0x02,  // offset r3, 2
        0x0a,               // remember_state
        0x07, 0x03,         // undefined r3
        0x0b,               // restore_state
    ];

    with_section(instructions, |elf, section, mut reader| {
        let mut context = CfaContext::new(8);
        context.set_location(0x1010, 0x1000);
        context.set_code_alignment(1);
        context.set_data_alignment(-8);

        parse_frame_instructions(
            &mut context,
            &mut reader,
            &CieAugmentation::default(),
            elf,
            section,
        )
        .unwrap();

        // the popped state still has the offset rule
        assert_eq!(*context.register_rule(3).unwrap(), CfaRule::LocationOffset(-16));
    });
}

#[test]
fn restore_state_without_remember_is_bad_data() {
    with_section(vec![0x0b], |elf, section, mut reader| {
        let mut context = CfaContext::new(8);
        let result = parse_frame_instructions(
            &mut context,
            &mut reader,
            &CieAugmentation::default(),
            elf,
            section,
        );
        assert!(result.is_err());
    });
}

#[test]
fn restore_uses_the_cie_initial_rules() {
    with_section(vec![0xc0 | 0x05], |elf, section, mut reader| {
        let mut context = CfaContext::new(8);
        context.set_location(0x1010, 0x1000);
        context.set_code_alignment(1);

        // pretend the CIE installed a same-value rule for r5, then the FDE
        // clobbered it
        *context.register_rule_mut(5).unwrap() = CfaRule::SameValue;
        context.save_initial_rule_set();
        *context.register_rule_mut(5).unwrap() = CfaRule::Undefined;

        parse_frame_instructions(
            &mut context,
            &mut reader,
            &CieAugmentation::default(),
            elf,
            section,
        )
        .unwrap();

        assert_eq!(*context.register_rule(5).unwrap(), CfaRule::SameValue);
    });
}

#[test]
fn register_rule_copies_from_another_register() {
    // DW_CFA_register r2 <- r7
    with_section(vec![0x09, 0x02, 0x07], |elf, section, mut reader| {
        let mut context = CfaContext::new(8);
        context.set_location(0x1010, 0x1000);

        parse_frame_instructions(
            &mut context,
            &mut reader,
            &CieAugmentation::default(),
            elf,
            section,
        )
        .unwrap();

        assert_eq!(*context.register_rule(2).unwrap(), CfaRule::Register(7));
    });
}
