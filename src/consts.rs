//! DWARF numeric constants.
//!
//! Names follow the spelling of the DWARF specification (DWARF5, appendix
//! 7.5 onwards) rather than Rust naming conventions, so that a constant can
//! be found by grepping for its spec name.
#![allow(non_upper_case_globals)]

// 7.5.4 tag encodings
pub const DW_TAG_array_type: u16 = 0x01;
pub const DW_TAG_class_type: u16 = 0x02;
pub const DW_TAG_entry_point: u16 = 0x03;
pub const DW_TAG_enumeration_type: u16 = 0x04;
pub const DW_TAG_formal_parameter: u16 = 0x05;
pub const DW_TAG_imported_declaration: u16 = 0x08;
pub const DW_TAG_label: u16 = 0x0a;
pub const DW_TAG_lexical_block: u16 = 0x0b;
pub const DW_TAG_member: u16 = 0x0d;
pub const DW_TAG_pointer_type: u16 = 0x0f;
pub const DW_TAG_reference_type: u16 = 0x10;
pub const DW_TAG_compile_unit: u16 = 0x11;
pub const DW_TAG_string_type: u16 = 0x12;
pub const DW_TAG_structure_type: u16 = 0x13;
pub const DW_TAG_subroutine_type: u16 = 0x15;
pub const DW_TAG_typedef: u16 = 0x16;
pub const DW_TAG_union_type: u16 = 0x17;
pub const DW_TAG_unspecified_parameters: u16 = 0x18;
pub const DW_TAG_variant: u16 = 0x19;
pub const DW_TAG_common_block: u16 = 0x1a;
pub const DW_TAG_common_inclusion: u16 = 0x1b;
pub const DW_TAG_inheritance: u16 = 0x1c;
pub const DW_TAG_inlined_subroutine: u16 = 0x1d;
pub const DW_TAG_module: u16 = 0x1e;
pub const DW_TAG_ptr_to_member_type: u16 = 0x1f;
pub const DW_TAG_set_type: u16 = 0x20;
pub const DW_TAG_subrange_type: u16 = 0x21;
pub const DW_TAG_with_stmt: u16 = 0x22;
pub const DW_TAG_access_declaration: u16 = 0x23;
pub const DW_TAG_base_type: u16 = 0x24;
pub const DW_TAG_catch_block: u16 = 0x25;
pub const DW_TAG_const_type: u16 = 0x26;
pub const DW_TAG_constant: u16 = 0x27;
pub const DW_TAG_enumerator: u16 = 0x28;
pub const DW_TAG_file_type: u16 = 0x29;
pub const DW_TAG_friend: u16 = 0x2a;
pub const DW_TAG_namelist: u16 = 0x2b;
pub const DW_TAG_namelist_item: u16 = 0x2c;
pub const DW_TAG_packed_type: u16 = 0x2d;
pub const DW_TAG_subprogram: u16 = 0x2e;
pub const DW_TAG_template_type_parameter: u16 = 0x2f;
pub const DW_TAG_template_value_parameter: u16 = 0x30;
pub const DW_TAG_thrown_type: u16 = 0x31;
pub const DW_TAG_try_block: u16 = 0x32;
pub const DW_TAG_variant_part: u16 = 0x33;
pub const DW_TAG_variable: u16 = 0x34;
pub const DW_TAG_volatile_type: u16 = 0x35;
pub const DW_TAG_dwarf_procedure: u16 = 0x36;
pub const DW_TAG_restrict_type: u16 = 0x37;
pub const DW_TAG_interface_type: u16 = 0x38;
pub const DW_TAG_namespace: u16 = 0x39;
pub const DW_TAG_imported_module: u16 = 0x3a;
pub const DW_TAG_unspecified_type: u16 = 0x3b;
pub const DW_TAG_partial_unit: u16 = 0x3c;
pub const DW_TAG_imported_unit: u16 = 0x3d;
pub const DW_TAG_condition: u16 = 0x3f;
pub const DW_TAG_shared_type: u16 = 0x40;
pub const DW_TAG_type_unit: u16 = 0x41;
pub const DW_TAG_rvalue_reference_type: u16 = 0x42;
pub const DW_TAG_template_alias: u16 = 0x43;

// 7.5.3 children determination
pub const DW_CHILDREN_no: u8 = 0x00;
pub const DW_CHILDREN_yes: u8 = 0x01;

// 7.5.4 attribute encodings
pub const DW_AT_sibling: u16 = 0x01;
pub const DW_AT_location: u16 = 0x02;
pub const DW_AT_name: u16 = 0x03;
pub const DW_AT_ordering: u16 = 0x09;
pub const DW_AT_byte_size: u16 = 0x0b;
pub const DW_AT_bit_offset: u16 = 0x0c;
pub const DW_AT_bit_size: u16 = 0x0d;
pub const DW_AT_stmt_list: u16 = 0x10;
pub const DW_AT_low_pc: u16 = 0x11;
pub const DW_AT_high_pc: u16 = 0x12;
pub const DW_AT_language: u16 = 0x13;
pub const DW_AT_discr: u16 = 0x15;
pub const DW_AT_discr_value: u16 = 0x16;
pub const DW_AT_visibility: u16 = 0x17;
pub const DW_AT_import: u16 = 0x18;
pub const DW_AT_string_length: u16 = 0x19;
pub const DW_AT_common_reference: u16 = 0x1a;
pub const DW_AT_comp_dir: u16 = 0x1b;
pub const DW_AT_const_value: u16 = 0x1c;
pub const DW_AT_containing_type: u16 = 0x1d;
pub const DW_AT_default_value: u16 = 0x1e;
pub const DW_AT_inline: u16 = 0x20;
pub const DW_AT_is_optional: u16 = 0x21;
pub const DW_AT_lower_bound: u16 = 0x22;
pub const DW_AT_producer: u16 = 0x25;
pub const DW_AT_prototyped: u16 = 0x27;
pub const DW_AT_return_addr: u16 = 0x2a;
pub const DW_AT_start_scope: u16 = 0x2c;
pub const DW_AT_bit_stride: u16 = 0x2e;
pub const DW_AT_upper_bound: u16 = 0x2f;
pub const DW_AT_abstract_origin: u16 = 0x31;
pub const DW_AT_accessibility: u16 = 0x32;
pub const DW_AT_address_class: u16 = 0x33;
pub const DW_AT_artificial: u16 = 0x34;
pub const DW_AT_base_types: u16 = 0x35;
pub const DW_AT_calling_convention: u16 = 0x36;
pub const DW_AT_count: u16 = 0x37;
pub const DW_AT_data_member_location: u16 = 0x38;
pub const DW_AT_decl_column: u16 = 0x39;
pub const DW_AT_decl_file: u16 = 0x3a;
pub const DW_AT_decl_line: u16 = 0x3b;
pub const DW_AT_declaration: u16 = 0x3c;
pub const DW_AT_discr_list: u16 = 0x3d;
pub const DW_AT_encoding: u16 = 0x3e;
pub const DW_AT_external: u16 = 0x3f;
pub const DW_AT_frame_base: u16 = 0x40;
pub const DW_AT_friend: u16 = 0x41;
pub const DW_AT_identifier_case: u16 = 0x42;
pub const DW_AT_macro_info: u16 = 0x43;
pub const DW_AT_namelist_item: u16 = 0x44;
pub const DW_AT_priority: u16 = 0x45;
pub const DW_AT_segment: u16 = 0x46;
pub const DW_AT_specification: u16 = 0x47;
pub const DW_AT_static_link: u16 = 0x48;
pub const DW_AT_type: u16 = 0x49;
pub const DW_AT_use_location: u16 = 0x4a;
pub const DW_AT_variable_parameter: u16 = 0x4b;
pub const DW_AT_virtuality: u16 = 0x4c;
pub const DW_AT_vtable_elem_location: u16 = 0x4d;
pub const DW_AT_allocated: u16 = 0x4e;
pub const DW_AT_associated: u16 = 0x4f;
pub const DW_AT_data_location: u16 = 0x50;
pub const DW_AT_byte_stride: u16 = 0x51;
pub const DW_AT_entry_pc: u16 = 0x52;
pub const DW_AT_use_UTF8: u16 = 0x53;
pub const DW_AT_extension: u16 = 0x54;
pub const DW_AT_ranges: u16 = 0x55;
pub const DW_AT_trampoline: u16 = 0x56;
pub const DW_AT_call_column: u16 = 0x57;
pub const DW_AT_call_file: u16 = 0x58;
pub const DW_AT_call_line: u16 = 0x59;
pub const DW_AT_description: u16 = 0x5a;
pub const DW_AT_binary_scale: u16 = 0x5b;
pub const DW_AT_decimal_scale: u16 = 0x5c;
pub const DW_AT_small: u16 = 0x5d;
pub const DW_AT_decimal_sign: u16 = 0x5e;
pub const DW_AT_digit_count: u16 = 0x5f;
pub const DW_AT_picture_string: u16 = 0x60;
pub const DW_AT_mutable: u16 = 0x61;
pub const DW_AT_threads_scaled: u16 = 0x62;
pub const DW_AT_explicit: u16 = 0x63;
pub const DW_AT_object_pointer: u16 = 0x64;
pub const DW_AT_endianity: u16 = 0x65;
pub const DW_AT_elemental: u16 = 0x66;
pub const DW_AT_pure: u16 = 0x67;
pub const DW_AT_recursive: u16 = 0x68;
pub const DW_AT_signature: u16 = 0x69;
pub const DW_AT_main_subprogram: u16 = 0x6a;
pub const DW_AT_data_bit_offset: u16 = 0x6b;
pub const DW_AT_const_expr: u16 = 0x6c;
pub const DW_AT_enum_class: u16 = 0x6d;
pub const DW_AT_linkage_name: u16 = 0x6e;
pub const DW_AT_call_site_value: u16 = 0x7a;
pub const DW_AT_call_site_data_value: u16 = 0x7b;
pub const DW_AT_call_site_target: u16 = 0x7c;
pub const DW_AT_call_site_target_clobbered: u16 = 0x7d;
pub const DW_AT_tail_call: u16 = 0x7e;
pub const DW_AT_all_tail_call_sites: u16 = 0x7f;
pub const DW_AT_all_call_sites: u16 = 0x80;
pub const DW_AT_all_source_call_sites: u16 = 0x81;

// 7.5.6 form encodings
pub const DW_FORM_addr: u16 = 0x01;
pub const DW_FORM_block2: u16 = 0x03;
pub const DW_FORM_block4: u16 = 0x04;
pub const DW_FORM_data2: u16 = 0x05;
pub const DW_FORM_data4: u16 = 0x06;
pub const DW_FORM_data8: u16 = 0x07;
pub const DW_FORM_string: u16 = 0x08;
pub const DW_FORM_block: u16 = 0x09;
pub const DW_FORM_block1: u16 = 0x0a;
pub const DW_FORM_data1: u16 = 0x0b;
pub const DW_FORM_flag: u16 = 0x0c;
pub const DW_FORM_sdata: u16 = 0x0d;
pub const DW_FORM_strp: u16 = 0x0e;
pub const DW_FORM_udata: u16 = 0x0f;
pub const DW_FORM_ref_addr: u16 = 0x10;
pub const DW_FORM_ref1: u16 = 0x11;
pub const DW_FORM_ref2: u16 = 0x12;
pub const DW_FORM_ref4: u16 = 0x13;
pub const DW_FORM_ref8: u16 = 0x14;
pub const DW_FORM_ref_udata: u16 = 0x15;
pub const DW_FORM_indirect: u16 = 0x16;
pub const DW_FORM_sec_offset: u16 = 0x17;
pub const DW_FORM_exprloc: u16 = 0x18;
pub const DW_FORM_flag_present: u16 = 0x19;
pub const DW_FORM_strx: u16 = 0x1a;
pub const DW_FORM_addrx: u16 = 0x1b;
pub const DW_FORM_ref_sup4: u16 = 0x1c;
pub const DW_FORM_strp_sup: u16 = 0x1d;
pub const DW_FORM_data16: u16 = 0x1e;
pub const DW_FORM_line_strp: u16 = 0x1f;
pub const DW_FORM_ref_sig8: u16 = 0x20;
pub const DW_FORM_implicit_const: u16 = 0x21;

// 7.22 line number standard opcodes
pub const DW_LNS_copy: u8 = 0x01;
pub const DW_LNS_advance_pc: u8 = 0x02;
pub const DW_LNS_advance_line: u8 = 0x03;
pub const DW_LNS_set_file: u8 = 0x04;
pub const DW_LNS_set_column: u8 = 0x05;
pub const DW_LNS_negate_stmt: u8 = 0x06;
pub const DW_LNS_set_basic_block: u8 = 0x07;
pub const DW_LNS_const_add_pc: u8 = 0x08;
pub const DW_LNS_fixed_advance_pc: u8 = 0x09;
pub const DW_LNS_set_prologue_end: u8 = 0x0a;
pub const DW_LNS_set_epilogue_begin: u8 = 0x0b;
pub const DW_LNS_set_isa: u8 = 0x0c;

// 7.22 line number extended opcodes
pub const DW_LNE_end_sequence: u8 = 0x01;
pub const DW_LNE_set_address: u8 = 0x02;
pub const DW_LNE_define_file: u8 = 0x03;
pub const DW_LNE_set_discriminator: u8 = 0x04;

// 7.22 line number header entry format content codes (DWARF 5)
pub const DW_LNCT_path: u64 = 0x01;
pub const DW_LNCT_directory_index: u64 = 0x02;
pub const DW_LNCT_timestamp: u64 = 0x03;
pub const DW_LNCT_size: u64 = 0x04;
pub const DW_LNCT_MD5: u64 = 0x05;

// 7.24 call frame instruction encodings. The first three live in the high
// two bits of the opcode byte with an operand in the low six.
pub const DW_CFA_advance_loc: u8 = 0x01;
pub const DW_CFA_offset: u8 = 0x02;
pub const DW_CFA_restore: u8 = 0x03;

pub const DW_CFA_nop: u8 = 0x00;
pub const DW_CFA_set_loc: u8 = 0x01;
pub const DW_CFA_advance_loc1: u8 = 0x02;
pub const DW_CFA_advance_loc2: u8 = 0x03;
pub const DW_CFA_advance_loc4: u8 = 0x04;
pub const DW_CFA_offset_extended: u8 = 0x05;
pub const DW_CFA_restore_extended: u8 = 0x06;
pub const DW_CFA_undefined: u8 = 0x07;
pub const DW_CFA_same_value: u8 = 0x08;
pub const DW_CFA_register: u8 = 0x09;
pub const DW_CFA_remember_state: u8 = 0x0a;
pub const DW_CFA_restore_state: u8 = 0x0b;
pub const DW_CFA_def_cfa: u8 = 0x0c;
pub const DW_CFA_def_cfa_register: u8 = 0x0d;
pub const DW_CFA_def_cfa_offset: u8 = 0x0e;
pub const DW_CFA_def_cfa_expression: u8 = 0x0f;
pub const DW_CFA_expression: u8 = 0x10;
pub const DW_CFA_offset_extended_sf: u8 = 0x11;
pub const DW_CFA_def_cfa_sf: u8 = 0x12;
pub const DW_CFA_def_cfa_offset_sf: u8 = 0x13;
pub const DW_CFA_val_offset: u8 = 0x14;
pub const DW_CFA_val_offset_sf: u8 = 0x15;
pub const DW_CFA_val_expression: u8 = 0x16;

// vendor extensions
pub const DW_CFA_MIPS_advance_loc8: u8 = 0x1d;
pub const DW_CFA_GNU_window_save: u8 = 0x2d;
pub const DW_CFA_GNU_args_size: u8 = 0x2e;
pub const DW_CFA_GNU_negative_offset_extended: u8 = 0x2f;

// 7.7.1 expression opcodes
pub const DW_OP_addr: u8 = 0x03;
pub const DW_OP_deref: u8 = 0x06;
pub const DW_OP_const1u: u8 = 0x08;
pub const DW_OP_const1s: u8 = 0x09;
pub const DW_OP_const2u: u8 = 0x0a;
pub const DW_OP_const2s: u8 = 0x0b;
pub const DW_OP_const4u: u8 = 0x0c;
pub const DW_OP_const4s: u8 = 0x0d;
pub const DW_OP_const8u: u8 = 0x0e;
pub const DW_OP_const8s: u8 = 0x0f;
pub const DW_OP_constu: u8 = 0x10;
pub const DW_OP_consts: u8 = 0x11;
pub const DW_OP_dup: u8 = 0x12;
pub const DW_OP_drop: u8 = 0x13;
pub const DW_OP_over: u8 = 0x14;
pub const DW_OP_pick: u8 = 0x15;
pub const DW_OP_swap: u8 = 0x16;
pub const DW_OP_rot: u8 = 0x17;
pub const DW_OP_xderef: u8 = 0x18;
pub const DW_OP_abs: u8 = 0x19;
pub const DW_OP_and: u8 = 0x1a;
pub const DW_OP_div: u8 = 0x1b;
pub const DW_OP_minus: u8 = 0x1c;
pub const DW_OP_mod: u8 = 0x1d;
pub const DW_OP_mul: u8 = 0x1e;
pub const DW_OP_neg: u8 = 0x1f;
pub const DW_OP_not: u8 = 0x20;
pub const DW_OP_or: u8 = 0x21;
pub const DW_OP_plus: u8 = 0x22;
pub const DW_OP_plus_uconst: u8 = 0x23;
pub const DW_OP_shl: u8 = 0x24;
pub const DW_OP_shr: u8 = 0x25;
pub const DW_OP_shra: u8 = 0x26;
pub const DW_OP_xor: u8 = 0x27;
pub const DW_OP_bra: u8 = 0x28;
pub const DW_OP_eq: u8 = 0x29;
pub const DW_OP_ge: u8 = 0x2a;
pub const DW_OP_gt: u8 = 0x2b;
pub const DW_OP_le: u8 = 0x2c;
pub const DW_OP_lt: u8 = 0x2d;
pub const DW_OP_ne: u8 = 0x2e;
pub const DW_OP_skip: u8 = 0x2f;
pub const DW_OP_lit0: u8 = 0x30;
pub const DW_OP_lit31: u8 = 0x4f;
pub const DW_OP_reg0: u8 = 0x50;
pub const DW_OP_reg31: u8 = 0x6f;
pub const DW_OP_breg0: u8 = 0x70;
pub const DW_OP_breg31: u8 = 0x8f;
pub const DW_OP_regx: u8 = 0x90;
pub const DW_OP_fbreg: u8 = 0x91;
pub const DW_OP_bregx: u8 = 0x92;
pub const DW_OP_piece: u8 = 0x93;
pub const DW_OP_deref_size: u8 = 0x94;
pub const DW_OP_xderef_size: u8 = 0x95;
pub const DW_OP_nop: u8 = 0x96;
pub const DW_OP_push_object_address: u8 = 0x97;
pub const DW_OP_call2: u8 = 0x98;
pub const DW_OP_call4: u8 = 0x99;
pub const DW_OP_call_ref: u8 = 0x9a;
pub const DW_OP_form_tls_address: u8 = 0x9b;
pub const DW_OP_call_frame_cfa: u8 = 0x9c;
pub const DW_OP_bit_piece: u8 = 0x9d;

// DW_AT_inline codes
pub const DW_INL_not_inlined: u8 = 0x00;
pub const DW_INL_inlined: u8 = 0x01;
pub const DW_INL_declared_not_inlined: u8 = 0x02;
pub const DW_INL_declared_inlined: u8 = 0x03;

/// Human-readable tag name, for logging.
pub fn tag_name(tag: u16) -> &'static str {
    match tag {
        DW_TAG_array_type => "DW_TAG_array_type",
        DW_TAG_class_type => "DW_TAG_class_type",
        DW_TAG_entry_point => "DW_TAG_entry_point",
        DW_TAG_enumeration_type => "DW_TAG_enumeration_type",
        DW_TAG_formal_parameter => "DW_TAG_formal_parameter",
        DW_TAG_imported_declaration => "DW_TAG_imported_declaration",
        DW_TAG_label => "DW_TAG_label",
        DW_TAG_lexical_block => "DW_TAG_lexical_block",
        DW_TAG_member => "DW_TAG_member",
        DW_TAG_pointer_type => "DW_TAG_pointer_type",
        DW_TAG_reference_type => "DW_TAG_reference_type",
        DW_TAG_compile_unit => "DW_TAG_compile_unit",
        DW_TAG_string_type => "DW_TAG_string_type",
        DW_TAG_structure_type => "DW_TAG_structure_type",
        DW_TAG_subroutine_type => "DW_TAG_subroutine_type",
        DW_TAG_typedef => "DW_TAG_typedef",
        DW_TAG_union_type => "DW_TAG_union_type",
        DW_TAG_unspecified_parameters => "DW_TAG_unspecified_parameters",
        DW_TAG_variant => "DW_TAG_variant",
        DW_TAG_common_block => "DW_TAG_common_block",
        DW_TAG_common_inclusion => "DW_TAG_common_inclusion",
        DW_TAG_inheritance => "DW_TAG_inheritance",
        DW_TAG_inlined_subroutine => "DW_TAG_inlined_subroutine",
        DW_TAG_module => "DW_TAG_module",
        DW_TAG_ptr_to_member_type => "DW_TAG_ptr_to_member_type",
        DW_TAG_set_type => "DW_TAG_set_type",
        DW_TAG_subrange_type => "DW_TAG_subrange_type",
        DW_TAG_with_stmt => "DW_TAG_with_stmt",
        DW_TAG_access_declaration => "DW_TAG_access_declaration",
        DW_TAG_base_type => "DW_TAG_base_type",
        DW_TAG_catch_block => "DW_TAG_catch_block",
        DW_TAG_const_type => "DW_TAG_const_type",
        DW_TAG_constant => "DW_TAG_constant",
        DW_TAG_enumerator => "DW_TAG_enumerator",
        DW_TAG_file_type => "DW_TAG_file_type",
        DW_TAG_friend => "DW_TAG_friend",
        DW_TAG_namelist => "DW_TAG_namelist",
        DW_TAG_namelist_item => "DW_TAG_namelist_item",
        DW_TAG_packed_type => "DW_TAG_packed_type",
        DW_TAG_subprogram => "DW_TAG_subprogram",
        DW_TAG_template_type_parameter => "DW_TAG_template_type_parameter",
        DW_TAG_template_value_parameter => "DW_TAG_template_value_parameter",
        DW_TAG_thrown_type => "DW_TAG_thrown_type",
        DW_TAG_try_block => "DW_TAG_try_block",
        DW_TAG_variant_part => "DW_TAG_variant_part",
        DW_TAG_variable => "DW_TAG_variable",
        DW_TAG_volatile_type => "DW_TAG_volatile_type",
        DW_TAG_dwarf_procedure => "DW_TAG_dwarf_procedure",
        DW_TAG_restrict_type => "DW_TAG_restrict_type",
        DW_TAG_interface_type => "DW_TAG_interface_type",
        DW_TAG_namespace => "DW_TAG_namespace",
        DW_TAG_imported_module => "DW_TAG_imported_module",
        DW_TAG_unspecified_type => "DW_TAG_unspecified_type",
        DW_TAG_partial_unit => "DW_TAG_partial_unit",
        DW_TAG_imported_unit => "DW_TAG_imported_unit",
        DW_TAG_condition => "DW_TAG_condition",
        DW_TAG_shared_type => "DW_TAG_shared_type",
        DW_TAG_type_unit => "DW_TAG_type_unit",
        DW_TAG_rvalue_reference_type => "DW_TAG_rvalue_reference_type",
        DW_TAG_template_alias => "DW_TAG_template_alias",
        _ => "DW_TAG_<unknown>",
    }
}
