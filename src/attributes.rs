//! Attribute classification and attribute values.
//!
//! DWARF attributes are (name, form) pairs. The *name* limits which value
//! classes make sense for it, the *form* decides which classes the encoded
//! bytes can be read as; the attribute's effective class is the
//! highest-numbered class both agree on. Unknown combinations are skipped by
//! the parser rather than treated as fatal.

#[cfg(test)]
mod tests;

use bitflags::bitflags;

use crate::consts::*;
use crate::entries::DieRef;
use crate::types::TargetAddr;

/// The value class an attribute was decoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum AttributeClass {
    Unknown = 0,
    Address = 1,
    Block = 2,
    Constant = 3,
    Flag = 4,
    LinePtr = 5,
    LocListPtr = 6,
    MacPtr = 7,
    RangeListPtr = 8,
    Reference = 9,
    String = 10,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClassSet: u16 {
        const ADDRESS = 1 << 0;
        const BLOCK = 1 << 1;
        const CONSTANT = 1 << 2;
        const FLAG = 1 << 3;
        const LINEPTR = 1 << 4;
        const LOCLISTPTR = 1 << 5;
        const MACPTR = 1 << 6;
        const RANGELISTPTR = 1 << 7;
        const REFERENCE = 1 << 8;
        const STRING = 1 << 9;
    }
}

/// Classes an attribute *name* may legally carry (DWARF 4, figure 20).
pub fn attribute_name_classes(name: u16) -> ClassSet {
    use ClassSet as C;
    match name {
        DW_AT_sibling => C::REFERENCE,
        DW_AT_location => C::BLOCK | C::LOCLISTPTR,
        DW_AT_name => C::STRING,
        DW_AT_ordering => C::CONSTANT,
        DW_AT_byte_size => C::BLOCK | C::CONSTANT | C::REFERENCE,
        DW_AT_bit_offset => C::BLOCK | C::CONSTANT | C::REFERENCE,
        DW_AT_bit_size => C::BLOCK | C::CONSTANT | C::REFERENCE,
        DW_AT_stmt_list => C::LINEPTR,
        DW_AT_low_pc => C::ADDRESS | C::CONSTANT | C::REFERENCE,
        DW_AT_high_pc => C::ADDRESS | C::CONSTANT | C::REFERENCE,
        DW_AT_language => C::CONSTANT,
        DW_AT_discr => C::REFERENCE,
        DW_AT_discr_value => C::CONSTANT,
        DW_AT_visibility => C::CONSTANT,
        DW_AT_import => C::REFERENCE,
        DW_AT_string_length => C::BLOCK | C::LOCLISTPTR,
        DW_AT_common_reference => C::REFERENCE,
        DW_AT_comp_dir => C::STRING,
        DW_AT_const_value => C::BLOCK | C::CONSTANT | C::STRING,
        DW_AT_containing_type => C::REFERENCE,
        DW_AT_default_value => C::REFERENCE | C::CONSTANT | C::FLAG,
        DW_AT_inline => C::CONSTANT,
        DW_AT_is_optional => C::FLAG,
        DW_AT_lower_bound => C::BLOCK | C::CONSTANT | C::REFERENCE,
        DW_AT_producer => C::STRING,
        DW_AT_prototyped => C::FLAG,
        DW_AT_return_addr => C::BLOCK | C::LOCLISTPTR,
        DW_AT_start_scope => C::CONSTANT,
        DW_AT_bit_stride => C::BLOCK | C::CONSTANT | C::REFERENCE,
        DW_AT_upper_bound => C::BLOCK | C::CONSTANT | C::REFERENCE,
        DW_AT_abstract_origin => C::REFERENCE,
        DW_AT_accessibility => C::CONSTANT,
        DW_AT_address_class => C::CONSTANT,
        DW_AT_artificial => C::FLAG,
        DW_AT_base_types => C::REFERENCE,
        DW_AT_calling_convention => C::CONSTANT,
        DW_AT_count => C::BLOCK | C::CONSTANT | C::REFERENCE,
        DW_AT_data_member_location => C::BLOCK | C::CONSTANT | C::LOCLISTPTR,
        DW_AT_decl_column => C::CONSTANT,
        DW_AT_decl_file => C::CONSTANT,
        DW_AT_decl_line => C::CONSTANT,
        DW_AT_declaration => C::FLAG,
        DW_AT_discr_list => C::BLOCK,
        DW_AT_encoding => C::CONSTANT,
        DW_AT_external => C::FLAG,
        DW_AT_frame_base => C::BLOCK | C::LOCLISTPTR,
        DW_AT_friend => C::REFERENCE,
        DW_AT_identifier_case => C::CONSTANT,
        DW_AT_macro_info => C::MACPTR,
        DW_AT_namelist_item => C::BLOCK | C::REFERENCE,
        DW_AT_priority => C::REFERENCE,
        DW_AT_segment => C::BLOCK | C::LOCLISTPTR,
        DW_AT_specification => C::REFERENCE,
        DW_AT_static_link => C::BLOCK | C::LOCLISTPTR,
        DW_AT_type => C::REFERENCE,
        DW_AT_use_location => C::BLOCK | C::LOCLISTPTR,
        DW_AT_variable_parameter => C::FLAG,
        DW_AT_virtuality => C::CONSTANT,
        DW_AT_vtable_elem_location => C::BLOCK | C::LOCLISTPTR,
        DW_AT_allocated => C::BLOCK | C::CONSTANT | C::REFERENCE,
        DW_AT_associated => C::BLOCK | C::CONSTANT | C::REFERENCE,
        DW_AT_data_location => C::BLOCK,
        DW_AT_byte_stride => C::BLOCK | C::CONSTANT | C::REFERENCE,
        DW_AT_entry_pc => C::ADDRESS,
        DW_AT_use_UTF8 => C::FLAG,
        DW_AT_extension => C::REFERENCE,
        DW_AT_ranges => C::RANGELISTPTR,
        DW_AT_trampoline => C::ADDRESS | C::FLAG | C::REFERENCE | C::STRING,
        DW_AT_call_column => C::CONSTANT,
        DW_AT_call_file => C::CONSTANT,
        DW_AT_call_line => C::CONSTANT,
        DW_AT_description => C::STRING,
        DW_AT_binary_scale => C::CONSTANT,
        DW_AT_decimal_scale => C::CONSTANT,
        DW_AT_small => C::REFERENCE,
        DW_AT_decimal_sign => C::CONSTANT,
        DW_AT_digit_count => C::CONSTANT,
        DW_AT_picture_string => C::STRING,
        DW_AT_mutable => C::FLAG,
        DW_AT_threads_scaled => C::FLAG,
        DW_AT_explicit => C::FLAG,
        DW_AT_object_pointer => C::REFERENCE,
        DW_AT_endianity => C::CONSTANT,
        DW_AT_elemental => C::FLAG,
        DW_AT_pure => C::FLAG,
        DW_AT_recursive => C::FLAG,
        DW_AT_signature => C::REFERENCE,
        DW_AT_main_subprogram => C::FLAG,
        DW_AT_data_bit_offset => C::CONSTANT,
        DW_AT_const_expr => C::FLAG,
        DW_AT_enum_class => C::FLAG,
        DW_AT_linkage_name => C::STRING,
        DW_AT_call_site_value
        | DW_AT_call_site_data_value
        | DW_AT_call_site_target
        | DW_AT_call_site_target_clobbered => C::BLOCK,
        DW_AT_tail_call
        | DW_AT_all_tail_call_sites
        | DW_AT_all_call_sites
        | DW_AT_all_source_call_sites => C::FLAG,
        _ => C::empty(),
    }
}

/// Classes an attribute *form* can be decoded as (DWARF 4, figure 21).
pub fn attribute_form_classes(form: u16) -> ClassSet {
    use ClassSet as C;
    match form {
        DW_FORM_addr => C::ADDRESS,
        DW_FORM_block | DW_FORM_block1 | DW_FORM_block2 | DW_FORM_block4 | DW_FORM_exprloc => {
            C::BLOCK
        }
        DW_FORM_data1 | DW_FORM_data2 => C::CONSTANT,
        DW_FORM_data4 | DW_FORM_data8 => {
            C::CONSTANT | C::LINEPTR | C::LOCLISTPTR | C::MACPTR | C::RANGELISTPTR
        }
        DW_FORM_string | DW_FORM_strp | DW_FORM_line_strp => C::STRING,
        DW_FORM_flag | DW_FORM_flag_present => C::FLAG,
        DW_FORM_sdata | DW_FORM_udata | DW_FORM_implicit_const => C::CONSTANT,
        DW_FORM_ref_addr
        | DW_FORM_ref1
        | DW_FORM_ref2
        | DW_FORM_ref4
        | DW_FORM_ref8
        | DW_FORM_ref_udata
        | DW_FORM_indirect
        | DW_FORM_ref_sig8 => C::REFERENCE,
        DW_FORM_sec_offset => C::LINEPTR | C::LOCLISTPTR | C::MACPTR | C::RANGELISTPTR,
        _ => C::empty(),
    }
}

/// The effective class of a (name, form) pair: the highest-numbered class in
/// the intersection of what the name allows and what the form provides, or
/// [`AttributeClass::Unknown`] when they don't overlap.
pub fn attribute_class(name: u16, form: u16) -> AttributeClass {
    let classes = attribute_name_classes(name) & attribute_form_classes(form);

    let mut best = AttributeClass::Unknown;
    for (bit, class) in [
        (ClassSet::ADDRESS, AttributeClass::Address),
        (ClassSet::BLOCK, AttributeClass::Block),
        (ClassSet::CONSTANT, AttributeClass::Constant),
        (ClassSet::FLAG, AttributeClass::Flag),
        (ClassSet::LINEPTR, AttributeClass::LinePtr),
        (ClassSet::LOCLISTPTR, AttributeClass::LocListPtr),
        (ClassSet::MACPTR, AttributeClass::MacPtr),
        (ClassSet::RANGELISTPTR, AttributeClass::RangeListPtr),
        (ClassSet::REFERENCE, AttributeClass::Reference),
        (ClassSet::STRING, AttributeClass::String),
    ] {
        if classes.contains(bit) {
            best = class;
        }
    }
    best
}

/// A decoded attribute value, borrowed from section data where possible.
/// Lives only for the duration of the attribute pass; DIE setters copy what
/// they keep.
#[derive(Debug, Clone, Copy)]
pub enum AttributeValue<'data> {
    Address(TargetAddr),
    Block(&'data [u8]),
    Constant { value: u64, signed: bool },
    Flag(bool),
    LinePointer(u64),
    LocationListPointer(u64),
    MacroPointer(u64),
    RangeListPointer(u64),
    Reference(DieRef),
    String(&'data str),
}

impl AttributeValue<'_> {
    pub fn constant(&self) -> u64 {
        match self {
            AttributeValue::Constant { value, .. } => *value,
            _ => 0,
        }
    }
}

/// A value that may be constant, a reference to another DIE, or computed by
/// an expression (`DW_AT_byte_size` and friends).
#[derive(Debug, Clone, Default)]
pub enum DynamicValue {
    #[default]
    Unset,
    Constant(u64),
    Reference(DieRef),
    Expression(Box<[u8]>),
}

impl DynamicValue {
    pub fn is_set(&self) -> bool {
        !matches!(self, DynamicValue::Unset)
    }

    pub fn set_from(&mut self, value: &AttributeValue<'_>) -> SetOutcome {
        *self = match value {
            AttributeValue::Constant { value, .. } => DynamicValue::Constant(*value),
            AttributeValue::Reference(reference) => DynamicValue::Reference(*reference),
            AttributeValue::Block(block) => DynamicValue::Expression((*block).into()),
            _ => return SetOutcome::BadData,
        };
        SetOutcome::Set
    }
}

/// A `DW_AT_const_value`: constant, string, or raw block.
#[derive(Debug, Clone, Default)]
pub enum ConstantValue {
    #[default]
    Unset,
    Constant(u64),
    String(Box<str>),
    Block(Box<[u8]>),
}

impl ConstantValue {
    pub fn is_set(&self) -> bool {
        !matches!(self, ConstantValue::Unset)
    }

    pub fn set_from(&mut self, value: &AttributeValue<'_>) -> SetOutcome {
        *self = match value {
            AttributeValue::Constant { value, .. } => ConstantValue::Constant(*value),
            AttributeValue::String(string) => ConstantValue::String((*string).into()),
            AttributeValue::Block(block) => ConstantValue::Block((*block).into()),
            _ => return SetOutcome::BadData,
        };
        SetOutcome::Set
    }
}

/// A `DW_AT_data_member_location`: constant offset, expression, or location
/// list.
#[derive(Debug, Clone, Default)]
pub enum MemberLocation {
    #[default]
    Unset,
    Constant(u64),
    Expression(Box<[u8]>),
    LocationList(u64),
}

impl MemberLocation {
    pub fn set_from(&mut self, value: &AttributeValue<'_>) -> SetOutcome {
        *self = match value {
            AttributeValue::Constant { value, .. } => MemberLocation::Constant(*value),
            AttributeValue::Block(block) => MemberLocation::Expression((*block).into()),
            AttributeValue::LocationListPointer(offset) => MemberLocation::LocationList(*offset),
            _ => return SetOutcome::BadData,
        };
        SetOutcome::Set
    }
}

/// A location description: either an expression to evaluate or an offset
/// into the location-list section selecting an expression by PC.
#[derive(Debug, Clone, Default)]
pub enum LocationDescription {
    #[default]
    Unset,
    Expression(Box<[u8]>),
    LocationList(u64),
}

impl LocationDescription {
    pub fn is_valid(&self) -> bool {
        match self {
            LocationDescription::Unset => false,
            LocationDescription::Expression(expression) => !expression.is_empty(),
            LocationDescription::LocationList(_) => true,
        }
    }

    pub fn set_from(&mut self, value: &AttributeValue<'_>) -> SetOutcome {
        *self = match value {
            AttributeValue::Block(block) => LocationDescription::Expression((*block).into()),
            AttributeValue::LocationListPointer(offset) => {
                LocationDescription::LocationList(*offset)
            }
            _ => return SetOutcome::BadData,
        };
        SetOutcome::Set
    }
}

/// Where an entity was declared: optional (file, line, column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclarationLocation {
    pub file: Option<u32>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// What a DIE attribute setter did with the value it was offered.
///
/// `NotHandled` is a benign skip (the entry kind has no use for that
/// attribute); `BadData` means the value class made no sense for the
/// attribute and is logged but does not abort the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Set,
    NotHandled,
    BadData,
}

pub type AttributeSetter =
    fn(&mut crate::entries::DebugInfoEntry, u16, &AttributeValue<'_>) -> SetOutcome;

/// The static attribute-name → setter table. Attribute names without a
/// setter are consumed and dropped by the parser.
pub fn attribute_setter(name: u16) -> Option<AttributeSetter> {
    use crate::entries::setters;
    Some(match name {
        DW_AT_sibling => setters::set_sibling,
        DW_AT_location => setters::set_location,
        DW_AT_name => setters::set_name,
        DW_AT_ordering => setters::set_ordering,
        DW_AT_byte_size => setters::set_byte_size,
        DW_AT_bit_offset => setters::set_bit_offset,
        DW_AT_bit_size => setters::set_bit_size,
        DW_AT_stmt_list => setters::set_stmt_list,
        DW_AT_low_pc => setters::set_low_pc,
        DW_AT_high_pc => setters::set_high_pc,
        DW_AT_language => setters::set_language,
        DW_AT_comp_dir => setters::set_comp_dir,
        DW_AT_const_value => setters::set_const_value,
        DW_AT_containing_type => setters::set_containing_type,
        DW_AT_inline => setters::set_inline,
        DW_AT_lower_bound => setters::set_lower_bound,
        DW_AT_producer => setters::set_producer,
        DW_AT_prototyped => setters::set_prototyped,
        DW_AT_bit_stride => setters::set_bit_stride,
        DW_AT_upper_bound => setters::set_upper_bound,
        DW_AT_abstract_origin => setters::set_abstract_origin,
        DW_AT_accessibility => setters::set_accessibility,
        DW_AT_address_class => setters::set_address_class,
        DW_AT_base_types => setters::set_base_types,
        DW_AT_count => setters::set_count,
        DW_AT_data_member_location => setters::set_data_member_location,
        DW_AT_decl_column => setters::set_decl_column,
        DW_AT_decl_file => setters::set_decl_file,
        DW_AT_decl_line => setters::set_decl_line,
        DW_AT_declaration => setters::set_declaration,
        DW_AT_encoding => setters::set_encoding,
        DW_AT_frame_base => setters::set_frame_base,
        DW_AT_identifier_case => setters::set_identifier_case,
        DW_AT_macro_info => setters::set_macro_info,
        DW_AT_specification => setters::set_specification,
        DW_AT_type => setters::set_type,
        DW_AT_use_location => setters::set_use_location,
        DW_AT_allocated => setters::set_allocated,
        DW_AT_associated => setters::set_associated,
        DW_AT_byte_stride => setters::set_byte_stride,
        DW_AT_entry_pc => setters::set_entry_pc,
        DW_AT_use_UTF8 => setters::set_use_utf8,
        DW_AT_ranges => setters::set_ranges,
        DW_AT_call_column => setters::set_call_column,
        DW_AT_call_file => setters::set_call_file,
        DW_AT_call_line => setters::set_call_line,
        DW_AT_description => setters::set_description,
        DW_AT_threads_scaled => setters::set_threads_scaled,
        DW_AT_endianity => setters::set_endianity,
        DW_AT_linkage_name => setters::set_linkage_name,
        _ => return None,
    })
}
