//! The debug-information-entry model.
//!
//! Every node of the DWARF graph is a [`DebugInfoEntry`]: a tag, a kind
//! payload holding the attributes that matter for that tag, a parent
//! back-handle and ordered child handles. Entries are owned by their unit's
//! arena; all cross-entry edges are [`DieRef`] handles, never pointers, so
//! the cyclic specification/abstract-origin edges of real-world DWARF cost
//! nothing to represent.
//!
//! The deep setter hierarchy of classic DWARF readers is flattened here
//! into free setter functions (one per attribute name, dispatched through
//! [`crate::attributes::attribute_setter`]) that match on the kind payload.
//! A setter offered to a kind that has no use for the attribute reports
//! [`SetOutcome::NotHandled`], which the parser treats as a benign skip.

use crate::attributes::{
    AttributeValue, ConstantValue, DeclarationLocation, DynamicValue, LocationDescription,
    MemberLocation, SetOutcome,
};
use crate::consts::*;
use crate::types::TargetAddr;

/// Identifies a unit within a [`crate::file::DwarfFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitId {
    Compilation(usize),
    Type(usize),
}

/// A handle to a DIE: owning unit plus index into the unit's entry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DieRef {
    pub unit: UnitId,
    pub entry: usize,
}

/// How a reference attribute's raw value is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Offset relative to the containing unit's header.
    Local,
    /// Absolute offset into `.debug_info`.
    Global,
    /// 64-bit signature into the type-unit map.
    Signature,
}

/// Shared name/declaration data carried by most declared entities.
#[derive(Debug, Clone, Default)]
pub struct DeclaredData {
    pub name: Option<Box<str>>,
    pub linkage_name: Option<Box<str>>,
    pub description: Option<Box<str>>,
    pub declaration_location: DeclarationLocation,
    pub accessibility: u8,
    pub is_declaration: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CompileUnitData {
    pub declared: DeclaredData,
    pub comp_dir: Option<Box<str>>,
    pub producer: Option<Box<str>>,
    pub low_pc: TargetAddr,
    pub high_pc: TargetAddr,
    pub high_pc_is_offset: bool,
    pub stmt_list_offset: Option<u64>,
    pub macro_info_offset: Option<u64>,
    pub ranges_offset: Option<u64>,
    pub base_types: Option<DieRef>,
    pub language: u16,
    pub identifier_case: u8,
    pub use_utf8: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BaseTypeData {
    pub declared: DeclaredData,
    pub byte_size: DynamicValue,
    pub bit_size: DynamicValue,
    pub bit_offset: DynamicValue,
    pub encoding: u8,
    pub endianity: u8,
}

/// Pointer, reference, rvalue-reference, const, volatile, restrict, packed
/// and shared types: a modifier wrapped around a referenced type.
#[derive(Debug, Clone, Default)]
pub struct ModifiedTypeData {
    pub declared: DeclaredData,
    pub referenced_type: Option<DieRef>,
    pub specification: Option<DieRef>,
    pub count: DynamicValue,
    pub address_class: u8,
}

/// Typedefs, set types, file types, template aliases.
#[derive(Debug, Clone, Default)]
pub struct DerivedTypeData {
    pub declared: DeclaredData,
    pub abstract_origin: Option<DieRef>,
    pub referenced_type: Option<DieRef>,
    pub byte_size: DynamicValue,
}

/// Structures, classes, unions, interfaces.
#[derive(Debug, Clone, Default)]
pub struct CompoundTypeData {
    pub declared: DeclaredData,
    pub abstract_origin: Option<DieRef>,
    pub specification: Option<DieRef>,
    pub byte_size: DynamicValue,
}

#[derive(Debug, Clone, Default)]
pub struct EnumerationTypeData {
    pub declared: DeclaredData,
    pub referenced_type: Option<DieRef>,
    pub specification: Option<DieRef>,
    pub byte_size: DynamicValue,
    pub bit_stride: DynamicValue,
    pub byte_stride: DynamicValue,
}

#[derive(Debug, Clone, Default)]
pub struct SubrangeTypeData {
    pub declared: DeclaredData,
    pub referenced_type: Option<DieRef>,
    pub byte_size: DynamicValue,
    pub bit_stride: DynamicValue,
    pub byte_stride: DynamicValue,
    pub lower_bound: DynamicValue,
    pub upper_bound: DynamicValue,
    pub count: DynamicValue,
    pub threads_scaled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ArrayTypeData {
    pub declared: DeclaredData,
    pub referenced_type: Option<DieRef>,
    pub specification: Option<DieRef>,
    pub byte_size: DynamicValue,
    pub bit_stride: DynamicValue,
    pub ordering: u8,
}

#[derive(Debug, Clone, Default)]
pub struct StringTypeData {
    pub declared: DeclaredData,
    pub byte_size: DynamicValue,
}

#[derive(Debug, Clone, Default)]
pub struct SubroutineTypeData {
    pub declared: DeclaredData,
    pub return_type: Option<DieRef>,
    pub address_class: u8,
    pub prototyped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PtrToMemberTypeData {
    pub declared: DeclaredData,
    pub referenced_type: Option<DieRef>,
    pub containing_type: Option<DieRef>,
    pub use_location: LocationDescription,
    pub address_class: u8,
}

#[derive(Debug, Clone, Default)]
pub struct SubprogramData {
    pub declared: DeclaredData,
    pub low_pc: TargetAddr,
    pub high_pc: TargetAddr,
    pub high_pc_is_offset: bool,
    pub entry_pc: TargetAddr,
    pub ranges_offset: Option<u64>,
    pub specification: Option<DieRef>,
    pub abstract_origin: Option<DieRef>,
    pub return_type: Option<DieRef>,
    pub frame_base: LocationDescription,
    pub address_class: u8,
    pub prototyped: bool,
    pub inline: u8,
}

#[derive(Debug, Clone, Default)]
pub struct LexicalBlockData {
    pub declared: DeclaredData,
    pub low_pc: TargetAddr,
    pub high_pc: TargetAddr,
    pub high_pc_is_offset: bool,
    pub ranges_offset: Option<u64>,
    pub abstract_origin: Option<DieRef>,
}

#[derive(Debug, Clone, Default)]
pub struct InlinedSubroutineData {
    pub abstract_origin: Option<DieRef>,
    pub low_pc: TargetAddr,
    pub high_pc: TargetAddr,
    pub high_pc_is_offset: bool,
    pub entry_pc: TargetAddr,
    pub ranges_offset: Option<u64>,
    pub call_file: Option<u32>,
    pub call_line: Option<u32>,
    pub call_column: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct VariableData {
    pub declared: DeclaredData,
    pub location: LocationDescription,
    pub const_value: ConstantValue,
    pub referenced_type: Option<DieRef>,
    pub specification: Option<DieRef>,
    pub abstract_origin: Option<DieRef>,
    pub start_scope: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FormalParameterData {
    pub declared: DeclaredData,
    pub location: LocationDescription,
    pub const_value: ConstantValue,
    pub referenced_type: Option<DieRef>,
    pub abstract_origin: Option<DieRef>,
}

#[derive(Debug, Clone, Default)]
pub struct MemberData {
    pub declared: DeclaredData,
    pub referenced_type: Option<DieRef>,
    pub byte_size: DynamicValue,
    pub bit_size: DynamicValue,
    pub bit_offset: DynamicValue,
    pub location: MemberLocation,
}

#[derive(Debug, Clone, Default)]
pub struct InheritanceData {
    pub declaration_location: DeclarationLocation,
    pub referenced_type: Option<DieRef>,
    pub location: MemberLocation,
}

#[derive(Debug, Clone, Default)]
pub struct EnumeratorData {
    pub declared: DeclaredData,
    pub const_value: ConstantValue,
}

#[derive(Debug, Clone, Default)]
pub struct ConstantData {
    pub declared: DeclaredData,
    pub const_value: ConstantValue,
    pub referenced_type: Option<DieRef>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateTypeParameterData {
    pub declared: DeclaredData,
    pub referenced_type: Option<DieRef>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateValueParameterData {
    pub declared: DeclaredData,
    pub referenced_type: Option<DieRef>,
    pub const_value: ConstantValue,
}

#[derive(Debug, Clone, Default)]
pub struct NamespaceData {
    pub declared: DeclaredData,
}

#[derive(Debug, Clone, Default)]
pub struct CommonBlockData {
    pub declared: DeclaredData,
    pub location: LocationDescription,
}

#[derive(Debug, Clone, Default)]
pub struct WithStatementData {
    pub referenced_type: Option<DieRef>,
    pub location: LocationDescription,
}

#[derive(Debug, Clone, Default)]
pub struct DwarfProcedureData {
    pub location: LocationDescription,
}

/// Entities that carry nothing the engine's queries consume beyond a name
/// and a declaration location (labels, friends, variants, modules, ...).
#[derive(Debug, Clone, Default)]
pub struct GenericData {
    pub declared: DeclaredData,
}

/// The kind payload of a DIE. One variant per family of tags that share
/// attribute storage.
#[derive(Debug, Clone)]
pub enum DieKind {
    CompileUnit(CompileUnitData),
    BaseType(BaseTypeData),
    ModifiedType(ModifiedTypeData),
    DerivedType(DerivedTypeData),
    CompoundType(CompoundTypeData),
    EnumerationType(EnumerationTypeData),
    SubrangeType(SubrangeTypeData),
    ArrayType(ArrayTypeData),
    StringType(StringTypeData),
    SubroutineType(SubroutineTypeData),
    PtrToMemberType(PtrToMemberTypeData),
    UnspecifiedType(GenericData),
    Subprogram(SubprogramData),
    LexicalBlock(LexicalBlockData),
    InlinedSubroutine(InlinedSubroutineData),
    Variable(VariableData),
    FormalParameter(FormalParameterData),
    Member(MemberData),
    Inheritance(InheritanceData),
    Enumerator(EnumeratorData),
    Constant(ConstantData),
    TemplateTypeParameter(TemplateTypeParameterData),
    TemplateValueParameter(TemplateValueParameterData),
    Namespace(NamespaceData),
    CommonBlock(CommonBlockData),
    WithStatement(WithStatementData),
    DwarfProcedure(DwarfProcedureData),
    Generic(GenericData),
}

/// One node of the DWARF graph.
#[derive(Debug, Clone)]
pub struct DebugInfoEntry {
    tag: u16,
    parent: Option<DieRef>,
    children: Vec<DieRef>,
    kind: DieKind,
}

impl DebugInfoEntry {
    /// The factory: builds the kind payload matching a tag. Unknown and
    /// vendor tags become [`DieKind::Generic`] so their subtrees still
    /// parse.
    pub fn for_tag(tag: u16) -> DebugInfoEntry {
        let kind = match tag {
            DW_TAG_compile_unit | DW_TAG_partial_unit | DW_TAG_type_unit => {
                DieKind::CompileUnit(CompileUnitData::default())
            }
            DW_TAG_base_type => DieKind::BaseType(BaseTypeData::default()),
            DW_TAG_pointer_type
            | DW_TAG_reference_type
            | DW_TAG_rvalue_reference_type
            | DW_TAG_const_type
            | DW_TAG_volatile_type
            | DW_TAG_restrict_type
            | DW_TAG_packed_type
            | DW_TAG_shared_type => DieKind::ModifiedType(ModifiedTypeData::default()),
            DW_TAG_typedef | DW_TAG_set_type | DW_TAG_file_type | DW_TAG_template_alias => {
                DieKind::DerivedType(DerivedTypeData::default())
            }
            DW_TAG_structure_type
            | DW_TAG_class_type
            | DW_TAG_union_type
            | DW_TAG_interface_type => DieKind::CompoundType(CompoundTypeData::default()),
            DW_TAG_enumeration_type => DieKind::EnumerationType(EnumerationTypeData::default()),
            DW_TAG_subrange_type => DieKind::SubrangeType(SubrangeTypeData::default()),
            DW_TAG_array_type => DieKind::ArrayType(ArrayTypeData::default()),
            DW_TAG_string_type => DieKind::StringType(StringTypeData::default()),
            DW_TAG_subroutine_type => DieKind::SubroutineType(SubroutineTypeData::default()),
            DW_TAG_ptr_to_member_type => DieKind::PtrToMemberType(PtrToMemberTypeData::default()),
            DW_TAG_unspecified_type => DieKind::UnspecifiedType(GenericData::default()),
            DW_TAG_subprogram | DW_TAG_entry_point => DieKind::Subprogram(SubprogramData::default()),
            DW_TAG_lexical_block | DW_TAG_try_block | DW_TAG_catch_block => {
                DieKind::LexicalBlock(LexicalBlockData::default())
            }
            DW_TAG_inlined_subroutine => {
                DieKind::InlinedSubroutine(InlinedSubroutineData::default())
            }
            DW_TAG_variable => DieKind::Variable(VariableData::default()),
            DW_TAG_formal_parameter => DieKind::FormalParameter(FormalParameterData::default()),
            DW_TAG_member => DieKind::Member(MemberData::default()),
            DW_TAG_inheritance => DieKind::Inheritance(InheritanceData::default()),
            DW_TAG_enumerator => DieKind::Enumerator(EnumeratorData::default()),
            DW_TAG_constant => DieKind::Constant(ConstantData::default()),
            DW_TAG_template_type_parameter => {
                DieKind::TemplateTypeParameter(TemplateTypeParameterData::default())
            }
            DW_TAG_template_value_parameter => {
                DieKind::TemplateValueParameter(TemplateValueParameterData::default())
            }
            DW_TAG_namespace => DieKind::Namespace(NamespaceData::default()),
            DW_TAG_common_block => DieKind::CommonBlock(CommonBlockData::default()),
            DW_TAG_with_stmt => DieKind::WithStatement(WithStatementData::default()),
            DW_TAG_dwarf_procedure => DieKind::DwarfProcedure(DwarfProcedureData::default()),
            _ => DieKind::Generic(GenericData::default()),
        };

        DebugInfoEntry {
            tag,
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    pub fn tag(&self) -> u16 {
        self.tag
    }

    pub fn kind(&self) -> &DieKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<DieRef> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: DieRef) {
        self.parent = Some(parent);
    }

    pub fn children(&self) -> &[DieRef] {
        &self.children
    }

    pub fn add_child(&mut self, child: DieRef) {
        self.children.push(child);
    }

    /// Hook run per entry before its attributes are set in the second pass.
    pub(crate) fn init_after_hierarchy(&mut self) {}

    /// Hook run per entry after its attributes are set. Converts
    /// constant-class `DW_AT_high_pc` values (offsets from `low_pc`,
    /// DWARF 4) into absolute addresses.
    pub(crate) fn init_after_attributes(&mut self) {
        fn absolutize(low: TargetAddr, high: &mut TargetAddr, is_offset: &mut bool) {
            if *is_offset {
                *high = low.wrapping_add(*high);
                *is_offset = false;
            }
        }

        match &mut self.kind {
            DieKind::CompileUnit(data) => {
                absolutize(data.low_pc, &mut data.high_pc, &mut data.high_pc_is_offset)
            }
            DieKind::Subprogram(data) => {
                absolutize(data.low_pc, &mut data.high_pc, &mut data.high_pc_is_offset)
            }
            DieKind::LexicalBlock(data) => {
                absolutize(data.low_pc, &mut data.high_pc, &mut data.high_pc_is_offset)
            }
            DieKind::InlinedSubroutine(data) => {
                absolutize(data.low_pc, &mut data.high_pc, &mut data.high_pc_is_offset)
            }
            _ => {}
        }
    }

    fn declared(&self) -> Option<&DeclaredData> {
        match &self.kind {
            DieKind::CompileUnit(data) => Some(&data.declared),
            DieKind::BaseType(data) => Some(&data.declared),
            DieKind::ModifiedType(data) => Some(&data.declared),
            DieKind::DerivedType(data) => Some(&data.declared),
            DieKind::CompoundType(data) => Some(&data.declared),
            DieKind::EnumerationType(data) => Some(&data.declared),
            DieKind::SubrangeType(data) => Some(&data.declared),
            DieKind::ArrayType(data) => Some(&data.declared),
            DieKind::StringType(data) => Some(&data.declared),
            DieKind::SubroutineType(data) => Some(&data.declared),
            DieKind::PtrToMemberType(data) => Some(&data.declared),
            DieKind::UnspecifiedType(data) => Some(&data.declared),
            DieKind::Subprogram(data) => Some(&data.declared),
            DieKind::LexicalBlock(data) => Some(&data.declared),
            DieKind::InlinedSubroutine(_) => None,
            DieKind::Variable(data) => Some(&data.declared),
            DieKind::FormalParameter(data) => Some(&data.declared),
            DieKind::Member(data) => Some(&data.declared),
            DieKind::Inheritance(_) => None,
            DieKind::Enumerator(data) => Some(&data.declared),
            DieKind::Constant(data) => Some(&data.declared),
            DieKind::TemplateTypeParameter(data) => Some(&data.declared),
            DieKind::TemplateValueParameter(data) => Some(&data.declared),
            DieKind::Namespace(data) => Some(&data.declared),
            DieKind::CommonBlock(data) => Some(&data.declared),
            DieKind::WithStatement(_) => None,
            DieKind::DwarfProcedure(_) => None,
            DieKind::Generic(data) => Some(&data.declared),
        }
    }

    fn declared_mut(&mut self) -> Option<&mut DeclaredData> {
        // same dispatch as `declared`, with mutable access
        match &mut self.kind {
            DieKind::CompileUnit(data) => Some(&mut data.declared),
            DieKind::BaseType(data) => Some(&mut data.declared),
            DieKind::ModifiedType(data) => Some(&mut data.declared),
            DieKind::DerivedType(data) => Some(&mut data.declared),
            DieKind::CompoundType(data) => Some(&mut data.declared),
            DieKind::EnumerationType(data) => Some(&mut data.declared),
            DieKind::SubrangeType(data) => Some(&mut data.declared),
            DieKind::ArrayType(data) => Some(&mut data.declared),
            DieKind::StringType(data) => Some(&mut data.declared),
            DieKind::SubroutineType(data) => Some(&mut data.declared),
            DieKind::PtrToMemberType(data) => Some(&mut data.declared),
            DieKind::UnspecifiedType(data) => Some(&mut data.declared),
            DieKind::Subprogram(data) => Some(&mut data.declared),
            DieKind::LexicalBlock(data) => Some(&mut data.declared),
            DieKind::InlinedSubroutine(_) => None,
            DieKind::Variable(data) => Some(&mut data.declared),
            DieKind::FormalParameter(data) => Some(&mut data.declared),
            DieKind::Member(data) => Some(&mut data.declared),
            DieKind::Inheritance(_) => None,
            DieKind::Enumerator(data) => Some(&mut data.declared),
            DieKind::Constant(data) => Some(&mut data.declared),
            DieKind::TemplateTypeParameter(data) => Some(&mut data.declared),
            DieKind::TemplateValueParameter(data) => Some(&mut data.declared),
            DieKind::Namespace(data) => Some(&mut data.declared),
            DieKind::CommonBlock(data) => Some(&mut data.declared),
            DieKind::WithStatement(_) => None,
            DieKind::DwarfProcedure(_) => None,
            DieKind::Generic(data) => Some(&mut data.declared),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.declared().and_then(|declared| declared.name.as_deref())
    }

    pub fn declaration_location(&self) -> Option<DeclarationLocation> {
        match &self.kind {
            DieKind::Inheritance(data) => Some(data.declaration_location),
            _ => self.declared().map(|declared| declared.declaration_location),
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.declared().map_or(false, |declared| declared.is_declaration)
    }

    /// The location description of locatable entities (variables,
    /// parameters, common blocks, with-statements, DWARF procedures).
    pub fn location_description(&self) -> Option<&LocationDescription> {
        match &self.kind {
            DieKind::Variable(data) => Some(&data.location),
            DieKind::FormalParameter(data) => Some(&data.location),
            DieKind::CommonBlock(data) => Some(&data.location),
            DieKind::WithStatement(data) => Some(&data.location),
            DieKind::DwarfProcedure(data) => Some(&data.location),
            _ => None,
        }
    }

    /// The referenced type (`DW_AT_type`), for entities that have one.
    pub fn type_ref(&self) -> Option<DieRef> {
        match &self.kind {
            DieKind::ModifiedType(data) => data.referenced_type,
            DieKind::DerivedType(data) => data.referenced_type,
            DieKind::EnumerationType(data) => data.referenced_type,
            DieKind::SubrangeType(data) => data.referenced_type,
            DieKind::ArrayType(data) => data.referenced_type,
            DieKind::SubroutineType(data) => data.return_type,
            DieKind::PtrToMemberType(data) => data.referenced_type,
            DieKind::Subprogram(data) => data.return_type,
            DieKind::Variable(data) => data.referenced_type,
            DieKind::FormalParameter(data) => data.referenced_type,
            DieKind::Member(data) => data.referenced_type,
            DieKind::Inheritance(data) => data.referenced_type,
            DieKind::Constant(data) => data.referenced_type,
            DieKind::TemplateTypeParameter(data) => data.referenced_type,
            DieKind::TemplateValueParameter(data) => data.referenced_type,
            DieKind::WithStatement(data) => data.referenced_type,
            _ => None,
        }
    }

    pub fn const_value(&self) -> Option<&ConstantValue> {
        match &self.kind {
            DieKind::Variable(data) => Some(&data.const_value),
            DieKind::FormalParameter(data) => Some(&data.const_value),
            DieKind::Enumerator(data) => Some(&data.const_value),
            DieKind::Constant(data) => Some(&data.const_value),
            DieKind::TemplateValueParameter(data) => Some(&data.const_value),
            _ => None,
        }
    }

    pub fn specification(&self) -> Option<DieRef> {
        match &self.kind {
            DieKind::ModifiedType(data) => data.specification,
            DieKind::CompoundType(data) => data.specification,
            DieKind::EnumerationType(data) => data.specification,
            DieKind::ArrayType(data) => data.specification,
            DieKind::Subprogram(data) => data.specification,
            DieKind::Variable(data) => data.specification,
            _ => None,
        }
    }

    pub fn abstract_origin(&self) -> Option<DieRef> {
        match &self.kind {
            DieKind::DerivedType(data) => data.abstract_origin,
            DieKind::CompoundType(data) => data.abstract_origin,
            DieKind::Subprogram(data) => data.abstract_origin,
            DieKind::LexicalBlock(data) => data.abstract_origin,
            DieKind::InlinedSubroutine(data) => data.abstract_origin,
            DieKind::Variable(data) => data.abstract_origin,
            DieKind::FormalParameter(data) => data.abstract_origin,
            _ => None,
        }
    }

    /// `[low_pc, high_pc)`, for entities that carry a contiguous code
    /// range. `None` when no `low_pc` was set.
    pub fn code_range(&self) -> Option<(TargetAddr, TargetAddr)> {
        let (low, high) = match &self.kind {
            DieKind::CompileUnit(data) => (data.low_pc, data.high_pc),
            DieKind::Subprogram(data) => (data.low_pc, data.high_pc),
            DieKind::LexicalBlock(data) => (data.low_pc, data.high_pc),
            DieKind::InlinedSubroutine(data) => (data.low_pc, data.high_pc),
            _ => return None,
        };
        if low == 0 && high == 0 {
            return None;
        }
        Some((low, high))
    }

    /// Offset into `.debug_ranges` (`DW_AT_ranges`), if any.
    pub fn ranges_offset(&self) -> Option<u64> {
        match &self.kind {
            DieKind::CompileUnit(data) => data.ranges_offset,
            DieKind::Subprogram(data) => data.ranges_offset,
            DieKind::LexicalBlock(data) => data.ranges_offset,
            DieKind::InlinedSubroutine(data) => data.ranges_offset,
            _ => None,
        }
    }

    pub fn frame_base(&self) -> Option<&LocationDescription> {
        match &self.kind {
            DieKind::Subprogram(data) => Some(&data.frame_base),
            _ => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self.kind,
            DieKind::BaseType(_)
                | DieKind::ModifiedType(_)
                | DieKind::DerivedType(_)
                | DieKind::CompoundType(_)
                | DieKind::EnumerationType(_)
                | DieKind::SubrangeType(_)
                | DieKind::ArrayType(_)
                | DieKind::StringType(_)
                | DieKind::SubroutineType(_)
                | DieKind::PtrToMemberType(_)
                | DieKind::UnspecifiedType(_)
        )
    }

    /// Namespace-like entities contribute their name when building a fully
    /// qualified name for a nested entity.
    pub fn is_namespace_like(&self) -> bool {
        matches!(
            self.kind,
            DieKind::Namespace(_) | DieKind::CompoundType(_) | DieKind::EnumerationType(_)
        )
    }
}

/// The attribute setter functions the dispatch table in
/// [`crate::attributes`] points at.
///
/// Each setter matches the kinds that accept the attribute and reports
/// `NotHandled` for everything else. A value of the wrong class for a kind
/// that *does* accept the attribute reports `BadData`.
pub(crate) mod setters {
    use super::*;

    type Entry = DebugInfoEntry;
    type Value<'a, 'data> = &'a AttributeValue<'data>;

    fn copy_string(value: Value<'_, '_>) -> Option<Box<str>> {
        match value {
            AttributeValue::String(string) => Some((*string).into()),
            _ => None,
        }
    }

    pub fn set_name(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let Some(string) = copy_string(value) else {
            return SetOutcome::BadData;
        };
        match entry.declared_mut() {
            Some(declared) => {
                declared.name = Some(string);
                SetOutcome::Set
            }
            None => SetOutcome::NotHandled,
        }
    }

    pub fn set_linkage_name(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let Some(string) = copy_string(value) else {
            return SetOutcome::BadData;
        };
        match entry.declared_mut() {
            Some(declared) => {
                declared.linkage_name = Some(string);
                SetOutcome::Set
            }
            None => SetOutcome::NotHandled,
        }
    }

    pub fn set_description(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let Some(string) = copy_string(value) else {
            return SetOutcome::BadData;
        };
        match entry.declared_mut() {
            Some(declared) => {
                declared.description = Some(string);
                SetOutcome::Set
            }
            None => SetOutcome::NotHandled,
        }
    }

    fn set_decl_part(entry: &mut Entry, value: Value<'_, '_>, part: fn(&mut DeclarationLocation, u32)) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        if let DieKind::Inheritance(data) = &mut entry.kind {
            part(&mut data.declaration_location, *constant as u32);
            return SetOutcome::Set;
        }
        match entry.declared_mut() {
            Some(declared) => {
                part(&mut declared.declaration_location, *constant as u32);
                SetOutcome::Set
            }
            None => SetOutcome::NotHandled,
        }
    }

    pub fn set_decl_file(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        set_decl_part(entry, value, |location, file| location.file = Some(file))
    }

    pub fn set_decl_line(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        set_decl_part(entry, value, |location, line| location.line = Some(line))
    }

    pub fn set_decl_column(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        set_decl_part(entry, value, |location, column| location.column = Some(column))
    }

    pub fn set_accessibility(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        match entry.declared_mut() {
            Some(declared) => {
                declared.accessibility = *constant as u8;
                SetOutcome::Set
            }
            None => SetOutcome::NotHandled,
        }
    }

    pub fn set_declaration(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Flag(flag) = value else {
            return SetOutcome::BadData;
        };
        match entry.declared_mut() {
            Some(declared) => {
                declared.is_declaration = *flag;
                SetOutcome::Set
            }
            None => SetOutcome::NotHandled,
        }
    }

    /// `DW_AT_sibling` only aids consumers that skip subtrees; the graph
    /// already has the children wired up.
    pub fn set_sibling(_entry: &mut Entry, _name: u16, _value: Value<'_, '_>) -> SetOutcome {
        SetOutcome::Set
    }

    pub fn set_location(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let location = match &mut entry.kind {
            DieKind::Variable(data) => &mut data.location,
            DieKind::FormalParameter(data) => &mut data.location,
            DieKind::CommonBlock(data) => &mut data.location,
            DieKind::WithStatement(data) => &mut data.location,
            DieKind::DwarfProcedure(data) => &mut data.location,
            _ => return SetOutcome::NotHandled,
        };
        location.set_from(value)
    }

    pub fn set_low_pc(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Address(address) = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => data.low_pc = *address,
            DieKind::Subprogram(data) => data.low_pc = *address,
            DieKind::LexicalBlock(data) => data.low_pc = *address,
            DieKind::InlinedSubroutine(data) => data.low_pc = *address,
            _ => return SetOutcome::NotHandled,
        }
        SetOutcome::Set
    }

    pub fn set_high_pc(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let (high, is_offset) = match value {
            AttributeValue::Address(address) => (*address, false),
            // DWARF 4: a constant-class high_pc is an offset from low_pc
            AttributeValue::Constant { value, .. } => (*value, true),
            _ => return SetOutcome::BadData,
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => {
                data.high_pc = high;
                data.high_pc_is_offset = is_offset;
            }
            DieKind::Subprogram(data) => {
                data.high_pc = high;
                data.high_pc_is_offset = is_offset;
            }
            DieKind::LexicalBlock(data) => {
                data.high_pc = high;
                data.high_pc_is_offset = is_offset;
            }
            DieKind::InlinedSubroutine(data) => {
                data.high_pc = high;
                data.high_pc_is_offset = is_offset;
            }
            _ => return SetOutcome::NotHandled,
        }
        SetOutcome::Set
    }

    pub fn set_entry_pc(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Address(address) = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::Subprogram(data) => data.entry_pc = *address,
            DieKind::InlinedSubroutine(data) => data.entry_pc = *address,
            _ => return SetOutcome::NotHandled,
        }
        SetOutcome::Set
    }

    pub fn set_ranges(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::RangeListPointer(offset) = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => data.ranges_offset = Some(*offset),
            DieKind::Subprogram(data) => data.ranges_offset = Some(*offset),
            DieKind::LexicalBlock(data) => data.ranges_offset = Some(*offset),
            DieKind::InlinedSubroutine(data) => data.ranges_offset = Some(*offset),
            _ => return SetOutcome::NotHandled,
        }
        SetOutcome::Set
    }

    pub fn set_stmt_list(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::LinePointer(offset) = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => {
                data.stmt_list_offset = Some(*offset);
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_macro_info(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::MacroPointer(offset) = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => {
                data.macro_info_offset = Some(*offset);
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_comp_dir(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let Some(string) = copy_string(value) else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => {
                data.comp_dir = Some(string);
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_producer(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let Some(string) = copy_string(value) else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => {
                data.producer = Some(string);
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_language(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => {
                data.language = *constant as u16;
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_identifier_case(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => {
                data.identifier_case = *constant as u8;
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_use_utf8(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Flag(flag) = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => {
                data.use_utf8 = *flag;
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_base_types(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Reference(reference) = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::CompileUnit(data) => {
                data.base_types = Some(*reference);
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_type(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Reference(reference) = value else {
            return SetOutcome::BadData;
        };
        let slot = match &mut entry.kind {
            DieKind::ModifiedType(data) => &mut data.referenced_type,
            DieKind::DerivedType(data) => &mut data.referenced_type,
            DieKind::EnumerationType(data) => &mut data.referenced_type,
            DieKind::SubrangeType(data) => &mut data.referenced_type,
            DieKind::ArrayType(data) => &mut data.referenced_type,
            DieKind::SubroutineType(data) => &mut data.return_type,
            DieKind::PtrToMemberType(data) => &mut data.referenced_type,
            DieKind::Subprogram(data) => &mut data.return_type,
            DieKind::Variable(data) => &mut data.referenced_type,
            DieKind::FormalParameter(data) => &mut data.referenced_type,
            DieKind::Member(data) => &mut data.referenced_type,
            DieKind::Inheritance(data) => &mut data.referenced_type,
            DieKind::Constant(data) => &mut data.referenced_type,
            DieKind::TemplateTypeParameter(data) => &mut data.referenced_type,
            DieKind::TemplateValueParameter(data) => &mut data.referenced_type,
            DieKind::WithStatement(data) => &mut data.referenced_type,
            _ => return SetOutcome::NotHandled,
        };
        *slot = Some(*reference);
        SetOutcome::Set
    }

    pub fn set_specification(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Reference(reference) = value else {
            return SetOutcome::BadData;
        };
        let slot = match &mut entry.kind {
            DieKind::ModifiedType(data) => &mut data.specification,
            DieKind::CompoundType(data) => &mut data.specification,
            DieKind::EnumerationType(data) => &mut data.specification,
            DieKind::ArrayType(data) => &mut data.specification,
            DieKind::Subprogram(data) => &mut data.specification,
            DieKind::Variable(data) => &mut data.specification,
            _ => return SetOutcome::NotHandled,
        };
        *slot = Some(*reference);
        SetOutcome::Set
    }

    pub fn set_abstract_origin(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Reference(reference) = value else {
            return SetOutcome::BadData;
        };
        let slot = match &mut entry.kind {
            DieKind::DerivedType(data) => &mut data.abstract_origin,
            DieKind::CompoundType(data) => &mut data.abstract_origin,
            DieKind::Subprogram(data) => &mut data.abstract_origin,
            DieKind::LexicalBlock(data) => &mut data.abstract_origin,
            DieKind::InlinedSubroutine(data) => &mut data.abstract_origin,
            DieKind::Variable(data) => &mut data.abstract_origin,
            DieKind::FormalParameter(data) => &mut data.abstract_origin,
            _ => return SetOutcome::NotHandled,
        };
        *slot = Some(*reference);
        SetOutcome::Set
    }

    pub fn set_const_value(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let slot = match &mut entry.kind {
            DieKind::Variable(data) => &mut data.const_value,
            DieKind::FormalParameter(data) => &mut data.const_value,
            DieKind::Enumerator(data) => &mut data.const_value,
            DieKind::Constant(data) => &mut data.const_value,
            DieKind::TemplateValueParameter(data) => &mut data.const_value,
            _ => return SetOutcome::NotHandled,
        };
        slot.set_from(value)
    }

    pub fn set_byte_size(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let slot = match &mut entry.kind {
            DieKind::BaseType(data) => &mut data.byte_size,
            DieKind::DerivedType(data) => &mut data.byte_size,
            DieKind::CompoundType(data) => &mut data.byte_size,
            DieKind::EnumerationType(data) => &mut data.byte_size,
            DieKind::SubrangeType(data) => &mut data.byte_size,
            DieKind::ArrayType(data) => &mut data.byte_size,
            DieKind::StringType(data) => &mut data.byte_size,
            DieKind::Member(data) => &mut data.byte_size,
            _ => return SetOutcome::NotHandled,
        };
        slot.set_from(value)
    }

    pub fn set_bit_size(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let slot = match &mut entry.kind {
            DieKind::BaseType(data) => &mut data.bit_size,
            DieKind::Member(data) => &mut data.bit_size,
            _ => return SetOutcome::NotHandled,
        };
        slot.set_from(value)
    }

    pub fn set_bit_offset(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let slot = match &mut entry.kind {
            DieKind::BaseType(data) => &mut data.bit_offset,
            DieKind::Member(data) => &mut data.bit_offset,
            _ => return SetOutcome::NotHandled,
        };
        slot.set_from(value)
    }

    pub fn set_bit_stride(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let slot = match &mut entry.kind {
            DieKind::EnumerationType(data) => &mut data.bit_stride,
            DieKind::SubrangeType(data) => &mut data.bit_stride,
            DieKind::ArrayType(data) => &mut data.bit_stride,
            _ => return SetOutcome::NotHandled,
        };
        slot.set_from(value)
    }

    pub fn set_byte_stride(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let slot = match &mut entry.kind {
            DieKind::EnumerationType(data) => &mut data.byte_stride,
            DieKind::SubrangeType(data) => &mut data.byte_stride,
            _ => return SetOutcome::NotHandled,
        };
        slot.set_from(value)
    }

    pub fn set_lower_bound(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        match &mut entry.kind {
            DieKind::SubrangeType(data) => data.lower_bound.set_from(value),
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_upper_bound(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        match &mut entry.kind {
            DieKind::SubrangeType(data) => data.upper_bound.set_from(value),
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_count(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        match &mut entry.kind {
            DieKind::SubrangeType(data) => data.count.set_from(value),
            DieKind::ModifiedType(data) => data.count.set_from(value),
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_threads_scaled(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Flag(flag) = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::SubrangeType(data) => {
                data.threads_scaled = *flag;
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_ordering(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::ArrayType(data) => {
                data.ordering = *constant as u8;
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_encoding(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::BaseType(data) => {
                data.encoding = *constant as u8;
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_endianity(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::BaseType(data) => {
                data.endianity = *constant as u8;
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_address_class(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        let slot = match &mut entry.kind {
            DieKind::ModifiedType(data) => &mut data.address_class,
            DieKind::SubroutineType(data) => &mut data.address_class,
            DieKind::PtrToMemberType(data) => &mut data.address_class,
            DieKind::Subprogram(data) => &mut data.address_class,
            _ => return SetOutcome::NotHandled,
        };
        *slot = *constant as u8;
        SetOutcome::Set
    }

    pub fn set_prototyped(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Flag(flag) = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::SubroutineType(data) => {
                data.prototyped = *flag;
                SetOutcome::Set
            }
            DieKind::Subprogram(data) => {
                data.prototyped = *flag;
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_inline(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::Subprogram(data) => {
                data.inline = *constant as u8;
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_frame_base(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        match &mut entry.kind {
            DieKind::Subprogram(data) => data.frame_base.set_from(value),
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_containing_type(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Reference(reference) = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::PtrToMemberType(data) => {
                data.containing_type = Some(*reference);
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_use_location(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        match &mut entry.kind {
            DieKind::PtrToMemberType(data) => data.use_location.set_from(value),
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_data_member_location(
        entry: &mut Entry,
        _name: u16,
        value: Value<'_, '_>,
    ) -> SetOutcome {
        let slot = match &mut entry.kind {
            DieKind::Member(data) => &mut data.location,
            DieKind::Inheritance(data) => &mut data.location,
            _ => return SetOutcome::NotHandled,
        };
        slot.set_from(value)
    }

    pub fn set_allocated(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        // tracked only for types that could carry it; the engine's queries
        // never consume it, so accept and drop
        if entry.is_type() {
            let _ = value;
            SetOutcome::Set
        } else {
            SetOutcome::NotHandled
        }
    }

    pub fn set_associated(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        if entry.is_type() {
            let _ = value;
            SetOutcome::Set
        } else {
            SetOutcome::NotHandled
        }
    }

    pub fn set_start_scope(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::Variable(data) => {
                data.start_scope = *constant;
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    fn set_call_part(
        entry: &mut Entry,
        value: Value<'_, '_>,
        part: fn(&mut InlinedSubroutineData, u32),
    ) -> SetOutcome {
        let AttributeValue::Constant { value: constant, .. } = value else {
            return SetOutcome::BadData;
        };
        match &mut entry.kind {
            DieKind::InlinedSubroutine(data) => {
                part(data, *constant as u32);
                SetOutcome::Set
            }
            _ => SetOutcome::NotHandled,
        }
    }

    pub fn set_call_file(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        set_call_part(entry, value, |data, file| data.call_file = Some(file))
    }

    pub fn set_call_line(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        set_call_part(entry, value, |data, line| data.call_line = Some(line))
    }

    pub fn set_call_column(entry: &mut Entry, _name: u16, value: Value<'_, '_>) -> SetOutcome {
        set_call_part(entry, value, |data, column| data.call_column = Some(column))
    }
}

#[cfg(test)]
mod tests;
