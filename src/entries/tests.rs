use super::*;
use crate::attributes::{attribute_setter, AttributeValue, SetOutcome};
use crate::consts::*;

fn apply(entry: &mut DebugInfoEntry, name: u16, value: AttributeValue<'_>) -> SetOutcome {
    attribute_setter(name).expect("setter exists")(entry, name, &value)
}

#[test]
fn factory_maps_tags_to_kinds() {
    assert!(matches!(
        DebugInfoEntry::for_tag(DW_TAG_compile_unit).kind(),
        DieKind::CompileUnit(_)
    ));
    assert!(matches!(
        DebugInfoEntry::for_tag(DW_TAG_pointer_type).kind(),
        DieKind::ModifiedType(_)
    ));
    assert!(matches!(
        DebugInfoEntry::for_tag(DW_TAG_subprogram).kind(),
        DieKind::Subprogram(_)
    ));
    // vendor/unknown tags still produce a parseable node
    assert!(matches!(
        DebugInfoEntry::for_tag(0x4090).kind(),
        DieKind::Generic(_)
    ));
}

#[test]
fn setters_fill_the_matching_kind() {
    let mut entry = DebugInfoEntry::for_tag(DW_TAG_subprogram);

    assert_eq!(
        apply(&mut entry, DW_AT_name, AttributeValue::String("frobnicate")),
        SetOutcome::Set
    );
    assert_eq!(
        apply(&mut entry, DW_AT_low_pc, AttributeValue::Address(0x1010)),
        SetOutcome::Set
    );
    assert_eq!(
        apply(
            &mut entry,
            DW_AT_high_pc,
            AttributeValue::Constant { value: 0x10, signed: false }
        ),
        SetOutcome::Set
    );

    entry.init_after_attributes();

    assert_eq!(entry.name(), Some("frobnicate"));
    // the constant-class high_pc became absolute
    assert_eq!(entry.code_range(), Some((0x1010, 0x1020)));
}

#[test]
fn unwanted_attributes_are_not_handled() {
    let mut entry = DebugInfoEntry::for_tag(DW_TAG_base_type);
    assert_eq!(
        apply(&mut entry, DW_AT_low_pc, AttributeValue::Address(0x1000)),
        SetOutcome::NotHandled
    );
    assert_eq!(
        apply(&mut entry, DW_AT_frame_base, AttributeValue::Block(&[0x9c])),
        SetOutcome::NotHandled
    );
}

#[test]
fn wrong_value_class_is_bad_data() {
    let mut entry = DebugInfoEntry::for_tag(DW_TAG_subprogram);
    assert_eq!(
        apply(&mut entry, DW_AT_low_pc, AttributeValue::Flag(true)),
        SetOutcome::BadData
    );
}

#[test]
fn declaration_locations_accumulate() {
    let mut entry = DebugInfoEntry::for_tag(DW_TAG_variable);
    apply(&mut entry, DW_AT_decl_file, AttributeValue::Constant { value: 2, signed: false });
    apply(&mut entry, DW_AT_decl_line, AttributeValue::Constant { value: 17, signed: false });

    let location = entry.declaration_location().unwrap();
    assert_eq!(location.file, Some(2));
    assert_eq!(location.line, Some(17));
    assert_eq!(location.column, None);
}

#[test]
fn location_descriptions_take_blocks_and_list_offsets() {
    let mut entry = DebugInfoEntry::for_tag(DW_TAG_variable);
    apply(&mut entry, DW_AT_location, AttributeValue::Block(&[0x91, 0x7c]));
    assert!(matches!(
        entry.location_description(),
        Some(crate::attributes::LocationDescription::Expression(bytes)) if bytes.as_ref() == [0x91, 0x7c]
    ));

    let mut entry = DebugInfoEntry::for_tag(DW_TAG_formal_parameter);
    apply(&mut entry, DW_AT_location, AttributeValue::LocationListPointer(0x40));
    assert!(matches!(
        entry.location_description(),
        Some(crate::attributes::LocationDescription::LocationList(0x40))
    ));
}

#[test]
fn shared_accessors_cover_type_edges() {
    let target = DieRef { unit: UnitId::Compilation(0), entry: 7 };

    let mut pointer = DebugInfoEntry::for_tag(DW_TAG_pointer_type);
    assert_eq!(
        apply(&mut pointer, DW_AT_type, AttributeValue::Reference(target)),
        SetOutcome::Set
    );
    assert_eq!(pointer.type_ref(), Some(target));
    assert!(pointer.is_type());
    assert!(!pointer.is_namespace_like());

    let namespace = DebugInfoEntry::for_tag(DW_TAG_namespace);
    assert!(namespace.is_namespace_like());
    assert!(!namespace.is_type());
}

#[test]
fn children_keep_document_order() {
    let mut parent = DebugInfoEntry::for_tag(DW_TAG_compile_unit);
    let unit = UnitId::Compilation(0);
    parent.add_child(DieRef { unit, entry: 1 });
    parent.add_child(DieRef { unit, entry: 4 });
    parent.add_child(DieRef { unit, entry: 2 });

    let entries: Vec<usize> = parent.children().iter().map(|child| child.entry).collect();
    assert_eq!(entries, vec![1, 4, 2]);
}
