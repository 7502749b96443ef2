use super::*;

#[test]
fn class_is_the_intersection_of_name_and_form() {
    // DW_AT_location allows block and loclistptr; DW_FORM_data4 can carry
    // the *ptr classes and constants. Only loclistptr survives.
    assert_eq!(
        attribute_class(DW_AT_location, DW_FORM_data4),
        AttributeClass::LocListPtr
    );

    // with an exprloc form, the same attribute is a block
    assert_eq!(
        attribute_class(DW_AT_location, DW_FORM_exprloc),
        AttributeClass::Block
    );

    assert_eq!(attribute_class(DW_AT_name, DW_FORM_strp), AttributeClass::String);
    assert_eq!(attribute_class(DW_AT_low_pc, DW_FORM_addr), AttributeClass::Address);
    assert_eq!(
        attribute_class(DW_AT_high_pc, DW_FORM_data8),
        AttributeClass::Constant
    );
    assert_eq!(
        attribute_class(DW_AT_stmt_list, DW_FORM_sec_offset),
        AttributeClass::LinePtr
    );
    assert_eq!(
        attribute_class(DW_AT_ranges, DW_FORM_sec_offset),
        AttributeClass::RangeListPtr
    );
}

#[test]
fn mismatched_pairs_have_no_class() {
    // a flag attribute cannot be read from an address form
    assert_eq!(attribute_class(DW_AT_prototyped, DW_FORM_addr), AttributeClass::Unknown);
    // unknown attribute name
    assert_eq!(attribute_class(0x3fff, DW_FORM_data4), AttributeClass::Unknown);
}

#[test]
fn implicit_const_is_a_constant() {
    assert_eq!(
        attribute_class(DW_AT_decl_file, DW_FORM_implicit_const),
        AttributeClass::Constant
    );
}

#[test]
fn every_setter_name_has_classes() {
    // the setter table must only name attributes the class tables know;
    // probe a few forms to prove the name is classifiable at all
    for name in 1u16..=0x81 {
        if attribute_setter(name).is_some() {
            assert_ne!(
                attribute_name_classes(name),
                ClassSet::empty(),
                "setter for unclassifiable attribute {name:#x}"
            );
        }
    }
}
