use std::collections::BTreeMap;

use super::{EvaluationContext, ExpressionEvaluator};
use crate::cfi::CfaContext;
use crate::entries::ReferenceKind;
use crate::error::Result;
use crate::location::{PieceStorage, ValueLocation};
use crate::target::DwarfTargetInterface;
use crate::types::{TargetAddr, ValueType, Variant};

#[derive(Default)]
struct TestTarget {
    memory: BTreeMap<u64, u8>,
}

impl TestTarget {
    fn with_memory(values: &[(u64, u64)]) -> TestTarget {
        let mut target = TestTarget::default();
        for &(address, value) in values {
            for (i, byte) in value.to_le_bytes().iter().enumerate() {
                target.memory.insert(address + i as u64, *byte);
            }
        }
        target
    }
}

impl DwarfTargetInterface for TestTarget {
    fn count_registers(&self) -> u32 {
        16
    }

    fn register_value_type(&self, _index: u32) -> Option<ValueType> {
        Some(ValueType::U64)
    }

    fn register_value(&self, index: u32) -> Option<Variant> {
        // register N holds 0x100 * (N + 1)
        (index < 16).then(|| Variant::Unsigned(0x100 * (index as u64 + 1)))
    }

    fn set_register_value(&mut self, _index: u32, _value: &Variant) -> bool {
        false
    }

    fn is_callee_preserved_register(&self, _index: u32) -> bool {
        false
    }

    fn init_register_rules(&self, _context: &mut CfaContext<'_>) -> Result<()> {
        Ok(())
    }

    fn read_memory(&self, address: TargetAddr, buffer: &mut [u8]) -> Result<usize> {
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = *self
                .memory
                .get(&(address + i as u64))
                .ok_or(crate::error::Error::EntryNotFound)?;
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

struct TestContext {
    target: TestTarget,
    address_size: u8,
    relocation_delta: u64,
    object_address: Option<TargetAddr>,
    frame_address: Option<TargetAddr>,
    frame_base: Option<TargetAddr>,
    call_targets: BTreeMap<u64, Vec<u8>>,
}

impl TestContext {
    fn new() -> TestContext {
        TestContext {
            target: TestTarget::default(),
            address_size: 8,
            relocation_delta: 0,
            object_address: None,
            frame_address: None,
            frame_base: None,
            call_targets: BTreeMap::new(),
        }
    }
}

impl EvaluationContext for TestContext {
    fn target_interface(&self) -> &dyn DwarfTargetInterface {
        &self.target
    }

    fn address_size(&self) -> u8 {
        self.address_size
    }

    fn relocation_delta(&self) -> u64 {
        self.relocation_delta
    }

    fn object_address(&mut self) -> Option<TargetAddr> {
        self.object_address
    }

    fn frame_address(&mut self) -> Option<TargetAddr> {
        self.frame_address
    }

    fn frame_base_address(&mut self) -> Option<TargetAddr> {
        self.frame_base
    }

    fn tls_address(&mut self, local_address: TargetAddr) -> Option<TargetAddr> {
        Some(local_address + 0x7000_0000)
    }

    fn call_target(&mut self, offset: u64, _kind: ReferenceKind) -> Result<Option<Vec<u8>>> {
        Ok(self.call_targets.get(&offset).cloned())
    }
}

fn evaluate(context: &mut TestContext, expression: &[u8]) -> Result<u64> {
    ExpressionEvaluator::new(context).evaluate(expression)
}

fn evaluate_location(context: &mut TestContext, expression: &[u8]) -> ValueLocation {
    let mut location = ValueLocation::new(false);
    ExpressionEvaluator::new(context)
        .evaluate_location(expression, &mut location)
        .unwrap();
    location
}

#[test]
fn literals_and_constants() {
    let mut context = TestContext::new();

    // lit17
    assert_eq!(evaluate(&mut context, &[0x30 + 17]).unwrap(), 17);
    // const1u 0xff
    assert_eq!(evaluate(&mut context, &[0x08, 0xff]).unwrap(), 0xff);
    // const1s -1
    assert_eq!(evaluate(&mut context, &[0x09, 0xff]).unwrap(), u64::MAX);
    // const2u
    assert_eq!(evaluate(&mut context, &[0x0a, 0x34, 0x12]).unwrap(), 0x1234);
    // constu LEB
    assert_eq!(evaluate(&mut context, &[0x10, 0xe5, 0x8e, 0x26]).unwrap(), 624485);
    // consts LEB
    assert_eq!(evaluate(&mut context, &[0x11, 0x78]).unwrap(), (-8i64) as u64);
}

#[test]
fn addr_applies_the_relocation_delta() {
    let mut context = TestContext::new();
    context.relocation_delta = 0x1000;

    let mut expression = vec![0x03];
    expression.extend_from_slice(&0x4000u64.to_le_bytes());
    assert_eq!(evaluate(&mut context, &expression).unwrap(), 0x5000);
}

#[test]
fn signed_division() {
    let mut context = TestContext::new();

    // constu 10; constu 3; div == 3
    assert_eq!(evaluate(&mut context, &[0x10, 10, 0x10, 3, 0x1b]).unwrap(), 3);

    // consts -10; consts 3; div == -3 (signed!)
    assert_eq!(
        evaluate(&mut context, &[0x11, 0x76, 0x10, 3, 0x1b]).unwrap(),
        (-3i64) as u64
    );

    // division by zero yields 0 instead of faulting
    assert_eq!(evaluate(&mut context, &[0x10, 10, 0x10, 0, 0x1b]).unwrap(), 0);
}

#[test]
fn unsigned_modulo_and_arithmetic_shift() {
    let mut context = TestContext::new();

    // mod is unsigned
    assert_eq!(evaluate(&mut context, &[0x10, 10, 0x10, 3, 0x1d]).unwrap(), 1);

    // shra preserves the dividend's sign: -16 >> 2 == -4
    assert_eq!(
        evaluate(&mut context, &[0x11, 0x70, 0x10, 2, 0x26]).unwrap(),
        (-4i64) as u64
    );

    // shr is logical
    let minus_sixteen_shr = evaluate(&mut context, &[0x11, 0x70, 0x10, 2, 0x25]).unwrap();
    assert_eq!(minus_sixteen_shr, ((-16i64) as u64) >> 2);
}

#[test]
fn stack_manipulation() {
    let mut context = TestContext::new();

    // 1 2 swap minus == 2 - 1... after swap top is 1, second 2; minus
    // computes second - top = 2 - 1
    assert_eq!(
        evaluate(&mut context, &[0x31, 0x32, 0x16, 0x1c]).unwrap(),
        1
    );

    // 7 dup plus == 14
    assert_eq!(evaluate(&mut context, &[0x37, 0x12, 0x22]).unwrap(), 14);

    // 1 2 over == 1 on top
    assert_eq!(evaluate(&mut context, &[0x31, 0x32, 0x14]).unwrap(), 1);

    // 5 6 7 pick(2) == 5
    assert_eq!(
        evaluate(&mut context, &[0x35, 0x36, 0x37, 0x15, 0x02]).unwrap(),
        5
    );

    // 1 2 3 rot: top (3) moves under, leaving 2 on top
    assert_eq!(evaluate(&mut context, &[0x31, 0x32, 0x33, 0x17]).unwrap(), 2);

    // popping an empty stack fails
    assert!(evaluate(&mut context, &[0x13]).is_err());
}

#[test]
fn comparisons_produce_zero_or_one() {
    let mut context = TestContext::new();

    assert_eq!(evaluate(&mut context, &[0x32, 0x32, 0x29]).unwrap(), 1); // 2 == 2
    assert_eq!(evaluate(&mut context, &[0x32, 0x33, 0x2e]).unwrap(), 1); // 2 != 3
    assert_eq!(evaluate(&mut context, &[0x32, 0x32, 0x2e]).unwrap(), 0);
    // signed: -1 < 1
    assert_eq!(evaluate(&mut context, &[0x11, 0x7f, 0x31, 0x2d]).unwrap(), 1);
    assert_eq!(evaluate(&mut context, &[0x31, 0x32, 0x2c]).unwrap(), 1); // 1 <= 2
    assert_eq!(evaluate(&mut context, &[0x32, 0x31, 0x2b]).unwrap(), 1); // 2 > 1
    assert_eq!(evaluate(&mut context, &[0x32, 0x32, 0x2a]).unwrap(), 1); // 2 >= 2
}

#[test]
fn bra_and_skip() {
    let mut context = TestContext::new();

    // lit1; bra +3 (over "lit2; nop"); ...: lit1 is consumed by bra, so
    // the surviving value is lit3
    #[rustfmt::skip]
    let expression = [
        0x31,             // lit1
        0x28, 0x02, 0x00, // bra +2
        0x32, 0x96,       // lit2; nop (skipped)
        0x33,             // lit3
    ];
    assert_eq!(evaluate(&mut context, &expression).unwrap(), 3);

    // bra falls through on zero
    #[rustfmt::skip]
    let expression = [
        0x30,             // lit0
        0x28, 0x02, 0x00, // bra +2 (not taken)
        0x32,             // lit2
    ];
    assert_eq!(evaluate(&mut context, &expression).unwrap(), 2);

    // a skip out of bounds is rejected
    assert!(evaluate(&mut context, &[0x2f, 0x40, 0x00]).is_err());
    // backwards past the expression start as well
    assert!(evaluate(&mut context, &[0x2f, 0x80, 0xff]).is_err());
}

#[test]
fn infinite_loops_hit_the_operation_limit() {
    let mut context = TestContext::new();
    // skip -3: jumps back onto itself forever
    assert!(evaluate(&mut context, &[0x96, 0x2f, 0xfd, 0xff]).is_err());
}

#[test]
fn dereferences() {
    let mut context = TestContext::new();
    context.target = TestTarget::with_memory(&[(0x2000, 0xdead_beef_1122_3344)]);

    // constu 0x2000; deref
    let mut expression = vec![0x10];
    expression.extend_from_slice(&crate::test_image::uleb(0x2000));
    expression.push(0x06);
    assert_eq!(
        evaluate(&mut context, &expression).unwrap(),
        0xdead_beef_1122_3344
    );

    // deref_size 2
    let mut expression = vec![0x10];
    expression.extend_from_slice(&crate::test_image::uleb(0x2000));
    expression.extend_from_slice(&[0x94, 0x02]);
    assert_eq!(evaluate(&mut context, &expression).unwrap(), 0x3344);

    // invalid deref size
    let mut expression = vec![0x10];
    expression.extend_from_slice(&crate::test_image::uleb(0x2000));
    expression.extend_from_slice(&[0x94, 0x03]);
    assert!(evaluate(&mut context, &expression).is_err());
}

#[test]
fn registers_and_frame_state() {
    let mut context = TestContext::new();
    context.frame_address = Some(0x7fff_0000);
    context.frame_base = Some(0x7fff_1000);

    // breg2 8: register 2 holds 0x300
    assert_eq!(evaluate(&mut context, &[0x70 + 2, 0x08]).unwrap(), 0x308);

    // bregx 2, -8
    assert_eq!(evaluate(&mut context, &[0x92, 0x02, 0x78]).unwrap(), 0x2f8);

    // call_frame_cfa
    assert_eq!(evaluate(&mut context, &[0x9c]).unwrap(), 0x7fff_0000);

    // fbreg -4
    assert_eq!(evaluate(&mut context, &[0x91, 0x7c]).unwrap(), 0x7fff_0ffc);

    // form_tls_address
    assert_eq!(
        evaluate(&mut context, &[0x10, 0x10, 0x9b]).unwrap(),
        0x7000_0010
    );
}

#[test]
fn missing_frame_base_is_an_error() {
    let mut context = TestContext::new();
    assert!(evaluate(&mut context, &[0x91, 0x7c]).is_err());
}

#[test]
fn pre_pushed_values_feed_cfi_rule_expressions() {
    let mut context = TestContext::new();
    let mut evaluator = ExpressionEvaluator::new(&mut context);
    evaluator.push(0x4000).unwrap();
    // plus_uconst 8 operates on the pre-pushed CFA
    assert_eq!(evaluator.evaluate(&[0x23, 0x08]).unwrap(), 0x4008);
}

#[test]
fn calls_inline_the_target_expression() {
    let mut context = TestContext::new();
    context.call_targets.insert(0x42, vec![0x33]); // lit3

    // call2 0x42; lit4; plus
    assert_eq!(
        evaluate(&mut context, &[0x98, 0x42, 0x00, 0x34, 0x22]).unwrap(),
        7
    );

    // a call target without a location is a no-op
    context.call_targets.clear();
    assert_eq!(
        evaluate(&mut context, &[0x98, 0x42, 0x00, 0x34]).unwrap(),
        4
    );
}

#[test]
fn location_with_register_piece() {
    let mut context = TestContext::new();

    // DW_OP_reg5
    let location = evaluate_location(&mut context, &[0x50 + 5]);
    assert_eq!(location.count_pieces(), 1);
    let piece = location.piece_at(0).unwrap();
    assert_eq!(piece.storage, PieceStorage::Register(5));
    assert_eq!(piece.size, 0);

    // DW_OP_regx 33
    let location = evaluate_location(&mut context, &[0x90, 33]);
    assert_eq!(
        location.piece_at(0).unwrap().storage,
        PieceStorage::Register(33)
    );
}

#[test]
fn location_defaults_to_memory() {
    let mut context = TestContext::new();

    // constu 0x1000
    let mut expression = vec![0x10];
    expression.extend_from_slice(&crate::test_image::uleb(0x1000));
    let location = evaluate_location(&mut context, &expression);
    assert_eq!(location.count_pieces(), 1);
    assert_eq!(location.piece_at(0).unwrap().storage, PieceStorage::Memory(0x1000));
}

#[test]
fn empty_location_expression_is_unknown() {
    let mut context = TestContext::new();
    let location = evaluate_location(&mut context, &[]);
    assert_eq!(location.count_pieces(), 1);
    assert_eq!(location.piece_at(0).unwrap().storage, PieceStorage::Unknown);
}

#[test]
fn composite_locations() {
    let mut context = TestContext::new();

    // reg3 piece(4); constu 0x2000 piece(4)
    let mut expression = vec![0x50 + 3, 0x93, 0x04, 0x10];
    expression.extend_from_slice(&crate::test_image::uleb(0x2000));
    expression.extend_from_slice(&[0x93, 0x04]);

    let location = evaluate_location(&mut context, &expression);
    assert_eq!(location.count_pieces(), 2);
    assert_eq!(location.piece_at(0).unwrap().storage, PieceStorage::Register(3));
    assert_eq!(location.piece_at(0).unwrap().size, 4);
    assert_eq!(location.piece_at(1).unwrap().storage, PieceStorage::Memory(0x2000));
    assert_eq!(location.total_bit_size(), 64);
}

#[test]
fn bit_pieces() {
    let mut context = TestContext::new();

    // reg1 bit_piece(12, 4); reg2 bit_piece(20, 0)
    let expression = [0x50 + 1, 0x9d, 12, 4, 0x50 + 2, 0x9d, 20, 0];
    let location = evaluate_location(&mut context, &expression);
    assert_eq!(location.count_pieces(), 2);
    assert_eq!(location.piece_at(0).unwrap().bit_size, 12);
    assert_eq!(location.piece_at(0).unwrap().bit_offset, 4);
    assert_eq!(location.total_bit_size(), 32);
}

#[test]
fn trailing_piece_operator_is_required_for_composites() {
    let mut context = TestContext::new();
    // reg3 piece(4); constu 0x10  -- missing the final piece operator
    let expression = [0x50 + 3, 0x93, 0x04, 0x10, 0x10];
    let mut location = ValueLocation::new(false);
    assert!(ExpressionEvaluator::new(&mut context)
        .evaluate_location(&expression, &mut location)
        .is_err());
}

#[test]
fn object_address_is_pushed_for_each_piece() {
    let mut context = TestContext::new();
    context.object_address = Some(0x6000);

    // plus_uconst 4 piece(4); plus_uconst 8 piece(4) -- both operate on
    // the implicitly pushed object address
    let expression = [0x23, 0x04, 0x93, 0x04, 0x23, 0x08, 0x93, 0x04];
    let location = evaluate_location(&mut context, &expression);
    assert_eq!(location.piece_at(0).unwrap().storage, PieceStorage::Memory(0x6004));
    assert_eq!(location.piece_at(1).unwrap().storage, PieceStorage::Memory(0x6008));
}
