//! The DWARF expression evaluator.
//!
//! Expressions are little stack programs over target-address-sized values
//! (DWARF5 §2.5). The evaluator runs them against an [`EvaluationContext`]
//! that supplies the pieces of outside state an expression may ask for:
//! the object address, the frame base, TLS resolution, the target's
//! registers and memory, and the expressions behind `DW_OP_call*`.
//!
//! Two entry points exist: [`ExpressionEvaluator::evaluate`] produces a
//! single address, [`ExpressionEvaluator::evaluate_location`] produces a
//! value location, possibly composed of multiple pieces.

#[cfg(test)]
mod tests;

use tracing::{trace, warn};

use crate::consts::*;
use crate::entries::ReferenceKind;
use crate::error::{bad_data, Error, Result};
use crate::location::{ValueLocation, ValuePiece};
use crate::reader::DataReader;
use crate::target::DwarfTargetInterface;
use crate::types::{TargetAddr, ValueType};

// number of elements the stack may grow to
const MAX_STACK_CAPACITY: usize = 1024;

// maximum number of operations a single evaluation may execute, so a
// malformed program cannot loop forever
const MAX_OPERATION_COUNT: u32 = 10000;

/// Everything an expression may ask its surroundings for.
pub trait EvaluationContext {
    fn target_interface(&self) -> &dyn DwarfTargetInterface;

    fn address_size(&self) -> u8;

    /// Delta to add to `DW_OP_addr` operands (load bias).
    fn relocation_delta(&self) -> u64;

    /// The address of the object owning the evaluated attribute, if the
    /// caller provided one (`DW_OP_push_object_address`).
    fn object_address(&mut self) -> Option<TargetAddr>;

    /// The frame's CFA (`DW_OP_call_frame_cfa`).
    fn frame_address(&mut self) -> Option<TargetAddr>;

    /// The frame base of the enclosing subprogram (`DW_OP_fbreg`),
    /// evaluated lazily on first use.
    fn frame_base_address(&mut self) -> Option<TargetAddr>;

    /// Resolves a TLS-local address to an absolute one
    /// (`DW_OP_form_tls_address`).
    fn tls_address(&mut self, local_address: TargetAddr) -> Option<TargetAddr>;

    /// The expression behind a `DW_OP_call2/call4/call_ref` target.
    /// `Ok(None)` means the called entry has no location, which makes the
    /// call a no-op.
    fn call_target(&mut self, offset: u64, kind: ReferenceKind) -> Result<Option<Vec<u8>>>;
}

pub struct ExpressionEvaluator<'context> {
    context: &'context mut dyn EvaluationContext,
    stack: Vec<TargetAddr>,
}

impl<'context> ExpressionEvaluator<'context> {
    pub fn new(context: &'context mut dyn EvaluationContext) -> ExpressionEvaluator<'context> {
        ExpressionEvaluator {
            context,
            stack: Vec::new(),
        }
    }

    /// Pre-pushes a value onto the evaluation stack. CFI rule expressions
    /// start with the CFA pushed.
    pub fn push(&mut self, value: TargetAddr) -> Result<()> {
        self.push_internal(value)
    }

    /// Runs the expression and returns the value left on top of the stack.
    pub fn evaluate(&mut self, expression: &[u8]) -> Result<TargetAddr> {
        let mut reader = DataReader::new(expression, self.context.address_size());
        self.evaluate_internal(&mut reader, None)?;
        self.pop()
    }

    /// Runs the expression as a location description and fills `location`
    /// with the resulting pieces.
    pub fn evaluate_location(
        &mut self,
        expression: &[u8],
        location: &mut ValueLocation,
    ) -> Result<()> {
        location.clear();

        // the empty expression is valid: location unknown
        if expression.is_empty() {
            let mut piece = ValuePiece::unknown();
            piece.set_byte_size(0);
            location.add_piece(piece);
            return Ok(());
        }

        let mut reader = DataReader::new(expression, self.context.address_size());

        // the first (and possibly only) simple expression
        if let Some(address) = self.context.object_address() {
            self.push_internal(address)?;
        }

        let mut piece = ValuePiece::default();
        self.evaluate_internal(&mut reader, Some(&mut piece))?;

        if reader.bytes_remaining() == 0 {
            // a simple expression without composition
            if !piece.is_valid() {
                piece = ValuePiece::in_memory(self.pop()?);
            }
            piece.set_byte_size(0);
            location.add_piece(piece);
            return Ok(());
        }

        // there is more, so the expression is a composition
        self.default_piece_storage(&mut piece);
        self.read_piece_size(&mut reader, &mut piece)?;
        location.add_piece(piece);

        // a composition operator implies at least two simple expressions
        if reader.bytes_remaining() == 0 {
            return Err(bad_data("composite location with a single piece"));
        }

        while reader.bytes_remaining() > 0 {
            if let Some(address) = self.context.object_address() {
                self.push_internal(address)?;
            }

            let mut piece = ValuePiece::default();
            self.evaluate_internal(&mut reader, Some(&mut piece))?;
            self.default_piece_storage(&mut piece);

            // every sub-expression must be followed by a composition
            // operator
            if reader.bytes_remaining() == 0 {
                return Err(bad_data("composite sub-expression without a piece operator"));
            }
            self.read_piece_size(&mut reader, &mut piece)?;
            location.add_piece(piece);
        }

        Ok(())
    }

    /// A sub-expression that didn't name a register yields a memory piece
    /// at the address on top of the stack; one that computed nothing at
    /// all (a bare piece operator) yields an unknown piece.
    fn default_piece_storage(&mut self, piece: &mut ValuePiece) {
        if !piece.is_valid() {
            *piece = match self.stack.pop() {
                Some(address) => ValuePiece::in_memory(address),
                None => ValuePiece::unknown(),
            };
        }
    }

    fn read_piece_size(
        &mut self,
        reader: &mut DataReader<'_>,
        piece: &mut ValuePiece,
    ) -> Result<()> {
        let opcode = reader.read_u8(0);
        if opcode == DW_OP_piece {
            piece.set_byte_size(reader.read_unsigned_leb128(0));
        } else if opcode == DW_OP_bit_piece {
            let bit_size = reader.read_unsigned_leb128(0);
            piece.set_bit_size(bit_size, reader.read_unsigned_leb128(0));
        } else {
            return Err(bad_data("expected a composition operator"));
        }
        if reader.has_overflow() {
            return Err(bad_data("truncated composition operator"));
        }
        Ok(())
    }

    fn push_internal(&mut self, value: TargetAddr) -> Result<()> {
        if self.stack.len() >= MAX_STACK_CAPACITY {
            return Err(Error::BadValue("expression stack overflow".into()));
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<TargetAddr> {
        self.stack
            .pop()
            .ok_or_else(|| Error::BadValue("pop from empty expression stack".into()))
    }

    fn peek(&self, depth: usize) -> Result<TargetAddr> {
        if depth >= self.stack.len() {
            return Err(Error::BadValue("pick from too-shallow expression stack".into()));
        }
        Ok(self.stack[self.stack.len() - 1 - depth])
    }

    /// The main loop. With `piece` set the expression is a location
    /// expression; `DW_OP_regN`/`DW_OP_regx` then terminate the current
    /// simple expression, and piece operators return to
    /// [`Self::evaluate_location`] with the opcode pushed back.
    fn evaluate_internal(
        &mut self,
        reader: &mut DataReader<'_>,
        mut piece: Option<&mut ValuePiece>,
    ) -> Result<()> {
        let mut operations_executed: u32 = 0;

        while reader.bytes_remaining() > 0 {
            let opcode = reader.read_u8(0);

            match opcode {
                DW_OP_addr => {
                    let address = reader.read_address(0);
                    trace!(address, "DW_OP_addr");
                    self.push_internal(address.wrapping_add(self.context.relocation_delta()))?;
                }
                DW_OP_const1u => {
                    let value = reader.read_u8(0) as u64;
                    self.push_internal(value)?;
                }
                DW_OP_const1s => {
                    let value = reader.read_i8(0) as i64;
                    self.push_internal(value as u64)?;
                }
                DW_OP_const2u => {
                    let value = reader.read_u16(0) as u64;
                    self.push_internal(value)?;
                }
                DW_OP_const2s => {
                    let value = reader.read_i16(0) as i64;
                    self.push_internal(value as u64)?;
                }
                DW_OP_const4u => {
                    let value = reader.read_u32(0) as u64;
                    self.push_internal(value)?;
                }
                DW_OP_const4s => {
                    let value = reader.read_i32(0) as i64;
                    self.push_internal(value as u64)?;
                }
                DW_OP_const8u => {
                    let value = reader.read_u64(0);
                    self.push_internal(value)?;
                }
                DW_OP_const8s => {
                    let value = reader.read_i64(0);
                    self.push_internal(value as u64)?;
                }
                DW_OP_constu => {
                    let value = reader.read_unsigned_leb128(0);
                    self.push_internal(value)?;
                }
                DW_OP_consts => {
                    let value = reader.read_signed_leb128(0);
                    self.push_internal(value as u64)?;
                }

                DW_OP_dup => {
                    let top = self.peek(0)?;
                    self.push_internal(top)?;
                }
                DW_OP_drop => {
                    self.pop()?;
                }
                DW_OP_over => {
                    let second = self.peek(1)?;
                    self.push_internal(second)?;
                }
                DW_OP_pick => {
                    let index = reader.read_u8(0) as usize;
                    let value = self.peek(index)?;
                    self.push_internal(value)?;
                }
                DW_OP_swap => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal(top)?;
                    self.push_internal(second)?;
                }
                DW_OP_rot => {
                    let first = self.pop()?;
                    let second = self.pop()?;
                    let third = self.pop()?;
                    self.push_internal(first)?;
                    self.push_internal(third)?;
                    self.push_internal(second)?;
                }

                DW_OP_deref => self.dereference(self.context.address_size())?,
                DW_OP_deref_size => {
                    let size = reader.read_u8(0);
                    self.dereference(size)?;
                }
                DW_OP_xderef => self.dereference_in_address_space(self.context.address_size())?,
                DW_OP_xderef_size => {
                    let size = reader.read_u8(0);
                    self.dereference_in_address_space(size)?;
                }

                DW_OP_abs => {
                    let value = self.pop()?;
                    if self.context.address_size() == 4 {
                        let signed = value as u32 as i32;
                        self.push_internal(signed.unsigned_abs() as u64)?;
                    } else {
                        let signed = value as i64;
                        self.push_internal(signed.unsigned_abs())?;
                    }
                }
                DW_OP_and => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal(second & top)?;
                }
                DW_OP_div => {
                    // signed division, per the specification
                    let top = self.pop()? as i64;
                    let second = self.pop()? as i64;
                    self.push_internal(if top != 0 {
                        second.wrapping_div(top) as u64
                    } else {
                        0
                    })?;
                }
                DW_OP_minus => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal(second.wrapping_sub(top))?;
                }
                DW_OP_mod => {
                    // the specification is silent here; unsigned matches
                    // what compilers emit against
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal(if top != 0 { second % top } else { 0 })?;
                }
                DW_OP_mul => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal(second.wrapping_mul(top))?;
                }
                DW_OP_neg => {
                    let value = self.pop()?;
                    if self.context.address_size() == 4 {
                        self.push_internal((value as u32 as i32).wrapping_neg() as u32 as u64)?;
                    } else {
                        self.push_internal((value as i64).wrapping_neg() as u64)?;
                    }
                }
                DW_OP_not => {
                    let value = self.pop()?;
                    self.push_internal(!value)?;
                }
                DW_OP_or => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal(second | top)?;
                }
                DW_OP_plus => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal(second.wrapping_add(top))?;
                }
                DW_OP_plus_uconst => {
                    let addend = reader.read_unsigned_leb128(0);
                    let value = self.pop()?;
                    self.push_internal(value.wrapping_add(addend))?;
                }
                DW_OP_shl => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal(if top < 64 { second << top } else { 0 })?;
                }
                DW_OP_shr => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal(if top < 64 { second >> top } else { 0 })?;
                }
                DW_OP_shra => {
                    // arithmetic shift preserves the dividend's sign
                    let top = self.pop()?;
                    let second = self.pop()? as i64;
                    let shift = top.min(63);
                    self.push_internal((second >> shift) as u64)?;
                }
                DW_OP_xor => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal(second ^ top)?;
                }

                DW_OP_bra | DW_OP_skip => {
                    let offset = reader.read_i16(0);
                    let taken = opcode == DW_OP_skip || self.pop()? != 0;
                    if taken {
                        let out_of_bounds = if offset >= 0 {
                            offset as u64 > reader.bytes_remaining()
                        } else {
                            offset.unsigned_abs() as u64 > reader.offset()
                        };
                        if out_of_bounds {
                            return Err(Error::BadValue("bra/skip: invalid offset".into()));
                        }
                        reader.seek_absolute((reader.offset() as i64 + offset as i64) as u64);
                    }
                }

                DW_OP_eq => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal((second == top) as u64)?;
                }
                DW_OP_ge => {
                    let top = self.pop()? as i64;
                    let second = self.pop()? as i64;
                    self.push_internal((second >= top) as u64)?;
                }
                DW_OP_gt => {
                    let top = self.pop()? as i64;
                    let second = self.pop()? as i64;
                    self.push_internal((second > top) as u64)?;
                }
                DW_OP_le => {
                    let top = self.pop()? as i64;
                    let second = self.pop()? as i64;
                    self.push_internal((second <= top) as u64)?;
                }
                DW_OP_lt => {
                    let top = self.pop()? as i64;
                    let second = self.pop()? as i64;
                    self.push_internal((second < top) as u64)?;
                }
                DW_OP_ne => {
                    let top = self.pop()?;
                    let second = self.pop()?;
                    self.push_internal((second != top) as u64)?;
                }

                DW_OP_push_object_address => {
                    let address = self
                        .context
                        .object_address()
                        .ok_or_else(|| Error::BadValue("no object address".into()))?;
                    self.push_internal(address)?;
                }
                DW_OP_call_frame_cfa => {
                    let address = self
                        .context
                        .frame_address()
                        .ok_or_else(|| Error::BadValue("no frame address".into()))?;
                    self.push_internal(address)?;
                }
                DW_OP_fbreg => {
                    let offset = reader.read_signed_leb128(0);
                    trace!(offset, "DW_OP_fbreg");
                    let base = self
                        .context
                        .frame_base_address()
                        .ok_or_else(|| Error::BadValue("no frame base address".into()))?;
                    self.push_internal(base.wrapping_add(offset as u64))?;
                }
                DW_OP_form_tls_address => {
                    let local = self.pop()?;
                    let address = self
                        .context
                        .tls_address(local)
                        .ok_or_else(|| Error::BadValue("no TLS address".into()))?;
                    self.push_internal(address)?;
                }

                DW_OP_regx => {
                    let register = reader.read_unsigned_leb128(0) as u32;
                    if reader.has_overflow() {
                        return Err(bad_data("unexpected end of expression"));
                    }
                    match piece.as_deref_mut() {
                        Some(piece) => {
                            *piece = ValuePiece::in_register(register);
                            return Ok(());
                        }
                        None => {
                            return Err(Error::BadValue(
                                "DW_OP_regx in a non-location expression".into(),
                            ))
                        }
                    }
                }
                DW_OP_bregx => {
                    let register = reader.read_unsigned_leb128(0) as u32;
                    let offset = reader.read_signed_leb128(0);
                    self.push_register(register, offset)?;
                }

                DW_OP_call2 => {
                    let offset = reader.read_u16(0) as u64;
                    self.call(reader, offset, ReferenceKind::Local)?;
                }
                DW_OP_call4 => {
                    let offset = reader.read_u32(0) as u64;
                    self.call(reader, offset, ReferenceKind::Local)?;
                }
                DW_OP_call_ref => {
                    let offset = if self.context.address_size() == 4 {
                        reader.read_u32(0) as u64
                    } else {
                        reader.read_u64(0)
                    };
                    self.call(reader, offset, ReferenceKind::Global)?;
                }

                DW_OP_piece | DW_OP_bit_piece => {
                    // handled by evaluate_location; put the opcode back
                    if piece.is_none() {
                        return Err(bad_data("piece operator in a non-location expression"));
                    }
                    reader.seek_absolute(reader.offset() - 1);
                    return Ok(());
                }

                DW_OP_nop => {}

                _ => {
                    if (DW_OP_lit0..=DW_OP_lit31).contains(&opcode) {
                        self.push_internal((opcode - DW_OP_lit0) as u64)?;
                    } else if (DW_OP_reg0..=DW_OP_reg31).contains(&opcode) {
                        let register = (opcode - DW_OP_reg0) as u32;
                        match piece.as_deref_mut() {
                            Some(piece) => {
                                *piece = ValuePiece::in_register(register);
                                return Ok(());
                            }
                            None => {
                                // only allowed in location expressions, but
                                // gcc 2.95.3 emits it elsewhere; degrade to
                                // the register's value
                                self.push_register(register, 0)?;
                            }
                        }
                    } else if (DW_OP_breg0..=DW_OP_breg31).contains(&opcode) {
                        let register = (opcode - DW_OP_breg0) as u32;
                        let offset = reader.read_signed_leb128(0);
                        trace!(register, offset, "DW_OP_breg");
                        self.push_register(register, offset)?;
                    } else {
                        warn!(opcode, "unsupported expression opcode");
                        return Err(bad_data(format!("unsupported expression opcode {opcode:#x}")));
                    }
                }
            }

            operations_executed += 1;
            if operations_executed >= MAX_OPERATION_COUNT {
                return Err(bad_data("expression exceeded the operation limit"));
            }
        }

        if reader.has_overflow() {
            return Err(bad_data("truncated expression"));
        }
        Ok(())
    }

    fn value_type_for_size(&self, size: u8) -> Result<ValueType> {
        // an 8-byte dereference only makes sense on an 8-byte target
        if size == 8 && self.context.address_size() != 8 {
            return Err(Error::BadValue("invalid dereference size".into()));
        }
        ValueType::for_size(size).ok_or_else(|| Error::BadValue("invalid dereference size".into()))
    }

    fn dereference(&mut self, size: u8) -> Result<()> {
        let value_type = self.value_type_for_size(size)?;
        let address = self.pop()?;
        let value = self
            .context
            .target_interface()
            .read_value_from_memory(address, value_type)
            .ok_or_else(|| Error::BadValue("failed to read memory".into()))?;
        self.push_internal(value.to_u64())
    }

    fn dereference_in_address_space(&mut self, size: u8) -> Result<()> {
        let value_type = self.value_type_for_size(size)?;
        let address = self.pop()?;
        let address_space = self.pop()?;
        let value = self
            .context
            .target_interface()
            .read_value_from_indexed_memory(address_space, address, value_type)
            .ok_or_else(|| Error::BadValue("failed to read memory".into()))?;
        self.push_internal(value.to_u64())
    }

    fn push_register(&mut self, register: u32, offset: i64) -> Result<()> {
        let value = self
            .context
            .target_interface()
            .register_value(register)
            .ok_or_else(|| Error::BadValue("failed to get register".into()))?;
        self.push_internal(value.to_u64().wrapping_add(offset as u64))
    }

    fn call(&mut self, reader: &DataReader<'_>, offset: u64, kind: ReferenceKind) -> Result<()> {
        if reader.has_overflow() {
            return Err(bad_data("unexpected end of expression"));
        }

        let Some(block) = self.context.call_target(offset, kind)? else {
            // an entry without a location makes the call a no-op
            return Ok(());
        };

        let mut call_reader = DataReader::new(&block, self.context.address_size());
        self.evaluate_internal(&mut call_reader, None)
    }
}
