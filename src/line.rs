//! The line-number program state machine.
//!
//! `.debug_line` encodes the line table as a bytecode program; running it
//! produces one row per (address, source position) pair. See DWARF5 §6.2.
//! The header is decoded by the file façade (it differs between versions);
//! this module interprets the program itself, which is stable across v2-v5
//! as long as `maximum_operations_per_instruction == 1`.


use tracing::warn;

use crate::consts::*;
use crate::error::{bad_data, Result};
use crate::reader::DataReader;
use crate::types::TargetAddr;

/// Operand counts of the twelve standard opcodes. A header whose
/// `standard_opcode_lengths` disagrees is from a dialect we don't speak.
const STANDARD_OPCODE_OPERANDS: [u8; 12] = [0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1];

/// A parsed line-number program: the header fields the state machine needs
/// plus the program bytes.
#[derive(Debug)]
pub struct LineNumberProgram {
    program: Box<[u8]>,
    address_size: u8,
    min_instruction_length: u8,
    default_is_statement: bool,
    line_base: i8,
    line_range: u8,
    opcode_base: u8,
    standard_opcode_lengths: Box<[u8]>,
}

/// The row state of the machine. [`LineNumberProgram::get_next_row`]
/// leaves it describing one emitted row.
#[derive(Debug, Clone)]
pub struct LineState<'program> {
    pub address: TargetAddr,
    /// 1-based file index; -1 after `DW_LNE_define_file` selected the
    /// explicit file.
    pub file: i64,
    pub line: i64,
    pub column: i64,
    pub is_statement: bool,
    pub is_basic_block: bool,
    pub is_sequence_end: bool,
    pub is_prologue_end: bool,
    pub is_epilogue_begin: bool,
    pub instruction_set: u32,
    pub discriminator: u32,
    /// File defined inline by `DW_LNE_define_file`, active while
    /// `file == -1`.
    pub explicit_file: Option<String>,
    pub explicit_file_directory_index: u64,

    reader: DataReader<'program>,
}

impl LineNumberProgram {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        program: Box<[u8]>,
        address_size: u8,
        min_instruction_length: u8,
        default_is_statement: bool,
        line_base: i8,
        line_range: u8,
        opcode_base: u8,
        standard_opcode_lengths: Box<[u8]>,
    ) -> Result<LineNumberProgram> {
        // check the operand counts for the standard opcodes
        let checked = (opcode_base.max(1) as usize - 1).min(STANDARD_OPCODE_OPERANDS.len());
        for i in 0..checked {
            if standard_opcode_lengths.get(i) != Some(&STANDARD_OPCODE_OPERANDS[i]) {
                warn!(opcode = i + 1, "unexpected operand count for standard opcode");
                return Err(bad_data("line program with incompatible standard opcodes"));
            }
        }

        Ok(LineNumberProgram {
            program,
            address_size,
            min_instruction_length,
            default_is_statement,
            line_base,
            line_range,
            opcode_base,
            standard_opcode_lengths,
        })
    }

    pub fn get_initial_state(&self) -> LineState<'_> {
        let mut state = LineState {
            address: 0,
            file: 1,
            line: 1,
            column: 0,
            is_statement: self.default_is_statement,
            is_basic_block: false,
            is_sequence_end: false,
            is_prologue_end: false,
            is_epilogue_begin: false,
            instruction_set: 0,
            discriminator: 0,
            explicit_file: None,
            explicit_file_directory_index: 0,
            reader: DataReader::new(&self.program, self.address_size),
        };
        self.set_to_initial(&mut state);
        state
    }

    fn set_to_initial(&self, state: &mut LineState<'_>) {
        state.address = 0;
        state.file = 1;
        state.line = 1;
        state.column = 0;
        state.is_statement = self.default_is_statement;
        state.is_basic_block = false;
        state.is_sequence_end = false;
        state.is_prologue_end = false;
        state.is_epilogue_begin = false;
        state.instruction_set = 0;
        state.discriminator = 0;
    }

    /// Advances the state to the next row. Returns `false` at the end of
    /// the program (or on malformed input). After a row with
    /// `is_sequence_end`, the next call restarts from the initial state
    /// and continues in the same byte stream.
    pub fn get_next_row(&self, state: &mut LineState<'_>) -> bool {
        if state.is_sequence_end {
            self.set_to_initial(state);
        }

        while state.reader.bytes_remaining() > 0 {
            let mut append_row = false;
            let opcode = state.reader.read_u8(0);

            if opcode >= self.opcode_base {
                // special opcode
                let adjusted = (opcode - self.opcode_base) as u64;
                state.address += adjusted / self.line_range as u64
                    * self.min_instruction_length as u64;
                state.line +=
                    (adjusted % self.line_range as u64) as i64 + self.line_base as i64;
                state.is_basic_block = false;
                state.is_prologue_end = false;
                state.is_epilogue_begin = false;
                state.discriminator = 0;
                append_row = true;
            } else if opcode > 0 {
                // standard opcode
                match opcode {
                    DW_LNS_copy => {
                        state.is_basic_block = false;
                        state.is_prologue_end = false;
                        state.is_epilogue_begin = false;
                        state.discriminator = 0;
                        append_row = true;
                    }
                    DW_LNS_advance_pc => {
                        state.address += state.reader.read_unsigned_leb128(0)
                            * self.min_instruction_length as u64;
                    }
                    DW_LNS_advance_line => {
                        state.line += state.reader.read_signed_leb128(0);
                    }
                    DW_LNS_set_file => {
                        state.file = state.reader.read_unsigned_leb128(0) as i64;
                    }
                    DW_LNS_set_column => {
                        state.column = state.reader.read_unsigned_leb128(0) as i64;
                    }
                    DW_LNS_negate_stmt => {
                        state.is_statement = !state.is_statement;
                    }
                    DW_LNS_set_basic_block => {
                        state.is_basic_block = true;
                    }
                    DW_LNS_const_add_pc => {
                        state.address += (255 - self.opcode_base) as u64
                            / self.line_range as u64
                            * self.min_instruction_length as u64;
                    }
                    DW_LNS_fixed_advance_pc => {
                        state.address += state.reader.read_u16(0) as u64;
                    }
                    DW_LNS_set_prologue_end => {
                        state.is_prologue_end = true;
                    }
                    DW_LNS_set_epilogue_begin => {
                        state.is_epilogue_begin = true;
                    }
                    DW_LNS_set_isa => {
                        state.instruction_set = state.reader.read_unsigned_leb128(0) as u32;
                    }
                    _ => {
                        warn!(opcode, "unsupported standard line opcode");
                        let operands = self
                            .standard_opcode_lengths
                            .get(opcode as usize - 1)
                            .copied()
                            .unwrap_or(0);
                        for _ in 0..operands {
                            state.reader.read_unsigned_leb128(0);
                        }
                    }
                }
            } else {
                // extended opcode: a length-prefixed instruction
                let instruction_length = state.reader.read_unsigned_leb128(0);
                let instruction_offset = state.reader.offset();
                let extended_opcode = state.reader.read_u8(0);

                match extended_opcode {
                    DW_LNE_end_sequence => {
                        state.is_sequence_end = true;
                        append_row = true;
                    }
                    DW_LNE_set_address => {
                        state.address = state.reader.read_address(0);
                    }
                    DW_LNE_define_file => {
                        state.explicit_file = Some(state.reader.read_string("").to_string());
                        state.explicit_file_directory_index =
                            state.reader.read_unsigned_leb128(0);
                        state.reader.read_unsigned_leb128(0); // modification time
                        state.reader.read_unsigned_leb128(0); // file length
                        state.file = -1;
                    }
                    DW_LNE_set_discriminator => {
                        state.discriminator = state.reader.read_unsigned_leb128(0) as u32;
                    }
                    _ => {
                        warn!(opcode = extended_opcode, "unsupported extended line opcode");
                    }
                }

                let consumed = state.reader.offset() - instruction_offset;
                if instruction_length < consumed {
                    return false;
                }
                state.reader.skip(instruction_length - consumed);
            }

            if state.reader.has_overflow() {
                return false;
            }
            if append_row {
                return true;
            }
        }

        false
    }
}
