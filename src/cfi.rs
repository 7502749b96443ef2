//! Call-frame information: rules, rule sets, CIE augmentation handling and
//! the instruction interpreter.
//!
//! The CFI of a program is a very large conceptual table: one row per code
//! location, one column per register, plus the CFA column. CIEs and FDEs
//! encode that table as bytecode which this module replays up to the PC
//! being unwound. See DWARF5 §6.4; the `.eh_frame` flavor is described by
//! the LSB ("Linux Standard Base Core") and differs in its CIE-id
//! sentinel, its CIE-pointer relativity and its encoded addresses.
//!
//! The driver that locates FDEs and applies the final rules lives on the
//! file façade; everything here is the per-entry machinery.

#[cfg(test)]
mod tests;

use bitflags::bitflags;
use tracing::{trace, warn};

use crate::consts::*;
use crate::elf::{ElfFile, ElfSection};
use crate::error::{bad_data, unsupported, Error, Result};
use crate::reader::DataReader;
use crate::types::TargetAddr;

/// How a register's caller value is recovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CfaRule<'data> {
    /// No recoverable value in the previous frame.
    #[default]
    Undefined,
    /// The register was not modified from the previous frame.
    SameValue,
    /// The value is saved at `CFA + offset`.
    LocationOffset(i64),
    /// The value *is* `CFA + offset`.
    ValueOffset(i64),
    /// The value lives in another register.
    Register(u32),
    /// An expression computes the address the value is saved at.
    LocationExpression(&'data [u8]),
    /// An expression computes the value itself.
    ValueExpression(&'data [u8]),
}

/// How the canonical frame address is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CfaCfaRule<'data> {
    #[default]
    Undefined,
    RegisterOffset {
        register: u32,
        offset: i64,
    },
    Expression(&'data [u8]),
}

/// One row of the conceptual table: the CFA rule plus one rule per
/// register.
#[derive(Debug, Clone, Default)]
pub struct CfaRuleSet<'data> {
    cfa_rule: CfaCfaRule<'data>,
    register_rules: Vec<CfaRule<'data>>,
}

impl<'data> CfaRuleSet<'data> {
    pub fn new(register_count: u32) -> CfaRuleSet<'data> {
        CfaRuleSet {
            cfa_rule: CfaCfaRule::Undefined,
            register_rules: vec![CfaRule::Undefined; register_count as usize],
        }
    }

    pub fn cfa_rule(&self) -> &CfaCfaRule<'data> {
        &self.cfa_rule
    }

    pub fn cfa_rule_mut(&mut self) -> &mut CfaCfaRule<'data> {
        &mut self.cfa_rule
    }

    pub fn register_rule(&self, register: u32) -> Option<&CfaRule<'data>> {
        self.register_rules.get(register as usize)
    }

    pub fn register_rule_mut(&mut self, register: u32) -> Option<&mut CfaRule<'data>> {
        self.register_rules.get_mut(register as usize)
    }
}

/// The interpreter state while replaying CIE/FDE instructions: the target
/// location, the current row and the remember/restore stack.
#[derive(Debug, Default)]
pub struct CfaContext<'data> {
    target_location: TargetAddr,
    location: TargetAddr,
    code_alignment: u64,
    data_alignment: i64,
    return_address_register: u32,
    rule_set: CfaRuleSet<'data>,
    initial_rule_set: Option<CfaRuleSet<'data>>,
    rule_set_stack: Vec<CfaRuleSet<'data>>,
}

impl<'data> CfaContext<'data> {
    pub fn new(register_count: u32) -> CfaContext<'data> {
        CfaContext {
            rule_set: CfaRuleSet::new(register_count),
            ..CfaContext::default()
        }
    }

    pub fn set_location(&mut self, target_location: TargetAddr, initial_location: TargetAddr) {
        self.target_location = target_location;
        self.location = initial_location;
    }

    pub fn target_location(&self) -> TargetAddr {
        self.target_location
    }

    pub fn location(&self) -> TargetAddr {
        self.location
    }

    pub fn set_current_location(&mut self, location: TargetAddr) {
        self.location = location;
    }

    pub fn code_alignment(&self) -> u64 {
        self.code_alignment
    }

    pub fn set_code_alignment(&mut self, alignment: u64) {
        self.code_alignment = alignment;
    }

    pub fn data_alignment(&self) -> i64 {
        self.data_alignment
    }

    pub fn set_data_alignment(&mut self, alignment: i64) {
        self.data_alignment = alignment;
    }

    pub fn return_address_register(&self) -> u32 {
        self.return_address_register
    }

    pub fn set_return_address_register(&mut self, register: u32) {
        self.return_address_register = register;
    }

    pub fn cfa_rule(&self) -> &CfaCfaRule<'data> {
        self.rule_set.cfa_rule()
    }

    pub fn cfa_rule_mut(&mut self) -> &mut CfaCfaRule<'data> {
        self.rule_set.cfa_rule_mut()
    }

    pub fn register_rule(&self, register: u32) -> Option<&CfaRule<'data>> {
        self.rule_set.register_rule(register)
    }

    pub fn register_rule_mut(&mut self, register: u32) -> Option<&mut CfaRule<'data>> {
        self.rule_set.register_rule_mut(register)
    }

    /// Snapshots the rules as established by the CIE's initial
    /// instructions; `DW_CFA_restore` restores single registers from this
    /// snapshot.
    pub fn save_initial_rule_set(&mut self) {
        self.initial_rule_set = Some(self.rule_set.clone());
    }

    /// `DW_CFA_remember_state`: deep-copies the current rule set onto the
    /// stack.
    pub fn push_rule_set(&mut self) {
        self.rule_set_stack.push(self.rule_set.clone());
    }

    /// `DW_CFA_restore_state`.
    pub fn pop_rule_set(&mut self) -> Result<()> {
        self.rule_set = self
            .rule_set_stack
            .pop()
            .ok_or_else(|| bad_data("restore_state without remember_state"))?;
        Ok(())
    }

    pub fn restore_register_rule(&mut self, register: u32) {
        let Some(initial) = &self.initial_rule_set else {
            return;
        };
        let Some(initial_rule) = initial.register_rule(register).copied() else {
            return;
        };
        if let Some(rule) = self.rule_set.register_rule_mut(register) {
            *rule = initial_rule;
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct AugmentationFlags: u8 {
        const DATA = 0x01;
        const LANGUAGE_SPECIFIC_DATA = 0x02;
        const PERSONALITY = 0x04;
        const ADDRESS_POINTER_FORMAT = 0x08;
    }
}

// value-format nibble of an Itanium pointer encoding
const CFI_ADDRESS_FORMAT_ABSOLUTE: u8 = 0x00;
const CFI_ADDRESS_FORMAT_UNSIGNED_LEB128: u8 = 0x01;
const CFI_ADDRESS_FORMAT_UNSIGNED_16: u8 = 0x02;
const CFI_ADDRESS_FORMAT_UNSIGNED_32: u8 = 0x03;
const CFI_ADDRESS_FORMAT_UNSIGNED_64: u8 = 0x04;
const CFI_ADDRESS_FORMAT_SIGNED: u8 = 0x08;
const CFI_ADDRESS_FORMAT_SIGNED_LEB128: u8 =
    CFI_ADDRESS_FORMAT_UNSIGNED_LEB128 | CFI_ADDRESS_FORMAT_SIGNED;
const CFI_ADDRESS_FORMAT_SIGNED_16: u8 = CFI_ADDRESS_FORMAT_UNSIGNED_16 | CFI_ADDRESS_FORMAT_SIGNED;
const CFI_ADDRESS_FORMAT_SIGNED_32: u8 = CFI_ADDRESS_FORMAT_UNSIGNED_32 | CFI_ADDRESS_FORMAT_SIGNED;
const CFI_ADDRESS_FORMAT_SIGNED_64: u8 = CFI_ADDRESS_FORMAT_UNSIGNED_64 | CFI_ADDRESS_FORMAT_SIGNED;

// application nibble
pub(crate) const CFI_ADDRESS_TYPE_PC_RELATIVE: u8 = 0x10;
const CFI_ADDRESS_TYPE_TEXT_RELATIVE: u8 = 0x20;
const CFI_ADDRESS_TYPE_DATA_RELATIVE: u8 = 0x30;
const CFI_ADDRESS_TYPE_FUNCTION_RELATIVE: u8 = 0x40;
const CFI_ADDRESS_TYPE_ALIGNED: u8 = 0x50;

/// A CIE's augmentation: the raw string, what the `z` data block declared,
/// and the pointer encoding governing the FDE's addresses.
///
/// The default encoding is an absolute target-address-sized word, matching
/// `.debug_frame`; a GCC-4-style `.eh_frame` CIE normally overrides it via
/// the `R` character.
#[derive(Debug, Default)]
pub struct CieAugmentation {
    string: String,
    flags: AugmentationFlags,
    address_encoding: u8,
}

impl CieAugmentation {
    /// Reads the augmentation string. The data block, if any, follows the
    /// alignment fields and is parsed by [`CieAugmentation::read`].
    pub fn init(&mut self, reader: &mut DataReader<'_>) {
        self.string = reader.read_string("").to_string();
        self.flags = AugmentationFlags::empty();
        self.address_encoding = CFI_ADDRESS_FORMAT_ABSOLUTE;
    }

    pub fn string(&self) -> &str {
        &self.string
    }

    /// Parses the `z` data block (or accepts the bare GCC-2 `eh`
    /// marker). Unknown augmentation characters make the whole CIE
    /// unusable since their data cannot be skipped reliably.
    pub fn read(&mut self, reader: &mut DataReader<'_>) -> Result<()> {
        if self.string.is_empty() {
            return Ok(());
        }

        if let Some(characters) = self.string.strip_prefix('z') {
            self.flags |= AugmentationFlags::DATA;

            // the block is preceded by its length
            let length = reader.read_unsigned_leb128(0);
            let mut remaining = length as i64;
            trace!(length, "CIE augmentation data");

            for character in characters.chars() {
                match character {
                    'L' => {
                        self.flags |= AugmentationFlags::LANGUAGE_SPECIFIC_DATA;
                        reader.read_u8(0);
                        remaining -= 1;
                    }
                    'P' => {
                        self.flags |= AugmentationFlags::PERSONALITY;
                        // the personality pointer has its own encoding
                        let saved_encoding = self.address_encoding;
                        self.address_encoding = reader.read_u8(0);
                        let offset = reader.offset();
                        self.read_encoded_address(reader, None, None, true);
                        self.address_encoding = saved_encoding;
                        remaining -= (reader.offset() - offset) as i64 + 1;
                    }
                    'R' => {
                        self.flags |= AugmentationFlags::ADDRESS_POINTER_FORMAT;
                        self.address_encoding = reader.read_u8(0);
                        remaining -= 1;
                    }
                    _ => {
                        warn!(
                            character = %character,
                            string = %self.string,
                            "unsupported CIE augmentation"
                        );
                        return Err(unsupported(format!(
                            "CIE augmentation {:?}",
                            self.string
                        )));
                    }
                }
            }

            if remaining != 0 || reader.has_overflow() {
                warn!(
                    expected = length,
                    read = length as i64 - remaining,
                    "CIE augmentation data length mismatch"
                );
                return Err(bad_data("CIE augmentation data length mismatch"));
            }

            return Ok(());
        }

        // GCC 2's "eh" carries a pre-CIE exception-table pointer handled
        // by the CIE header parser; nothing to do here.
        if self.string == "eh" {
            return Ok(());
        }

        Err(unsupported(format!("CIE augmentation {:?}", self.string)))
    }

    /// Skips an FDE's augmentation data block, if the CIE declared one.
    pub fn read_fde_data(&self, reader: &mut DataReader<'_>) -> Result<()> {
        if !self.has_data() {
            return Ok(());
        }

        let length = reader.read_unsigned_leb128(0);
        reader.skip(length);
        trace!(length, "FDE augmentation data");

        if reader.has_overflow() {
            return Err(bad_data("truncated FDE augmentation data"));
        }
        Ok(())
    }

    pub fn has_data(&self) -> bool {
        self.flags.contains(AugmentationFlags::DATA)
    }

    pub fn has_fde_address_format(&self) -> bool {
        self.flags.contains(AugmentationFlags::ADDRESS_POINTER_FORMAT)
    }

    pub fn fde_address_type(&self) -> u8 {
        self.address_encoding & 0x70
    }

    /// The base address selected by the encoding's application nibble.
    fn fde_address_offset(
        &self,
        elf: Option<&ElfFile>,
        section: Option<&ElfSection<'_>>,
    ) -> TargetAddr {
        match self.fde_address_type() {
            CFI_ADDRESS_TYPE_PC_RELATIVE => section.map_or(0, |section| section.load_address),
            CFI_ADDRESS_TYPE_TEXT_RELATIVE => elf
                .and_then(ElfFile::text_segment)
                .map_or(0, |segment| segment.load_address),
            CFI_ADDRESS_TYPE_DATA_RELATIVE => elf
                .and_then(ElfFile::data_segment)
                .map_or(0, |segment| segment.load_address),
            CFI_ADDRESS_TYPE_FUNCTION_RELATIVE => 0,
            CFI_ADDRESS_TYPE_ALIGNED => {
                // not generated by the toolchains we read
                warn!("aligned/indirect FDE address format not implemented");
                0
            }
            _ => 0,
        }
    }

    /// Reads one address in the CIE's pointer encoding, resolved against
    /// the encoding's base unless `value_only` is set.
    pub fn read_encoded_address(
        &self,
        reader: &mut DataReader<'_>,
        elf: Option<&ElfFile>,
        section: Option<&ElfSection<'_>>,
        value_only: bool,
    ) -> TargetAddr {
        let base = if value_only {
            0
        } else {
            self.fde_address_offset(elf, section)
        };

        match self.address_encoding & 0x0f {
            CFI_ADDRESS_FORMAT_ABSOLUTE => base.wrapping_add(reader.read_address(0)),
            CFI_ADDRESS_FORMAT_UNSIGNED_LEB128 => {
                base.wrapping_add(reader.read_unsigned_leb128(0))
            }
            CFI_ADDRESS_FORMAT_SIGNED_LEB128 => {
                base.wrapping_add(reader.read_signed_leb128(0) as u64)
            }
            CFI_ADDRESS_FORMAT_UNSIGNED_16 => base.wrapping_add(reader.read_u16(0) as u64),
            CFI_ADDRESS_FORMAT_SIGNED_16 => base.wrapping_add(reader.read_i16(0) as i64 as u64),
            CFI_ADDRESS_FORMAT_UNSIGNED_32 => base.wrapping_add(reader.read_u32(0) as u64),
            CFI_ADDRESS_FORMAT_SIGNED_32 => base.wrapping_add(reader.read_i32(0) as i64 as u64),
            CFI_ADDRESS_FORMAT_UNSIGNED_64 => base.wrapping_add(reader.read_u64(0)),
            CFI_ADDRESS_FORMAT_SIGNED_64 => base.wrapping_add(reader.read_i64(0) as u64),
            format => {
                warn!(format, "unknown FDE address value format");
                base
            }
        }
    }
}

/// One record of the FDE index: the covered range `[start, end)` and
/// where the FDE and its CIE live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdeLookupInfo {
    pub start: TargetAddr,
    pub end: TargetAddr,
    pub fde_offset: u64,
    pub cie_offset: u64,
    pub eh_frame: bool,
}

impl FdeLookupInfo {
    pub fn contains_address(&self, address: TargetAddr) -> bool {
        address >= self.start && address < self.end
    }
}

/// Binary search over an index sorted by `start`.
pub fn lookup_fde(infos: &[FdeLookupInfo], address: TargetAddr) -> Option<&FdeLookupInfo> {
    if infos.is_empty() {
        return None;
    }

    let mut lower = 0;
    let mut upper = infos.len() - 1;
    while lower < upper {
        let mid = (lower + upper + 1) / 2;
        if address < infos[mid].start {
            upper = mid - 1;
        } else {
            lower = mid;
        }
    }

    let info = &infos[lower];
    info.contains_address(address).then_some(info)
}

/// Replays CIE or FDE instructions into `context`, stopping as soon as the
/// row location would pass the target location.
pub fn parse_frame_instructions<'data>(
    context: &mut CfaContext<'data>,
    reader: &mut DataReader<'data>,
    augmentation: &CieAugmentation,
    elf: &ElfFile,
    section: &ElfSection<'data>,
) -> Result<()> {
    while reader.bytes_remaining() > 0 {
        let opcode = reader.read_u8(0);

        // the high two bits select the short-form instructions
        if opcode >> 6 != 0 {
            let operand = (opcode & 0x3f) as u32;
            match opcode >> 6 {
                DW_CFA_advance_loc => {
                    trace!(delta = operand, "DW_CFA_advance_loc");
                    let location =
                        context.location() + operand as u64 * context.code_alignment();
                    if location > context.target_location() {
                        return Ok(());
                    }
                    context.set_current_location(location);
                }
                DW_CFA_offset => {
                    let offset = reader.read_unsigned_leb128(0);
                    trace!(register = operand, offset, "DW_CFA_offset");
                    let data_alignment = context.data_alignment();
                    if let Some(rule) = context.register_rule_mut(operand) {
                        *rule = CfaRule::LocationOffset(offset as i64 * data_alignment);
                    }
                }
                DW_CFA_restore => {
                    trace!(register = operand, "DW_CFA_restore");
                    context.restore_register_rule(operand);
                }
                _ => unreachable!(),
            }
            continue;
        }

        match opcode {
            DW_CFA_nop => {}
            DW_CFA_set_loc => {
                let location =
                    augmentation.read_encoded_address(reader, Some(elf), Some(section), false);
                trace!(location, "DW_CFA_set_loc");
                if location < context.location() {
                    return Err(Error::BadValue("set_loc moved backwards".into()));
                }
                if location > context.target_location() {
                    return Ok(());
                }
                context.set_current_location(location);
            }
            DW_CFA_advance_loc1 | DW_CFA_advance_loc2 | DW_CFA_advance_loc4
            | DW_CFA_MIPS_advance_loc8 => {
                let delta = match opcode {
                    DW_CFA_advance_loc1 => reader.read_u8(0) as u64,
                    DW_CFA_advance_loc2 => reader.read_u16(0) as u64,
                    DW_CFA_advance_loc4 => reader.read_u32(0) as u64,
                    _ => reader.read_u64(0),
                };
                trace!(delta, "DW_CFA_advance_loc{{1,2,4,8}}");
                let location = context.location() + delta * context.code_alignment();
                if location > context.target_location() {
                    return Ok(());
                }
                context.set_current_location(location);
            }
            DW_CFA_offset_extended => {
                let register = reader.read_unsigned_leb128(0) as u32;
                let offset = reader.read_unsigned_leb128(0);
                trace!(register, offset, "DW_CFA_offset_extended");
                let data_alignment = context.data_alignment();
                if let Some(rule) = context.register_rule_mut(register) {
                    *rule = CfaRule::LocationOffset(offset as i64 * data_alignment);
                }
            }
            DW_CFA_restore_extended => {
                let register = reader.read_unsigned_leb128(0) as u32;
                trace!(register, "DW_CFA_restore_extended");
                context.restore_register_rule(register);
            }
            DW_CFA_undefined => {
                let register = reader.read_unsigned_leb128(0) as u32;
                trace!(register, "DW_CFA_undefined");
                if let Some(rule) = context.register_rule_mut(register) {
                    *rule = CfaRule::Undefined;
                }
            }
            DW_CFA_same_value => {
                let register = reader.read_unsigned_leb128(0) as u32;
                trace!(register, "DW_CFA_same_value");
                if let Some(rule) = context.register_rule_mut(register) {
                    *rule = CfaRule::SameValue;
                }
            }
            DW_CFA_register => {
                let register = reader.read_unsigned_leb128(0) as u32;
                let source = reader.read_unsigned_leb128(0) as u32;
                trace!(register, source, "DW_CFA_register");
                if let Some(rule) = context.register_rule_mut(register) {
                    *rule = CfaRule::Register(source);
                }
            }
            DW_CFA_remember_state => {
                trace!("DW_CFA_remember_state");
                context.push_rule_set();
            }
            DW_CFA_restore_state => {
                trace!("DW_CFA_restore_state");
                context.pop_rule_set()?;
            }
            DW_CFA_def_cfa => {
                let register = reader.read_unsigned_leb128(0) as u32;
                let offset = reader.read_unsigned_leb128(0);
                trace!(register, offset, "DW_CFA_def_cfa");
                *context.cfa_rule_mut() = CfaCfaRule::RegisterOffset {
                    register,
                    offset: offset as i64,
                };
            }
            DW_CFA_def_cfa_register => {
                let register = reader.read_unsigned_leb128(0) as u32;
                trace!(register, "DW_CFA_def_cfa_register");
                match context.cfa_rule_mut() {
                    CfaCfaRule::RegisterOffset { register: slot, .. } => *slot = register,
                    _ => return Err(bad_data("def_cfa_register without a register+offset CFA")),
                }
            }
            DW_CFA_def_cfa_offset => {
                let offset = reader.read_unsigned_leb128(0);
                trace!(offset, "DW_CFA_def_cfa_offset");
                match context.cfa_rule_mut() {
                    CfaCfaRule::RegisterOffset { offset: slot, .. } => *slot = offset as i64,
                    _ => return Err(bad_data("def_cfa_offset without a register+offset CFA")),
                }
            }
            DW_CFA_def_cfa_expression => {
                let length = reader.read_unsigned_leb128(0);
                let block = &reader.remaining_data()[..length.min(reader.bytes_remaining()) as usize];
                reader.skip(length);
                trace!(length, "DW_CFA_def_cfa_expression");
                *context.cfa_rule_mut() = CfaCfaRule::Expression(block);
            }
            DW_CFA_expression => {
                let register = reader.read_unsigned_leb128(0) as u32;
                let length = reader.read_unsigned_leb128(0);
                let block = &reader.remaining_data()[..length.min(reader.bytes_remaining()) as usize];
                reader.skip(length);
                trace!(register, length, "DW_CFA_expression");
                if let Some(rule) = context.register_rule_mut(register) {
                    *rule = CfaRule::LocationExpression(block);
                }
            }
            DW_CFA_offset_extended_sf => {
                let register = reader.read_unsigned_leb128(0) as u32;
                let offset = reader.read_signed_leb128(0);
                trace!(register, offset, "DW_CFA_offset_extended_sf");
                let data_alignment = context.data_alignment();
                if let Some(rule) = context.register_rule_mut(register) {
                    *rule = CfaRule::LocationOffset(offset * data_alignment);
                }
            }
            DW_CFA_def_cfa_sf => {
                let register = reader.read_unsigned_leb128(0) as u32;
                let offset = reader.read_signed_leb128(0);
                trace!(register, offset, "DW_CFA_def_cfa_sf");
                *context.cfa_rule_mut() = CfaCfaRule::RegisterOffset {
                    register,
                    offset: offset * context.data_alignment(),
                };
            }
            DW_CFA_def_cfa_offset_sf => {
                let offset = reader.read_signed_leb128(0);
                trace!(offset, "DW_CFA_def_cfa_offset_sf");
                let data_alignment = context.data_alignment();
                match context.cfa_rule_mut() {
                    CfaCfaRule::RegisterOffset { offset: slot, .. } => {
                        *slot = offset * data_alignment
                    }
                    _ => return Err(bad_data("def_cfa_offset_sf without a register+offset CFA")),
                }
            }
            DW_CFA_val_offset => {
                let register = reader.read_unsigned_leb128(0) as u32;
                let offset = reader.read_unsigned_leb128(0);
                trace!(register, offset, "DW_CFA_val_offset");
                let data_alignment = context.data_alignment();
                if let Some(rule) = context.register_rule_mut(register) {
                    *rule = CfaRule::ValueOffset(offset as i64 * data_alignment);
                }
            }
            DW_CFA_val_offset_sf => {
                let register = reader.read_unsigned_leb128(0) as u32;
                let offset = reader.read_signed_leb128(0);
                trace!(register, offset, "DW_CFA_val_offset_sf");
                let data_alignment = context.data_alignment();
                if let Some(rule) = context.register_rule_mut(register) {
                    *rule = CfaRule::ValueOffset(offset * data_alignment);
                }
            }
            DW_CFA_val_expression => {
                let register = reader.read_unsigned_leb128(0) as u32;
                let length = reader.read_unsigned_leb128(0);
                let block = &reader.remaining_data()[..length.min(reader.bytes_remaining()) as usize];
                reader.skip(length);
                trace!(register, length, "DW_CFA_val_expression");
                if let Some(rule) = context.register_rule_mut(register) {
                    *rule = CfaRule::ValueExpression(block);
                }
            }

            // vendor extensions
            DW_CFA_GNU_window_save => {
                // SPARC specific; a no-op everywhere else
                trace!("DW_CFA_GNU_window_save");
            }
            DW_CFA_GNU_args_size => {
                // argument-area size; irrelevant for unwinding registers
                let size = reader.read_unsigned_leb128(0);
                trace!(size, "DW_CFA_GNU_args_size");
            }
            DW_CFA_GNU_negative_offset_extended => {
                // obsolete predecessor of offset_extended_sf
                let register = reader.read_unsigned_leb128(0) as u32;
                let offset = reader.read_signed_leb128(0);
                trace!(register, offset, "DW_CFA_GNU_negative_offset_extended");
                let data_alignment = context.data_alignment();
                if let Some(rule) = context.register_rule_mut(register) {
                    *rule = CfaRule::LocationOffset(offset * data_alignment);
                }
            }

            _ => {
                warn!(opcode, "unknown call frame instruction");
                return Err(bad_data(format!("unknown call frame instruction {opcode:#x}")));
            }
        }

        if reader.has_overflow() {
            return Err(bad_data("truncated call frame instructions"));
        }
    }

    Ok(())
}
