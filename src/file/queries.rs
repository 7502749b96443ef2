//! The query surface of [`DwarfFile`]: function discovery, statement
//! resolution, call-frame unwinding and expression/location evaluation.

use tracing::{instrument, trace, warn};

use super::{find_location_expression, parse_cie_header, Sections};
use crate::attributes::{ConstantValue, DynamicValue, LocationDescription};
use crate::cfi::{
    lookup_fde, parse_frame_instructions, CfaCfaRule, CfaContext, CfaRule, CieAugmentation,
    FdeLookupInfo,
};
use crate::consts::*;
use crate::elf::{ElfFile, ElfSection};
use crate::entries::{DebugInfoEntry, DieKind, DieRef, ReferenceKind, UnitId};
use crate::error::{bad_data, Error, Result};
use crate::expr::{EvaluationContext, ExpressionEvaluator};
use crate::file::DwarfFile;
use crate::location::ValueLocation;
use crate::ranges::{TargetAddressRange, TargetAddressRangeList};
use crate::reader::DataReader;
use crate::statement::{FunctionInfo, SourceLocation, Statement};
use crate::target::DwarfTargetInterface;
use crate::types::{TargetAddr, Variant};
use crate::unit::CompilationUnit;

/// The expression context wired to a loaded file: it can resolve call
/// targets through the DIE graph and lazily evaluates the enclosing
/// subprogram's frame base.
struct FileEvaluationContext<'file> {
    file: &'file DwarfFile,
    sections: Sections<'file>,
    unit_index: Option<usize>,
    subprogram: Option<&'file DebugInfoEntry>,
    target: &'file dyn DwarfTargetInterface,
    address_size: u8,
    instruction_pointer: TargetAddr,
    object_address: Option<TargetAddr>,
    frame_address: TargetAddr,
    frame_base: TargetAddr,
    frame_base_evaluated: bool,
    relocation_delta: u64,
}

impl<'file> FileEvaluationContext<'file> {
    fn unit(&self) -> Option<&'file CompilationUnit> {
        self.file.compilation_units.get(self.unit_index?)
    }
}

impl EvaluationContext for FileEvaluationContext<'_> {
    fn target_interface(&self) -> &dyn DwarfTargetInterface {
        self.target
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
        (self.frame_address != 0).then_some(self.frame_address)
    }

    fn frame_base_address(&mut self) -> Option<TargetAddr> {
        if self.frame_base_evaluated {
            return (self.frame_base != 0).then_some(self.frame_base);
        }

        // set the flag up front so a buggy self-referential frame-base
        // expression fails instead of recursing
        self.frame_base_evaluated = true;

        let subprogram = self.subprogram?;
        let location = subprogram.frame_base()?;
        if !location.is_valid() {
            return None;
        }

        let expression = location_expression(
            &self.sections,
            self.unit(),
            location,
            self.instruction_pointer,
        )
        .ok()?;
        let expression = expression.to_vec();

        let mut evaluator = ExpressionEvaluator::new(self);
        let base = evaluator.evaluate(&expression).ok()?;

        trace!(base, "frame base");
        self.frame_base = base;
        (base != 0).then_some(base)
    }

    fn tls_address(&mut self, _local_address: TargetAddr) -> Option<TargetAddr> {
        // needs runtime-loader knowledge the engine doesn't have
        None
    }

    fn call_target(&mut self, offset: u64, kind: ReferenceKind) -> Result<Option<Vec<u8>>> {
        let unit_id = self
            .unit_index
            .map(UnitId::Compilation)
            .ok_or(Error::EntryNotFound)?;

        let reference = DwarfFile::resolve_reference(
            &self.file.compilation_units,
            &self.file.type_units,
            &self.file.type_unit_signatures,
            unit_id,
            offset,
            kind,
        )
        .ok_or(Error::EntryNotFound)?;
        let entry = self.file.entry(reference).ok_or(Error::EntryNotFound)?;

        let Some(location) = entry.location_description() else {
            return Ok(None);
        };
        if !location.is_valid() {
            return Ok(None);
        }

        let expression = location_expression(
            &self.sections,
            self.unit(),
            location,
            self.instruction_pointer,
        )?;
        Ok(Some(expression.to_vec()))
    }
}

/// The bytes of a location description: either its inline expression or
/// the location-list entry selected by the instruction pointer.
fn location_expression<'elf>(
    sections: &Sections<'elf>,
    unit: Option<&CompilationUnit>,
    location: &'elf LocationDescription,
    instruction_pointer: TargetAddr,
) -> Result<&'elf [u8]> {
    match location {
        LocationDescription::Expression(expression) => Ok(expression),
        LocationDescription::LocationList(offset) if instruction_pointer != 0 => {
            let unit = unit.ok_or(Error::EntryNotFound)?;
            find_location_expression(sections, unit, *offset, instruction_pointer)
        }
        _ => Err(Error::BadValue("invalid location description".into())),
    }
}

impl DwarfFile {
    fn sections(&self) -> Result<Sections<'_>> {
        let main = self.elf_file.as_ref().ok_or(Error::EntryNotFound)?;
        Ok(Sections::resolve(main, self.alternate_elf_file.as_ref()))
    }

    fn evaluation_context<'file>(
        &'file self,
        unit_index: Option<usize>,
        address_size: u8,
        subprogram: Option<DieRef>,
        target: &'file dyn DwarfTargetInterface,
        instruction_pointer: TargetAddr,
        object_address: Option<TargetAddr>,
        frame_address: TargetAddr,
        relocation_delta: u64,
    ) -> Result<FileEvaluationContext<'file>> {
        Ok(FileEvaluationContext {
            file: self,
            sections: self.sections()?,
            unit_index,
            subprogram: subprogram.and_then(|reference| self.entry(reference)),
            target,
            address_size,
            instruction_pointer,
            object_address,
            frame_address,
            frame_base: 0,
            frame_base_evaluated: false,
            relocation_delta,
        })
    }

    /// Evaluates an expression to a single value. `initial_push`, when
    /// set, seeds the stack (CFI rule expressions start with the CFA).
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate_expression(
        &self,
        unit_index: Option<usize>,
        address_size: u8,
        subprogram: Option<DieRef>,
        expression: &[u8],
        target: &dyn DwarfTargetInterface,
        instruction_pointer: TargetAddr,
        frame_pointer: TargetAddr,
        initial_push: Option<TargetAddr>,
    ) -> Result<TargetAddr> {
        let mut context = self.evaluation_context(
            unit_index,
            address_size,
            subprogram,
            target,
            instruction_pointer,
            None,
            frame_pointer,
            0,
        )?;
        let mut evaluator = ExpressionEvaluator::new(&mut context);
        if let Some(value) = initial_push {
            evaluator.push(value)?;
        }
        evaluator.evaluate(expression)
    }

    /// Resolves a location description against a concrete frame into the
    /// pieces the value occupies.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_location(
        &self,
        unit_index: Option<usize>,
        address_size: u8,
        subprogram: Option<DieRef>,
        location: &LocationDescription,
        target: &dyn DwarfTargetInterface,
        instruction_pointer: TargetAddr,
        object_address: Option<TargetAddr>,
        frame_pointer: TargetAddr,
        relocation_delta: u64,
    ) -> Result<ValueLocation> {
        let expression = {
            let sections = self.sections()?;
            let unit = unit_index.and_then(|index| self.compilation_units.get(index));
            location_expression(&sections, unit, location, instruction_pointer)?.to_vec()
        };

        let mut context = self.evaluation_context(
            unit_index,
            address_size,
            subprogram,
            target,
            instruction_pointer,
            object_address,
            frame_pointer,
            relocation_delta,
        )?;
        let mut evaluator = ExpressionEvaluator::new(&mut context);
        let mut result = ValueLocation::new(false);
        evaluator.evaluate_location(&expression, &mut result)?;
        Ok(result)
    }

    /// Evaluates a `DW_AT_const_value`.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate_constant_value(
        &self,
        unit_index: Option<usize>,
        address_size: u8,
        subprogram: Option<DieRef>,
        value: &ConstantValue,
        target: &dyn DwarfTargetInterface,
        instruction_pointer: TargetAddr,
        frame_pointer: TargetAddr,
    ) -> Result<Variant> {
        match value {
            ConstantValue::Constant(constant) => Ok(Variant::Unsigned(*constant)),
            ConstantValue::String(string) => Ok(Variant::String(string.to_string())),
            ConstantValue::Block(block) => {
                let result = self.evaluate_expression(
                    unit_index,
                    address_size,
                    subprogram,
                    block,
                    target,
                    instruction_pointer,
                    frame_pointer,
                    None,
                )?;
                Ok(Variant::Unsigned(result))
            }
            ConstantValue::Unset => Err(Error::BadValue("unset constant value".into())),
        }
    }

    /// Evaluates a dynamic attribute value (constant, reference to a
    /// constant-valued entity, or expression). Returns the value and, for
    /// references, the referenced entity's type.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate_dynamic_value(
        &self,
        unit_index: Option<usize>,
        address_size: u8,
        subprogram: Option<DieRef>,
        value: &DynamicValue,
        target: &dyn DwarfTargetInterface,
        instruction_pointer: TargetAddr,
        frame_pointer: TargetAddr,
    ) -> Result<(Variant, Option<DieRef>)> {
        match value {
            DynamicValue::Constant(constant) => Ok((Variant::Unsigned(*constant), None)),

            DynamicValue::Reference(reference) => {
                let entry = self.entry(*reference).ok_or(Error::EntryNotFound)?;

                // only entities that can carry a DW_AT_const_value make
                // sense here
                let constant_value = entry
                    .const_value()
                    .ok_or_else(|| Error::BadValue("reference to a value-less entity".into()))?;
                if !constant_value.is_set() {
                    return Err(Error::BadValue("referenced entity has no value".into()));
                }

                let value_type = if entry.tag() == DW_TAG_enumerator {
                    entry
                        .parent()
                        .and_then(|parent| self.entry(parent))
                        .and_then(DebugInfoEntry::type_ref)
                } else {
                    entry.type_ref()
                };

                let result = self.evaluate_constant_value(
                    unit_index,
                    address_size,
                    subprogram,
                    constant_value,
                    target,
                    instruction_pointer,
                    frame_pointer,
                )?;
                Ok((result, value_type))
            }

            DynamicValue::Expression(expression) => {
                let result = self.evaluate_expression(
                    unit_index,
                    address_size,
                    subprogram,
                    expression,
                    target,
                    instruction_pointer,
                    frame_pointer,
                    None,
                )?;
                Ok((Variant::Unsigned(result), None))
            }

            DynamicValue::Unset => Err(Error::BadValue("unset dynamic value".into())),
        }
    }

    /// Unwinds one call frame: computes the CFA at `location` and fills
    /// `output` with the caller's recoverable register values.
    #[instrument(skip(self, input, output))]
    pub fn unwind_call_frame(
        &self,
        unit_index: Option<usize>,
        address_size: u8,
        subprogram: Option<DieRef>,
        location: TargetAddr,
        input: &dyn DwarfTargetInterface,
        output: &mut dyn DwarfTargetInterface,
    ) -> Result<TargetAddr> {
        let info = *self.containing_fde_info(location).ok_or(Error::EntryNotFound)?;

        let main = self.elf_file.as_ref().ok_or(Error::EntryNotFound)?;
        let sections = self.sections()?;
        let section = if info.eh_frame {
            sections.eh_frame.as_ref()
        } else {
            sections.debug_frame.as_ref()
        }
        .ok_or(Error::EntryNotFound)?;

        let unit_address_size = unit_index
            .and_then(|index| self.compilation_units.get(index))
            .map(|unit| unit.base().address_size());

        self.unwind_with_fde(
            main,
            section,
            &info,
            unit_index,
            unit_address_size.unwrap_or(address_size),
            subprogram,
            location,
            input,
            output,
        )
    }

    fn containing_fde_info(&self, address: TargetAddr) -> Option<&FdeLookupInfo> {
        lookup_fde(&self.debug_frame_infos, address)
            .or_else(|| lookup_fde(&self.eh_frame_infos, address))
    }

    #[allow(clippy::too_many_arguments)]
    fn unwind_with_fde(
        &self,
        elf: &ElfFile,
        section: &ElfSection<'_>,
        info: &FdeLookupInfo,
        unit_index: Option<usize>,
        address_size: u8,
        subprogram: Option<DieRef>,
        location: TargetAddr,
        input: &dyn DwarfTargetInterface,
        output: &mut dyn DwarfTargetInterface,
    ) -> Result<TargetAddr> {
        trace!(location, fde_offset = info.fde_offset, "unwinding");

        let mut reader = DataReader::new(section.data, address_size);
        reader.seek_absolute(info.fde_offset);

        let (length, dwarf64) = reader.read_initial_length();
        let length_offset = reader.offset();

        let mut context = CfaContext::new(output.count_registers());
        let mut augmentation = CieAugmentation::default();
        // parse the CIE up front; its augmentation decides how the FDE's
        // addresses are encoded
        let (cie_reader, cie_remaining) = parse_cie_header(
            section,
            info.eh_frame,
            Some(address_size),
            address_size,
            &mut context,
            info.cie_offset,
            &mut augmentation,
        )?;

        // skip the FDE's CIE pointer and its location fields; the index
        // already knows the range
        reader.read_offset(dwarf64, 0);
        augmentation.read_encoded_address(&mut reader, Some(elf), Some(section), false);
        augmentation.read_encoded_address(&mut reader, Some(elf), Some(section), true);
        if reader.has_overflow() {
            return Err(bad_data("truncated FDE"));
        }

        trace!(
            length,
            cie_offset = info.cie_offset,
            start = info.start,
            end = info.end,
            "found fde"
        );

        context.set_location(location, info.start);
        output.init_register_rules(&mut context)?;

        // replay the CIE's initial instructions
        let mut initial_reader = cie_reader.restricted_reader(cie_remaining);
        parse_frame_instructions(&mut context, &mut initial_reader, &augmentation, elf, section)?;

        // the FDE's own augmentation data (skipped)
        augmentation.read_fde_data(&mut reader)?;

        context.save_initial_rule_set();

        let fde_end = length_offset + length;
        let remaining = fde_end
            .checked_sub(reader.offset())
            .ok_or_else(|| bad_data("FDE contents longer than its length"))?;
        let mut instruction_reader = reader.restricted_reader(remaining);
        parse_frame_instructions(
            &mut context,
            &mut instruction_reader,
            &augmentation,
            elf,
            section,
        )?;

        trace!("found row");

        // compute the frame address
        let frame_address = match *context.cfa_rule() {
            CfaCfaRule::RegisterOffset { register, offset } => {
                let value = input
                    .register_value(register)
                    .ok_or_else(|| Error::BadValue("CFA register unavailable".into()))?;
                if !value.is_number() {
                    return Err(Error::BadValue("CFA register value not numeric".into()));
                }
                value.to_u64().wrapping_add(offset as u64)
            }
            CfaCfaRule::Expression(expression) => self.evaluate_expression(
                unit_index,
                address_size,
                subprogram,
                expression,
                input,
                location,
                0,
                None,
            )?,
            CfaCfaRule::Undefined => {
                return Err(Error::BadValue("undefined CFA rule".into()));
            }
        };

        trace!(frame_address, "frame address");

        // apply the register rules
        for register in 0..output.count_registers() {
            let Some(value_type) = output.register_value_type(register) else {
                continue;
            };
            let Some(rule) = context.register_rule(register) else {
                continue;
            };

            match *rule {
                CfaRule::SameValue => {
                    if let Some(value) = input.register_value(register) {
                        output.set_register_value(register, &value);
                    }
                }
                CfaRule::LocationOffset(offset) => {
                    let address = frame_address.wrapping_add(offset as u64);
                    if let Some(value) = input.read_value_from_memory(address, value_type) {
                        output.set_register_value(register, &value);
                    }
                }
                CfaRule::ValueOffset(offset) => {
                    let value = Variant::Unsigned(frame_address.wrapping_add(offset as u64));
                    output.set_register_value(register, &value);
                }
                CfaRule::Register(source) => {
                    if let Some(value) = input.register_value(source) {
                        output.set_register_value(register, &value);
                    }
                }
                CfaRule::LocationExpression(expression) => {
                    let address = self.evaluate_expression(
                        unit_index,
                        address_size,
                        subprogram,
                        expression,
                        input,
                        location,
                        frame_address,
                        Some(frame_address),
                    );
                    if let Ok(address) = address {
                        if let Some(value) = input.read_value_from_memory(address, value_type) {
                            output.set_register_value(register, &value);
                        }
                    }
                }
                CfaRule::ValueExpression(expression) => {
                    if let Ok(value) = self.evaluate_expression(
                        unit_index,
                        address_size,
                        subprogram,
                        expression,
                        input,
                        location,
                        frame_address,
                        Some(frame_address),
                    ) {
                        output.set_register_value(register, &Variant::Unsigned(value));
                    }
                }
                CfaRule::Undefined => {}
            }
        }

        Ok(frame_address)
    }

    /// The functions defined by a compilation unit. Declarations,
    /// prototypes and inlined instances are not functions in their own
    /// right and are skipped.
    pub fn load_functions(&self, unit_index: usize) -> Result<Vec<FunctionInfo>> {
        let unit = self
            .compilation_units
            .get(unit_index)
            .ok_or(Error::EntryNotFound)?;
        let root = unit.base().root_entry().ok_or(Error::EntryNotFound)?;
        let root_entry = unit.base().entry(root).ok_or(Error::EntryNotFound)?;

        let mut functions = Vec::new();

        for &child_ref in root_entry.children() {
            let Some(entry) = self.entry(child_ref) else {
                continue;
            };
            if entry.tag() != DW_TAG_subprogram {
                continue;
            }

            let DieKind::Subprogram(data) = entry.kind() else {
                continue;
            };
            if entry.is_declaration()
                || data.prototyped
                || data.inline == DW_INL_inlined
                || data.inline == DW_INL_declared_inlined
                || data.abstract_origin.is_some()
            {
                continue;
            }

            let Some(name) = self.fully_qualified_name(child_ref) else {
                continue;
            };

            // address ranges: a range list when present, the contiguous
            // [low_pc, high_pc) otherwise
            let ranges = if let Some(offset) = entry.ranges_offset() {
                match self.resolve_range_list(unit_index, offset) {
                    Ok(ranges) => ranges,
                    Err(error) => {
                        warn!(%error, function = %name, "unusable range list");
                        continue;
                    }
                }
            } else {
                let Some((low, high)) = entry.code_range() else {
                    continue;
                };
                if low >= high {
                    continue;
                }
                TargetAddressRangeList::with_range(TargetAddressRange::new(low, high - low))
            };

            let (source_file, declaration) = self.declaration_location(unit, entry);

            functions.push(FunctionInfo {
                name,
                entry: child_ref,
                ranges,
                source_file,
                declaration,
            });
        }

        Ok(functions)
    }

    /// The source file and location an entry was declared at.
    fn declaration_location(
        &self,
        unit: &CompilationUnit,
        entry: &DebugInfoEntry,
    ) -> (Option<String>, SourceLocation) {
        let Some(location) = entry.declaration_location() else {
            return (None, SourceLocation::default());
        };

        let file = location
            .file
            .and_then(|index| unit.file_at(index as u64))
            .map(|(name, directory)| match directory {
                Some(directory) => format!("{directory}/{name}"),
                None => name.to_string(),
            });

        (
            file,
            SourceLocation::new(location.line.unwrap_or(0), location.column.unwrap_or(0)),
        )
    }

    /// The name of an entry with the enclosing namespace-like scopes
    /// joined on, e.g. `Namespace::Class::method`.
    pub fn fully_qualified_name(&self, reference: DieRef) -> Option<String> {
        let entry = self.entry(reference)?;
        let mut name = self.entry_name(entry)?.to_string();

        let mut ancestor = entry.parent();
        while let Some(parent_ref) = ancestor {
            let parent = self.entry(parent_ref)?;
            if parent.is_namespace_like() {
                if let Some(parent_name) = self.entry_name(parent) {
                    name = format!("{parent_name}::{name}");
                }
            }
            ancestor = parent.parent();
        }

        Some(name)
    }

    /// An entry's own name, following specification and abstract-origin
    /// links when the entry itself is anonymous.
    fn entry_name<'file>(&'file self, entry: &'file DebugInfoEntry) -> Option<&'file str> {
        if let Some(name) = entry.name() {
            return Some(name);
        }
        if let Some(specification) = entry.specification() {
            if let Some(name) = self.entry(specification).and_then(|e| self.entry_name(e)) {
                return Some(name);
            }
        }
        if let Some(origin) = entry.abstract_origin() {
            if let Some(name) = self.entry(origin).and_then(|e| self.entry_name(e)) {
                return Some(name);
            }
        }
        None
    }

    /// The statement covering `pc` within a function: the closest line row
    /// at or below `pc`, its range ending at the next row.
    pub fn resolve_statement(
        &self,
        function: &FunctionInfo,
        pc: TargetAddr,
    ) -> Result<Statement> {
        if !function.ranges.contains(pc) {
            return Err(Error::EntryNotFound);
        }

        self.find_statement(function, |previous, next_address| {
            (previous.address <= pc && pc < next_address).then(|| ())
        })
    }

    /// The statement for a source position within a function: the first
    /// row matching (file, line[, column]).
    pub fn resolve_statement_for_source_location(
        &self,
        function: &FunctionInfo,
        file: &str,
        line: u32,
        column: u32,
    ) -> Result<Statement> {
        self.find_statement(function, |previous, _next_address| {
            let file_matches = match &previous.file {
                Some(path) => {
                    path.as_str() == file
                        || path
                            .rsplit('/')
                            .next()
                            .map_or(false, |name| name == file)
                }
                None => false,
            };
            let line_matches = previous.location.line == line;
            let column_matches = column == 0 || previous.location.column == column;
            (file_matches && line_matches && column_matches).then(|| ())
        })
    }

    fn find_statement(
        &self,
        function: &FunctionInfo,
        matches: impl Fn(&RowSnapshot, TargetAddr) -> Option<()>,
    ) -> Result<Statement> {
        let UnitId::Compilation(unit_index) = function.entry.unit else {
            return Err(Error::EntryNotFound);
        };
        let unit = self
            .compilation_units
            .get(unit_index)
            .ok_or(Error::EntryNotFound)?;
        let program = unit.line_program().ok_or(Error::EntryNotFound)?;

        let mut state = program.get_initial_state();
        let mut previous: Option<RowSnapshot> = None;

        while program.get_next_row(&mut state) {
            if let Some(snapshot) = &previous {
                let next_address = state.address;
                if function.ranges.contains(snapshot.address)
                    && matches(snapshot, next_address).is_some()
                {
                    return Ok(Statement {
                        start: snapshot.location,
                        range: TargetAddressRange::new(
                            snapshot.address,
                            next_address.saturating_sub(snapshot.address),
                        ),
                        file: snapshot.file.clone(),
                    });
                }
            }

            previous = if state.is_sequence_end {
                None
            } else {
                Some(RowSnapshot {
                    address: state.address,
                    location: SourceLocation::new(
                        state.line.max(0) as u32,
                        state.column.max(0) as u32,
                    ),
                    file: self.row_file(unit, &state),
                })
            };
        }

        Err(Error::EntryNotFound)
    }

    /// The path of the file a line row refers to: the explicit inline
    /// file while one is active, the unit's file table otherwise.
    fn row_file(&self, unit: &CompilationUnit, state: &crate::line::LineState<'_>) -> Option<String> {
        if state.file == -1 {
            let name = state.explicit_file.as_deref()?;
            let directory = unit.directory_at(state.explicit_file_directory_index as usize);
            return Some(match directory {
                Some(directory) => format!("{directory}/{name}"),
                None => name.to_string(),
            });
        }

        if state.file < 0 {
            return None;
        }
        unit.file_at(state.file as u64)
            .map(|(name, directory)| match directory {
                Some(directory) => format!("{directory}/{name}"),
                None => name.to_string(),
            })
    }
}

/// One emitted line row, kept while looking for the row that ends its
/// statement.
struct RowSnapshot {
    address: TargetAddr,
    location: SourceLocation,
    file: Option<String>,
}
