//! The file façade: owns the ELF image(s) and the loaded model, and offers
//! every query of the engine.
//!
//! Loading is a three-phase protocol:
//!
//! 1. [`DwarfFile::start_loading`] opens the image and locates the debug
//!    info, following a `.gnu_debuglink` to a companion file if necessary.
//! 2. [`DwarfFile::load`] reads the sections: the frame index, the unit
//!    headers and the structural DIE pass (which builds each unit's
//!    offset-ordered entry arena without interpreting attributes).
//! 3. [`DwarfFile::finish_loading`] runs the attribute pass over every
//!    entry, wires up references, then parses line programs and the public
//!    types info. Its result is sticky.
//!
//! The attribute pass is separate because reference attributes may point
//! forward within a unit or into other units; only after the structural
//! pass are all referents known.

mod queries;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use crate::abbrev::{AbbreviationEntry, AbbreviationTable};
use crate::attributes::{
    attribute_class, attribute_setter, AttributeClass, AttributeValue, SetOutcome,
};
use crate::cfi::FdeLookupInfo;
use crate::consts::*;
use crate::elf::{ElfFile, ElfSection};
use crate::entries::{DebugInfoEntry, DieRef, ReferenceKind, UnitId};
use crate::error::{bad_data, unsupported, Error, Result};
use crate::line::LineNumberProgram;
use crate::ranges::{TargetAddressRange, TargetAddressRangeList};
use crate::reader::DataReader;
use crate::unit::{CompilationUnit, TypeUnit, UnitBase};

// DWARF 5 unit kinds
const DW_UT_compile: u8 = 0x01;
const DW_UT_partial: u8 = 0x03;

/// Roots under which split debug files live, mirroring the image's own
/// directory layout.
const DEBUG_FILE_ROOTS: &[&str] = &["/usr/lib/debug"];

/// The sections the engine reads, resolved against the right image (debug
/// sections may come from the companion file; `.eh_frame` never does, as
/// it is not copied into split debug files properly).
struct Sections<'elf> {
    info: Option<ElfSection<'elf>>,
    abbrev: Option<ElfSection<'elf>>,
    strings: Option<ElfSection<'elf>>,
    line: Option<ElfSection<'elf>>,
    line_strings: Option<ElfSection<'elf>>,
    ranges: Option<ElfSection<'elf>>,
    debug_frame: Option<ElfSection<'elf>>,
    eh_frame: Option<ElfSection<'elf>>,
    locations: Option<ElfSection<'elf>>,
    public_types: Option<ElfSection<'elf>>,
    types: Option<ElfSection<'elf>>,
}

impl<'elf> Sections<'elf> {
    fn resolve(main: &'elf ElfFile, alternate: Option<&'elf ElfFile>) -> Sections<'elf> {
        let debug_file = alternate.unwrap_or(main);
        Sections {
            info: debug_file.section(".debug_info"),
            abbrev: debug_file.section(".debug_abbrev"),
            strings: debug_file.section(".debug_str"),
            line: debug_file.section(".debug_line"),
            line_strings: debug_file.section(".debug_line_str"),
            ranges: debug_file.section(".debug_ranges"),
            debug_frame: debug_file.section(".debug_frame"),
            eh_frame: main.section(".eh_frame"),
            locations: debug_file.section(".debug_loc"),
            public_types: debug_file.section(".debug_pubtypes"),
            types: debug_file.section(".debug_types"),
        }
    }
}

/// An attribute value with owned storage, collected during the read half
/// of the attribute pass and applied to the entry afterwards.
#[derive(Debug, Clone)]
enum OwnedAttributeValue {
    Address(u64),
    Block(Vec<u8>),
    Constant { value: u64, signed: bool },
    Flag(bool),
    LinePointer(u64),
    LocationListPointer(u64),
    MacroPointer(u64),
    RangeListPointer(u64),
    Reference(DieRef),
    String(String),
}

impl OwnedAttributeValue {
    fn as_value(&self) -> AttributeValue<'_> {
        match self {
            OwnedAttributeValue::Address(address) => AttributeValue::Address(*address),
            OwnedAttributeValue::Block(block) => AttributeValue::Block(block),
            OwnedAttributeValue::Constant { value, signed } => AttributeValue::Constant {
                value: *value,
                signed: *signed,
            },
            OwnedAttributeValue::Flag(flag) => AttributeValue::Flag(*flag),
            OwnedAttributeValue::LinePointer(offset) => AttributeValue::LinePointer(*offset),
            OwnedAttributeValue::LocationListPointer(offset) => {
                AttributeValue::LocationListPointer(*offset)
            }
            OwnedAttributeValue::MacroPointer(offset) => AttributeValue::MacroPointer(*offset),
            OwnedAttributeValue::RangeListPointer(offset) => {
                AttributeValue::RangeListPointer(*offset)
            }
            OwnedAttributeValue::Reference(reference) => AttributeValue::Reference(*reference),
            OwnedAttributeValue::String(string) => AttributeValue::String(string),
        }
    }
}

/// A DWARF debugging-information file.
pub struct DwarfFile {
    name: PathBuf,
    alternate_name: Option<PathBuf>,
    elf_file: Option<ElfFile>,
    alternate_elf_file: Option<ElfFile>,
    debug_info_located: bool,
    default_address_size: u8,
    compilation_units: Vec<CompilationUnit>,
    type_units: Vec<TypeUnit>,
    type_unit_signatures: HashMap<u64, usize>,
    abbreviation_tables: Vec<Arc<AbbreviationTable>>,
    debug_frame_infos: Vec<FdeLookupInfo>,
    eh_frame_infos: Vec<FdeLookupInfo>,
    itanium_eh_frame_format: bool,
    types_section_required: bool,
    finished: bool,
    finish_error: Option<Error>,
}

impl std::fmt::Debug for DwarfFile {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("DwarfFile")
            .field("name", &self.name)
            .field("compilation_units", &self.compilation_units.len())
            .field("type_units", &self.type_units.len())
            .field("finished", &self.finished)
            .finish()
    }
}

impl DwarfFile {
    pub fn new() -> DwarfFile {
        DwarfFile {
            name: PathBuf::new(),
            alternate_name: None,
            elf_file: None,
            alternate_elf_file: None,
            debug_info_located: false,
            default_address_size: 8,
            compilation_units: Vec::new(),
            type_units: Vec::new(),
            type_unit_signatures: HashMap::new(),
            abbreviation_tables: Vec::new(),
            debug_frame_infos: Vec::new(),
            eh_frame_infos: Vec::new(),
            itanium_eh_frame_format: false,
            types_section_required: false,
            finished: false,
            finish_error: None,
        }
    }

    /// Opens the image and locates its debug info.
    ///
    /// When the image carries a `.gnu_debuglink` whose target cannot be
    /// found, [`Error::MissingDebugInfoFile`] names the wanted file; the
    /// caller may locate it (e.g. by asking the user) and pass the path to
    /// [`DwarfFile::load`].
    #[instrument(skip(self))]
    pub fn start_loading(&mut self, path: &Path) -> Result<()> {
        self.name = path.to_path_buf();
        self.elf_file = Some(ElfFile::open(path)?);
        self.locate_debug_info(None)
    }

    /// Completes section loading and runs the structural DIE pass.
    pub fn load(&mut self, address_size: u8, external_info_path: Option<&Path>) -> Result<()> {
        self.default_address_size = address_size;

        if !self.debug_info_located {
            self.locate_debug_info(external_info_path)?;
        }

        let main = self
            .elf_file
            .as_ref()
            .ok_or_else(|| Error::BadValue("load before start_loading".into()))?;
        let sections = Sections::resolve(main, self.alternate_elf_file.as_ref());

        // frame sections first; they are useful even without .debug_info
        let mut debug_frame_infos = Vec::new();
        let mut eh_frame_infos = Vec::new();
        let mut itanium_format = false;
        if let Some(section) = &sections.debug_frame {
            Self::parse_frame_section(
                main,
                section,
                address_size,
                false,
                &mut debug_frame_infos,
                &mut itanium_format,
            )?;
        }
        if let Some(section) = &sections.eh_frame {
            Self::parse_frame_section(
                main,
                section,
                address_size,
                true,
                &mut eh_frame_infos,
                &mut itanium_format,
            )?;
        }

        let mut abbreviation_tables = std::mem::take(&mut self.abbreviation_tables);
        let mut compilation_units = Vec::new();
        let mut type_units = Vec::new();
        let mut type_unit_signatures = HashMap::new();
        let mut types_section_required = false;

        if let (Some(info), Some(abbrev)) = (&sections.info, &sections.abbrev) {
            parse_info_section(
                info,
                abbrev,
                &mut abbreviation_tables,
                &mut compilation_units,
                &mut types_section_required,
            )?;

            if types_section_required {
                let types = sections.types.as_ref().ok_or_else(|| {
                    warn!(".debug_types section required but missing");
                    bad_data(".debug_types section required but missing")
                })?;
                parse_types_section(
                    types,
                    abbrev,
                    &mut abbreviation_tables,
                    &mut type_units,
                    &mut type_unit_signatures,
                )?;
            }
        } else {
            // no debug info proper; an .eh_frame alone still allows
            // unwinding
            if sections.eh_frame.is_none() {
                return Err(Error::EntryNotFound);
            }
            self.finished = true;
        }

        self.debug_frame_infos = debug_frame_infos;
        self.eh_frame_infos = eh_frame_infos;
        self.itanium_eh_frame_format = itanium_format;
        self.abbreviation_tables = abbreviation_tables;
        self.compilation_units = compilation_units;
        self.type_units = type_units;
        self.type_unit_signatures = type_unit_signatures;
        self.types_section_required = types_section_required;

        Ok(())
    }

    /// Runs the attribute pass, the line programs and the public-types
    /// info. Idempotent; a failure is remembered and returned again
    /// without retrying.
    pub fn finish_loading(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        if let Some(error) = &self.finish_error {
            return Err(error.clone());
        }

        match self.finish_loading_internal() {
            Ok(()) => {
                self.finished = true;
                Ok(())
            }
            Err(error) => {
                self.finish_error = Some(error.clone());
                Err(error)
            }
        }
    }

    fn finish_loading_internal(&mut self) -> Result<()> {
        let main = self
            .elf_file
            .as_ref()
            .ok_or_else(|| Error::BadValue("finish_loading before load".into()))?;
        let sections = Sections::resolve(main, self.alternate_elf_file.as_ref());

        let mut compilation_units = std::mem::take(&mut self.compilation_units);
        let mut type_units = std::mem::take(&mut self.type_units);

        let result = (|| -> Result<()> {
            for index in 0..type_units.len() {
                finish_unit(
                    &sections,
                    &mut compilation_units,
                    &mut type_units,
                    &self.type_unit_signatures,
                    UnitId::Type(index),
                )?;
            }
            for index in 0..compilation_units.len() {
                finish_unit(
                    &sections,
                    &mut compilation_units,
                    &mut type_units,
                    &self.type_unit_signatures,
                    UnitId::Compilation(index),
                )?;
            }
            Ok(())
        })();

        self.compilation_units = compilation_units;
        self.type_units = type_units;
        result?;

        // failure to parse the public types info is not fatal
        if let Err(error) = self.parse_public_types_info() {
            debug!(%error, "no usable public types info");
        }

        Ok(())
    }

    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Path of the separate debug-info companion, if one is in use.
    pub fn alternate_name(&self) -> Option<&Path> {
        self.alternate_name.as_deref()
    }

    pub fn elf_file(&self) -> Option<&ElfFile> {
        self.elf_file.as_ref()
    }

    /// The address size queries default to, as passed to
    /// [`DwarfFile::load`].
    pub fn address_size(&self) -> u8 {
        self.default_address_size
    }

    /// Whether the image's `.eh_frame` follows the read-only Itanium-ABI
    /// layout (GCC 4) rather than the writable GCC 2 one.
    pub fn uses_itanium_eh_frame_format(&self) -> bool {
        self.itanium_eh_frame_format
    }

    /// Whether any unit referenced a type by signature, forcing
    /// `.debug_types` to be parsed.
    pub fn types_section_required(&self) -> bool {
        self.types_section_required
    }

    pub fn count_compilation_units(&self) -> usize {
        self.compilation_units.len()
    }

    pub fn compilation_unit_at(&self, index: usize) -> Option<&CompilationUnit> {
        self.compilation_units.get(index)
    }

    pub fn type_unit_for_signature(&self, signature: u64) -> Option<&TypeUnit> {
        self.type_units
            .get(*self.type_unit_signatures.get(&signature)?)
    }

    /// The entry a handle points at.
    pub fn entry(&self, reference: DieRef) -> Option<&DebugInfoEntry> {
        match reference.unit {
            UnitId::Compilation(index) => self
                .compilation_units
                .get(index)?
                .base()
                .entry(reference.entry),
            UnitId::Type(index) => self.type_units.get(index)?.base().entry(reference.entry),
        }
    }

    /// The compilation unit owning an entry.
    pub fn compilation_unit_for_entry(&self, reference: DieRef) -> Option<&CompilationUnit> {
        match reference.unit {
            UnitId::Compilation(index) => self.compilation_units.get(index),
            UnitId::Type(_) => None,
        }
    }

    /// Resolves `.debug_ranges` at `offset`, relative to the unit's base
    /// address.
    pub fn resolve_range_list(
        &self,
        unit_index: usize,
        offset: u64,
    ) -> Result<TargetAddressRangeList> {
        let unit = self
            .compilation_units
            .get(unit_index)
            .ok_or(Error::EntryNotFound)?;
        let main = self.elf_file.as_ref().ok_or(Error::EntryNotFound)?;
        let sections = Sections::resolve(main, self.alternate_elf_file.as_ref());
        resolve_range_list(&sections, unit, offset)
    }

    #[instrument(skip(self))]
    fn locate_debug_info(&mut self, located_path: Option<&Path>) -> Result<()> {
        let main = self
            .elf_file
            .as_ref()
            .ok_or_else(|| Error::BadValue("no image opened".into()))?;

        if let Some(link_section) = main.section(".gnu_debuglink") {
            // the image points at a separate debug-info file.
            // Format: NUL-terminated file name, padding to a 32-bit
            // boundary, then a 32-bit CRC of the target.
            let mut reader = DataReader::new(link_section.data, 4);
            let link_name = reader.read_string("").to_string();
            if link_name.is_empty() {
                return Err(bad_data("empty .gnu_debuglink"));
            }

            let debug_path = match located_path {
                Some(path) => path.to_path_buf(),
                None => self.find_debug_info_path(&link_name)?,
            };

            debug!(?debug_path, "using separate debug info");
            self.alternate_elf_file = Some(ElfFile::open(&debug_path)?);
            self.alternate_name = Some(debug_path);
        }

        let debug_file = self.alternate_elf_file.as_ref().unwrap_or(main);
        if debug_file.section(".debug_info").is_none()
            || debug_file.section(".debug_abbrev").is_none()
        {
            trace!("no .debug_info or .debug_abbrev");

            // an .eh_frame still allows unwinding, with nothing else
            if main.section(".eh_frame").is_none() {
                return Err(Error::EntryNotFound);
            }
        }

        self.debug_info_located = true;
        Ok(())
    }

    /// Resolves the `.gnu_debuglink` target per the usual search order:
    /// next to the image under `debug/`, under `../debug/` for images in
    /// well-known library directories, then under the system debug-file
    /// roots.
    fn find_debug_info_path(&self, debug_file_name: &str) -> Result<PathBuf> {
        let base_directory = self.name.parent().unwrap_or(Path::new("."));

        let is_library_directory = matches!(
            base_directory.file_name().and_then(|name| name.to_str()),
            Some("lib") | Some("add-ons")
        );
        let candidate = if is_library_directory {
            base_directory.join("../debug").join(debug_file_name)
        } else {
            base_directory.join("debug").join(debug_file_name)
        };
        if candidate.exists() {
            return Ok(candidate);
        }

        for root in DEBUG_FILE_ROOTS {
            let mut candidate = PathBuf::from(root);
            if let Ok(relative) = base_directory.strip_prefix("/") {
                candidate.push(relative);
            }
            candidate.push(debug_file_name);
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        // it's up to the caller to locate the file; hand back its name
        Err(Error::MissingDebugInfoFile(PathBuf::from(debug_file_name)))
    }

    /// Scans a frame section and builds its FDE index. For `.eh_frame`,
    /// the writable heuristic distinguishes the GCC 2 layout (writable,
    /// absolute addresses) from the Itanium-ABI layout GCC 4 emits
    /// (read-only, encoded addresses).
    fn parse_frame_section(
        elf: &ElfFile,
        section: &ElfSection<'_>,
        address_size: u8,
        eh_frame: bool,
        infos: &mut Vec<FdeLookupInfo>,
        itanium_format: &mut bool,
    ) -> Result<()> {
        if eh_frame {
            *itanium_format = !section.is_writable();
        }

        let mut reader = DataReader::new(section.data, address_size);

        while reader.bytes_remaining() > 0 {
            let entry_offset = reader.offset();
            let (length, dwarf64) = reader.read_initial_length();

            trace!(entry_offset, length, "frame entry");

            if length > reader.bytes_remaining() {
                return Err(bad_data("frame entry length out of bounds"));
            }
            let length_offset = reader.offset();

            // a zero length terminates the section
            if length == 0 {
                return Ok(());
            }

            let cie_id = reader.read_offset(dwarf64, 0);
            let is_cie = if eh_frame {
                cie_id == 0
            } else if dwarf64 {
                cie_id == u64::MAX
            } else {
                cie_id == u32::MAX as u64
            };

            if !is_cie {
                // an FDE
                let initial_location_offset = reader.offset();

                // in .eh_frame the CIE pointer is a relative back-offset
                let cie_offset = if eh_frame {
                    if cie_id > length_offset {
                        trace!(cie_id, max = length_offset, "invalid relative CIE offset");
                        break;
                    }
                    length_offset - cie_id
                } else {
                    cie_id
                };

                let mut context = crate::cfi::CfaContext::new(0);
                let mut augmentation = crate::cfi::CieAugmentation::default();
                // the CIE's augmentation decides how the FDE's addresses
                // are encoded, so parse it up front
                let (_cie_reader, _cie_remaining) = parse_cie_header(
                    section,
                    eh_frame,
                    None,
                    address_size,
                    &mut context,
                    cie_offset,
                    &mut augmentation,
                )?;

                let mut initial_location =
                    augmentation.read_encoded_address(&mut reader, Some(elf), Some(section), false);
                let address_range =
                    augmentation.read_encoded_address(&mut reader, Some(elf), Some(section), true);

                if reader.has_overflow() {
                    return Err(bad_data("truncated FDE header"));
                }

                if augmentation.fde_address_type() & crate::cfi::CFI_ADDRESS_TYPE_PC_RELATIVE != 0 {
                    initial_location += initial_location_offset;
                }

                // gcc occasionally emits duplicate FDEs; keep the first
                if crate::cfi::lookup_fde(infos, initial_location).is_none() {
                    let info = FdeLookupInfo {
                        start: initial_location,
                        end: initial_location.wrapping_add(address_range),
                        fde_offset: entry_offset,
                        cie_offset,
                        eh_frame,
                    };
                    let position = infos
                        .binary_search_by_key(&info.start, |info| info.start)
                        .unwrap_or_else(|position| position);
                    infos.insert(position, info);
                }
            }

            reader.seek_absolute(length_offset + length);
        }

        Ok(())
    }

    fn parse_public_types_info(&self) -> Result<()> {
        let main = self.elf_file.as_ref().ok_or(Error::EntryNotFound)?;
        let sections = Sections::resolve(main, self.alternate_elf_file.as_ref());
        let Some(section) = &sections.public_types else {
            trace!("no public types section");
            return Err(Error::EntryNotFound);
        };

        let mut reader = DataReader::new(section.data, 4);
        while reader.bytes_remaining() > 0 {
            let (set_length, dwarf64) = reader.read_initial_length();
            let set_offset = reader.offset();
            if reader.has_overflow() || set_length > reader.bytes_remaining() {
                return Err(bad_data("invalid public types set length"));
            }

            let mut set_reader = reader.restricted_reader(set_length);
            if let Err(error) = parse_public_types_set(&mut set_reader, dwarf64) {
                warn!(%error, "skipping public types set");
            }

            reader.seek_absolute(set_offset + set_length);
        }

        Ok(())
    }

    /// Resolves a reference attribute to the entry it names.
    fn resolve_reference(
        units: &[CompilationUnit],
        type_units: &[TypeUnit],
        type_unit_signatures: &HashMap<u64, usize>,
        unit_id: UnitId,
        value: u64,
        kind: ReferenceKind,
    ) -> Option<DieRef> {
        match kind {
            ReferenceKind::Local => {
                let base = match unit_id {
                    UnitId::Compilation(index) => units.get(index)?.base(),
                    UnitId::Type(index) => type_units.get(index)?.base(),
                };
                let entry = base.entry_index_for_offset(value)?;
                Some(DieRef {
                    unit: unit_id,
                    entry,
                })
            }
            ReferenceKind::Global => {
                let (unit_index, unit) = containing_compilation_unit(units, value)?;
                let entry = unit
                    .base()
                    .entry_index_for_offset(value - unit.base().header_offset())?;
                Some(DieRef {
                    unit: UnitId::Compilation(unit_index),
                    entry,
                })
            }
            ReferenceKind::Signature => {
                trace!(signature = value, "resolving type signature");
                let index = *type_unit_signatures.get(&value)?;
                let entry = type_units.get(index)?.type_entry()?;
                Some(DieRef {
                    unit: UnitId::Type(index),
                    entry,
                })
            }
        }
    }
}

impl Default for DwarfFile {
    fn default() -> DwarfFile {
        DwarfFile::new()
    }
}

/// Binary search of the unit covering an absolute `.debug_info` offset.
fn containing_compilation_unit(
    units: &[CompilationUnit],
    offset: u64,
) -> Option<(usize, &CompilationUnit)> {
    if units.is_empty() {
        return None;
    }

    let mut lower = 0;
    let mut upper = units.len() - 1;
    while lower < upper {
        let mid = (lower + upper + 1) / 2;
        if units[mid].base().header_offset() > offset {
            upper = mid - 1;
        } else {
            lower = mid;
        }
    }

    let unit = &units[lower];
    unit.base()
        .contains_absolute_offset(offset)
        .then_some((lower, unit))
}

/// Finds (or parses and caches) the abbreviation table at `offset`.
fn abbreviation_table_at(
    tables: &mut Vec<Arc<AbbreviationTable>>,
    section: &ElfSection<'_>,
    offset: u64,
) -> Result<Arc<AbbreviationTable>> {
    if let Some(table) = tables.iter().find(|table| table.offset() == offset) {
        return Ok(table.clone());
    }

    let table = Arc::new(AbbreviationTable::parse(section.data, offset)?);
    tables.push(table.clone());
    Ok(table)
}

/// Parses `.debug_info` into compilation units (structural pass only).
fn parse_info_section(
    info: &ElfSection<'_>,
    abbrev: &ElfSection<'_>,
    abbreviation_tables: &mut Vec<Arc<AbbreviationTable>>,
    units: &mut Vec<CompilationUnit>,
    types_section_required: &mut bool,
) -> Result<()> {
    let mut reader = DataReader::new(info.data, 4); // address size doesn't matter yet

    while reader.has_data() {
        let unit_header_offset = reader.offset();
        let (unit_length, dwarf64) = reader.read_initial_length();
        let unit_length_offset = reader.offset();

        if unit_length_offset + unit_length > info.data.len() as u64 {
            warn!(unit_header_offset, "invalid compilation unit length");
            break;
        }

        let version = reader.read_u16(0);

        // DWARF 5 moved the address size before the abbreviation offset
        // and added a unit kind
        let (abbreviation_offset, address_size) = if version >= 5 {
            let unit_kind = reader.read_u8(0);
            if unit_kind != DW_UT_compile && unit_kind != DW_UT_partial {
                warn!(unit_kind, "unsupported DWARF 5 unit kind");
                break;
            }
            let address_size = reader.read_u8(0);
            let abbreviation_offset = reader.read_offset(dwarf64, 0);
            (abbreviation_offset, address_size)
        } else {
            let abbreviation_offset = reader.read_offset(dwarf64, 0);
            let address_size = reader.read_u8(0);
            (abbreviation_offset, address_size)
        };

        if reader.has_overflow() {
            warn!("unexpected end of data in compilation unit header");
            break;
        }

        trace!(
            dwarf = if dwarf64 { 64 } else { 32 },
            version,
            unit_length,
            abbreviation_offset,
            address_size,
            "compilation unit"
        );

        if !(2..=5).contains(&version) {
            warn!(version, "unsupported compilation unit version");
            break;
        }
        if address_size != 4 && address_size != 8 {
            warn!(address_size, "unsupported address size");
            break;
        }
        reader.set_address_size(address_size);

        let unit_content_offset = reader.offset();

        let base = UnitBase::new(
            unit_header_offset,
            unit_content_offset,
            unit_length + (unit_length_offset - unit_header_offset),
            abbreviation_offset,
            address_size,
            dwarf64,
        );
        let mut unit = CompilationUnit::new(base);
        let unit_id = UnitId::Compilation(units.len());

        let table = abbreviation_table_at(abbreviation_tables, abbrev, abbreviation_offset)?;
        unit.base_mut().set_abbreviation_table(table.clone());

        // parse the unit's DIE tree
        let mut unit_reader = DataReader::new(
            &info.data[unit_content_offset as usize
                ..(unit_header_offset + unit.base().total_size()) as usize],
            address_size,
        );
        let root = parse_debug_info_entry(
            &mut unit_reader,
            unit.base_mut(),
            unit_id,
            &table,
            types_section_required,
            0,
        )?;

        let root = root.ok_or_else(|| bad_data("no compilation unit entry in .debug_info"))?;
        let root_is_unit_entry = matches!(
            unit.base().entry(root).map(DebugInfoEntry::tag),
            Some(DW_TAG_compile_unit) | Some(DW_TAG_partial_unit)
        );
        if !root_is_unit_entry {
            warn!("no compilation unit entry in .debug_info section");
            return Err(bad_data("no compilation unit entry in .debug_info"));
        }
        unit.base_mut().set_root_entry(root);

        units.push(unit);
        reader.seek_absolute(unit_length_offset + unit_length);
    }

    Ok(())
}

/// Parses `.debug_types` into type units and the signature map.
fn parse_types_section(
    types: &ElfSection<'_>,
    abbrev: &ElfSection<'_>,
    abbreviation_tables: &mut Vec<Arc<AbbreviationTable>>,
    units: &mut Vec<TypeUnit>,
    signatures: &mut HashMap<u64, usize>,
) -> Result<()> {
    let mut reader = DataReader::new(types.data, 4);
    let mut ignored = false;

    while reader.has_data() {
        let unit_header_offset = reader.offset();
        let (unit_length, dwarf64) = reader.read_initial_length();
        let unit_length_offset = reader.offset();

        if unit_length_offset + unit_length > types.data.len() as u64 {
            warn!(unit_header_offset, "invalid type unit length");
            break;
        }

        let version = reader.read_u16(0);
        let abbreviation_offset = reader.read_offset(dwarf64, 0);
        let address_size = reader.read_u8(0);

        if reader.has_overflow() {
            warn!(unit_header_offset, "unexpected end of data in type unit header");
            break;
        }

        reader.set_address_size(address_size);

        let signature = reader.read_u64(0);
        let type_offset = reader.read_offset(dwarf64, 0);
        let unit_content_offset = reader.offset();

        trace!(
            version,
            unit_length,
            abbreviation_offset,
            address_size,
            signature,
            type_offset,
            "type unit"
        );

        if version > 4 {
            warn!(version, "unsupported type unit version");
            break;
        }
        if address_size != 4 && address_size != 8 {
            warn!(address_size, "unsupported address size");
            break;
        }

        let base = UnitBase::new(
            unit_header_offset,
            unit_content_offset,
            unit_length + (unit_length_offset - unit_header_offset),
            abbreviation_offset,
            address_size,
            dwarf64,
        );
        let mut unit = TypeUnit::new(base, signature, type_offset);
        let unit_id = UnitId::Type(units.len());

        let table = abbreviation_table_at(abbreviation_tables, abbrev, abbreviation_offset)?;
        unit.base_mut().set_abbreviation_table(table.clone());

        let mut unit_reader = DataReader::new(
            &types.data[unit_content_offset as usize
                ..(unit_header_offset + unit.base().total_size()) as usize],
            address_size,
        );
        let root = parse_debug_info_entry(
            &mut unit_reader,
            unit.base_mut(),
            unit_id,
            &table,
            &mut ignored,
            0,
        )?;
        let root = root.ok_or_else(|| bad_data("no type unit entry in .debug_types"))?;
        if unit.base().entry(root).map(DebugInfoEntry::tag) != Some(DW_TAG_type_unit) {
            warn!("no type unit entry in .debug_types section");
            return Err(bad_data("no type unit entry in .debug_types"));
        }
        unit.base_mut().set_root_entry(root);

        let type_entry = unit
            .base()
            .entry_index_for_offset(unit.type_offset())
            .ok_or_else(|| {
                warn!(signature, type_offset = unit.type_offset(), "type unit without its type");
                bad_data("type unit has no entry at its type offset")
            })?;
        unit.set_type_entry(type_entry);

        // duplicates should not happen; keep the first if they do
        let index = units.len();
        units.push(unit);
        signatures.entry(signature).or_insert(index);

        reader.seek_absolute(unit_length_offset + unit_length);
    }

    Ok(())
}

/// The structural pass over one DIE and its children.
///
/// Builds the entry (with its offset recorded, attributes consumed but not
/// interpreted) and recurses until the null-code terminator of each
/// sibling list. Returns `None` for a null entry.
fn parse_debug_info_entry(
    reader: &mut DataReader<'_>,
    unit: &mut UnitBase,
    unit_id: UnitId,
    table: &AbbreviationTable,
    types_section_required: &mut bool,
    level: u32,
) -> Result<Option<usize>> {
    let entry_offset = reader.offset() + unit.relative_content_offset();

    let code = reader.read_unsigned_leb128(0);
    if code == 0 {
        if reader.has_overflow() {
            warn!("unexpected end of unit data");
            return Err(bad_data("unexpected end of unit data"));
        }
        return Ok(None);
    }

    let mut abbreviation = table.entry(code as u32).ok_or_else(|| {
        warn!(code, "no abbreviation entry for code");
        bad_data(format!("no abbreviation entry for code {code}"))
    })?;

    let entry = DebugInfoEntry::for_tag(abbreviation.tag());
    trace!(
        level,
        offset = entry_offset,
        code,
        tag = tag_name(abbreviation.tag()),
        children = abbreviation.has_children(),
        "entry"
    );

    let index = unit.add_entry(entry, entry_offset);

    // consume the attributes; their semantics wait for the second pass
    skip_entry_attributes(reader, unit, &mut abbreviation, types_section_required)?;

    if abbreviation.has_children() {
        loop {
            let child = parse_debug_info_entry(
                reader,
                unit,
                unit_id,
                table,
                types_section_required,
                level + 1,
            )?;
            let Some(child) = child else {
                break;
            };

            let parent_ref = DieRef {
                unit: unit_id,
                entry: index,
            };
            let child_ref = DieRef {
                unit: unit_id,
                entry: child,
            };
            if let Some(child_entry) = unit.entry_mut(child) {
                child_entry.set_parent(parent_ref);
            }
            if let Some(parent_entry) = unit.entry_mut(index) {
                parent_entry.add_child(child_ref);
            }
        }
    }

    Ok(Some(index))
}

/// Consumes the encoded attribute values of one entry without interpreting
/// them (the structural pass). Only `DW_FORM_ref_sig8` leaves a mark: it
/// requires the types section.
fn skip_entry_attributes(
    reader: &mut DataReader<'_>,
    unit: &UnitBase,
    abbreviation: &mut AbbreviationEntry<'_>,
    types_section_required: &mut bool,
) -> Result<()> {
    while let Some(spec) = abbreviation.next_attribute()? {
        let form = if spec.form == DW_FORM_indirect {
            reader.read_unsigned_leb128(0).min(u16::MAX as u64) as u16
        } else {
            spec.form
        };

        match form {
            DW_FORM_addr => {
                reader.read_address(0);
            }
            DW_FORM_block1 => {
                let length = reader.read_u8(0) as u64;
                reader.skip(length);
            }
            DW_FORM_block2 => {
                let length = reader.read_u16(0) as u64;
                reader.skip(length);
            }
            DW_FORM_block4 => {
                let length = reader.read_u32(0) as u64;
                reader.skip(length);
            }
            DW_FORM_block | DW_FORM_exprloc => {
                let length = reader.read_unsigned_leb128(0);
                reader.skip(length);
            }
            DW_FORM_data1 | DW_FORM_ref1 | DW_FORM_flag => {
                reader.read_u8(0);
            }
            DW_FORM_data2 | DW_FORM_ref2 => {
                reader.read_u16(0);
            }
            DW_FORM_data4 | DW_FORM_ref4 => {
                reader.read_u32(0);
            }
            DW_FORM_data8 | DW_FORM_ref8 => {
                reader.read_u64(0);
            }
            DW_FORM_data16 => {
                reader.skip(16);
            }
            DW_FORM_string => {
                reader.read_string("");
            }
            DW_FORM_sdata => {
                reader.read_signed_leb128(0);
            }
            DW_FORM_udata | DW_FORM_ref_udata => {
                reader.read_unsigned_leb128(0);
            }
            DW_FORM_strp | DW_FORM_line_strp | DW_FORM_sec_offset | DW_FORM_ref_addr => {
                reader.read_offset(unit.is_dwarf64(), 0);
            }
            DW_FORM_ref_sig8 => {
                *types_section_required = true;
                reader.read_u64(0);
            }
            DW_FORM_flag_present | DW_FORM_implicit_const => {}
            _ => {
                warn!(form, "unsupported attribute form");
                return Err(bad_data(format!("unsupported attribute form {form:#x}")));
            }
        }

        if reader.has_overflow() {
            return Err(bad_data("unexpected end of unit data"));
        }
    }

    Ok(())
}

/// The attribute pass for one unit: for every entry, re-read its
/// attributes from the section, now dispatching each to its setter, with
/// `init_after_hierarchy`/`init_after_attributes` around them.
fn finish_unit(
    sections: &Sections<'_>,
    compilation_units: &mut Vec<CompilationUnit>,
    type_units: &mut Vec<TypeUnit>,
    type_unit_signatures: &HashMap<u64, usize>,
    unit_id: UnitId,
) -> Result<()> {
    trace!(?unit_id, "finishing unit");

    let section = match unit_id {
        UnitId::Compilation(_) => sections.info.as_ref(),
        UnitId::Type(_) => sections.types.as_ref(),
    }
    .ok_or(Error::EntryNotFound)?;

    let (header_offset, entry_count, address_size, total_size, table) = {
        let base = match unit_id {
            UnitId::Compilation(index) => compilation_units[index].base(),
            UnitId::Type(index) => type_units[index].base(),
        };
        (
            base.header_offset(),
            base.entry_count(),
            base.address_size(),
            base.total_size(),
            base.abbreviation_table()
                .cloned()
                .ok_or_else(|| bad_data("unit without abbreviation table"))?,
        )
    };

    let unit_data =
        &section.data[header_offset as usize..(header_offset + total_size) as usize];

    for index in 0..entry_count {
        // read the attributes with only shared borrows in play...
        let attributes = {
            let units: &[CompilationUnit] = compilation_units;
            let tunits: &[TypeUnit] = type_units;
            let unit_base = match unit_id {
                UnitId::Compilation(unit_index) => units[unit_index].base(),
                UnitId::Type(unit_index) => tunits[unit_index].base(),
            };
            let offset = unit_base.entry_offset(index);

            let mut reader = DataReader::new(unit_data, address_size);
            reader.seek_absolute(offset);

            let code = reader.read_unsigned_leb128(0);
            let mut abbreviation = table.entry(code as u32).ok_or_else(|| {
                bad_data(format!("no abbreviation entry for code {code}"))
            })?;

            collect_entry_attributes(
                sections,
                units,
                tunits,
                type_unit_signatures,
                unit_id,
                unit_base,
                &mut reader,
                &mut abbreviation,
            )?
        };

        // ...then apply them to the (mutably borrowed) entry
        let entry = match unit_id {
            UnitId::Compilation(unit_index) => {
                compilation_units[unit_index].base_mut().entry_mut(index)
            }
            UnitId::Type(unit_index) => type_units[unit_index].base_mut().entry_mut(index),
        }
        .ok_or(Error::EntryNotFound)?;

        entry.init_after_hierarchy();
        for (name, value) in &attributes {
            let Some(setter) = attribute_setter(*name) else {
                trace!(name, "no attribute setter");
                continue;
            };
            match setter(entry, *name, &value.as_value()) {
                SetOutcome::Set => {}
                SetOutcome::NotHandled => trace!(name, "attribute not handled"),
                SetOutcome::BadData => {
                    warn!(name, tag = entry.tag(), "failed to set attribute")
                }
            }
        }
        entry.init_after_attributes();
    }

    // per-unit post processing
    match unit_id {
        UnitId::Type(unit_index) => {
            let unit = &mut type_units[unit_index];
            let language = unit.base().root_entry().and_then(|root| {
                match unit.base().entry(root)?.kind() {
                    crate::entries::DieKind::CompileUnit(data) => Some(data.language),
                    _ => None,
                }
            });
            if let Some(language) = language {
                unit.base_mut().set_language(language);
            }
        }
        UnitId::Compilation(unit_index) => {
            let (language, low_pc, ranges_offset, comp_dir, stmt_list) = {
                let unit = &compilation_units[unit_index];
                let root = unit.base().root_entry().ok_or(Error::EntryNotFound)?;
                let entry = unit.base().entry(root).ok_or(Error::EntryNotFound)?;
                match entry.kind() {
                    crate::entries::DieKind::CompileUnit(data) => (
                        data.language,
                        data.low_pc,
                        data.ranges_offset,
                        data.comp_dir.clone(),
                        data.stmt_list_offset,
                    ),
                    _ => return Err(bad_data("unit entry is not a compile unit")),
                }
            };

            {
                let unit = &mut compilation_units[unit_index];
                unit.base_mut().set_language(language);
                unit.set_range_base_address(low_pc);

                // directory 0 is the compilation directory
                unit.add_directory(comp_dir.as_deref().unwrap_or("."));
            }

            // the unit's own address ranges
            if let Some(offset) = ranges_offset {
                match resolve_range_list(sections, &compilation_units[unit_index], offset) {
                    Ok(ranges) => compilation_units[unit_index].set_address_ranges(ranges),
                    Err(error) => warn!(%error, "unit range list unusable"),
                }
            }

            // the line program
            if let (Some(offset), Some(_)) = (stmt_list, sections.line.as_ref()) {
                if let Err(error) =
                    parse_line_info(sections, &mut compilation_units[unit_index], offset)
                {
                    warn!(%error, "line info unusable");
                }
            }
        }
    }

    Ok(())
}

/// Reads one entry's attribute values, classifying them and resolving
/// references. This is the read half of the attribute pass; the values
/// come back owned so the entry can be mutated afterwards.
#[allow(clippy::too_many_arguments)]
fn collect_entry_attributes(
    sections: &Sections<'_>,
    compilation_units: &[CompilationUnit],
    type_units: &[TypeUnit],
    type_unit_signatures: &HashMap<u64, usize>,
    unit_id: UnitId,
    unit: &UnitBase,
    reader: &mut DataReader<'_>,
    abbreviation: &mut AbbreviationEntry<'_>,
) -> Result<Vec<(u16, OwnedAttributeValue)>> {
    let mut attributes = Vec::new();

    while let Some(spec) = abbreviation.next_attribute()? {
        let form = if spec.form == DW_FORM_indirect {
            reader.read_unsigned_leb128(0).min(u16::MAX as u64) as u16
        } else {
            spec.form
        };
        let name = spec.name;

        let mut value: u64 = 0;
        let mut block: Option<Vec<u8>> = None;
        let mut string: Option<String> = None;
        let mut flag: Option<bool> = None;
        let mut signed = false;
        let mut reference_kind = ReferenceKind::Local;

        match form {
            DW_FORM_addr => value = reader.read_address(0),
            DW_FORM_block1 => {
                let length = reader.read_u8(0) as u64;
                block = Some(read_block(reader, length));
            }
            DW_FORM_block2 => {
                let length = reader.read_u16(0) as u64;
                block = Some(read_block(reader, length));
            }
            DW_FORM_block4 => {
                let length = reader.read_u32(0) as u64;
                block = Some(read_block(reader, length));
            }
            DW_FORM_block | DW_FORM_exprloc => {
                let length = reader.read_unsigned_leb128(0);
                block = Some(read_block(reader, length));
            }
            DW_FORM_data1 => value = reader.read_u8(0) as u64,
            DW_FORM_data2 => value = reader.read_u16(0) as u64,
            DW_FORM_data4 => value = reader.read_u32(0) as u64,
            DW_FORM_data8 => value = reader.read_u64(0),
            DW_FORM_data16 => {
                // only used for MD5 sums; no attribute we set consumes it
                reader.skip(16);
                continue;
            }
            DW_FORM_string => string = Some(reader.read_string("").to_string()),
            DW_FORM_strp => {
                let offset = reader.read_offset(unit.is_dwarf64(), 0);
                string = Some(read_string_section(sections.strings.as_ref(), offset)?);
            }
            DW_FORM_line_strp => {
                let offset = reader.read_offset(unit.is_dwarf64(), 0);
                string = Some(read_string_section(sections.line_strings.as_ref(), offset)?);
            }
            DW_FORM_flag => flag = Some(reader.read_u8(0) != 0),
            DW_FORM_flag_present => flag = Some(true),
            DW_FORM_sdata => {
                value = reader.read_signed_leb128(0) as u64;
                signed = true;
            }
            DW_FORM_udata => value = reader.read_unsigned_leb128(0),
            DW_FORM_ref_addr => {
                value = reader.read_offset(unit.is_dwarf64(), 0);
                reference_kind = ReferenceKind::Global;
            }
            DW_FORM_ref1 => value = reader.read_u8(0) as u64,
            DW_FORM_ref2 => value = reader.read_u16(0) as u64,
            DW_FORM_ref4 => value = reader.read_u32(0) as u64,
            DW_FORM_ref8 => value = reader.read_u64(0),
            DW_FORM_ref_udata => value = reader.read_unsigned_leb128(0),
            DW_FORM_ref_sig8 => {
                value = reader.read_u64(0);
                reference_kind = ReferenceKind::Signature;
            }
            DW_FORM_implicit_const => value = spec.implicit_const as u64,
            DW_FORM_sec_offset => value = reader.read_offset(unit.is_dwarf64(), 0),
            _ => {
                warn!(form, "unsupported attribute form");
                return Err(bad_data(format!("unsupported attribute form {form:#x}")));
            }
        }

        if reader.has_overflow() {
            warn!("unexpected end of unit data");
            return Err(bad_data("unexpected end of unit data"));
        }

        // the attribute's class decides how the raw value is kept; skip
        // attributes whose (name, form) combination we can't place
        let class = attribute_class(name, form);
        let owned = match class {
            AttributeClass::Unknown => {
                trace!(name, form, "skipping attribute with unrecognized class");
                continue;
            }
            AttributeClass::Address => OwnedAttributeValue::Address(value),
            AttributeClass::Block => OwnedAttributeValue::Block(block.unwrap_or_default()),
            AttributeClass::Constant => OwnedAttributeValue::Constant { value, signed },
            AttributeClass::Flag => OwnedAttributeValue::Flag(flag.unwrap_or(false)),
            AttributeClass::LinePtr => OwnedAttributeValue::LinePointer(value),
            AttributeClass::LocListPtr => OwnedAttributeValue::LocationListPointer(value),
            AttributeClass::MacPtr => OwnedAttributeValue::MacroPointer(value),
            AttributeClass::RangeListPtr => OwnedAttributeValue::RangeListPointer(value),
            AttributeClass::String => OwnedAttributeValue::String(string.unwrap_or_default()),
            AttributeClass::Reference => {
                match DwarfFile::resolve_reference(
                    compilation_units,
                    type_units,
                    type_unit_signatures,
                    unit_id,
                    value,
                    reference_kind,
                ) {
                    Some(reference) => OwnedAttributeValue::Reference(reference),
                    None => {
                        // gcc 2 has been seen producing DW_AT_sibling
                        // attributes pointing past the end of the sibling
                        // list; ignore those
                        if name == DW_AT_sibling {
                            trace!(value, "sibling reference past end of list");
                            continue;
                        }
                        warn!(
                            name,
                            form,
                            value,
                            "failed to resolve reference"
                        );
                        return Err(Error::EntryNotFound);
                    }
                }
            }
        };

        attributes.push((name, owned));
    }

    Ok(attributes)
}

fn read_block(reader: &mut DataReader<'_>, length: u64) -> Vec<u8> {
    let available = length.min(reader.bytes_remaining());
    let block = reader.remaining_data()[..available as usize].to_vec();
    reader.skip(length);
    block
}

fn read_string_section(section: Option<&ElfSection<'_>>, offset: u64) -> Result<String> {
    let section = section.ok_or_else(|| bad_data("string offset without a string section"))?;
    if offset >= section.data.len() as u64 {
        warn!(offset, "invalid string section offset");
        return Err(bad_data("string offset out of bounds"));
    }
    let mut reader = DataReader::new(&section.data[offset as usize..], 4);
    let string = reader.read_string("").to_string();
    if reader.has_overflow() {
        return Err(bad_data("unterminated string in string section"));
    }
    Ok(string)
}

/// Walks a `.debug_ranges` list. Base-address selection entries (start ==
/// all-ones) change the base; (0, 0) terminates; empty ranges are dropped.
fn resolve_range_list(
    sections: &Sections<'_>,
    unit: &CompilationUnit,
    offset: u64,
) -> Result<TargetAddressRangeList> {
    let section = sections.ranges.as_ref().ok_or(Error::EntryNotFound)?;
    if offset >= section.data.len() as u64 {
        return Err(bad_data("range list offset out of bounds"));
    }

    let mut base_address = unit.range_base_address();
    let max_address = unit.base().max_address();

    let mut list = TargetAddressRangeList::new();
    let mut reader = DataReader::new(
        &section.data[offset as usize..],
        unit.base().address_size(),
    );
    loop {
        let start = reader.read_address(0);
        let end = reader.read_address(0);
        if reader.has_overflow() {
            return Err(bad_data("truncated range list"));
        }

        if start == 0 && end == 0 {
            break;
        }
        if start == max_address {
            base_address = end;
            continue;
        }
        if start == end {
            continue;
        }

        list.add_range(TargetAddressRange::new(base_address + start, end - start));
    }

    Ok(list)
}

/// Walks a `.debug_loc` list and picks the expression covering `address`.
fn find_location_expression<'elf>(
    sections: &Sections<'elf>,
    unit: &CompilationUnit,
    offset: u64,
    address: u64,
) -> Result<&'elf [u8]> {
    let section = sections.locations.as_ref().ok_or(Error::EntryNotFound)?;
    if offset >= section.data.len() as u64 {
        return Err(bad_data("location list offset out of bounds"));
    }

    let mut base_address = unit.range_base_address();
    let max_address = unit.base().max_address();

    let mut reader = DataReader::new(
        &section.data[offset as usize..],
        unit.base().address_size(),
    );
    loop {
        let start = reader.read_address(0);
        let end = reader.read_address(0);
        if reader.has_overflow() {
            return Err(bad_data("truncated location list"));
        }

        if start == 0 && end == 0 {
            return Err(Error::EntryNotFound);
        }
        if start == max_address {
            base_address = end;
            continue;
        }

        let expression_length = reader.read_u16(0) as u64;
        if expression_length > reader.bytes_remaining() {
            return Err(bad_data("truncated location list expression"));
        }
        let expression = &reader.remaining_data()[..expression_length as usize];
        reader.skip(expression_length);

        if start == end {
            continue;
        }

        let start = start + base_address;
        let end = end + base_address;
        if address >= start && address < end {
            return Ok(expression);
        }
    }
}

/// One `.debug_pubtypes` set: header plus (offset, name) pairs until the
/// zero offset.
fn parse_public_types_set(reader: &mut DataReader<'_>, dwarf64: bool) -> Result<()> {
    let version = reader.read_u16(0);
    if version != 2 {
        trace!(version, "unsupported pubtypes version");
        return Err(unsupported(format!("pubtypes version {version}")));
    }

    let info_offset = reader.read_offset(dwarf64, 0);
    let info_size = reader.read_offset(dwarf64, 0);
    if reader.has_overflow() {
        return Err(bad_data("truncated pubtypes set header"));
    }
    trace!(info_offset, info_size, "public types set");

    while reader.bytes_remaining() > 0 {
        let entry_offset = reader.read_offset(dwarf64, 0);
        if entry_offset == 0 {
            return Ok(());
        }
        let name = reader.read_string("");
        trace!(name, entry_offset, "public type");
        if reader.has_overflow() {
            return Err(bad_data("truncated pubtypes entry"));
        }
    }

    Ok(())
}

/// Parses a unit's line-table header (all versions) and hands the program
/// to the unit. Directory and file tables land on the unit as well.
fn parse_line_info(
    sections: &Sections<'_>,
    unit: &mut CompilationUnit,
    offset: u64,
) -> Result<()> {
    let section = sections.line.as_ref().ok_or(Error::EntryNotFound)?;
    if offset >= section.data.len() as u64 {
        return Err(bad_data("line info offset out of bounds"));
    }

    trace!(offset, "parsing line info");

    let mut reader = DataReader::new(
        &section.data[offset as usize..],
        unit.base().address_size(),
    );

    let (unit_length, dwarf64) = reader.read_initial_length();
    if unit_length > reader.bytes_remaining() {
        return Err(bad_data("line info unit length out of bounds"));
    }
    let unit_offset = reader.offset();

    let version = reader.read_u16(0);
    if !(2..=5).contains(&version) {
        warn!(version, "unsupported line info version");
        return Err(unsupported(format!("line info version {version}")));
    }

    let mut address_size = unit.base().address_size();
    if version >= 5 {
        address_size = reader.read_u8(0);
        if address_size != 4 && address_size != 8 {
            warn!(address_size, "unsupported line info address size");
            return Err(bad_data("unsupported line info address size"));
        }

        let segment_selector_size = reader.read_u8(0);
        if segment_selector_size != 0 {
            warn!(segment_selector_size, "unsupported segment selector size");
            return Err(bad_data("unsupported segment selector size"));
        }
    }

    let header_length = reader.read_offset(dwarf64, 0);
    let header_offset = reader.offset();
    if reader.bytes_remaining() < header_length {
        return Err(bad_data("line info header length out of bounds"));
    }

    let min_instruction_length = reader.read_u8(0);
    let max_operations_per_instruction = if version >= 4 { reader.read_u8(0) } else { 1 };
    if max_operations_per_instruction != 1 {
        warn!(
            max_operations_per_instruction,
            "unsupported maximum operations per instruction"
        );
        return Err(unsupported("maximum operations per instruction != 1"));
    }

    let default_is_statement = reader.read_u8(0) != 0;
    let line_base = reader.read_i8(0);
    let line_range = reader.read_u8(0);
    let opcode_base = reader.read_u8(0);

    let standard_opcode_lengths: Box<[u8]> = {
        let count = opcode_base.max(1) as u64 - 1;
        let available = count.min(reader.bytes_remaining());
        let lengths = reader.remaining_data()[..available as usize].into();
        reader.skip(count);
        lengths
    };

    if reader.has_overflow() || line_range == 0 {
        return Err(bad_data("truncated line info header"));
    }

    trace!(
        unit_length,
        version,
        header_length,
        min_instruction_length,
        default_is_statement,
        line_base,
        line_range,
        opcode_base,
        "line info header"
    );

    if version >= 5 {
        parse_line_info_v5_tables(sections, unit, &mut reader)?;
    } else {
        // include directories, terminated by an empty string
        loop {
            let directory = reader.read_string("");
            if directory.is_empty() {
                break;
            }
            trace!(directory, "include directory");
            unit.add_directory(directory);
        }

        // file names, ditto
        loop {
            let file = reader.read_string("");
            if file.is_empty() {
                break;
            }
            let directory_index = reader.read_unsigned_leb128(0);
            let _modification_time = reader.read_unsigned_leb128(0);
            let _file_length = reader.read_unsigned_leb128(0);

            if reader.has_overflow() {
                return Err(bad_data("truncated line info file table"));
            }

            trace!(file, directory_index, "file");
            unit.add_file(file, directory_index);
        }
    }

    if reader.has_overflow() {
        return Err(bad_data("truncated line info header"));
    }

    // the program follows the declared header length, which may be larger
    // than what we consumed
    let reader_offset = reader.offset();
    let program_start = header_offset + header_length;
    if program_start < reader_offset {
        return Err(bad_data("line info header shorter than its contents"));
    }
    reader.seek_absolute(program_start);

    let program_size = unit_length
        .checked_sub(program_start - unit_offset)
        .ok_or_else(|| bad_data("line info header extends past its unit"))?;
    let program: Box<[u8]> = {
        let available = program_size.min(reader.bytes_remaining());
        reader.remaining_data()[..available as usize].into()
    };

    let program = LineNumberProgram::new(
        program,
        address_size,
        min_instruction_length,
        default_is_statement,
        line_base,
        line_range,
        opcode_base,
        standard_opcode_lengths,
    )?;
    unit.set_line_program(program);
    Ok(())
}

/// The DWARF 5 directory/file tables: a format-descriptor list of
/// (content, form) pairs followed by the entries.
fn parse_line_info_v5_tables(
    sections: &Sections<'_>,
    unit: &mut CompilationUnit,
    reader: &mut DataReader<'_>,
) -> Result<()> {
    // directories
    let format_count = reader.read_u8(0);
    let format_offset = reader.offset();
    for _ in 0..format_count {
        reader.read_unsigned_leb128(0);
        reader.read_unsigned_leb128(0);
    }
    let format_length = reader.offset() - format_offset;
    let format_reader =
        reader.restricted_reader_at(-(format_length as i64), format_length);

    let directory_count = reader.read_unsigned_leb128(0);
    for _ in 0..directory_count {
        let mut formats = format_reader.clone();
        for _ in 0..format_count {
            let content = formats.read_unsigned_leb128(0);
            let form = formats.read_unsigned_leb128(0);
            if content != DW_LNCT_path {
                warn!(content, "unsupported field in line info directories");
                return Err(unsupported("line info directory field"));
            }
            let directory = read_line_info_string(sections, unit, reader, form)?;
            trace!(directory = %directory, "include directory");
            unit.add_directory(&directory);
        }
    }

    // file names
    let format_count = reader.read_u8(0);
    let format_offset = reader.offset();
    for _ in 0..format_count {
        reader.read_unsigned_leb128(0);
        reader.read_unsigned_leb128(0);
    }
    let format_length = reader.offset() - format_offset;
    let format_reader =
        reader.restricted_reader_at(-(format_length as i64), format_length);

    let file_count = reader.read_unsigned_leb128(0);
    for _ in 0..file_count {
        let mut file_name: Option<String> = None;
        let mut directory_index: Option<u64> = None;

        let mut formats = format_reader.clone();
        for _ in 0..format_count {
            let content = formats.read_unsigned_leb128(0);
            let form = formats.read_unsigned_leb128(0);
            match content {
                DW_LNCT_path => {
                    file_name = Some(read_line_info_string(sections, unit, reader, form)?);
                }
                DW_LNCT_directory_index => {
                    directory_index = Some(read_line_info_uint(reader, form)?);
                }
                DW_LNCT_timestamp => {
                    read_line_info_uint(reader, form)?;
                }
                DW_LNCT_size => {
                    read_line_info_uint(reader, form)?;
                }
                DW_LNCT_MD5 => {
                    if form != DW_FORM_data16 as u64 {
                        return Err(bad_data("MD5 line info field with a bad form"));
                    }
                    reader.skip(16);
                }
                _ => {
                    warn!(content, "unsupported field in line info files");
                    return Err(unsupported("line info file field"));
                }
            }
        }

        if let (Some(name), Some(index)) = (file_name, directory_index) {
            trace!(file = %name, index, "file");
            unit.add_file(&name, index);
        }
    }

    Ok(())
}

fn read_line_info_string(
    sections: &Sections<'_>,
    unit: &CompilationUnit,
    reader: &mut DataReader<'_>,
    form: u64,
) -> Result<String> {
    match form as u16 {
        DW_FORM_string => Ok(reader.read_string("").to_string()),
        DW_FORM_line_strp => {
            let offset = reader.read_offset(unit.base().is_dwarf64(), 0);
            read_string_section(sections.line_strings.as_ref(), offset)
        }
        DW_FORM_strp => {
            let offset = reader.read_offset(unit.base().is_dwarf64(), 0);
            read_string_section(sections.strings.as_ref(), offset)
        }
        DW_FORM_strp_sup => Err(unsupported("supplementary string forms")),
        _ => {
            warn!(form, "unsupported line info string form");
            Err(bad_data("unsupported line info string form"))
        }
    }
}

fn read_line_info_uint(reader: &mut DataReader<'_>, form: u64) -> Result<u64> {
    match form as u16 {
        DW_FORM_data1 => Ok(reader.read_u8(0) as u64),
        DW_FORM_data2 => Ok(reader.read_u16(0) as u64),
        DW_FORM_data4 => Ok(reader.read_u32(0) as u64),
        DW_FORM_data8 => Ok(reader.read_u64(0)),
        DW_FORM_udata => Ok(reader.read_unsigned_leb128(0)),
        _ => {
            warn!(form, "unsupported line info integer form");
            Err(bad_data("unsupported line info integer form"))
        }
    }
}

/// Parses the shared head of a CIE: sentinel, version, augmentation and
/// the alignment/return-register fields, leaving `context` loaded and the
/// returned reader positioned at the initial instructions (with the
/// number of instruction bytes).
fn parse_cie_header<'elf>(
    frame_section: &ElfSection<'elf>,
    eh_frame: bool,
    unit_address_size: Option<u8>,
    address_size: u8,
    context: &mut crate::cfi::CfaContext<'elf>,
    cie_offset: u64,
    augmentation: &mut crate::cfi::CieAugmentation,
) -> Result<(DataReader<'elf>, u64)> {
    if cie_offset >= frame_section.data.len() as u64 {
        return Err(bad_data("CIE offset out of bounds"));
    }

    let mut reader = DataReader::new(
        &frame_section.data[cie_offset as usize..],
        unit_address_size.unwrap_or(address_size),
    );

    let (length, dwarf64) = reader.read_initial_length();
    if length > reader.bytes_remaining() {
        return Err(bad_data("CIE length out of bounds"));
    }
    let length_offset = reader.offset();

    let cie_id = reader.read_offset(dwarf64, 0);
    let id_is_valid = if eh_frame {
        cie_id == 0
    } else if dwarf64 {
        cie_id == u64::MAX
    } else {
        cie_id == u32::MAX as u64
    };
    if !id_is_valid {
        return Err(bad_data("FDE's CIE pointer names no CIE"));
    }

    let version = reader.read_u8(0);
    if version != 1 {
        trace!(cie_offset, version, "unsupported CIE version");
        return Err(unsupported(format!("CIE version {version}")));
    }

    augmentation.init(&mut reader);

    // with the "eh" augmentation an exception-table pointer precedes the
    // alignment fields; we have no use for it
    if augmentation.string() == "eh" {
        reader.skip(if dwarf64 { 8 } else { 4 });
    }

    context.set_code_alignment(reader.read_unsigned_leb128(0));
    context.set_data_alignment(reader.read_signed_leb128(0));
    context.set_return_address_register(reader.read_unsigned_leb128(0) as u32);

    trace!(
        cie_offset,
        length,
        augmentation = augmentation.string(),
        code_alignment = context.code_alignment(),
        data_alignment = context.data_alignment(),
        return_address_register = context.return_address_register(),
        "cie"
    );

    augmentation.read(&mut reader)?;

    if reader.has_overflow() {
        return Err(bad_data("truncated CIE"));
    }

    let consumed = reader.offset() - length_offset;
    let remaining = length
        .checked_sub(consumed)
        .ok_or_else(|| bad_data("CIE contents longer than its length"))?;

    Ok((reader, remaining))
}
