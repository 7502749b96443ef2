//! Compilation and type units.
//!
//! A unit owns the arena of its debug-information entries. Entry offsets
//! are recorded in the order the structural pass walks them, which is byte
//! order, so the offset array is strictly ascending and lookups by offset
//! binary-search it.

use std::sync::Arc;

use crate::abbrev::AbbreviationTable;
use crate::entries::DebugInfoEntry;
use crate::line::LineNumberProgram;
use crate::ranges::TargetAddressRangeList;
use crate::types::TargetAddr;

/// Data common to compilation and type units.
#[derive(Debug)]
pub struct UnitBase {
    header_offset: u64,
    content_offset: u64,
    total_size: u64,
    abbreviation_offset: u64,
    address_size: u8,
    is_dwarf64: bool,
    abbreviation_table: Option<Arc<AbbreviationTable>>,
    entries: Vec<DebugInfoEntry>,
    entry_offsets: Vec<u64>,
    root_entry: Option<usize>,
    language: u16,
}

impl UnitBase {
    pub fn new(
        header_offset: u64,
        content_offset: u64,
        total_size: u64,
        abbreviation_offset: u64,
        address_size: u8,
        is_dwarf64: bool,
    ) -> UnitBase {
        UnitBase {
            header_offset,
            content_offset,
            total_size,
            abbreviation_offset,
            address_size,
            is_dwarf64,
            abbreviation_table: None,
            entries: Vec::new(),
            entry_offsets: Vec::new(),
            root_entry: None,
            language: 0,
        }
    }

    pub fn header_offset(&self) -> u64 {
        self.header_offset
    }

    pub fn content_offset(&self) -> u64 {
        self.content_offset
    }

    /// Content offset relative to the unit header.
    pub fn relative_content_offset(&self) -> u64 {
        self.content_offset - self.header_offset
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn content_size(&self) -> u64 {
        self.total_size - self.relative_content_offset()
    }

    pub fn abbreviation_offset(&self) -> u64 {
        self.abbreviation_offset
    }

    pub fn address_size(&self) -> u8 {
        self.address_size
    }

    pub fn is_dwarf64(&self) -> bool {
        self.is_dwarf64
    }

    /// All-ones for the unit's address size; doubles as the base-address
    /// selection marker in range and location lists.
    pub fn max_address(&self) -> TargetAddr {
        if self.address_size == 4 {
            u32::MAX as u64
        } else {
            u64::MAX
        }
    }

    pub fn language(&self) -> u16 {
        self.language
    }

    pub fn set_language(&mut self, language: u16) {
        self.language = language;
    }

    pub fn abbreviation_table(&self) -> Option<&Arc<AbbreviationTable>> {
        self.abbreviation_table.as_ref()
    }

    pub fn set_abbreviation_table(&mut self, table: Arc<AbbreviationTable>) {
        self.abbreviation_table = Some(table);
    }

    pub fn contains_absolute_offset(&self, offset: u64) -> bool {
        self.header_offset <= offset && offset < self.header_offset + self.total_size
    }

    /// Appends an entry parsed at the given unit-relative offset. The
    /// structural pass visits entries in byte order, keeping
    /// `entry_offsets` ascending.
    pub fn add_entry(&mut self, entry: DebugInfoEntry, offset: u64) -> usize {
        debug_assert!(self
            .entry_offsets
            .last()
            .map_or(true, |&last| last < offset));
        self.entries.push(entry);
        self.entry_offsets.push(offset);
        self.entries.len() - 1
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, index: usize) -> Option<&DebugInfoEntry> {
        self.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut DebugInfoEntry> {
        self.entries.get_mut(index)
    }

    pub fn entry_offset(&self, index: usize) -> u64 {
        self.entry_offsets[index]
    }

    /// Index of the entry at exactly this unit-relative offset.
    pub fn entry_index_for_offset(&self, offset: u64) -> Option<usize> {
        self.entry_offsets.binary_search(&offset).ok()
    }

    pub fn root_entry(&self) -> Option<usize> {
        self.root_entry
    }

    pub fn set_root_entry(&mut self, index: usize) {
        self.root_entry = Some(index);
    }
}

/// One source file recorded in a unit's line-table header.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub directory_index: u64,
}

/// A translation unit from `.debug_info`.
#[derive(Debug)]
pub struct CompilationUnit {
    base: UnitBase,
    directories: Vec<String>,
    files: Vec<FileEntry>,
    line_program: Option<LineNumberProgram>,
    address_ranges: Option<TargetAddressRangeList>,
    range_base_address: TargetAddr,
}

impl CompilationUnit {
    pub fn new(base: UnitBase) -> CompilationUnit {
        CompilationUnit {
            base,
            directories: Vec::new(),
            files: Vec::new(),
            line_program: None,
            address_ranges: None,
            range_base_address: 0,
        }
    }

    pub fn base(&self) -> &UnitBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut UnitBase {
        &mut self.base
    }

    /// Base address for range- and location-list entries: the unit's
    /// `DW_AT_low_pc`, until a base-address selection entry overrides it.
    pub fn range_base_address(&self) -> TargetAddr {
        self.range_base_address
    }

    pub fn set_range_base_address(&mut self, address: TargetAddr) {
        self.range_base_address = address;
    }

    pub fn address_ranges(&self) -> Option<&TargetAddressRangeList> {
        self.address_ranges.as_ref()
    }

    pub fn set_address_ranges(&mut self, ranges: TargetAddressRangeList) {
        self.address_ranges = Some(ranges);
    }

    /// Directory 0 is the compilation directory; the line-table header's
    /// include directories follow.
    pub fn add_directory(&mut self, directory: &str) {
        if !directory.is_empty() {
            self.directories.push(directory.to_string());
        }
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    pub fn directory_at(&self, index: usize) -> Option<&str> {
        self.directories.get(index).map(String::as_str)
    }

    pub fn add_file(&mut self, name: &str, directory_index: u64) {
        if !name.is_empty() {
            self.files.push(FileEntry {
                name: name.to_string(),
                directory_index,
            });
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// File by line-table index (1-based, as the line-number state machine
    /// counts them). Returns the file name and its directory.
    pub fn file_at(&self, index: u64) -> Option<(&str, Option<&str>)> {
        if index == 0 {
            return None;
        }
        let file = self.files.get(index as usize - 1)?;
        let directory = self.directory_at(file.directory_index as usize);
        Some((&file.name, directory))
    }

    pub fn line_program(&self) -> Option<&LineNumberProgram> {
        self.line_program.as_ref()
    }

    pub fn set_line_program(&mut self, program: LineNumberProgram) {
        self.line_program = Some(program);
    }
}

/// A type unit from `.debug_types`: a unit plus the 64-bit signature other
/// units refer to it by, and the offset of the DIE it exports.
#[derive(Debug)]
pub struct TypeUnit {
    base: UnitBase,
    signature: u64,
    type_offset: u64,
    type_entry: Option<usize>,
}

impl TypeUnit {
    pub fn new(base: UnitBase, signature: u64, type_offset: u64) -> TypeUnit {
        TypeUnit {
            base,
            signature,
            type_offset,
            type_entry: None,
        }
    }

    pub fn base(&self) -> &UnitBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut UnitBase {
        &mut self.base
    }

    pub fn signature(&self) -> u64 {
        self.signature
    }

    pub fn type_offset(&self) -> u64 {
        self.type_offset
    }

    /// Index of the exported type's entry within this unit.
    pub fn type_entry(&self) -> Option<usize> {
        self.type_entry
    }

    pub fn set_type_entry(&mut self, index: usize) {
        self.type_entry = Some(index);
    }
}
