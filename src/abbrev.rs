//! `.debug_abbrev` parsing.
//!
//! An abbreviation table is a sequence of entries, each giving a code, a
//! tag, a children flag and the attribute specifications of every DIE that
//! uses the code. Tables are indexed by their offset in the section so
//! units sharing an offset share the parsed table.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use tracing::warn;

use crate::consts::{DW_CHILDREN_yes, DW_FORM_implicit_const};
use crate::error::{bad_data, Result};
use crate::reader::DataReader;

/// One attribute specification of an abbreviation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: u16,
    pub form: u16,
    /// Only meaningful for `DW_FORM_implicit_const`, whose value lives in
    /// the abbreviation table instead of the DIE.
    pub implicit_const: i64,
}

/// A parsed abbreviation table, owning a copy of its bytes.
#[derive(Debug)]
pub struct AbbreviationTable {
    offset: u64,
    data: Box<[u8]>,
    // code -> (offset, length) of the entry body within `data`
    entries: HashMap<u32, (u32, u32)>,
}

impl AbbreviationTable {
    /// Parses the table starting at `offset` within the abbreviation
    /// section. The table ends at its null entry.
    pub fn parse(section: &[u8], offset: u64) -> Result<AbbreviationTable> {
        if offset >= section.len() as u64 {
            return Err(bad_data(format!(
                "abbreviation table offset {offset:#x} outside the section"
            )));
        }

        let data = &section[offset as usize..];
        let mut reader = DataReader::new(data, 4); // address size doesn't matter here
        let mut entries = HashMap::new();

        loop {
            let code = reader.read_unsigned_leb128(0);
            if code == 0 {
                if reader.has_overflow() {
                    return Err(bad_data("abbreviation table without null terminator"));
                }
                break;
            }
            if code > u32::MAX as u64 {
                return Err(bad_data(format!("abbreviation code {code:#x} out of range")));
            }

            let body_offset = reader.offset();

            let _tag = reader.read_unsigned_leb128(0);
            let _has_children = reader.read_u8(0);

            // attribute specifications, terminated by a (0, 0) pair
            loop {
                let name = reader.read_unsigned_leb128(0);
                let form = reader.read_unsigned_leb128(0);
                if reader.has_overflow() {
                    return Err(bad_data("truncated abbreviation entry"));
                }
                if name == 0 && form == 0 {
                    break;
                }
                if form == DW_FORM_implicit_const as u64 {
                    reader.read_signed_leb128(0);
                }
            }

            let length = (reader.offset() - body_offset) as u32;
            match entries.entry(code as u32) {
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert((body_offset as u32, length));
                }
                std::collections::hash_map::Entry::Occupied(_) => {
                    warn!(
                        code,
                        table_offset = offset,
                        entry_offset = body_offset,
                        "duplicate abbreviation table entry"
                    );
                }
            }
        }

        let table_size = reader.offset() as usize;
        Ok(AbbreviationTable {
            offset,
            data: data[..table_size].into(),
            entries,
        })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn entry(&self, code: u32) -> Option<AbbreviationEntry<'_>> {
        let &(offset, length) = self.entries.get(&code)?;
        Some(AbbreviationEntry::new(
            code,
            &self.data[offset as usize..(offset + length) as usize],
        ))
    }
}

/// A cursor over one abbreviation entry's attribute specifications.
#[derive(Debug, Clone)]
pub struct AbbreviationEntry<'table> {
    code: u32,
    tag: u16,
    has_children: bool,
    reader: DataReader<'table>,
}

impl<'table> AbbreviationEntry<'table> {
    fn new(code: u32, body: &'table [u8]) -> Self {
        let mut reader = DataReader::new(body, 4);
        let tag = reader.read_unsigned_leb128(0).min(u16::MAX as u64) as u16;
        let has_children = reader.read_u8(0) == DW_CHILDREN_yes;
        AbbreviationEntry {
            code,
            tag,
            has_children,
            reader,
        }
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn tag(&self) -> u16 {
        self.tag
    }

    pub fn has_children(&self) -> bool {
        self.has_children
    }

    /// The next attribute specification, or `None` at the terminator.
    /// Values out of the 16-bit range any known attribute or form uses are
    /// reported as bad data.
    pub fn next_attribute(&mut self) -> Result<Option<AttributeSpec>> {
        let name = self.reader.read_unsigned_leb128(0);
        let form = self.reader.read_unsigned_leb128(0);
        if self.reader.has_overflow() {
            return Err(bad_data("truncated abbreviation attribute specification"));
        }
        if name == 0 && form == 0 {
            return Ok(None);
        }
        if name > u16::MAX as u64 || form > u16::MAX as u64 {
            return Err(bad_data(format!(
                "attribute specification ({name:#x}, {form:#x}) out of range"
            )));
        }

        let implicit_const = if form == DW_FORM_implicit_const as u64 {
            self.reader.read_signed_leb128(0)
        } else {
            0
        };

        Ok(Some(AttributeSpec {
            name: name as u16,
            form: form as u16,
            implicit_const,
        }))
    }
}
