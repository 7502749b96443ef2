//! Minimal ELF image access: just enough of the format to hand out named
//! sections and the text/data segments.
//!
//! The image is mapped read-only and kept mapped for the lifetime of the
//! file; all section data is borrowed straight out of the mapping.

#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

use bitflags::bitflags;
use memmap::Mmap;
use tracing::warn;

use crate::error::{bad_data, unsupported, Result};
use crate::types::TargetAddr;

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

const ELFCLASS32: u8 = 1;
const ELFCLASS64: u8 = 2;
const ELFDATA2LSB: u8 = 1;

const SHT_NOBITS: u32 = 8;

const PT_LOAD: u32 = 1;
const PF_X: u32 = 1;
const PF_W: u32 = 2;

bitflags! {
    /// Section header flags (`sh_flags`), truncated to the bits we look at.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SectionFlags: u64 {
        const WRITE = 0x1;
        const ALLOC = 0x2;
        const EXECINSTR = 0x4;
    }
}

/// One section of the image: metadata plus its raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct ElfSection<'data> {
    pub name: &'data str,
    pub load_address: TargetAddr,
    pub file_offset: u64,
    pub size: u64,
    pub flags: SectionFlags,
    pub data: &'data [u8],
}

impl ElfSection<'_> {
    pub fn is_writable(&self) -> bool {
        self.flags.contains(SectionFlags::WRITE)
    }
}

/// One PT_LOAD segment of the image.
#[derive(Debug, Clone, Copy)]
pub struct ElfSegment {
    pub load_address: TargetAddr,
    pub file_offset: u64,
    pub file_size: u64,
    pub memory_size: u64,
    pub executable: bool,
    pub writable: bool,
}

#[derive(Debug)]
struct SectionRecord {
    name_offset: u32,
    kind: u32,
    flags: u64,
    load_address: u64,
    file_offset: u64,
    size: u64,
}

enum ImageBytes {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl ImageBytes {
    fn bytes(&self) -> &[u8] {
        match self {
            ImageBytes::Mapped(map) => map,
            ImageBytes::Owned(bytes) => bytes,
        }
    }
}

/// A loaded ELF image, exposing sections by name.
pub struct ElfFile {
    image: ImageBytes,
    sections: Vec<SectionRecord>,
    segments: Vec<ElfSegment>,
    string_table: (u64, u64),
}

impl std::fmt::Debug for ElfFile {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ElfFile")
            .field("sections", &self.sections.len())
            .field("segments", &self.segments.len())
            .finish()
    }
}

impl ElfFile {
    pub fn open(path: &Path) -> Result<ElfFile> {
        let file = fs::File::open(path)?;
        // SAFETY: the mapping is private read-only; we never hand out the
        // map itself, only slices whose lifetime is tied to `self`.
        let map = unsafe { Mmap::map(&file) }?;
        Self::parse(ImageBytes::Mapped(map))
    }

    /// Parses an image already held in memory. Tests assemble their fixtures
    /// this way.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<ElfFile> {
        Self::parse(ImageBytes::Owned(bytes))
    }

    fn parse(image: ImageBytes) -> Result<ElfFile> {
        let data = image.bytes();
        if data.len() < 0x34 || data[0..4] != ELF_MAGIC {
            return Err(bad_data("not an ELF image"));
        }

        let class = data[4];
        if class != ELFCLASS32 && class != ELFCLASS64 {
            return Err(bad_data(format!("invalid ELF class {class}")));
        }
        if data[5] != ELFDATA2LSB {
            return Err(unsupported("big-endian ELF image"));
        }

        let is64 = class == ELFCLASS64;

        let read_u16 = |offset: usize| -> u16 {
            u16::from_le_bytes(data[offset..offset + 2].try_into().unwrap())
        };
        let read_u32 = |offset: usize| -> u32 {
            u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
        };
        let read_word = |offset: usize| -> u64 {
            if is64 {
                u64::from_le_bytes(data[offset..offset + 8].try_into().unwrap())
            } else {
                read_u32(offset) as u64
            }
        };

        let header_size = if is64 { 0x40 } else { 0x34 };
        if data.len() < header_size {
            return Err(bad_data("truncated ELF header"));
        }

        let (phoff, shoff) = if is64 {
            (read_word(0x20), read_word(0x28))
        } else {
            (read_word(0x1c), read_word(0x20))
        };
        let (phentsize, phnum, shentsize, shnum, shstrndx) = if is64 {
            (read_u16(0x36), read_u16(0x38), read_u16(0x3a), read_u16(0x3c), read_u16(0x3e))
        } else {
            (read_u16(0x2a), read_u16(0x2c), read_u16(0x2e), read_u16(0x30), read_u16(0x32))
        };

        // program headers
        let mut segments = Vec::new();
        for i in 0..phnum as u64 {
            let base = phoff.checked_add(i * phentsize as u64).ok_or_else(|| bad_data("program header offset overflow"))? as usize;
            let entry_size = if is64 { 0x38 } else { 0x20 };
            if (phentsize as usize) < entry_size || base + entry_size > data.len() {
                return Err(bad_data("truncated program header table"));
            }

            let kind = read_u32(base);
            if kind != PT_LOAD {
                continue;
            }

            let (flags, file_offset, load_address, file_size, memory_size) = if is64 {
                (
                    read_u32(base + 0x04),
                    read_word(base + 0x08),
                    read_word(base + 0x10),
                    read_word(base + 0x20),
                    read_word(base + 0x28),
                )
            } else {
                (
                    read_u32(base + 0x18),
                    read_word(base + 0x04),
                    read_word(base + 0x08),
                    read_word(base + 0x10),
                    read_word(base + 0x14),
                )
            };

            segments.push(ElfSegment {
                load_address,
                file_offset,
                file_size,
                memory_size,
                executable: flags & PF_X != 0,
                writable: flags & PF_W != 0,
            });
        }

        // section headers
        let mut sections = Vec::new();
        for i in 0..shnum as u64 {
            let base = shoff.checked_add(i * shentsize as u64).ok_or_else(|| bad_data("section header offset overflow"))? as usize;
            let entry_size = if is64 { 0x40 } else { 0x28 };
            if (shentsize as usize) < entry_size || base + entry_size > data.len() {
                return Err(bad_data("truncated section header table"));
            }

            let (flags, load_address, file_offset, size) = if is64 {
                (
                    read_word(base + 0x08),
                    read_word(base + 0x10),
                    read_word(base + 0x18),
                    read_word(base + 0x20),
                )
            } else {
                (
                    read_word(base + 0x08),
                    read_word(base + 0x0c),
                    read_word(base + 0x10),
                    read_word(base + 0x14),
                )
            };

            sections.push(SectionRecord {
                name_offset: read_u32(base),
                kind: read_u32(base + 4),
                flags,
                load_address,
                file_offset,
                size,
            });
        }

        let string_table = match sections.get(shstrndx as usize) {
            Some(record) => (record.file_offset, record.size),
            None => {
                warn!("image has no section name string table");
                (0, 0)
            }
        };

        Ok(ElfFile {
            image,
            sections,
            segments,
            string_table,
        })
    }

    fn section_name(&self, record: &SectionRecord) -> Option<&str> {
        let (table_offset, table_size) = self.string_table;
        let table = self
            .image
            .bytes()
            .get(table_offset as usize..(table_offset + table_size) as usize)?;
        let name = table.get(record.name_offset as usize..)?;
        let length = name.iter().position(|&byte| byte == 0)?;
        std::str::from_utf8(&name[..length]).ok()
    }

    /// Looks up a section by name. `SHT_NOBITS` sections and sections whose
    /// extent lies outside the image yield no data.
    pub fn section(&self, name: &str) -> Option<ElfSection<'_>> {
        let data = self.image.bytes();
        for record in &self.sections {
            let Some(section_name) = self.section_name(record) else {
                continue;
            };
            if section_name != name {
                continue;
            }

            let bytes = if record.kind == SHT_NOBITS {
                &[][..]
            } else {
                data.get(record.file_offset as usize..(record.file_offset + record.size) as usize)?
            };

            return Some(ElfSection {
                name: section_name,
                load_address: record.load_address,
                file_offset: record.file_offset,
                size: record.size,
                flags: SectionFlags::from_bits_truncate(record.flags),
                data: bytes,
            });
        }

        None
    }

    /// The first executable PT_LOAD segment.
    pub fn text_segment(&self) -> Option<&ElfSegment> {
        self.segments.iter().find(|segment| segment.executable)
    }

    /// The first writable PT_LOAD segment.
    pub fn data_segment(&self) -> Option<&ElfSegment> {
        self.segments.iter().find(|segment| segment.writable)
    }
}
