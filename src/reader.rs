//! Bounds-checked reading of raw debug-information bytes.
//!
//! Every DWARF section is parsed through a [`DataReader`]. The reader never
//! panics on truncated input; instead any under-read flips a sticky overflow
//! flag and returns a caller-supplied default, so a parse loop can run to a
//! natural stopping point and check [`DataReader::has_overflow`] once.

#[cfg(test)]
mod tests;

/// A cursor over a byte slice with DWARF's primitive encodings.
///
/// All integers are read little-endian, which is the byte order of every
/// image this engine accepts. The address size (4 or 8) decides how many
/// bytes [`DataReader::read_address`] consumes.
#[derive(Debug, Clone)]
pub struct DataReader<'data> {
    data: &'data [u8],
    position: usize,
    address_size: u8,
    overflow: bool,
}

impl<'data> DataReader<'data> {
    pub fn new(data: &'data [u8], address_size: u8) -> Self {
        DataReader {
            data,
            position: 0,
            address_size,
            overflow: false,
        }
    }

    /// A fresh reader over at most `max_length` bytes starting at the
    /// current position. The sub-reader has its own offset zero and its own
    /// overflow flag.
    pub fn restricted_reader(&self, max_length: u64) -> DataReader<'data> {
        let remaining = &self.data[self.position..];
        let length = (max_length as usize).min(remaining.len());
        DataReader::new(&remaining[..length], self.address_size)
    }

    /// Like [`DataReader::restricted_reader`], but starting at a position
    /// relative to the current one. Negative offsets look back at already
    /// consumed bytes (the line-table header parser re-reads its format
    /// descriptor lists this way).
    pub fn restricted_reader_at(&self, relative_offset: i64, max_length: u64) -> DataReader<'data> {
        let start = (self.position as i64 + relative_offset).clamp(0, self.data.len() as i64) as usize;
        let remaining = &self.data[start..];
        let length = (max_length as usize).min(remaining.len());
        DataReader::new(&remaining[..length], self.address_size)
    }

    pub fn has_data(&self) -> bool {
        self.position < self.data.len()
    }

    pub fn bytes_remaining(&self) -> u64 {
        (self.data.len() - self.position) as u64
    }

    /// Offset of the next byte to be read, from the start of the reader.
    pub fn offset(&self) -> u64 {
        self.position as u64
    }

    pub fn address_size(&self) -> u8 {
        self.address_size
    }

    pub fn set_address_size(&mut self, address_size: u8) {
        self.address_size = address_size;
    }

    pub fn has_overflow(&self) -> bool {
        self.overflow
    }

    /// The bytes that have not been consumed yet.
    pub fn remaining_data(&self) -> &'data [u8] {
        &self.data[self.position..]
    }

    /// Clamping absolute seek; never sets the overflow flag.
    pub fn seek_absolute(&mut self, offset: u64) {
        self.position = (offset as usize).min(self.data.len());
    }

    /// Skips `count` bytes. Skipping past the end consumes what is left and
    /// flips the overflow flag.
    pub fn skip(&mut self, count: u64) -> bool {
        if count > self.bytes_remaining() {
            self.position = self.data.len();
            self.overflow = true;
            return false;
        }
        self.position += count as usize;
        true
    }

    fn read_bytes(&mut self, count: usize) -> Option<&'data [u8]> {
        if self.data.len() - self.position < count {
            self.position = self.data.len();
            self.overflow = true;
            return None;
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Some(bytes)
    }

    pub fn read_u8(&mut self, default: u8) -> u8 {
        match self.read_bytes(1) {
            Some(bytes) => bytes[0],
            None => default,
        }
    }

    pub fn read_i8(&mut self, default: i8) -> i8 {
        self.read_u8(default as u8) as i8
    }

    pub fn read_u16(&mut self, default: u16) -> u16 {
        match self.read_bytes(2) {
            Some(bytes) => u16::from_le_bytes(bytes.try_into().unwrap()),
            None => default,
        }
    }

    pub fn read_i16(&mut self, default: i16) -> i16 {
        self.read_u16(default as u16) as i16
    }

    pub fn read_u32(&mut self, default: u32) -> u32 {
        match self.read_bytes(4) {
            Some(bytes) => u32::from_le_bytes(bytes.try_into().unwrap()),
            None => default,
        }
    }

    pub fn read_i32(&mut self, default: i32) -> i32 {
        self.read_u32(default as u32) as i32
    }

    pub fn read_u64(&mut self, default: u64) -> u64 {
        match self.read_bytes(8) {
            Some(bytes) => u64::from_le_bytes(bytes.try_into().unwrap()),
            None => default,
        }
    }

    pub fn read_i64(&mut self, default: i64) -> i64 {
        self.read_u64(default as u64) as i64
    }

    /// A target-address-sized word: 4 or 8 bytes depending on the reader's
    /// address size.
    pub fn read_address(&mut self, default: u64) -> u64 {
        if self.address_size == 4 {
            self.read_u32(default as u32) as u64
        } else {
            self.read_u64(default)
        }
    }

    /// A 4- or 8-byte section offset, as selected by the unit's 32/64-bit
    /// DWARF format.
    pub fn read_offset(&mut self, dwarf64: bool, default: u64) -> u64 {
        if dwarf64 {
            self.read_u64(default)
        } else {
            self.read_u32(default as u32) as u64
        }
    }

    pub fn read_unsigned_leb128(&mut self, default: u64) -> u64 {
        let mut result: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = self.read_u8(0);
            if shift < 64 {
                result |= u64::from(byte & 0x7f) << shift;
            }
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }

        if self.overflow {
            default
        } else {
            result
        }
    }

    pub fn read_signed_leb128(&mut self, default: i64) -> i64 {
        let mut result: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = self.read_u8(0);
            if shift < 64 {
                result |= u64::from(byte & 0x7f) << shift;
            }
            shift += 7;

            if byte & 0x80 == 0 {
                // sign extend
                if byte & 0x40 != 0 && shift < 64 {
                    result |= u64::MAX << shift;
                }
                break;
            }
        }

        if self.overflow {
            default
        } else {
            result as i64
        }
    }

    /// A NUL-terminated string. A missing terminator or invalid UTF-8 flips
    /// the overflow flag and yields the empty string.
    pub fn read_string(&mut self, default: &'data str) -> &'data str {
        let remaining = &self.data[self.position..];
        let Some(length) = remaining.iter().position(|&byte| byte == 0) else {
            self.position = self.data.len();
            self.overflow = true;
            return default;
        };

        self.position += length + 1;
        match std::str::from_utf8(&remaining[..length]) {
            Ok(string) => string,
            Err(_) => {
                self.overflow = true;
                default
            }
        }
    }

    /// The DWARF "initial length": a 4-byte length, unless it is the
    /// `0xffffffff` escape, in which case the real length follows as 8
    /// bytes and the record uses 64-bit offsets.
    pub fn read_initial_length(&mut self) -> (u64, bool) {
        let length = self.read_u32(0);
        if length == 0xffff_ffff {
            (self.read_u64(0), true)
        } else {
            (length as u64, false)
        }
    }
}
