use super::MemoryReader;
use crate::error::{Error, Result};
use crate::types::TargetAddr;

/// A target with exactly one mapped page starting at `base`; reads
/// touching anything else fail, like an unmapped page would.
struct OnePageTarget {
    base: u64,
    page: Vec<u8>,
}

impl MemoryReader for OnePageTarget {
    fn read_memory(&self, address: TargetAddr, buffer: &mut [u8]) -> Result<usize> {
        let end = self.base + self.page.len() as u64;
        if address < self.base || address + buffer.len() as u64 > end {
            return Err(Error::EntryNotFound);
        }
        let offset = (address - self.base) as usize;
        buffer.copy_from_slice(&self.page[offset..offset + buffer.len()]);
        Ok(buffer.len())
    }
}

#[test]
fn reads_a_string_within_one_page() {
    let mut page = vec![0u8; 4096];
    page[16..21].copy_from_slice(b"hello");
    let target = OnePageTarget { base: 0x1000, page };

    assert_eq!(target.read_memory_string(0x1010, 256).unwrap(), "hello");
}

#[test]
fn string_read_does_not_cross_into_an_unmapped_page() {
    // the string ends just before the page boundary; a naive 256-byte
    // read at its address would fault on the next page
    let mut page = vec![0u8; 4096];
    let start = 4096 - 4;
    page[start..start + 3].copy_from_slice(b"end");
    page[4095] = 0;
    let target = OnePageTarget { base: 0x1000, page };

    let address = 0x1000 + start as u64;
    assert_eq!(target.read_memory_string(address, 256).unwrap(), "end");
}

#[test]
fn unterminated_string_up_to_the_limit_is_not_found() {
    let page = vec![b'x'; 4096];
    let target = OnePageTarget { base: 0x1000, page };

    assert!(target.read_memory_string(0x1000, 64).is_err());
}
