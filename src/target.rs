//! The abstractions through which the engine touches the target program.
//!
//! The engine itself never talks to a live process; callers implement these
//! traits over whatever they debug (a process, a core file, a remote stub).

#[cfg(test)]
mod tests;

use crate::cfi::CfaContext;
use crate::error::Result;
use crate::types::{TargetAddr, ValueType, Variant};

/// Chunk size for the paged string read: never cross more than one page
/// boundary per target read, so a string that ends just before an unmapped
/// page still comes back whole.
const MEMORY_PAGE_SIZE: u64 = 4096;

/// Raw target memory access.
pub trait MemoryReader {
    /// Reads up to `buffer.len()` bytes at `address`; returns how many
    /// bytes were actually read.
    fn read_memory(&self, address: TargetAddr, buffer: &mut [u8]) -> Result<usize>;

    /// Reads a NUL-terminated string of at most `max_length` bytes,
    /// page-chunked so a terminator just before an unmapped page is still
    /// found.
    fn read_memory_string(&self, address: TargetAddr, max_length: usize) -> Result<String> {
        let mut bytes: Vec<u8> = Vec::new();
        let mut address = address;
        let mut remaining = max_length;

        while remaining > 0 {
            let in_page = (MEMORY_PAGE_SIZE - address % MEMORY_PAGE_SIZE) as usize;
            let chunk_size = remaining.min(in_page);

            let mut chunk = vec![0u8; chunk_size];
            let read = self.read_memory(address, &mut chunk)?;
            if read == 0 {
                break;
            }

            if let Some(terminator) = chunk[..read].iter().position(|&byte| byte == 0) {
                bytes.extend_from_slice(&chunk[..terminator]);
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }

            bytes.extend_from_slice(&chunk[..read]);
            address += read as u64;
            remaining -= read;

            if read < chunk_size {
                break;
            }
        }

        Err(crate::error::Error::EntryNotFound)
    }
}

/// Register and memory access for expression evaluation and call-frame
/// unwinding.
///
/// An unwind works with two of these: the *input* view describing the frame
/// being unwound, and the *output* view receiving the caller's recovered
/// register values.
pub trait DwarfTargetInterface {
    /// Number of architecturally defined registers, which is also the
    /// width of a CFI rule set.
    fn count_registers(&self) -> u32;

    /// The width of a register's value, or `None` for registers whose
    /// caller value is not recoverable (the unwinder skips those).
    fn register_value_type(&self, index: u32) -> Option<ValueType>;

    fn register_value(&self, index: u32) -> Option<Variant>;

    fn set_register_value(&mut self, index: u32, value: &Variant) -> bool;

    /// Whether the ABI requires callees to preserve this register.
    fn is_callee_preserved_register(&self, index: u32) -> bool;

    /// Installs the architecture's default unwinding rules (typically
    /// `same_value` for callee-preserved registers) before the CIE's
    /// initial instructions run.
    fn init_register_rules(&self, context: &mut CfaContext<'_>) -> Result<()>;

    fn read_memory(&self, address: TargetAddr, buffer: &mut [u8]) -> Result<usize>;

    /// Reads one value of the given width from target memory.
    fn read_value_from_memory(&self, address: TargetAddr, value_type: ValueType)
        -> Option<Variant>;

    /// Like [`Self::read_value_from_memory`], with an explicit address
    /// space (`DW_OP_xderef`).
    fn read_value_from_indexed_memory(
        &self,
        address_space: TargetAddr,
        address: TargetAddr,
        value_type: ValueType,
    ) -> Option<Variant>;
}
