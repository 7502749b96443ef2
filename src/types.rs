//! Target-side primitive types.
//!
//! The engine describes a *target* program that is not necessarily the one it
//! runs in, so addresses and sizes get their own aliases instead of `usize`.

/// An address in the target program's address space.
pub type TargetAddr = u64;

/// A size in the target program's address space.
pub type TargetSize = u64;

/// The width of a single value read from a target register or target memory.
///
/// `DW_OP_deref_size` and the CFI location rules read values narrower than a
/// target address; the target interface is asked for exactly this width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    U8,
    U16,
    U32,
    U64,
}

impl ValueType {
    /// The value type matching a byte count, if there is one.
    pub fn for_size(size: u8) -> Option<ValueType> {
        match size {
            1 => Some(ValueType::U8),
            2 => Some(ValueType::U16),
            4 => Some(ValueType::U32),
            8 => Some(ValueType::U64),
            _ => None,
        }
    }

    pub fn byte_size(self) -> u8 {
        match self {
            ValueType::U8 => 1,
            ValueType::U16 => 2,
            ValueType::U32 => 4,
            ValueType::U64 => 8,
        }
    }
}

/// A loosely typed value, as produced by constant- and dynamic-value
/// evaluation and exchanged with the target interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    Unsigned(u64),
    Signed(i64),
    String(String),
}

impl Variant {
    pub fn to_u64(&self) -> u64 {
        match self {
            Variant::Unsigned(value) => *value,
            Variant::Signed(value) => *value as u64,
            Variant::String(_) => 0,
        }
    }

    pub fn is_number(&self) -> bool {
        !matches!(self, Variant::String(_))
    }
}

impl From<u64> for Variant {
    fn from(value: u64) -> Variant {
        Variant::Unsigned(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Variant {
        Variant::Signed(value)
    }
}
