//! A DWARF v2-v5 debugging-information engine.
//!
//! Given an ELF image (optionally paired with a separate debug-info
//! companion found through `.gnu_debuglink`), this crate parses the DWARF
//! sections into a queryable model and answers the three questions a
//! source-level debugger keeps asking:
//!
//! - which compilation unit, function, source file and line does a code
//!   address belong to ([`DwarfFile::load_functions`],
//!   [`DwarfFile::resolve_statement`]);
//! - given a frame's PC and registers, what are the caller's frame and
//!   registers ([`DwarfFile::unwind_call_frame`]);
//! - where does a variable live at a given PC, and what is its value
//!   ([`DwarfFile::resolve_location`], [`DwarfFile::evaluate_expression`]
//!   and friends).
//!
//! See https://dwarfstd.org/doc/DWARF5.pdf for the format; the `.eh_frame`
//! variant additionally follows the LSB/Itanium C++ ABI conventions.
//!
//! The model is built in three phases (`start_loading`, `load`,
//! `finish_loading`) on one thread; once finished it is immutable and all
//! queries are safe to run concurrently. The engine never touches a live
//! target itself: reads of registers and memory go through the traits in
//! [`target`].

pub mod abbrev;
pub mod attributes;
pub mod cfi;
pub mod consts;
pub mod elf;
pub mod entries;
pub mod error;
pub mod expr;
pub mod file;
pub mod line;
pub mod location;
pub mod ranges;
pub mod reader;
pub mod statement;
pub mod target;
pub mod types;
pub mod unit;

#[cfg(test)]
mod test_image;

pub use error::{Error, Result};
pub use file::DwarfFile;
pub use statement::{FunctionInfo, SourceLocation, Statement};
pub use types::{TargetAddr, TargetSize, ValueType, Variant};
