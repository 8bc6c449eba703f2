#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod reader;
pub mod scanner;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use reader::{ReadError, ReaderConfig, RuneReader};
pub use scanner::{LiteralKind, ScanCode, ScanConfig, ScanError, ScanErrorKind, Scanner};
