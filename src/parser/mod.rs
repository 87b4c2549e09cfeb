//! Parsers: PHP declarations and the doc comments attached to them.

pub mod docblock;
pub mod php;
