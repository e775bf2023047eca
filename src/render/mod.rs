//! Rendering of collection results: symbol cleanup and JSON output.

mod json;
mod symbols;

pub use json::{to_json, write_output, JsonFormat};
pub use symbols::{clean_special_symbols, SymbolCleaner};
