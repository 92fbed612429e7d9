//! Loader for binary definition containers (`.cdo`) of an embedded,
//! reference-counted scripting runtime.

/// Container parsing, value model, symbol table, and bootstrap driver.
pub mod defs;
