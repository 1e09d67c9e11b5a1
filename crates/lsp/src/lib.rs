//! Language server for TEAL programs: full-document sync, published and
//! pulled diagnostics, hover, completion, inlay hints, document symbols,
//! signature help and goto-definition, all backed by `teal-core`'s
//! `process` result.

mod convert;
mod server;
mod types;

pub use server::run_stdio_server;
