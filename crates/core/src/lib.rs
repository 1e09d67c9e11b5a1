//! Language front end for TEAL, the Algorand Virtual Machine assembly
//! language: lexer, opcode catalog, parser, linter and the positional
//! queries editor integrations are built on.
//!
//! The single entry point is [`process`]; everything it returns is
//! immutable and safe to share.

pub mod ast;
pub mod diag;
mod docs;
pub mod fields;
pub mod lexer;
pub mod lint;
pub mod ops;
pub mod parser;
pub mod query;
pub mod span;

pub use ast::{Listing, Op};
pub use diag::{Diagnostic, DiagnosticKind, Severity};
pub use lexer::{Token, TokenKind};
pub use lint::{RedundantLine, Redundancy};
pub use ops::{ArgSpec, ArgType, Mode, OpSpec, ops};
pub use parser::{LabelSymbol, ProcessResult, RequiredVersion, process};
pub use query::{ArgValue, DecodedHint, InlayHints, NamedHint};
pub use span::{LineRange, Position};
