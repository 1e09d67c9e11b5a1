//! Read-only positional queries over a finished [`ProcessResult`],
//! used by editor integrations for hover, completion, inlay hints and
//! symbol navigation.

use crate::fields::{ON_COMPLETIONS, TXN_TYPES};
use crate::lexer::{Token, TokenKind};
use crate::ops::{self, ArgSpec, ArgType};
use crate::parser::{LabelSymbol, ProcessResult};
use crate::span::LineRange;

/// One completion value for an argument: a catalog field, a named
/// constant, or a label symbol (which has no numeric value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgValue {
    pub value: Option<u64>,
    pub name: String,
    pub docs: String,
    pub signature: Option<String>,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedHint {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHint {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlayHints {
    pub named: Vec<NamedHint>,
    pub decoded: Vec<DecodedHint>,
}

/// The token at `column` and the argument index it occupies (the first
/// token on a line is the opcode, not an argument).
fn imm_at(line: &[Token], column: usize) -> Option<(&Token, usize)> {
    line.iter()
        .enumerate()
        .skip(1)
        .find(|(_, token)| column >= token.begin() && column <= token.end())
        .map(|(index, token)| (token, index - 1))
}

impl ProcessResult {
    /// Hover documentation at a cursor position: the opcode's full docs
    /// on the first token, or `"<name> = <value>\n<note>"` for a
    /// field-enum argument.
    pub fn doc_at(&self, line: usize, column: usize) -> Option<String> {
        let tokens = self.lines.get(line)?;
        let (index, token) = tokens
            .iter()
            .enumerate()
            .find(|(_, t)| column >= t.begin() && column <= t.end())?;

        if index == 0 {
            let spec = ops::ops().get(&token.text)?;
            return Some(spec.full_doc.clone());
        }

        let spec = ops::ops().get(&tokens[0].text)?;
        let (arg_token, mut arg_index) = imm_at(tokens, column)?;
        if !spec.args.is_empty()
            && arg_index >= spec.args.len()
            && spec.args[spec.args.len() - 1].array
        {
            arg_index = spec.args.len() - 1;
        }
        let arg = spec.args.get(arg_index)?;
        let field = ops::field_info(arg.ty, &arg_token.text)?;
        Some(format!("{} = {}\n{}", field.name, field.value, field.note))
    }

    /// The argument descriptor under the cursor. A trailing array
    /// argument absorbs every later position.
    pub fn arg_at(&self, line: usize, column: usize) -> Option<(ArgSpec, usize)> {
        let tokens = self.lines.get(line)?;
        let first = tokens.first()?;

        // Defaults past the last token, which completes the next
        // expected argument when the cursor sits at end of line.
        let mut index = tokens.len() - 1;
        if let Some((_, at)) = imm_at(tokens, column) {
            index = at;
        }

        let spec = ops::ops().get(&first.text)?;
        if !spec.args.is_empty() && index >= spec.args.len() && spec.args[spec.args.len() - 1].array
        {
            index = spec.args.len() - 1;
        }
        let arg = spec.args.get(index)?;
        Some((*arg, index))
    }

    /// All catalog values admissible for an argument, gated by the
    /// result's active version. Labels complete to the defined symbols
    /// and constant integers to the named-constant universe.
    pub fn arg_values(&self, arg: ArgSpec) -> Vec<ArgValue> {
        match arg.ty {
            ArgType::Label => self
                .symbols
                .iter()
                .map(|symbol| ArgValue {
                    value: None,
                    name: symbol.name.clone(),
                    docs: symbol.docs.clone(),
                    signature: symbol.signature.clone(),
                    version: 0,
                })
                .collect(),
            ArgType::ConstInt => TXN_TYPES
                .iter()
                .filter(|(_, value)| *value != 0)
                .chain(ON_COMPLETIONS)
                .map(|&(name, value)| ArgValue {
                    value: Some(value),
                    name: name.to_string(),
                    docs: String::new(),
                    signature: None,
                    version: 0,
                })
                .collect(),
            ty => ops::field_values(ty)
                .into_iter()
                .filter(|(_, version)| self.version >= *version)
                .map(|(spec, version)| ArgValue {
                    value: Some(spec.value),
                    name: spec.name.to_string(),
                    docs: spec.note.to_string(),
                    signature: None,
                    version,
                })
                .collect(),
        }
    }

    pub fn arg_values_at(&self, line: usize, column: usize) -> Vec<ArgValue> {
        match self.arg_at(line, column) {
            Some((arg, _)) => self.arg_values(arg),
            None => Vec::new(),
        }
    }

    /// Inlay hints within a range: field names for numeric field-enum
    /// arguments, and decoded text for `0x…` values that spell printable
    /// ASCII.
    pub fn inlay_hints(&self, range: LineRange) -> InlayHints {
        let mut hints = InlayHints::default();

        let last = self.lines.len().saturating_sub(1);
        for line in range.start_line..=range.end_line.min(last) {
            let tokens = match self.lines.get(line) {
                Some(tokens) if !tokens.is_empty() => tokens,
                _ => continue,
            };
            let spec = ops::ops().get(&tokens[0].text);

            for (i, token) in tokens.iter().enumerate() {
                if !range.overlaps(token.position) {
                    continue;
                }

                if let Some(spec) = spec {
                    if i > 0 && i - 1 < spec.args.len() {
                        if let Ok(value) = token.text.parse::<u64>() {
                            if let Some(name) = ops::field_name(spec.args[i - 1].ty, value) {
                                hints.named.push(NamedHint {
                                    token: token.clone(),
                                    name: name.to_string(),
                                });
                            }
                        }
                    }
                }

                if token.kind == TokenKind::Value {
                    if let Some(decoded) = decode_printable_hex(&token.text) {
                        hints.decoded.push(DecodedHint {
                            token: token.clone(),
                            value: decoded,
                        });
                    }
                }
            }
        }

        hints
    }

    pub fn symbols_within(&self, range: LineRange) -> Vec<&LabelSymbol> {
        self.symbols
            .iter()
            .filter(|symbol| range.overlaps(symbol.position))
            .collect()
    }

    pub fn symbol_refs_within(&self, range: LineRange) -> Vec<&Token> {
        self.symbol_refs
            .iter()
            .filter(|token| range.overlaps(token.position))
            .collect()
    }

    /// The definitions named by the first symbol reference in a range.
    pub fn symbols_for_ref_within(&self, range: LineRange) -> Vec<&LabelSymbol> {
        match self.symbol_refs_within(range).first() {
            Some(reference) => self.symbols_by_name(&reference.text),
            None => Vec::new(),
        }
    }

    /// The symbol name under a position, whether it is a definition or
    /// a reference.
    pub fn symbol_or_ref_at(&self, range: LineRange) -> Option<&str> {
        if let Some(symbol) = self
            .symbols
            .iter()
            .find(|symbol| range.overlaps(symbol.position))
        {
            return Some(&symbol.name);
        }
        self.symbol_refs
            .iter()
            .find(|token| range.overlaps(token.position))
            .map(|token| token.text.as_str())
    }

    pub fn symbols_by_name(&self, name: &str) -> Vec<&LabelSymbol> {
        self.symbols
            .iter()
            .filter(|symbol| symbol.name == name)
            .collect()
    }

    pub fn symbol_refs_by_name(&self, name: &str) -> Vec<&Token> {
        self.symbol_refs
            .iter()
            .filter(|token| token.text == name)
            .collect()
    }
}

fn decode_printable_hex(text: &str) -> Option<String> {
    let digits = text.strip_prefix("0x")?;
    let bytes = hex::decode(digits).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    if decoded.is_empty() {
        return None;
    }
    let printable = decoded
        .chars()
        .all(|ch| ch.is_ascii() && (ch == ' ' || ch.is_ascii_graphic()));
    printable.then_some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::process;

    #[test]
    fn hover_on_the_opcode_returns_its_full_docs() {
        let result = process("int 1\n");
        let doc = result.doc_at(0, 1).unwrap();
        assert!(doc.contains("uint64 constant"));
        // Past the mnemonic there is a constant, not a field.
        assert!(result.doc_at(0, 4).is_none());
        assert!(result.doc_at(9, 0).is_none());
    }

    #[test]
    fn hover_on_a_field_argument_resolves_name_and_value() {
        let result = process("txn Sender\n");
        let doc = result.doc_at(0, 5).unwrap();
        assert_eq!(doc, "Sender = 0\n32 byte address");

        let result = process("txn 0\n");
        let doc = result.doc_at(0, 4).unwrap();
        assert!(doc.starts_with("Sender = 0"));
    }

    #[test]
    fn hover_past_a_trailing_array_repeats_the_last_argument() {
        let result = process("#pragma version 8\nswitch a b\na:\nb:\n");
        // Both targets sit on the single array argument.
        assert!(result.arg_at(1, 8).is_some());
        let (arg, index) = result.arg_at(1, 10).unwrap();
        assert_eq!(arg.ty, ArgType::Label);
        assert_eq!(index, 0);
    }

    #[test]
    fn arg_at_tracks_cursor_position() {
        let result = process("#pragma version 2\ngtxn 0 Sender\n");
        let (arg, index) = result.arg_at(1, 5).unwrap();
        assert_eq!(arg.ty, ArgType::Uint8);
        assert_eq!(index, 0);
        let (arg, index) = result.arg_at(1, 8).unwrap();
        assert_eq!(arg.ty, ArgType::TxnField);
        assert_eq!(index, 1);
        // Off every argument token, the position after the last token
        // wins: the optional index argument.
        let (arg, index) = result.arg_at(1, 2).unwrap();
        assert_eq!(arg.ty, ArgType::Uint8);
        assert_eq!(index, 2);
    }

    #[test]
    fn label_arguments_complete_to_defined_symbols() {
        let result = process("#pragma version 2\nmain:\nb main\n");
        let values = result.arg_values_at(2, 3);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].name, "main");
        assert_eq!(values[0].value, None);
    }

    #[test]
    fn const_int_arguments_complete_to_named_constants() {
        let result = process("int 1\n");
        let values = result.arg_values_at(0, 5);
        let names: Vec<_> = values.iter().map(|v| v.name.as_str()).collect();
        assert!(names.contains(&"pay"));
        assert!(names.contains(&"NoOp"));
        // The zero-valued "unknown" transaction type is not offered.
        assert!(!names.contains(&"unknown"));
    }

    #[test]
    fn field_completions_are_version_gated() {
        let v2 = process("#pragma version 2\nglobal GroupSize\n");
        let names: Vec<_> = v2
            .arg_values_at(1, 8)
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert!(names.contains(&"GroupSize".to_string()));
        assert!(!names.contains(&"CreatorAddress".to_string()));

        let v6 = process("#pragma version 6\nglobal GroupSize\n");
        let names: Vec<_> = v6
            .arg_values_at(1, 8)
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert!(names.contains(&"CreatorAddress".to_string()));
        assert!(names.contains(&"OpcodeBudget".to_string()));
    }

    #[test]
    fn itxn_field_completions_use_inner_versions() {
        let result = process("#pragma version 5\nitxn_begin\n");
        let arg = ops::ops().get("itxn_field").unwrap().args[0];
        let names: Vec<_> = result.arg_values(arg).into_iter().map(|v| v.name).collect();
        assert!(names.contains(&"Sender".to_string()));
        // VotePK becomes settable on inner transactions at version 6.
        assert!(!names.contains(&"VotePK".to_string()));
    }

    #[test]
    fn numeric_field_arguments_get_named_hints() {
        let result = process("txn 0\nint 5\n");
        let hints = result.inlay_hints(LineRange::new(0, 0, 1, 10));
        assert_eq!(hints.named.len(), 1);
        assert_eq!(hints.named[0].name, "Sender");
        assert_eq!(hints.named[0].token.text, "0");
    }

    #[test]
    fn printable_hex_values_get_decoded_hints() {
        let result = process("byte 0x68656c6c6f\nbyte 0x00ff\n");
        let hints = result.inlay_hints(LineRange::new(0, 0, 1, 20));
        assert_eq!(hints.decoded.len(), 1);
        assert_eq!(hints.decoded[0].value, "hello");
    }

    #[test]
    fn hints_outside_the_range_are_skipped() {
        let result = process("txn 0\ntxn 1\n");
        let hints = result.inlay_hints(LineRange::new(1, 0, 1, 10));
        assert_eq!(hints.named.len(), 1);
        assert_eq!(hints.named[0].name, "Fee");
    }

    #[test]
    fn symbol_queries_distinguish_defs_and_refs() {
        let result = process("#pragma version 2\nmain:\nb main\n");
        assert_eq!(result.symbols_within(LineRange::point(1, 2)).len(), 1);
        assert!(result.symbols_within(LineRange::point(2, 3)).is_empty());
        assert_eq!(result.symbol_refs_within(LineRange::point(2, 3)).len(), 1);
        assert_eq!(result.symbol_or_ref_at(LineRange::point(1, 2)), Some("main"));
        assert_eq!(result.symbol_or_ref_at(LineRange::point(2, 3)), Some("main"));
        assert_eq!(result.symbol_or_ref_at(LineRange::point(0, 0)), None);

        let defs = result.symbols_for_ref_within(LineRange::point(2, 3));
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].position.line, 1);
    }
}
