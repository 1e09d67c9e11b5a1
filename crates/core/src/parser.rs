use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use data_encoding::BASE32_NOPAD;
use rustc_hash::FxHashMap;
use sha2::{Digest as _, Sha512_256};

use crate::ast::{Listing, Op};
use crate::diag::{Diagnostic, DiagnosticKind};
use crate::fields::{
    self, AcctParamsField, AppParamsField, AssetHoldingField, AssetParamsField, Base64Encoding,
    BlockField, EcGroup, EcdsaCurve, GlobalField, JsonRef, TxnField, TxnFieldContext, VrfStandard,
};
use crate::lexer::{self, Token, TokenKind};
use crate::lint::{Linter, RedundantLine};
use crate::ops::{self, LineAbort, Mode, OpContext, ParseResult};
use crate::span::Position;

/// A defined label: where it is, the comments that preceded it, and the
/// signature derived from a following `proto` instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSymbol {
    pub name: String,
    pub position: Position,
    pub docs: String,
    pub signature: Option<String>,
}

/// An instruction demanding a higher language version than is active;
/// spans the whole line so editors can offer a version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredVersion {
    pub line: usize,
    pub begin: usize,
    pub end: usize,
    pub version: u64,
}

/// Everything `process` learns about one source text. Immutable once
/// built; the editor integration replaces it wholesale on every edit.
#[derive(Debug)]
pub struct ProcessResult {
    pub mode: Mode,
    pub version: u64,
    pub version_token: Option<Token>,
    pub versions: Vec<RequiredVersion>,

    pub diagnostics: Vec<Diagnostic>,

    pub missing_refs: Vec<Token>,
    pub symbols: Vec<LabelSymbol>,
    pub symbol_refs: Vec<Token>,

    pub tokens: Vec<Token>,
    pub listing: Listing,
    pub lines: Vec<Vec<Token>>,

    pub ops_tokens: Vec<Token>,

    pub numbers: Vec<Token>,
    pub strings: Vec<Token>,
    pub keywords: Vec<Token>,
    pub macros: Vec<Token>,

    pub redundants: Vec<RedundantLine>,

    pub ref_counts: FxHashMap<String, usize>,
}

/// Cursor over one line's tokens. `scan` consumes the next token;
/// `curr` is the token most recently consumed.
struct Arguments<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> Arguments<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, index: 0 }
    }

    fn scan(&mut self) -> bool {
        if self.index < self.tokens.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn curr(&self) -> &'a Token {
        &self.tokens[self.index.saturating_sub(1).min(self.tokens.len().saturating_sub(1))]
    }

    fn text(&self) -> &'a str {
        &self.curr().text
    }

    fn has_remaining(&self) -> bool {
        self.index < self.tokens.len()
    }
}

struct LineParser<'a> {
    mode: Mode,
    version: u64,
    seen_instruction: bool,

    listing: Listing,
    args: Arguments<'a>,
    diagnostics: Vec<Diagnostic>,

    numbers: Vec<Token>,
    strings: Vec<Token>,
    keywords: Vec<Token>,
    macros: Vec<Token>,
    refs: Vec<Token>,
    ops_tokens: Vec<Token>,

    symbols: Vec<LabelSymbol>,
    versions: Vec<RequiredVersion>,
    version_token: Option<Token>,

    protos: FxHashMap<String, (u8, u8)>,
    ref_counts: FxHashMap<String, usize>,

    last_label: Option<String>,
    comments: Vec<String>,
}

impl<'a> LineParser<'a> {
    fn new() -> Self {
        Self {
            mode: Mode::App,
            version: 1,
            seen_instruction: false,
            listing: Vec::new(),
            args: Arguments::new(&[]),
            diagnostics: Vec::new(),
            numbers: Vec::new(),
            strings: Vec::new(),
            keywords: Vec::new(),
            macros: Vec::new(),
            refs: Vec::new(),
            ops_tokens: Vec::new(),
            symbols: Vec::new(),
            versions: Vec::new(),
            version_token: None,
            protos: FxHashMap::default(),
            ref_counts: FxHashMap::default(),
            last_label: None,
            comments: Vec::new(),
        }
    }

    fn fail_at<T>(
        &mut self,
        position: Position,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> ParseResult<T> {
        self.diagnostics
            .push(Diagnostic::error(position, kind, message));
        Err(LineAbort)
    }

    fn fail_curr<T>(&mut self, kind: DiagnosticKind, message: impl Into<String>) -> ParseResult<T> {
        let position = self.args.curr().position;
        self.fail_at(position, kind, message)
    }

    fn fail_parse<T>(&mut self, message: impl Into<String>) -> ParseResult<T> {
        self.fail_curr(DiagnosticKind::ParseError, message)
    }

    fn must_read_arg(&mut self, name: &'static str) -> ParseResult<()> {
        if !self.args.scan() {
            return self.fail_parse(format!("missing arg: {name}"));
        }
        Ok(())
    }

    fn must_read(&mut self, name: &'static str) -> ParseResult<&'a str> {
        self.must_read_arg(name)?;
        Ok(self.args.text())
    }

    fn parse_uint64_curr(&mut self, name: &'static str) -> ParseResult<u64> {
        let Ok(value) = fields::parse_uint64(self.args.text()) else {
            return self.fail_parse(format!("failed to parse uint64: {name}"));
        };
        self.numbers.push(self.args.curr().clone());
        Ok(value)
    }

    fn parse_uint8_curr(&mut self, name: &'static str) -> ParseResult<u8> {
        let Ok(value) = fields::parse_uint8(self.args.text()) else {
            return self.fail_parse(format!("failed to parse uint8: {name}"));
        };
        self.numbers.push(self.args.curr().clone());
        Ok(value)
    }

    fn classify_field(&mut self, is_const: bool) {
        let token = self.args.curr().clone();
        if is_const {
            self.strings.push(token);
        } else {
            self.numbers.push(token);
        }
    }

    fn read_field_curr<F, R>(&mut self, read: R) -> ParseResult<F>
    where
        R: FnOnce(u64, &str) -> Result<(F, bool), fields::FieldError>,
    {
        match read(self.version, self.args.text()) {
            Ok((field, is_const)) => {
                self.classify_field(is_const);
                Ok(field)
            }
            Err(err) => self.fail_parse(err.to_string()),
        }
    }

    fn parse_bytes(&mut self, _name: &'static str) -> ParseResult<Vec<u8>> {
        let token = self.args.curr().clone();
        let arg = token.text.clone();

        if arg.starts_with("base32(") || arg.starts_with("b32(") {
            return self.parse_delimited_bytes(&arg, token, decode_base32);
        }
        if arg.starts_with("base64(") || arg.starts_with("b64(") {
            return self.parse_delimited_bytes(&arg, token, decode_base64);
        }

        if let Some(digits) = arg.strip_prefix("0x") {
            let Ok(value) = hex::decode(digits) else {
                return self.fail_parse("failed to decode hex bytes");
            };
            self.strings.push(token);
            return Ok(value);
        }

        if arg == "base32" || arg == "b32" {
            self.keywords.push(token);
            let literal = self.must_read("literal")?.to_string();
            let Ok(value) = decode_base32(&literal) else {
                return self.fail_parse("failed to decode base32 bytes");
            };
            self.strings.push(self.args.curr().clone());
            return Ok(value);
        }
        if arg == "base64" || arg == "b64" {
            self.keywords.push(token);
            let literal = self.must_read("literal")?.to_string();
            let Ok(value) = decode_base64(&literal) else {
                return self.fail_parse("failed to decode base64 bytes");
            };
            self.strings.push(self.args.curr().clone());
            return Ok(value);
        }

        if token.kind == TokenKind::Str {
            return match unescape_string(&arg) {
                Ok(value) => {
                    self.strings.push(token);
                    Ok(value)
                }
                Err(message) => self.fail_parse(message),
            };
        }

        self.fail_parse(format!("byte arg did not parse: {arg}"))
    }

    fn parse_delimited_bytes(
        &mut self,
        arg: &str,
        token: Token,
        decode: fn(&str) -> Result<Vec<u8>, ()>,
    ) -> ParseResult<Vec<u8>> {
        let Some(open) = arg.find('(') else {
            return self.fail_parse("byte arg lacks open paren");
        };
        let Some(close) = arg.find(')') else {
            return self.fail_parse(format!("byte {} arg lacks close paren", &arg[..open]));
        };
        let Ok(value) = decode(&arg[open + 1..close]) else {
            return self.fail_parse(format!("failed to decode {} bytes", &arg[..open]));
        };
        self.strings.push(token);
        Ok(value)
    }
}

impl OpContext for LineParser<'_> {
    fn emit(&mut self, op: Op) {
        for target in op.label_refs() {
            *self.ref_counts.entry(target.clone()).or_default() += 1;
        }

        match &op {
            Op::Label { name } => {
                self.last_label = Some(name.clone());
            }
            Op::Empty | Op::Pragma { .. } => {}
            Op::Proto { args, results } => {
                if let Some(label) = self.last_label.take() {
                    self.protos.insert(label, (*args, *results));
                }
                self.seen_instruction = true;
            }
            _ => {
                self.last_label = None;
                self.seen_instruction = true;
            }
        }

        self.listing.push(op);
    }

    fn min_version(&mut self, _version: u64) {}

    fn mode_min_version(&mut self, _mode: Mode, _version: u64) {}

    fn must_read_pragma(&mut self, _name: &'static str) -> ParseResult<u64> {
        self.macros.push(self.args.curr().clone());

        let name = self.must_read("name")?;
        match name {
            "version" => {
                self.macros.push(self.args.curr().clone());
                self.must_read_arg("version value")?;
                let version = self.parse_uint64_curr("version value")?;
                if version < 1 {
                    return self.fail_parse("version must be at least 1");
                }
                // A pragma that appears after an instruction is diagnosed
                // by the linter and does not change the active version.
                if !self.seen_instruction {
                    self.version = version;
                    self.version_token = Some(self.args.curr().clone());
                }
                Ok(version)
            }
            other => {
                let message = format!("unexpected #pragma: {other}");
                self.fail_parse(message)
            }
        }
    }

    fn must_read_addr(&mut self, name: &'static str) -> ParseResult<String> {
        let value = self.must_read(name)?.to_string();
        if let Err(message) = decode_address(&value) {
            return self.fail_parse(message);
        }
        self.strings.push(self.args.curr().clone());
        Ok(value)
    }

    fn must_read_signature(&mut self, name: &'static str) -> ParseResult<String> {
        let value = self.must_read(name)?.to_string();
        if value.len() < 2 || !value.starts_with('"') || !value.ends_with('"') {
            return self.fail_parse("missing quotes");
        }
        self.strings.push(self.args.curr().clone());
        Ok(value)
    }

    fn must_read_label(&mut self, name: &'static str) -> ParseResult<String> {
        let value = self.must_read(name)?.to_string();
        self.refs.push(self.args.curr().clone());
        Ok(value)
    }

    fn must_read_bytes(&mut self, name: &'static str) -> ParseResult<Vec<u8>> {
        self.must_read_arg(name)?;
        self.parse_bytes(name)
    }

    fn must_read_uint64(&mut self, name: &'static str) -> ParseResult<u64> {
        self.must_read_arg(name)?;
        self.parse_uint64_curr(name)
    }

    fn must_read_const_int(&mut self, name: &'static str) -> ParseResult<u64> {
        self.must_read_arg(name)?;
        if let Some(value) = fields::named_constant(self.args.text()) {
            self.numbers.push(self.args.curr().clone());
            return Ok(value);
        }
        self.parse_uint64_curr(name)
    }

    fn must_read_uint8(&mut self, name: &'static str) -> ParseResult<u8> {
        self.must_read_arg(name)?;
        self.parse_uint8_curr(name)
    }

    fn maybe_read_uint8(&mut self, name: &'static str) -> ParseResult<Option<u8>> {
        if !self.args.scan() {
            return Ok(None);
        }
        Ok(Some(self.parse_uint8_curr(name)?))
    }

    fn must_read_int8(&mut self, name: &'static str) -> ParseResult<i8> {
        self.must_read_arg(name)?;
        let Ok(value) = fields::parse_int8(self.args.text()) else {
            return self.fail_parse(format!("failed to parse int8: {name}"));
        };
        self.numbers.push(self.args.curr().clone());
        Ok(value)
    }

    fn must_read_txn_field(&mut self, name: &'static str) -> ParseResult<TxnField> {
        self.must_read_arg(name)?;
        self.read_field_curr(|version, text| {
            fields::read_txn_field(TxnFieldContext::Txn, version, text)
        })
    }

    fn must_read_txna_field(&mut self, name: &'static str) -> ParseResult<TxnField> {
        self.must_read_arg(name)?;
        self.read_field_curr(|version, text| {
            fields::read_txn_field(TxnFieldContext::Txna, version, text)
        })
    }

    fn must_read_itxn_field(&mut self, name: &'static str) -> ParseResult<TxnField> {
        self.must_read_arg(name)?;
        self.read_field_curr(|version, text| {
            fields::read_txn_field(TxnFieldContext::Itxn, version, text)
        })
    }

    fn must_read_global_field(&mut self, name: &'static str) -> ParseResult<GlobalField> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<GlobalField>)
    }

    fn must_read_asset_holding_field(
        &mut self,
        name: &'static str,
    ) -> ParseResult<AssetHoldingField> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<AssetHoldingField>)
    }

    fn must_read_asset_params_field(
        &mut self,
        name: &'static str,
    ) -> ParseResult<AssetParamsField> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<AssetParamsField>)
    }

    fn must_read_app_params_field(&mut self, name: &'static str) -> ParseResult<AppParamsField> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<AppParamsField>)
    }

    fn must_read_acct_params_field(&mut self, name: &'static str) -> ParseResult<AcctParamsField> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<AcctParamsField>)
    }

    fn must_read_json_ref(&mut self, name: &'static str) -> ParseResult<JsonRef> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<JsonRef>)
    }

    fn must_read_ecdsa_curve(&mut self, name: &'static str) -> ParseResult<EcdsaCurve> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<EcdsaCurve>)
    }

    fn must_read_vrf_standard(&mut self, name: &'static str) -> ParseResult<VrfStandard> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<VrfStandard>)
    }

    fn must_read_base64_encoding(&mut self, name: &'static str) -> ParseResult<Base64Encoding> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<Base64Encoding>)
    }

    fn must_read_block_field(&mut self, name: &'static str) -> ParseResult<BlockField> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<BlockField>)
    }

    fn must_read_ec_group(&mut self, name: &'static str) -> ParseResult<EcGroup> {
        self.must_read_arg(name)?;
        self.read_field_curr(fields::read_field::<EcGroup>)
    }

    fn read_uint64_array(&mut self, name: &'static str) -> ParseResult<Vec<u64>> {
        let mut values = Vec::new();
        while self.args.scan() {
            values.push(self.parse_uint64_curr(name)?);
        }
        Ok(values)
    }

    fn read_bytes_array(&mut self, name: &'static str) -> ParseResult<Vec<Vec<u8>>> {
        let mut values = Vec::new();
        while self.args.scan() {
            values.push(self.parse_bytes(name)?);
        }
        Ok(values)
    }

    fn read_labels_array(&mut self, name: &'static str) -> ParseResult<Vec<String>> {
        let mut values = Vec::new();
        while self.args.scan() {
            values.push(self.args.text().to_string());
            self.refs.push(self.args.curr().clone());
        }
        let _ = name;
        Ok(values)
    }
}

impl LineParser<'_> {
    fn parse_line(&mut self) -> ParseResult<()> {
        if !self.args.scan() {
            self.emit(Op::Empty);
            return Ok(());
        }

        let first = self.args.curr().clone();

        if first.kind == TokenKind::Comment {
            let body = comment_body(&first.text);
            if body == "#pragma mode logicsig" {
                self.mode = Mode::Sig;
            } else {
                self.comments.push(body.to_string());
            }
            self.emit(Op::Empty);
            return Ok(());
        }

        if let Some(name) = first.text.strip_suffix(':') {
            if name.is_empty() {
                return self.fail_parse("missing label name");
            }
            self.symbols.push(LabelSymbol {
                name: name.to_string(),
                position: first.position,
                docs: self.comments.join("\n"),
                signature: None,
            });
            self.emit(Op::Label {
                name: name.to_string(),
            });
            self.comments.clear();
            return Ok(());
        }

        if first.text == "#pragma" {
            return ops::op_pragma(self);
        }

        let Some(spec) = ops::ops().get(&first.text) else {
            let message = format!("unknown opcode: {}", first.text);
            return self.fail_curr(DiagnosticKind::UnknownOpcode, message);
        };

        self.ops_tokens.push(first.clone());

        let min = spec.min_version(self.mode);
        if min == 0 {
            self.diagnostics.push(Diagnostic::error(
                first.position,
                DiagnosticKind::OpcodeNotAvailableInMode,
                format!("opcode not available in the current mode: {}", self.mode),
            ));
        }
        if min > self.version {
            self.diagnostics.push(Diagnostic::error(
                first.position,
                DiagnosticKind::VersionTooOld,
                format!(
                    "opcode requires version >= {min} (current: {})",
                    self.version
                ),
            ));
            let tokens = self.args.tokens;
            self.versions.push(RequiredVersion {
                line: first.position.line,
                begin: tokens.first().map(|t| t.begin()).unwrap_or(0),
                end: tokens.last().map(|t| t.end()).unwrap_or(0),
                version: min,
            });
        }

        (spec.parse)(self)?;

        // Trailing tokens are only an error when the opcode itself parsed
        // cleanly; a failed parse has already aborted the line.
        if self.args.has_remaining() && self.args.scan() {
            return self.fail_parse("too many values");
        }

        Ok(())
    }
}

fn comment_body(text: &str) -> &str {
    text.strip_prefix("//").unwrap_or(text).trim()
}

fn unescape_string(text: &str) -> Result<Vec<u8>, String> {
    let content = &text[1..text.len() - 1];
    let mut out = Vec::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => out.push(b'\n'),
            Some('r') => out.push(b'\r'),
            Some('t') => out.push(b'\t'),
            Some('\\') => out.push(b'\\'),
            Some('"') => out.push(b'"'),
            Some('x') => {
                let hi = chars.next();
                let lo = chars.next();
                let (Some(hi), Some(lo)) = (hi, lo) else {
                    return Err("truncated hex escape in string".to_string());
                };
                let (Some(hi), Some(lo)) = (hi.to_digit(16), lo.to_digit(16)) else {
                    return Err("invalid hex escape in string".to_string());
                };
                out.push((hi * 16 + lo) as u8);
            }
            Some(other) => return Err(format!("invalid escape sequence: \\{other}")),
            None => return Err("truncated escape at end of string".to_string()),
        }
    }
    Ok(out)
}

fn decode_base32(text: &str) -> Result<Vec<u8>, ()> {
    let trimmed = text.trim_end_matches('=');
    BASE32_NOPAD.decode(trimmed.as_bytes()).map_err(|_| ())
}

fn decode_base64(text: &str) -> Result<Vec<u8>, ()> {
    BASE64.decode(text.as_bytes()).map_err(|_| ())
}

/// Validates an Algorand address: 58 base32 characters decoding to a
/// 32 byte public key followed by the last 4 bytes of its SHA-512/256
/// digest.
fn decode_address(text: &str) -> Result<(), &'static str> {
    if text.len() != 58 {
        return Err("invalid address length");
    }
    let Ok(data) = BASE32_NOPAD.decode(text.as_bytes()) else {
        return Err("failed to decode address");
    };
    if data.len() != 36 {
        return Err("invalid address length");
    }
    let (public_key, checksum) = data.split_at(32);
    let digest = Sha512_256::digest(public_key);
    if digest[28..] != *checksum {
        return Err("address checksum mismatch");
    }
    Ok(())
}

fn line_position(lines: &[Vec<Token>], line: usize) -> Position {
    let tokens = lines.get(line).map(Vec::as_slice).unwrap_or(&[]);
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => Position::new(line, first.begin(), last.end()),
        _ => Position::new(line, 0, 0),
    }
}

/// Runs the whole front end over one source text: lex, parse line by
/// line, resolve labels, lint, and collect every side channel the
/// editor integration needs.
pub fn process(source: &str) -> ProcessResult {
    let (tokens, lex_diagnostics) = lexer::lex(source);

    let mut lines: Vec<&[Token]> = Vec::new();
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        let eol = token.kind == TokenKind::Eol;
        if eol || i + 1 == tokens.len() {
            let end = if eol { i } else { i + 1 };
            lines.push(&tokens[start..end]);
            start = i + 1;
        }
    }

    // Trailing comments play no part in parsing; a leading comment is
    // handled by the line parser itself.
    for line in &mut lines {
        let current = *line;
        if let Some(pos) = current
            .iter()
            .skip(1)
            .position(|t| t.kind == TokenKind::Comment)
        {
            *line = &current[..pos + 1];
        }
    }

    let mut parser = LineParser::new();
    parser.diagnostics = lex_diagnostics;

    for line in &lines {
        parser.args = Arguments::new(*line);
        let emitted = parser.listing.len();
        if parser.parse_line().is_err() {
            // An abort after the op was already emitted (trailing tokens)
            // must not break the line/listing bijection.
            parser.listing.truncate(emitted);
            parser.emit(Op::Empty);
        }
        debug_assert_eq!(parser.listing.len(), emitted + 1);
    }

    let owned_lines: Vec<Vec<Token>> = lines.iter().map(|line| line.to_vec()).collect();
    drop(lines);

    let LineParser {
        mode,
        version,
        listing,
        mut diagnostics,
        numbers,
        strings,
        keywords,
        macros,
        refs,
        ops_tokens,
        mut symbols,
        versions,
        version_token,
        protos,
        ref_counts,
        ..
    } = parser;

    let (findings, redundants) = Linter::new(&listing).lint();
    for finding in findings {
        diagnostics.push(Diagnostic {
            position: line_position(&owned_lines, finding.line),
            severity: finding.kind.severity(),
            kind: finding.kind.diagnostic_kind(),
            message: finding.kind.to_string(),
        });
    }

    let defined: rustc_hash::FxHashSet<&str> =
        symbols.iter().map(|sym| sym.name.as_str()).collect();
    let missing_refs = refs
        .iter()
        .filter(|token| !defined.contains(token.text.as_str()))
        .cloned()
        .collect();
    drop(defined);

    for symbol in &mut symbols {
        if let Some((args, results)) = protos.get(&symbol.name) {
            symbol.signature = Some(format!("in: {args}, out: {results}"));
        }
    }

    ProcessResult {
        mode,
        version,
        version_token,
        versions,
        diagnostics,
        missing_refs,
        symbols,
        symbol_refs: refs,
        tokens,
        listing,
        lines: owned_lines,
        ops_tokens,
        numbers,
        strings,
        keywords,
        macros,
        redundants,
        ref_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Severity;
    use crate::fields::GlobalField;
    use crate::lint::Redundancy;

    fn kinds(result: &ProcessResult) -> Vec<DiagnosticKind> {
        result.diagnostics.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn single_int_line() {
        let result = process("int 1\n");
        assert_eq!(result.listing, vec![Op::Int { value: 1 }]);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.version, 1);
        assert_eq!(result.mode, Mode::App);
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.numbers.len(), 1);
        assert_eq!(result.ops_tokens.len(), 1);
    }

    #[test]
    fn listing_stays_aligned_with_lines() {
        let result = process("int 1\n\nbogus_op 3\n// note\nint 2");
        assert_eq!(result.lines.len(), 5);
        assert_eq!(result.listing.len(), 5);
        assert_eq!(result.listing[1], Op::Empty);
        assert_eq!(result.listing[2], Op::Empty);
        assert_eq!(result.listing[3], Op::Empty);
        assert_eq!(result.listing[4], Op::Int { value: 2 });
        assert_eq!(kinds(&result), vec![DiagnosticKind::UnknownOpcode]);
        assert_eq!(result.diagnostics[0].position.line, 2);
    }

    #[test]
    fn forward_branch_resolves_cleanly() {
        let result = process("#pragma version 2\nbz done\nint 1\ndone:\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.symbols.len(), 1);
        assert_eq!(result.symbols[0].name, "done");
        assert_eq!(result.symbols[0].position.line, 3);
        assert_eq!(result.ref_counts.get("done"), Some(&1));
        assert_eq!(result.version, 2);
        assert_eq!(
            result.version_token.as_ref().map(|t| t.text.as_str()),
            Some("2")
        );
    }

    #[test]
    fn branch_over_dead_code_to_next_label() {
        let result = process("#pragma version 2\nb end\nint 1\nend:\n");
        let kinds = kinds(&result);
        assert!(kinds.contains(&DiagnosticKind::UnreachableCode));
        assert!(kinds.contains(&DiagnosticKind::RedundantBranch));
        let unreachable = result
            .diagnostics
            .iter()
            .find(|d| d.kind == DiagnosticKind::UnreachableCode)
            .unwrap();
        assert_eq!(unreachable.position.line, 2);
        assert_eq!(unreachable.severity, Severity::Warning);
        assert_eq!(result.redundants.len(), 1);
        assert_eq!(result.redundants[0].line, 1);
        assert_eq!(result.redundants[0].kind, Redundancy::RemoveBranch);
    }

    #[test]
    fn back_branch_with_no_escape_is_an_infinite_loop() {
        let result = process("#pragma version 2\nloop:\nb loop\n");
        let loops: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::InfiniteLoop)
            .collect();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].position.line, 2);
    }

    #[test]
    fn duplicate_labels_are_reported_per_definition() {
        let result = process("#pragma version 2\nl:\nl:\nb l\n");
        let dups: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::DuplicateLabel)
            .collect();
        assert_eq!(dups.len(), 2);
        assert_eq!(dups[0].position.line, 1);
        assert_eq!(dups[1].position.line, 2);
        assert!(!kinds(&result).contains(&DiagnosticKind::MissingLabel));
        assert_eq!(result.ref_counts.get("l"), Some(&1));
        assert!(result.missing_refs.is_empty());
    }

    #[test]
    fn late_pragma_does_not_upgrade_the_version() {
        let result = process("#pragma version 2\nint 1\n#pragma version 3\n");
        let kinds = kinds(&result);
        assert!(kinds.contains(&DiagnosticKind::PragmaAfterInstruction));
        let late = result
            .diagnostics
            .iter()
            .find(|d| d.kind == DiagnosticKind::PragmaAfterInstruction)
            .unwrap();
        assert_eq!(late.position.line, 2);
        assert_eq!(result.version, 2);
    }

    #[test]
    fn version_gate_records_required_version() {
        let result = process("b skip\nskip:\n");
        assert!(kinds(&result).contains(&DiagnosticKind::VersionTooOld));
        assert_eq!(result.versions.len(), 1);
        let required = result.versions[0];
        assert_eq!(required.line, 0);
        assert_eq!(required.version, 2);
        assert_eq!(result.version, 1);
    }

    #[test]
    fn logicsig_mode_switch_gates_application_opcodes() {
        let result = process("//#pragma mode logicsig\n#pragma version 5\nint 1\nlog\n");
        assert_eq!(result.mode, Mode::Sig);
        let modal: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::OpcodeNotAvailableInMode)
            .collect();
        assert_eq!(modal.len(), 1);
        assert_eq!(modal[0].position.line, 3);
        assert!(modal[0].message.contains("logicsig"));
    }

    #[test]
    fn application_mode_rejects_logicsig_only_opcodes() {
        let result = process("arg 0\n");
        assert!(kinds(&result).contains(&DiagnosticKind::OpcodeNotAvailableInMode));
        // The line still parses; the listing keeps the typed op.
        assert_eq!(result.listing, vec![Op::Arg { index: 0 }]);
    }

    #[test]
    fn unknown_opcode_reports_and_recovers() {
        let result = process("frobnicate 1 2\nint 1\n");
        assert_eq!(kinds(&result), vec![DiagnosticKind::UnknownOpcode]);
        assert!(result.diagnostics[0].message.contains("frobnicate"));
        assert_eq!(result.listing[0], Op::Empty);
        assert_eq!(result.listing[1], Op::Int { value: 1 });
    }

    #[test]
    fn too_many_values_only_after_a_clean_parse() {
        let result = process("int 1 2\n");
        assert_eq!(kinds(&result), vec![DiagnosticKind::ParseError]);
        assert!(result.diagnostics[0].message.contains("too many values"));
        assert_eq!(result.listing, vec![Op::Empty]);

        // A failing parse swallows its trailing tokens.
        let result = process("int bad-value trailing\n");
        assert_eq!(kinds(&result), vec![DiagnosticKind::ParseError]);
        assert!(result.diagnostics[0].message.contains("uint64"));
    }

    #[test]
    fn missing_argument_is_a_parse_error() {
        let result = process("intc\n");
        assert_eq!(kinds(&result), vec![DiagnosticKind::ParseError]);
        assert!(result.diagnostics[0].message.contains("missing arg"));
        assert_eq!(result.listing, vec![Op::Empty]);
    }

    #[test]
    fn named_constants_parse_in_int() {
        let result = process("int pay\nint NoOp\nint 0x10\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            result.listing,
            vec![
                Op::Int { value: 1 },
                Op::Int { value: 0 },
                Op::Int { value: 16 },
            ]
        );
        assert_eq!(result.numbers.len(), 3);
    }

    #[test]
    fn byte_literal_forms() {
        let source = "byte \"hi\\n\"\nbyte 0x6869\nbyte base64(aGk=)\nbyte b64 aGk=\nbyte base32(NBUQ====)\n";
        let result = process(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        for op in &result.listing {
            match op {
                Op::Byte { value } => assert_eq!(&value[..2], b"hi"),
                other => panic!("expected byte op, got {other:?}"),
            }
        }
        // The two-token keyword form classifies the keyword separately.
        assert_eq!(result.keywords.len(), 1);
        assert_eq!(result.keywords[0].text, "b64");
        assert_eq!(result.strings.len(), 5);
    }

    #[test]
    fn invalid_byte_literal_fails_the_line() {
        let result = process("byte base64(???)\n");
        assert_eq!(kinds(&result), vec![DiagnosticKind::ParseError]);
        assert_eq!(result.listing, vec![Op::Empty]);
    }

    #[test]
    fn addr_requires_a_valid_checksum() {
        // Zero public key with its correct checksum.
        let good = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ";
        assert_eq!(good.len(), 58);
        let result = process(&format!("addr {good}\n"));
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

        // Same length, corrupted checksum.
        let bad = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKA";
        let result = process(&format!("addr {bad}\n"));
        assert_eq!(kinds(&result), vec![DiagnosticKind::ParseError]);
        assert!(result.diagnostics[0].message.contains("checksum"));
    }

    #[test]
    fn comments_attach_to_the_next_label() {
        let source = "// adds two numbers\n// and returns\nadd:\nint 1\n";
        let result = process(source);
        assert_eq!(result.symbols.len(), 1);
        assert_eq!(result.symbols[0].docs, "adds two numbers\nand returns");
    }

    #[test]
    fn proto_after_label_becomes_its_signature() {
        let result = process("#pragma version 8\ncallsub sub\nsub:\nproto 2 1\nretsub\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            result.symbols[0].signature.as_deref(),
            Some("in: 2, out: 1")
        );

        // A proto that does not directly follow a label attaches to
        // nothing.
        let result = process("#pragma version 8\ncallsub sub\nsub:\nint 1\nproto 2 1\nretsub\n");
        assert_eq!(result.symbols[0].signature, None);
    }

    #[test]
    fn pragma_tokens_are_classified_as_macros() {
        let result = process("#pragma version 2\n");
        let macro_texts: Vec<_> = result.macros.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(macro_texts, vec!["#pragma", "version"]);
        assert_eq!(result.numbers.len(), 1);
    }

    #[test]
    fn zero_version_pragma_is_rejected() {
        let result = process("#pragma version 0\n");
        assert_eq!(kinds(&result), vec![DiagnosticKind::ParseError]);
        assert!(result.diagnostics[0].message.contains("at least 1"));
        assert_eq!(result.version, 1);
    }

    #[test]
    fn unknown_pragma_is_rejected() {
        let result = process("#pragma fuel high\n");
        assert_eq!(kinds(&result), vec![DiagnosticKind::ParseError]);
        assert!(result.diagnostics[0].message.contains("unexpected #pragma"));
    }

    #[test]
    fn switch_records_every_target() {
        let result = process("#pragma version 8\nint 1\nswitch a b a\na:\nb:\n");
        assert_eq!(result.ref_counts.get("a"), Some(&2));
        assert_eq!(result.ref_counts.get("b"), Some(&1));
        assert_eq!(result.symbol_refs.len(), 3);
        for token in &result.symbol_refs {
            assert!(["a", "b"].contains(&token.text.as_str()));
        }
    }

    #[test]
    fn missing_refs_lists_unresolved_targets() {
        let result = process("#pragma version 2\nb nowhere\n");
        assert_eq!(result.missing_refs.len(), 1);
        assert_eq!(result.missing_refs[0].text, "nowhere");
        assert!(kinds(&result).contains(&DiagnosticKind::MissingLabel));
    }

    #[test]
    fn txn_with_index_parses_as_array_access() {
        let result = process("#pragma version 2\ntxn ApplicationArgs 0\ntxn Sender\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            result.listing[1],
            Op::Txna {
                field: TxnField::ApplicationArgs,
                index: 0
            }
        );
        assert_eq!(
            result.listing[2],
            Op::Txn {
                field: TxnField::Sender
            }
        );
    }

    #[test]
    fn numeric_field_arguments_classify_as_numbers() {
        let result = process("#pragma version 2\nglobal 4\nglobal GroupSize\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            result.listing[1],
            Op::Global {
                field: GlobalField::GroupSize
            }
        );
        // `4` lands in numbers, `GroupSize` in strings.
        assert!(result.numbers.iter().any(|t| t.text == "4"));
        assert!(result.strings.iter().any(|t| t.text == "GroupSize"));
    }

    #[test]
    fn field_version_gates_are_independent_of_opcode_gates() {
        let result = process("#pragma version 2\nglobal CreatorAddress\n");
        assert_eq!(kinds(&result), vec![DiagnosticKind::ParseError]);
        assert!(result.diagnostics[0].message.contains("version >= 3"));
    }

    #[test]
    fn trailing_whitespace_and_blank_lines_do_not_shift_diagnostics() {
        let plain = process("#pragma version 2\nb nowhere\n");
        let padded = process("#pragma version 2\nb nowhere   \n\n\n");
        let lines_of = |result: &ProcessResult| {
            result
                .diagnostics
                .iter()
                .map(|d| (d.kind, d.position.line))
                .collect::<Vec<_>>()
        };
        assert_eq!(lines_of(&plain), lines_of(&padded));
    }

    #[test]
    fn symbol_refs_match_label_reference_counts() {
        let result = process("#pragma version 8\nx:\nb x\nswitch x y\ny:\n");
        let mut counted = 0usize;
        for (name, count) in &result.ref_counts {
            let refs = result
                .symbol_refs
                .iter()
                .filter(|t| &t.text == name)
                .count();
            assert_eq!(refs, *count, "{name}");
            counted += count;
        }
        assert_eq!(counted, result.symbol_refs.len());
    }
}
