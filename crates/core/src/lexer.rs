use logos::Logos;

use crate::diag::{Diagnostic, DiagnosticKind};
use crate::span::{LineRange, Position};

/// TEAL is scanned as whitespace-separated fields, so a `Value` is any
/// maximal run of non-whitespace bytes: `0x1234`, `b+`, `base64(aGk=)` and
/// `#pragma` are all single tokens. Quoted strings and comments are the
/// only multi-field tokens.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip(r"[ \t\f]+"))]
pub enum TokenKind {
    #[regex(r"//[^\r\n]*", priority = 5)]
    Comment,

    #[regex(r#""([^"\\\r\n]|\\.)*""#, priority = 5)]
    Str,

    #[regex(r"\r?\n")]
    Eol,

    #[regex(r#"[^ \t\r\n\f"]+"#)]
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn begin(&self) -> usize {
        self.position.begin
    }

    pub fn end(&self) -> usize {
        self.position.end
    }

    pub fn range(&self) -> LineRange {
        LineRange::new(
            self.position.line,
            self.position.begin,
            self.position.line,
            self.position.end,
        )
    }
}

/// Scans the whole source, collecting malformed input as diagnostics
/// instead of failing, so the parser always receives a token stream.
pub fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    let mut diagnostics = Vec::new();

    let mut line = 0usize;
    let mut line_start = 0usize;

    while let Some(next) = lexer.next() {
        let span = lexer.span();
        let position = Position::new(line, span.start - line_start, span.end - line_start);
        match next {
            Ok(kind) => {
                tokens.push(Token {
                    kind,
                    text: lexer.slice().to_string(),
                    position,
                });
                if kind == TokenKind::Eol {
                    line += 1;
                    line_start = span.end;
                }
            }
            Err(()) => {
                let slice = lexer.slice();
                let message = if slice.starts_with('"') {
                    "unterminated string literal".to_string()
                } else {
                    format!("unexpected input {slice:?}")
                };
                diagnostics.push(Diagnostic::error(
                    position,
                    DiagnosticKind::ParseError,
                    message,
                ));
            }
        }
    }

    (tokens, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, diagnostics) = lex(source);
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn lexes_fields_and_newlines() {
        assert_eq!(
            kinds("int 1\nreturn\n"),
            vec![
                TokenKind::Value,
                TokenKind::Value,
                TokenKind::Eol,
                TokenKind::Value,
                TokenKind::Eol,
            ]
        );
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let (tokens, _) = lex("int 1 // the answer\nint 2");
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[2].text, "// the answer");
        assert_eq!(tokens[3].kind, TokenKind::Eol);
    }

    #[test]
    fn base64_call_form_is_one_value() {
        let (tokens, _) = lex("byte base64(aGVsbG8=)");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "base64(aGVsbG8=)");
        assert_eq!(tokens[1].kind, TokenKind::Value);
    }

    #[test]
    fn slashes_inside_a_value_do_not_start_a_comment() {
        let (tokens, _) = lex("byte b64(AB//CD==)");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "b64(AB//CD==)");
    }

    #[test]
    fn quoted_string_with_spaces_is_one_token() {
        let (tokens, _) = lex(r#"byte "hi there""#);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Str);
        assert_eq!(tokens[1].text, r#""hi there""#);
    }

    #[test]
    fn positions_are_line_relative_byte_columns() {
        let (tokens, _) = lex("int 1\n  bnz end\n");
        let bnz = &tokens[3];
        assert_eq!(bnz.text, "bnz");
        assert_eq!(bnz.position, Position::new(1, 2, 5));
        let end = &tokens[4];
        assert_eq!(end.position, Position::new(1, 6, 9));
    }

    #[test]
    fn crlf_terminates_lines() {
        let (tokens, diagnostics) = lex("int 1\r\nint 2\r\n");
        assert!(diagnostics.is_empty());
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eol).count(), 2);
        assert_eq!(tokens[3].line(), 1);
    }

    #[test]
    fn unterminated_string_reports_a_diagnostic() {
        let (_, diagnostics) = lex("byte \"oops\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::ParseError);
        assert!(diagnostics[0].message.contains("unterminated"));
    }
}
