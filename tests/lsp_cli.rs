//! Drives the `tealint lsp` binary over its stdio transport with framed
//! JSON-RPC messages, the way an editor would.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde_json::{Value, json};

struct Lsp {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    next_id: i64,
}

impl Lsp {
    fn start() -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_tealint"))
            .arg("lsp")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to spawn tealint lsp");
        let stdin = child.stdin.take().expect("stdin");
        let reader = BufReader::new(child.stdout.take().expect("stdout"));
        Self {
            child,
            stdin,
            reader,
            next_id: 1,
        }
    }

    fn write_message(&mut self, message: &Value) {
        let body = serde_json::to_vec(message).expect("serialize message");
        write!(self.stdin, "Content-Length: {}\r\n\r\n", body.len()).expect("write header");
        self.stdin.write_all(&body).expect("write body");
        self.stdin.flush().expect("flush");
    }

    fn read_message(&mut self) -> Value {
        let mut length = None;
        loop {
            let mut header = String::new();
            self.reader.read_line(&mut header).expect("read header");
            let header = header.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some(value) = header.strip_prefix("Content-Length:") {
                length = Some(value.trim().parse::<usize>().expect("content length"));
            }
        }
        let mut body = vec![0u8; length.expect("missing Content-Length")];
        self.reader.read_exact(&mut body).expect("read body");
        serde_json::from_slice(&body).expect("parse message body")
    }

    fn notify(&mut self, method: &str, params: Value) {
        self.write_message(&json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        }));
    }

    /// Sends a request and reads messages until its response arrives;
    /// notifications received on the way are discarded.
    fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        self.write_message(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }));
        loop {
            let message = self.read_message();
            if message.get("id") == Some(&json!(id)) {
                return message;
            }
        }
    }

    /// Reads messages until a notification with the given method shows up.
    fn wait_notification(&mut self, method: &str) -> Value {
        loop {
            let message = self.read_message();
            if message.get("method") == Some(&json!(method)) {
                return message;
            }
        }
    }

    fn stop(mut self) {
        self.request("shutdown", Value::Null);
        self.notify("exit", Value::Null);
        drop(self.stdin);
        let status = self.child.wait().expect("wait for lsp process");
        assert!(status.success(), "lsp exited with status {status}");
    }
}

#[test]
fn serves_diagnostics_hover_and_definition_over_stdio() {
    let uri = "file:///approval.teal";

    let mut lsp = Lsp::start();
    let initialize = lsp.request(
        "initialize",
        json!({ "processId": null, "capabilities": {} }),
    );
    let capabilities = &initialize["result"]["capabilities"];
    assert_eq!(capabilities["textDocumentSync"], json!(1));
    assert!(capabilities.get("diagnosticProvider").is_some());
    lsp.notify("initialized", json!({}));

    lsp.notify(
        "textDocument/didOpen",
        json!({
            "textDocument": {
                "uri": uri,
                "languageId": "teal",
                "version": 1,
                "text": "#pragma version 2\nmain:\nint 1\nb missing\n",
            }
        }),
    );

    let published = lsp.wait_notification("textDocument/publishDiagnostics");
    assert_eq!(published["params"]["uri"], json!(uri));
    let diagnostics = published["params"]["diagnostics"]
        .as_array()
        .expect("diagnostics array");
    let message_of = |diag: &Value| diag["message"].as_str().unwrap_or("").to_string();
    assert!(
        diagnostics
            .iter()
            .any(|d| message_of(d).contains("missing label") && d["severity"] == json!(1)),
        "expected a missing label error, got {diagnostics:?}"
    );
    assert!(
        diagnostics
            .iter()
            .any(|d| message_of(d).contains("unused label") && d["severity"] == json!(2)),
        "expected an unused label warning, got {diagnostics:?}"
    );

    let hover = lsp.request(
        "textDocument/hover",
        json!({
            "textDocument": { "uri": uri },
            "position": { "line": 2, "character": 1 },
        }),
    );
    let hover_text = hover["result"]["contents"]["value"]
        .as_str()
        .expect("hover markdown");
    assert!(
        hover_text.contains("uint64 constant"),
        "expected int docs, got {hover_text}"
    );

    // Fixing the branch target clears the error on the next publish.
    lsp.notify(
        "textDocument/didChange",
        json!({
            "textDocument": { "uri": uri, "version": 2 },
            "contentChanges": [
                { "text": "#pragma version 2\nmain:\nint 1\nb main\n" }
            ],
        }),
    );
    let updated = lsp.wait_notification("textDocument/publishDiagnostics");
    assert_eq!(updated["params"]["version"], json!(2));
    let diagnostics = updated["params"]["diagnostics"]
        .as_array()
        .expect("diagnostics array");
    assert!(
        diagnostics.iter().all(|d| !message_of(d).contains("missing")),
        "expected the missing label to resolve, got {diagnostics:?}"
    );

    let definition = lsp.request(
        "textDocument/definition",
        json!({
            "textDocument": { "uri": uri },
            "position": { "line": 3, "character": 3 },
        }),
    );
    let locations = definition["result"].as_array().expect("definition array");
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0]["range"]["start"]["line"], json!(1));

    let pulled = lsp.request(
        "textDocument/diagnostic",
        json!({ "textDocument": { "uri": uri } }),
    );
    assert_eq!(pulled["result"]["kind"], json!("full"));
    assert!(pulled["result"]["items"].is_array());

    let completion = lsp.request(
        "textDocument/completion",
        json!({
            "textDocument": { "uri": uri },
            "position": { "line": 3, "character": 3 },
        }),
    );
    let items = completion["result"].as_array().expect("completion array");
    assert!(
        items.iter().any(|item| item["label"] == json!("main")),
        "expected the label to complete, got {items:?}"
    );

    lsp.stop();
}
