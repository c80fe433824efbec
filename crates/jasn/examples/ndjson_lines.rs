//! Reads newline-delimited JSON and prints one summary line per record.
//!
//! ```text
//! cargo run --example ndjson_lines
//! ```
#![allow(missing_docs)]

use jasn::{ParserOptions, ValueKind, parse_many};

const LOG: &str = r#"{"level":"info","msg":"started","port":8080}
{"level":"warn","msg":"slow request","ms":1532.5,"path":"/api/items"}
{"level":"info","msg":"tags","tags":["a","b","c"]}
{"level":"error","msg":"bad record" "oops":1}
{"level":"info","msg":"never reached"}
"#;

fn main() {
    let options = ParserOptions {
        max_depth: 8,
        ..Default::default()
    };

    for record in parse_many(LOG.as_bytes(), options) {
        let doc = match record {
            Ok(doc) => doc,
            Err(err) => {
                let (line, column) = err.line_column(LOG.as_bytes());
                eprintln!("{line}:{column}: {err}");
                break;
            }
        };

        let Some(fields) = doc.root().as_object() else {
            println!("skipping non-object record ending at byte {}", doc.end_offset());
            continue;
        };
        let level = fields.get("level").and_then(|v| v.as_str()).unwrap_or("?");
        let msg = fields.get("msg").and_then(|v| v.as_str()).unwrap_or("");
        let extra: Vec<String> = fields
            .iter()
            .filter(|(key, _)| !matches!(*key, "level" | "msg"))
            .map(|(key, value)| match value.kind() {
                ValueKind::Array => format!("{key}=[{}]", value.as_array().map_or(0, |a| a.len())),
                _ => format!("{key}={}", value.to_owned_value()),
            })
            .collect();
        println!("[{level:>5}] {msg} {}", extra.join(" "));
    }
}
