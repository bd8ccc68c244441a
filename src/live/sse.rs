//! Incremental `text/event-stream` parser for the desktop transport.
//!
//! Accepts LF or CRLF line endings. Only `message` events are returned;
//! `id:` and `retry:` are ignored since reconnection policy is fixed.

use tracing::warn;

/// Longest line kept in memory. Longer lines are dropped whole.
const MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Debug, Default)]
pub struct SseParser {
    line: Vec<u8>,
    // set while skipping the rest of an oversized line
    overflowed: bool,
    seen_first_line: bool,
    data: Vec<String>,
    event_type: Option<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of body bytes, returning the payloads of every message
    /// event completed by it. Partial lines are kept for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut completed = Vec::new();
        for &byte in chunk {
            if byte != b'\n' {
                if self.overflowed {
                    continue;
                }
                if self.line.len() >= MAX_LINE_BYTES {
                    warn!(limit = MAX_LINE_BYTES, "dropping oversized event-stream line");
                    self.line.clear();
                    self.overflowed = true;
                    continue;
                }
                self.line.push(byte);
                continue;
            }
            if std::mem::take(&mut self.overflowed) {
                continue;
            }
            if self.line.last() == Some(&b'\r') {
                self.line.pop();
            }
            let line = String::from_utf8_lossy(&self.line).into_owned();
            self.line.clear();
            let line = self.strip_bom(&line);
            if let Some(payload) = self.process_line(line) {
                completed.push(payload);
            }
        }
        completed
    }

    // A UTF-8 byte order mark may only precede the very first line.
    fn strip_bom<'a>(&mut self, line: &'a str) -> &'a str {
        if std::mem::replace(&mut self.seen_first_line, true) {
            return line;
        }
        line.strip_prefix('\u{FEFF}').unwrap_or(line)
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.finish_event();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event_type = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn finish_event(&mut self) -> Option<String> {
        let event_type = self.event_type.take();
        if self.data.is_empty() {
            return None;
        }
        let payload = self.data.join("\n");
        self.data.clear();
        match event_type.as_deref() {
            None | Some("") | Some("message") => Some(payload),
            Some(_) => None,
        }
    }
}
