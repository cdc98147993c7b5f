//! Exchange log backed by a JSONL file.
//!
//! Every [`ExchangeEvent`] becomes one line: the event's own fields, its
//! `type` tag, a per-file sequence number and a UTC timestamp. Long
//! free-text fields (script prompts, model replies) are cut to a configured
//! number of characters.

use chrono::{SecondsFormat, Utc};
use interview_application::{ExchangeEvent, ExchangeLogger};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Free-text fields subject to `max_chars`
const CAPPED_FIELDS: [&str; 4] = ["prompt", "reply", "feedback", "error"];

struct Sink {
    writer: BufWriter<File>,
    seq: u64,
}

pub struct JsonlExchangeLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
    max_chars: usize,
}

impl JsonlExchangeLogger {
    /// Open `path` for appending, creating it and its directory if needed.
    ///
    /// `max_chars` of 0 keeps text fields whole.
    pub fn open(path: impl AsRef<Path>, max_chars: usize) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
            max_chars,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(&self, event: &ExchangeEvent, seq: u64) -> Option<Value> {
        let mut value = match serde_json::to_value(event) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return None,
            Err(e) => {
                warn!("Dropping {} exchange record: {}", event.kind(), e);
                return None;
            }
        };

        if self.max_chars > 0 {
            for name in CAPPED_FIELDS {
                if let Some(Value::String(text)) = value.get_mut(name)
                    && let Some(cut) = truncated(text, self.max_chars)
                {
                    *text = cut;
                }
            }
        }
        value.insert("seq".to_string(), Value::from(seq));
        value.insert(
            "at".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        Some(Value::Object(value))
    }
}

/// `text` cut to `max` characters with a marker, or `None` when it fits.
fn truncated(text: &str, max: usize) -> Option<String> {
    let (cut, _) = text.char_indices().nth(max)?;
    let dropped = text[cut..].chars().count();
    Some(format!("{}…[+{} chars]", &text[..cut], dropped))
}

impl ExchangeLogger for JsonlExchangeLogger {
    fn log(&self, event: ExchangeEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        sink.seq += 1;
        let Some(record) = self.record(&event, sink.seq) else {
            return;
        };

        let written = serde_json::to_writer(&mut sink.writer, &record)
            .map_err(io::Error::from)
            .and_then(|()| sink.writer.write_all(b"\n"))
            .and_then(|()| sink.writer.flush());
        if let Err(e) = written {
            warn!("Could not append to exchange log {}: {}", self.path.display(), e);
        }
    }
}
