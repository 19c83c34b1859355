//! NDJSON output for `--json`.
//!
//! One JSON object per line on stdout, each with an `"event"` field.

use std::io::{self, Write};

use serde::Serialize;

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    let line = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Convenience helper that writes raw JSON value to stdout.
pub fn emit(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, &event)
}

/// Serialize `payload` and merge it into an event object named `event`.
pub fn event_with<T: Serialize>(event: &str, payload: &T) -> serde_json::Value {
    let mut value = serde_json::to_value(payload).unwrap_or(serde_json::Value::Null);
    match value.as_object_mut() {
        Some(map) => {
            map.insert("event".to_string(), event.into());
            value
        }
        None => serde_json::json!({ "event": event, "data": value }),
    }
}
