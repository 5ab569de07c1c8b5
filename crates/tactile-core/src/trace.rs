#![forbid(unsafe_code)]

//! Touch-trace recording and replay for deterministic debugging.
//!
//! A [`TouchTrace`] is the ordered list of [`ContactEvent`]s one element
//! received. It round-trips through JSONL (one record per line) so a trace
//! captured on a device can be replayed through a [`GestureSession`] on a
//! desktop and produce exactly the same gestures.
//!
//! # Format
//!
//! Each line is a JSON object tagged by `record`. The first line is a
//! `header` carrying the schema version; every following line is a
//! `contact` event:
//!
//! ```text
//! {"record":"header","schema_version":"touch-trace-v1","session_name":"inbox"}
//! {"record":"contact","phase":"start","contacts":[{"x":0.0,"y":0.0,"timestamp_ms":0}]}
//! {"record":"contact","phase":"end","contacts":[],"released":{"x":0.0,"y":0.0,"timestamp_ms":40}}
//! ```

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::{ContactEvent, Gesture};
use crate::gesture::GestureSession;

/// Current schema version for touch trace files.
pub const SCHEMA_VERSION: &str = "touch-trace-v1";

/// One line of a trace file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum TraceRecord {
    Header {
        schema_version: String,
        session_name: String,
    },
    Contact(ContactEvent),
}

/// Errors reading or writing a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported trace schema: {found}")]
    Schema { found: String },

    #[error("line {line}: header must be the first record")]
    MisplacedHeader { line: usize },
}

/// An ordered recording of contact events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchTrace {
    session_name: String,
    events: Vec<ContactEvent>,
}

impl TouchTrace {
    /// Start an empty trace.
    #[must_use]
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            session_name: session_name.into(),
            events: Vec::new(),
        }
    }

    /// Append one event.
    pub fn record(&mut self, event: ContactEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    #[must_use]
    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    /// Write the trace as JSONL.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), TraceError> {
        let header = TraceRecord::Header {
            schema_version: SCHEMA_VERSION.to_owned(),
            session_name: self.session_name.clone(),
        };
        write_record(&mut writer, &header)?;
        for event in &self.events {
            write_record(&mut writer, &TraceRecord::Contact(event.clone()))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Render the trace as a JSONL string.
    pub fn to_jsonl(&self) -> Result<String, TraceError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        // serde_json only emits UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Parse a JSONL trace. Blank lines are skipped; a missing header yields
    /// an unnamed trace.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, TraceError> {
        let mut trace = Self::default();
        let mut seen_record = false;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let record: TraceRecord =
                serde_json::from_str(&line).map_err(|source| TraceError::Json {
                    line: line_no,
                    source,
                })?;
            match record {
                TraceRecord::Header {
                    schema_version,
                    session_name,
                } => {
                    if seen_record {
                        return Err(TraceError::MisplacedHeader { line: line_no });
                    }
                    if schema_version != SCHEMA_VERSION {
                        return Err(TraceError::Schema {
                            found: schema_version,
                        });
                    }
                    trace.session_name = session_name;
                }
                TraceRecord::Contact(event) => trace.events.push(event),
            }
            seen_record = true;
        }
        Ok(trace)
    }

    /// Parse a JSONL trace from a string.
    pub fn from_jsonl(s: &str) -> Result<Self, TraceError> {
        Self::from_reader(s.as_bytes())
    }

    /// Feed every event through `session`, then flush pending timers so
    /// deferred taps are delivered. Returns every gesture in emission order.
    pub fn replay(&self, session: &mut GestureSession) -> Vec<Gesture> {
        let mut out = Vec::new();
        for event in &self.events {
            out.extend(session.handle(event));
        }
        while let Some(deadline) = session.next_deadline() {
            out.extend(session.advance(deadline));
        }
        tracing::debug!(
            session = %self.session_name,
            events = self.events.len(),
            gestures = out.len(),
            "trace replayed"
        );
        out
    }
}

fn write_record<W: Write>(writer: &mut W, record: &TraceRecord) -> Result<(), TraceError> {
    serde_json::to_writer(&mut *writer, record).map_err(|source| TraceError::Json {
        line: 0,
        source,
    })?;
    writer.write_all(b"\n")?;
    Ok(())
}
