// Copyright 2026 imdb-reviews contributors
// SPDX-License-Identifier: MIT

//! Progress event types and broadcast channel for review collection.
//!
//! The collector emits `CollectEvent`s while it paginates, which flow through
//! a `tokio::sync::broadcast` channel to any subscriber. When no subscriber
//! exists, events are silently dropped. [`report`] is the subscriber the
//! command-line tool uses to print progress.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;

/// A progress event emitted during collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectEvent {
    /// The movie identifier being collected.
    pub target_id: String,
    /// Monotonically increasing sequence number.
    pub seq: u64,
    /// The kind of progress event.
    pub event: CollectEventKind,
}

/// The specific kind of progress event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CollectEventKind {
    /// The listing page was opened.
    Navigated {
        url: String,
        /// Total review count advertised by the page, if readable.
        total: Option<u64>,
    },
    /// A "load more" attempt finished.
    PageLoaded {
        attempt: u32,
        clicked: bool,
        loaded: usize,
        total: Option<u64>,
    },
    /// Pagination ended.
    Exhausted { attempts: u32, capped: bool },
    /// Records were extracted from the final page.
    Extracted { count: usize },
}

/// Sender handle for emitting progress events.
pub type ProgressSender = tokio::sync::broadcast::Sender<CollectEvent>;

/// Receiver handle for consuming progress events.
pub type ProgressReceiver = tokio::sync::broadcast::Receiver<CollectEvent>;

/// Create a new progress broadcast channel with a bounded buffer.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    tokio::sync::broadcast::channel(256)
}

/// Emit a progress event, ignoring send errors (no receivers listening).
pub fn emit(tx: &Option<ProgressSender>, target_id: &str, seq: &mut u64, event: CollectEventKind) {
    if let Some(ref sender) = tx {
        *seq += 1;
        let _ = sender.send(CollectEvent {
            target_id: target_id.to_string(),
            seq: *seq,
            event,
        });
    }
}

/// Render a review total, `?` when the page did not advertise one.
pub fn display_total(total: Option<u64>) -> String {
    total.map_or_else(|| "?".to_string(), |t| t.to_string())
}

/// One progress line for an event, or `None` for events not worth a line.
pub fn describe(event: &CollectEventKind) -> Option<String> {
    match event {
        CollectEventKind::Navigated { total, .. } => {
            total.map(|t| format!("{t} reviews listed"))
        }
        CollectEventKind::PageLoaded { loaded, total, .. } => {
            Some(format!("{loaded} / {}", display_total(*total)))
        }
        CollectEventKind::Exhausted { capped: true, attempts } => Some(format!(
            "stopped after {attempts} pages, more reviews may be available"
        )),
        CollectEventKind::Exhausted { capped: false, .. } => None,
        CollectEventKind::Extracted { count } => Some(format!("{count} reviews extracted")),
    }
}

/// Write a line per event to `out` until every sender is dropped.
///
/// Returns the number of lines written.
pub async fn report<W: Write>(mut rx: ProgressReceiver, out: &mut W) -> std::io::Result<usize> {
    let mut lines = 0;
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Some(line) = describe(&event.event) {
                    writeln!(out, "{line}")?;
                    out.flush()?;
                    lines += 1;
                }
            }
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
    Ok(lines)
}
