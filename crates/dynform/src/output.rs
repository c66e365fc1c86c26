//! Output formatting helpers for the `dynform` CLI.
//!
//! Provides JSON output, aligned tables, and a few colored status renderers.

use std::env;
use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;

use dynform_core::value::FieldValue;
use dynform_engine::events::{ChangeEvent, ChangeSource};

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - green
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - gray

pub const ICON_PASS: &str = "\u{2713}";
pub const ICON_FAIL: &str = "\u{2716}";

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a simple table with headers and rows.
///
/// Column widths are computed from the data for alignment.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", format_row(headers, &widths));
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(handle, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(handle, "{}", format_row(row, &widths));
    }
}

fn format_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        match widths.get(i) {
            // Last column is not padded, so lines carry no trailing spaces.
            Some(width) if i + 1 < cells.len() => {
                line.push_str(&format!("{:<width$}", cell.as_ref(), width = *width));
            }
            _ => line.push_str(cell.as_ref()),
        }
    }
    line
}

/// A field value for display; empty values show as `-`.
pub fn format_value(value: &FieldValue, date_format: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.display_with(date_format)
    }
}

/// One change-log line: `field: old -> new (source)`.
pub fn format_change(change: &ChangeEvent, date_format: &str) -> String {
    let source = match change.source {
        ChangeSource::User => "user".to_string(),
        ChangeSource::Patch => "patch".to_string(),
        ChangeSource::Derived(handler) => format!("derived: {}", handler),
    };
    format!(
        "{}: {} -> {} ({})",
        change.field,
        format_value(&change.previous, date_format),
        format_value(&change.value, date_format),
        source
    )
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// Determines if ANSI color codes should be used.
///
/// `NO_COLOR` (any value), `CLICOLOR=0` and `TERM=dumb` disable color;
/// `CLICOLOR_FORCE` forces it; otherwise color follows TTY detection.
pub fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").as_deref() == Ok("0") {
        return false;
    }
    if env::var("TERM").as_deref() == Ok("dumb") {
        return false;
    }
    if env::var_os("CLICOLOR_FORCE").is_some() {
        return true;
    }
    io::stdout().is_terminal()
}

fn paint(s: &str, (r, g, b): (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(r, g, b).to_string()
    } else {
        s.to_string()
    }
}

pub fn render_pass(s: &str) -> String {
    paint(&format!("{} {}", ICON_PASS, s), PASS)
}

pub fn render_fail(s: &str) -> String {
    paint(&format!("{} {}", ICON_FAIL, s), FAIL)
}

pub fn render_muted(s: &str) -> String {
    paint(s, MUTED)
}
