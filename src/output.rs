//! CLI output formatting.
//!
//! Every line the user sees is built here. Each event type has a `format_*`
//! function (returns `Vec<String>`) for testability and the binary prints the
//! result. Format functions are pure — no I/O, no side effects.
//!
//! # Output Format
//!
//! ```text
//! Found 2 images in input (1 skipped)
//! [1/2] a.jpg → 184.2 KB
//! [2/2] sub/bad.png failed: Failed to decode input/sub/bad.png: ...
//!
//! Done: 1 succeeded, 1 failed
//! Output: output
//! ```

use crate::process::{ProcessEvent, RunSummary};

/// Format a byte count as kilobytes with one decimal.
fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn skipped_suffix(skipped: usize) -> String {
    if skipped == 0 {
        String::new()
    } else {
        format!(" ({skipped} skipped)")
    }
}

pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Discovered { count, skipped } => {
            vec![format!(
                "Found {}{}",
                plural(*count, "image", "images"),
                skipped_suffix(*skipped)
            )]
        }
        ProcessEvent::NoImages {
            input_root,
            skipped,
        } => {
            vec![format!(
                "No images found in {}{}",
                input_root.display(),
                skipped_suffix(*skipped)
            )]
        }
        ProcessEvent::ImageProcessed {
            index,
            total,
            source,
            bytes,
        } => {
            vec![format!(
                "[{}/{}] {} → {}",
                index,
                total,
                source.display(),
                format_kb(*bytes)
            )]
        }
        ProcessEvent::ImageFailed {
            index,
            total,
            source,
            message,
        } => {
            vec![format!(
                "[{}/{}] {} failed: {}",
                index,
                total,
                source.display(),
                message
            )]
        }
    }
}

pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Done: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        ),
        format!("Output: {}", summary.output_root.display()),
    ]
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}
