//! Progress events and the sinks that display them

use std::io::Write;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Installing,
    Uninstalling,
    Completed,
    Failed,
}

/// One tool transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub tool_id: String,
    pub status: ProgressStatus,
    /// Percentage of the batch done, 0..=100
    pub progress: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(
        tool_id: impl Into<String>,
        status: ProgressStatus,
        done: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tool_id: tool_id.into(),
            status,
            progress: percent(done, total),
            message: message.into(),
        }
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    u8::try_from(done.min(total) * 100 / total).unwrap_or(100)
}

/// Receives progress events in emission order
pub trait ProgressSink {
    fn event(&mut self, event: &ProgressEvent);

    /// Package-manager output for the tool currently in progress
    fn output(&mut self, _line: &str) {}

    /// Called once after the last event of a batch
    fn finish(&mut self) {}
}

/// One JSON object per line, for machine consumers
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ProgressSink for JsonLinesSink<W> {
    fn event(&mut self, event: &ProgressEvent) {
        if let Ok(line) = serde_json::to_string(event) {
            let _ = writeln!(self.writer, "{line}");
            let _ = self.writer.flush();
        }
    }
}

/// Terminal progress bar, one step per finished tool
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    pub fn new(total_tools: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = ProgressBar::new(total_tools);
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressSink for ProgressDisplay {
    fn event(&mut self, event: &ProgressEvent) {
        match event.status {
            ProgressStatus::Installing | ProgressStatus::Uninstalling => {
                self.bar.set_message(event.message.clone());
            }
            ProgressStatus::Completed => {
                self.bar.inc(1);
                self.bar.println(format!(
                    "{} {}",
                    console::style("✓").green(),
                    event.message
                ));
            }
            ProgressStatus::Failed => {
                self.bar.inc(1);
                self.bar
                    .println(format!("{} {}", console::style("✗").red(), event.message));
            }
        }
    }

    fn output(&mut self, line: &str) {
        let line = line.trim_end();
        if !line.is_empty() {
            self.bar.set_message(line.chars().take(60).collect::<String>());
        }
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}
