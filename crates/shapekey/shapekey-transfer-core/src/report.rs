//! Transfer summaries and the user-facing reporting channel.
//!
//! Every top-level operation produces exactly one report: INFO with the
//! summary message on success, ERROR with the error text otherwise.

use serde::{Deserialize, Serialize};

use crate::config::TransferMode;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportLevel {
    Info,
    Error,
}

/// Sink for user-visible messages.
pub trait Reporter {
    fn report(&mut self, level: ReportLevel, message: &str);
}

/// Forwards reports to the `log` facade.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, level: ReportLevel, message: &str) {
        match level {
            ReportLevel::Info => log::info!("{message}"),
            ReportLevel::Error => log::error!("{message}"),
        }
    }
}

/// Keeps every report in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingReporter {
    pub entries: Vec<(ReportLevel, String)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&(ReportLevel, String)> {
        self.entries.last()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, level: ReportLevel, message: &str) {
        self.entries.push((level, message.to_string()));
    }
}

/// Non-fatal conditions attached to a successful transfer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TransferWarning {
    /// Names-only transfer between meshes of different vertex counts.
    VertexCountMismatch { source: usize, target: usize },
}

/// Outcome of a single-channel or bulk shape key transfer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferSummary {
    pub mode: TransferMode,
    /// Channels written, in processing order.
    pub channels: Vec<String>,
    /// Channels that did not exist on the target before this call.
    pub created: Vec<String>,
    /// Vertex positions written, summed over channels.
    pub vertices_affected: usize,
    /// Selected vertex count when a selection gated the transfer.
    pub selection_size: Option<usize>,
    #[serde(default)]
    pub warnings: Vec<TransferWarning>,
    /// Bulk transfers report counts; single transfers name the channel.
    pub bulk: bool,
}

impl TransferSummary {
    pub(crate) fn new(mode: TransferMode, bulk: bool) -> Self {
        Self {
            mode,
            channels: Vec::new(),
            created: Vec::new(),
            vertices_affected: 0,
            selection_size: None,
            warnings: Vec::new(),
            bulk,
        }
    }

    #[inline]
    pub fn processed(&self) -> usize {
        self.channels.len()
    }

    /// User-facing report text.
    pub fn message(&self) -> String {
        let mut msg = if self.bulk {
            let mode = self.mode.describe();
            format!("Transferred {} shape keys {mode}", self.processed())
        } else {
            let mode = match self.mode {
                TransferMode::Full => "with full data",
                TransferMode::NamesOnly => "with name only",
            };
            let name = self.channels.first().map(String::as_str).unwrap_or_default();
            format!("Shape key '{name}' transferred {mode}")
        };
        if let Some(n) = self.selection_size {
            msg.push_str(&format!(" for {n} selected vertices"));
        }
        for warning in &self.warnings {
            match warning {
                TransferWarning::VertexCountMismatch { source, target } => msg.push_str(
                    &format!(" (different vertex counts: Source {source}, Target {target})"),
                ),
            }
        }
        msg
    }
}

/// Outcome of a driver transfer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverTransferSummary {
    pub drivers_transferred: usize,
    pub matching_channels: usize,
    /// Matching channels whose source carried no drivers.
    pub channels_without_drivers: usize,
    /// Variable target fields the destination did not accept.
    pub fields_skipped: usize,
}

impl DriverTransferSummary {
    pub fn message(&self) -> String {
        if self.drivers_transferred > 0 {
            format!(
                "Transferred {} drivers for {} matching shape keys",
                self.drivers_transferred, self.matching_channels
            )
        } else {
            "No drivers found to transfer".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_message_names_channel_and_selection() {
        let mut s = TransferSummary::new(TransferMode::Full, false);
        s.channels.push("Smile".into());
        assert_eq!(s.message(), "Shape key 'Smile' transferred with full data");
        s.selection_size = Some(5);
        assert_eq!(
            s.message(),
            "Shape key 'Smile' transferred with full data for 5 selected vertices"
        );
    }

    #[test]
    fn bulk_message_counts_and_warns() {
        let mut s = TransferSummary::new(TransferMode::NamesOnly, true);
        s.channels = vec!["A".into(), "B".into()];
        s.warnings.push(TransferWarning::VertexCountMismatch {
            source: 50,
            target: 60,
        });
        assert_eq!(
            s.message(),
            "Transferred 2 shape keys with names only (different vertex counts: Source 50, Target 60)"
        );
    }

    #[test]
    fn driver_message_distinguishes_noop() {
        let mut s = DriverTransferSummary {
            matching_channels: 2,
            ..Default::default()
        };
        assert_eq!(s.message(), "No drivers found to transfer");
        s.drivers_transferred = 3;
        assert_eq!(s.message(), "Transferred 3 drivers for 2 matching shape keys");
    }

    #[test]
    fn recording_reporter_keeps_order() {
        let mut r = RecordingReporter::new();
        r.report(ReportLevel::Info, "a");
        r.report(ReportLevel::Error, "b");
        assert_eq!(r.entries.len(), 2);
        assert_eq!(r.last(), Some(&(ReportLevel::Error, "b".to_string())));
    }
}
