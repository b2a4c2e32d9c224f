//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use origin_domain::{ContentFingerprint, ProvenanceRecord};
use serde_json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format records output.
    pub fn format_records(&self, records: &[ProvenanceRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<_> = records.iter().map(record_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Table => Ok(self.format_records_table(records)),
            OutputFormat::Quiet => Ok(records
                .iter()
                .map(|r| r.fingerprint().to_hex())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format the result of a successful anchor or derive.
    pub fn record_anchored(&self, record: &ProvenanceRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&record_json(record))?),
            OutputFormat::Quiet => Ok(record.record_id().to_string()),
            OutputFormat::Table => {
                let kind = if record.is_original() { "Anchored" } else { "Anchored derivative" };
                Ok(self.success(&format!(
                    "{} {} as {}",
                    kind,
                    record.fingerprint().short(),
                    record.record_id()
                )))
            }
        }
    }

    /// Format a verification outcome.
    ///
    /// A miss is a normal answer, rendered distinctly from a found record.
    pub fn verification(
        &self,
        fingerprint: &ContentFingerprint,
        record: Option<&ProvenanceRecord>,
    ) -> Result<String> {
        match (self.format, record) {
            (OutputFormat::Json, Some(record)) => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "anchored": true,
                "record": record_json(record),
            }))?),
            (OutputFormat::Json, None) => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "anchored": false,
                "fingerprint": fingerprint.to_hex(),
            }))?),
            (OutputFormat::Quiet, Some(record)) => Ok(record.record_id().to_string()),
            (OutputFormat::Quiet, None) => Ok("not anchored".to_string()),
            (OutputFormat::Table, Some(record)) => Ok(format!(
                "{}\n{}",
                self.success(&format!("Anchored: {}", fingerprint.short())),
                self.format_records_table(std::slice::from_ref(record))
            )),
            (OutputFormat::Table, None) => {
                Ok(self.warning(&format!("Not anchored: {}", fingerprint.to_hex())))
            }
        }
    }

    /// Format a bare count.
    pub fn count(&self, count: usize) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(&serde_json::json!({ "count": count }))?),
            OutputFormat::Quiet => Ok(count.to_string()),
            OutputFormat::Table => Ok(format!("{} anchored record(s)", count)),
        }
    }

    /// Format a fingerprint listing.
    pub fn fingerprints(&self, fingerprints: &[ContentFingerprint]) -> Result<String> {
        let hex: Vec<String> = fingerprints.iter().map(|fp| fp.to_hex()).collect();
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&hex)?),
            OutputFormat::Table if hex.is_empty() => {
                Ok(self.colorize("No records anchored.", "yellow"))
            }
            OutputFormat::Table | OutputFormat::Quiet => Ok(hex.join("\n")),
        }
    }

    /// Format records as a table.
    fn format_records_table(&self, records: &[ProvenanceRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No records found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "Fingerprint",
            "Record ID",
            "Creator",
            "Organization",
            "Location",
            "Created",
            "Parent",
            "Edit",
        ]);

        for record in records {
            let record_id = record.record_id().to_string();
            let parent = record
                .parent_id()
                .map(|id| id.to_string()[..8].to_string())
                .unwrap_or_else(|| "-".to_string());
            builder.push_record([
                record.fingerprint().short(),
                record_id[..8].to_string(), // Truncate ID for readability
                record.creator().to_string(),
                record.organization_tag().to_string(),
                record.location_tag().to_string(),
                record.created_at().to_string(),
                parent,
                record.edit_type().to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn record_json(record: &ProvenanceRecord) -> serde_json::Value {
    serde_json::json!({
        "record_id": record.record_id().to_string(),
        "fingerprint": record.fingerprint().to_hex(),
        "storage_locator": record.storage_locator(),
        "location_tag": record.location_tag(),
        "organization_tag": record.organization_tag(),
        "creator": record.creator().as_str(),
        "created_at": record.created_at(),
        "parent_id": record.parent_id().map(|id| id.to_string()),
        "edit_type": record.edit_type(),
        "is_original": record.is_original(),
    })
}
