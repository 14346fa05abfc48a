//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chemlog_domain::{Program, ResultRecord};
use chemlog_extractor::{Catalog, CatalogReport, IngestionReport, Outcome};
use colored::*;
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

    /// Format the record of an ingestion.
    pub fn format_record(&self, report: &IngestionReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&report.record)?),
            OutputFormat::Table => Ok(self.format_record_table(&report.record)),
            OutputFormat::Quiet => Ok(report
                .record
                .present_keys()
                .map(|key| key.name())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a whole ingestion report, record and per-job outcomes.
    pub fn format_report(&self, report: &IngestionReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(report.to_json()?),
            OutputFormat::Quiet => self.format_record(report),
            OutputFormat::Table => {
                let mut sections = vec![self.format_record_table(&report.record)];
                for (index, job) in report.jobs.iter().enumerate() {
                    sections.push(self.format_outcomes(index, job));
                }
                Ok(sections.join("\n\n"))
            }
        }
    }

    /// Format the record as a table.
    fn format_record_table(&self, record: &ResultRecord) -> String {
        if record.is_empty() {
            return self.colorize("No properties extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Property", "Kind", "Value"]);

        for key in record.present_keys() {
            if let Some(value) = record.get(key) {
                builder.push_record([key.name(), value.kind(), value.summary().as_str()]);
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format one job's outcomes as a table.
    fn format_outcomes(&self, index: usize, report: &CatalogReport) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Property", "Outcome"]);

        for (key, outcome) in report.entries() {
            let color = match outcome {
                Outcome::Updated(_) => "green",
                Outcome::Skipped(_) => "yellow",
                Outcome::Failed(_) => "red",
            };
            builder.push_record([key.name().to_string(), self.colorize(&outcome.to_string(), color)]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("{}\n{}", self.info(&format!("Job {}: {}", index, report.summary())), table)
    }

    /// Format a catalog listing in run order.
    pub fn format_catalog(&self, catalog: &Catalog) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<serde_json::Value> = catalog
                    .iter()
                    .map(|entry| {
                        serde_json::json!({
                            "produces": entry.produces(),
                            "requires": entry.prerequisites(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Quiet => Ok(catalog.keys().map(|key| key.name()).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["#", "Property", "Requires"]);

                for (position, entry) in catalog.iter().enumerate() {
                    let requires: Vec<&str> = entry.prerequisites().iter().map(|key| key.name()).collect();
                    builder.push_record([
                        position.to_string(),
                        entry.produces().name().to_string(),
                        requires.join(", "),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(table.to_string())
            }
        }
    }

    /// Format a detected program.
    pub fn format_program(&self, program: Option<Program>) -> Result<String> {
        match (self.format, program) {
            (OutputFormat::Json, program) => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "program": program.map(|p| p.as_str()),
            }))?),
            (OutputFormat::Quiet, Some(program)) => Ok(program.as_str().to_string()),
            (OutputFormat::Quiet, None) => Ok(String::new()),
            (OutputFormat::Table, Some(program)) => Ok(self.success(&format!("Detected {}", program))),
            (OutputFormat::Table, None) => Ok(self.warning("No known program banner found")),
        }
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
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
