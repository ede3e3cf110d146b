// src/output.rs
use crate::types::{EnumerationReport, OutputConfig, OutputFormat, Record, SubprobeError};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const FQDN_WIDTH: usize = 40;
const IP_WIDTH: usize = 16;

/// One text line per record: padded name, padded address, then `PTR:` names
/// when there are any.
pub fn render_record_line(record: &Record) -> String {
    if record.ptrs.is_empty() {
        format!("{:<fw$} {:<iw$}", record.fqdn, record.ip, fw = FQDN_WIDTH, iw = IP_WIDTH)
    } else {
        format!(
            "{:<fw$} {:<iw$} PTR: {}",
            record.fqdn,
            record.ip,
            record.ptrs.join(", "),
            fw = FQDN_WIDTH,
            iw = IP_WIDTH
        )
    }
}

pub fn render_text(records: &[Record]) -> String {
    records
        .iter()
        .map(|record| render_record_line(record) + "\n")
        .collect()
}

/// Quotes a CSV field, doubling embedded quotes (RFC 4180).
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn io_err(e: std::io::Error) -> SubprobeError {
    SubprobeError::OutputError(e.to_string())
}

pub struct OutputManager {
    config: OutputConfig,
}

impl OutputManager {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn write_report(&self, report: &EnumerationReport) -> Result<(), SubprobeError> {
        match &self.config.file {
            Some(file_path) => self.write_to_file(file_path, report),
            None => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                self.write_output(&mut handle, report)
            }
        }
    }

    fn write_to_file(&self, file_path: &str, report: &EnumerationReport) -> Result<(), SubprobeError> {
        if let Some(parent) = Path::new(file_path).parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SubprobeError::OutputError(format!("Failed to create directory: {}", e)))?;
        }

        let file = File::create(file_path)
            .map_err(|e| SubprobeError::OutputError(format!("Failed to create file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        self.write_output(&mut writer, report)?;
        writer.flush().map_err(io_err)?;

        info!("Results written to: {}", file_path);
        Ok(())
    }

    pub fn write_output<W: Write>(&self, writer: &mut W, report: &EnumerationReport) -> Result<(), SubprobeError> {
        match self.config.format {
            OutputFormat::Text => writer.write_all(render_text(&report.records).as_bytes()).map_err(io_err),
            OutputFormat::Json => self.write_json_output(writer, report),
            OutputFormat::Csv => self.write_csv_output(writer, report),
        }
    }

    fn write_json_output<W: Write>(&self, writer: &mut W, report: &EnumerationReport) -> Result<(), SubprobeError> {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| SubprobeError::OutputError(format!("Failed to serialize JSON: {}", e)))?;

        writeln!(writer, "{}", json).map_err(io_err)
    }

    fn write_csv_output<W: Write>(&self, writer: &mut W, report: &EnumerationReport) -> Result<(), SubprobeError> {
        writeln!(writer, "fqdn,ip,ptrs").map_err(io_err)?;

        for record in &report.records {
            writeln!(
                writer,
                "{},{},{}",
                csv_field(&record.fqdn),
                csv_field(&record.ip),
                csv_field(&record.ptrs.join(";"))
            )
            .map_err(io_err)?;
        }

        Ok(())
    }
}
