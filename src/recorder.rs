use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use crate::drivers::ScopeError;

/// Ships one capture with its summary to a list of recipients.
pub trait Exporter {
    fn export(
        &mut self,
        period_seconds: f64,
        samples: &[f64],
        summary: &str,
        recipients: &str,
    ) -> Result<(), ScopeError>;
}

/// Writes each export as a CSV file instead of mailing it.
pub struct CsvExporter {
    output_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ScopeError> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn next_path(&self) -> PathBuf {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.output_dir
            .join(format!("capture_{}_{:03}.csv", timestamp, self.written.len()))
    }
}

impl Exporter for CsvExporter {
    fn export(
        &mut self,
        period_seconds: f64,
        samples: &[f64],
        summary: &str,
        recipients: &str,
    ) -> Result<(), ScopeError> {
        let path = self.next_path();
        write_capture(&path, period_seconds, samples, summary, recipients)?;
        log::info!("exported {} samples to {}", samples.len(), path.display());
        self.written.push(path);
        Ok(())
    }
}

fn write_capture(
    path: &Path,
    period_seconds: f64,
    samples: &[f64],
    summary: &str,
    recipients: &str,
) -> Result<(), ScopeError> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "# to: {recipients}")?;
    for line in summary.lines() {
        writeln!(w, "# {line}")?;
    }
    writeln!(w, "Time,Voltage")?;
    for (i, value) in samples.iter().enumerate() {
        writeln!(w, "{:.6},{:.4}", i as f64 * period_seconds, value)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_export_contains_header_and_rows() {
        let dir = std::env::temp_dir().join(format!("uscope-export-{}", std::process::id()));
        let mut exporter = CsvExporter::new(&dir).unwrap();
        exporter
            .export(0.001, &[1.0, -0.5], "Vmax: 1.00", "a@example.org,b@example.org")
            .unwrap();
        let path = exporter.written()[0].clone();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# to: a@example.org,b@example.org");
        assert_eq!(lines[1], "# Vmax: 1.00");
        assert_eq!(lines[2], "Time,Voltage");
        assert_eq!(lines[3], "0.000000,1.0000");
        assert_eq!(lines[4], "0.001000,-0.5000");
        std::fs::remove_dir_all(&dir).ok();
    }
}
