use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use crate::drivers::{CalibrationProfile, SpectrumMethod};

/// Where samples come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Simulated {
        frequency_hz: f64,
        amplitude_v: f64,
        #[serde(default)]
        offset_v: f64,
        #[serde(default)]
        noise_v: f64,
    },
    Serial {
        port: String,
        baud_rate: u32,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Simulated {
            frequency_hz: 200.0,
            amplitude_v: 3.0,
            offset_v: 0.0,
            noise_v: 0.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub calibration: CalibrationProfile,
    pub spectrum_method: SpectrumMethod,
    /// Samples per capture, one per display column.
    pub sample_count: usize,
    pub source: SourceConfig,
    pub output_dir: PathBuf,
    pub recipients: Vec<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            calibration: CalibrationProfile::default(),
            spectrum_method: SpectrumMethod::default(),
            sample_count: 240,
            source: SourceConfig::default(),
            output_dir: PathBuf::from("uscope-out"),
            recipients: Vec::new(),
        }
    }
}

impl ScopeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: ScopeConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        anyhow::ensure!(config.sample_count >= 2, "sample_count must be at least 2");
        Ok(config)
    }

    /// Recipients in the comma-separated form the exporter expects.
    pub fn recipient_list(&self) -> String {
        self.recipients.join(",")
    }
}
