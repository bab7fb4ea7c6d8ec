// src/main.rs
mod config;
mod drivers;
mod engine;
mod recorder;
mod types;
use std::io;
use std::path::PathBuf;
use anyhow::{Context, Result};
use config::{ScopeConfig, SourceConfig};
use drivers::{
    LineInput, PngScreen, SampleSource, ScriptedInput, SerialSource, SignalPipeline,
    SimulatedSource,
};
use engine::Oscilloscope;
use recorder::CsvExporter;
fn load_config() -> Result<ScopeConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => ScopeConfig::load(&PathBuf::from(path)),
        None => {
            log::info!("no config file given, using defaults");
            Ok(ScopeConfig::default())
        }
    }
}
fn open_source(config: &ScopeConfig) -> Result<Box<dyn SampleSource>> {
    let source: Box<dyn SampleSource> = match &config.source {
        SourceConfig::Simulated {
            frequency_hz,
            amplitude_v,
            offset_v,
            noise_v,
        } => Box::new(SimulatedSource::new(
            *frequency_hz,
            *amplitude_v,
            *offset_v,
            *noise_v,
            config.calibration,
        )),
        SourceConfig::Serial { port, baud_rate } => Box::new(
            SerialSource::open(port, *baud_rate)
                .with_context(|| format!("opening ADC front-end on {port}"))?,
        ),
    };
    Ok(source)
}
/// Optional second argument: comma-separated button codes to replay instead of
/// reading presses from stdin.
fn scripted_presses() -> Result<Option<Vec<u8>>> {
    let Some(arg) = std::env::args().nth(2) else {
        return Ok(None);
    };
    let presses = arg
        .split(',')
        .map(|code| {
            code.trim()
                .parse::<u8>()
                .with_context(|| format!("invalid button code {code:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(presses))
}
fn main() -> Result<()> {
    env_logger::init();
    let config = load_config()?;
    log::info!(
        "uscope starting: {:?} calibration, {:?} spectrum, {} samples per capture",
        config.calibration,
        config.spectrum_method,
        config.sample_count
    );
    let source = open_source(&config)?;
    let pipeline = SignalPipeline::new(
        source,
        config.calibration,
        config.sample_count,
        config.spectrum_method,
    );
    let screen = PngScreen::new(config.output_dir.join("frames"))
        .context("creating frame output directory")?;
    let exporter = CsvExporter::new(config.output_dir.join("exports"))
        .context("creating export directory")?;
    let mut scope = Oscilloscope::new(pipeline, screen, exporter, config.recipient_list());
    match scripted_presses()? {
        Some(presses) => engine::run(&mut scope, &mut ScriptedInput::new(presses)),
        None => engine::run(&mut scope, &mut LineInput::new(io::stdin().lock())),
    }
    log::info!(
        "wrote {} frames and {} exports under {}",
        scope.screen().frames_written(),
        scope.exporter().written().len(),
        config.output_dir.display()
    );
    Ok(())
}
