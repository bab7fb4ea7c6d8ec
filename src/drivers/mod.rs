// src/drivers/mod.rs
pub mod calibration;
pub mod error;
pub mod fft;
pub mod frequency;
pub mod input;
pub mod metrics;
pub mod pipeline;
pub mod plot;
pub mod scale;
pub mod source;
// re-export what the controller and the entry point wire together
pub use calibration::CalibrationProfile;
pub use error::ScopeError;
pub use fft::SpectrumMethod;
pub use input::{InputSource, LineInput, ScriptedInput};
pub use metrics::peak_magnitude;
pub use pipeline::SignalPipeline;
pub use plot::{GridSpec, Icon, PngScreen, Screen, TraceColor, PLOT_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use scale::{map_to_pixels, AxisScaleState, PlotMode};
pub use source::{SampleSource, SerialSource, SimulatedSource};
