use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("signal series is empty")]
    EmptySeries,
    #[error("invalid series length {len}: {reason}")]
    InvalidLength { len: usize, reason: &'static str },
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,
    #[error("capture returned {actual} samples, expected {expected}")]
    SampleCountMismatch { expected: usize, actual: usize },
    #[error("failed to capture samples: {0}")]
    Capture(String),
    #[error("failed to render frame: {0}")]
    Render(String),
    #[error("failed to export capture: {0}")]
    Export(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ScopeError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ScopeError::Render(format!("{value:?}"))
    }
}
impl From<image::ImageError> for ScopeError {
    fn from(value: image::ImageError) -> Self {
        ScopeError::Render(value.to_string())
    }
}
impl From<serialport::Error> for ScopeError {
    fn from(value: serialport::Error) -> Self {
        ScopeError::Capture(value.to_string())
    }
}
