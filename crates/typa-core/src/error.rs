//! Error types for Typa

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TypaError>;

/// Main error type for Typa
#[derive(Debug, Error)]
pub enum TypaError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Shaping failed: {0}")]
    ShapingFailed(#[from] ShapingError),

    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Resource limit exceeded: {0}")]
    ResourceLimit(#[from] ResourceLimitError),

    #[error("Invalid primitive: {0}")]
    Primitive(#[from] PrimitiveError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Unable to read font: {0}")]
    UnableToReadFont(String),

    #[error("Unrecognized font encoding: {0}")]
    UnrecognizedFontEncoding(String),

    #[error("No usable font for `{0}`")]
    NoUsableFont(String),
}

/// Shaping errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("Invalid text input")]
    InvalidText,

    #[error("Font data could not be parsed by the shaper")]
    UnparsableFont,

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Canvas row {y} could not be synced")]
    SyncFailed { y: i64 },

    #[error("{rows} canvas row(s) failed to sync")]
    PartialWrite { rows: usize },

    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    #[error("Delegate failed: {0}")]
    DelegateFailed(String),
}

/// Resource accounting errors
#[derive(Debug, Error)]
pub enum ResourceLimitError {
    #[error("width or height exceeds limit ({kind} = {amount})")]
    WidthOrHeightExceedsLimit { kind: &'static str, amount: f64 },
}

/// Errors raised while parsing the drawing primitive grammar
#[derive(Debug, Error)]
pub enum PrimitiveError {
    #[error("Unknown primitive keyword: {0}")]
    UnknownKeyword(String),

    #[error("Malformed {keyword} primitive: {detail}")]
    Malformed { keyword: &'static str, detail: String },
}

/// Image encoding errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

impl TypaError {
    /// Short reason tag used when the error is recorded as a diagnostic
    pub fn tag(&self) -> &'static str {
        match self {
            TypaError::FontLoad(FontLoadError::UnrecognizedFontEncoding(_)) => {
                "UnrecognizedFontEncoding"
            },
            TypaError::FontLoad(FontLoadError::NoUsableFont(_)) => "NoUsableFont",
            TypaError::FontLoad(_) => "UnableToReadFont",
            TypaError::ShapingFailed(_) => "UnableToShapeText",
            TypaError::RenderingFailed(RenderError::BackendUnavailable(_)) => {
                "DelegateLibrarySupportNotBuiltIn"
            },
            TypaError::RenderingFailed(RenderError::DelegateFailed(_)) => "DelegateFailed",
            TypaError::RenderingFailed(_) => "UnableToAnnotateImage",
            TypaError::ResourceLimit(_) => "WidthOrHeightExceedsLimit",
            TypaError::Primitive(_) => "NonconformingDrawingPrimitiveDefinition",
            TypaError::Export(_) => "UnableToWriteImage",
            TypaError::InvalidAttribute(_) => "InvalidArgument",
            TypaError::Io(_) => "UnableToOpenFile",
        }
    }
}
