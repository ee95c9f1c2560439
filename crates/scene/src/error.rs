use gpu::program::GpuError;

/// Why a scene fell back to an undrawn surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    ContextUnavailable,
    Gpu(GpuError),
}

impl std::fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradeReason::ContextUnavailable => write!(f, "no WebGL rendering context"),
            DegradeReason::Gpu(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DegradeReason {}

impl From<GpuError> for DegradeReason {
    fn from(err: GpuError) -> Self {
        DegradeReason::Gpu(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Missing { id: String },
    NotNumeric { id: String, value: String },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Missing { id } => write!(f, "input element #{id} not found"),
            InputError::NotNumeric { id, value } => {
                write!(f, "input element #{id} has non-numeric value {value:?}")
            }
        }
    }
}

impl std::error::Error for InputError {}

/// A per-frame failure; it stops the render loop that hit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    Input(InputError),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Input(err) => write!(f, "reading rotation input: {err}"),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<InputError> for FrameError {
    fn from(err: InputError) -> Self {
        FrameError::Input(err)
    }
}

/// A scene configuration that cannot be used.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "scene config is not valid JSON: {msg}"),
            ConfigError::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "scene config {field} = {value} must be {expected}"),
        }
    }
}

impl std::error::Error for ConfigError {}
