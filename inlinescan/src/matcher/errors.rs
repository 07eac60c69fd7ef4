use crate::cfg::BuildError;

/// Matching failure.
#[derive(Debug)]
pub enum MatchError {
    /// The CFG frontend failed; no partial results exist.
    Build(BuildError),
    /// A matched path pair lost its length alignment. Caller bug.
    LengthMismatch {
        /// Length of the first path.
        left: usize,
        /// Length of the second path.
        right: usize,
    },
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Build(e) => write!(f, "CFG build failed: {e}"),
            Self::LengthMismatch { left, right } => {
                write!(f, "matched paths have unequal lengths ({left} vs {right})")
            }
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Build(e) => Some(e),
            Self::LengthMismatch { .. } => None,
        }
    }
}

impl From<BuildError> for MatchError {
    fn from(e: BuildError) -> Self {
        Self::Build(e)
    }
}

/// State persistence failure. Surfaced without side effects.
#[derive(Debug)]
pub enum StateError {
    /// Reading or writing the state stream failed.
    Io(std::io::Error),
    /// A record could not be encoded.
    Encode(serde_json::Error),
    /// A record payload could not be decoded.
    Decode(serde_json::Error),
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "state I/O error: {e}"),
            Self::Encode(e) => write!(f, "state encode error: {e}"),
            Self::Decode(e) => write!(f, "state decode error: {e}"),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Encode(e) | Self::Decode(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StateError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
