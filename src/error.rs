use std::fmt;

use thiserror::Error;

/// Host capability the background needs before it can start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// No GPU adapter, device or drawable surface could be acquired.
    Renderer(String),
    /// The element that should host the canvas is not in the document.
    MountPoint(String),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renderer(reason) => write!(f, "3D rendering is not available ({reason})"),
            Self::MountPoint(id) => write!(f, "mount point #{id} was not found"),
        }
    }
}

/// Errors surfaced by the background, its renderers and the preference stores.
#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("{0}")]
    CapabilityUnavailable(Capability),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("GPU is out of memory")]
    OutOfMemory,
    #[error("preference store error: {0}")]
    Preferences(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BackdropError {
    pub fn renderer_unavailable(reason: impl fmt::Display) -> Self {
        Self::CapabilityUnavailable(Capability::Renderer(reason.to_string()))
    }

    pub fn mount_point_missing(id: impl Into<String>) -> Self {
        Self::CapabilityUnavailable(Capability::MountPoint(id.into()))
    }

    /// Whether the error only means the background should stay disabled.
    pub fn is_capability(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_messages_name_the_missing_piece() {
        let err = BackdropError::mount_point_missing("canvas-container");
        assert_eq!(err.to_string(), "mount point #canvas-container was not found");
        assert!(err.is_capability());

        let err = BackdropError::renderer_unavailable("no adapter");
        assert_eq!(err.to_string(), "3D rendering is not available (no adapter)");
        assert!(!BackdropError::OutOfMemory.is_capability());
    }
}
