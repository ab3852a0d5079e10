use std::path::PathBuf;

use crate::document::model::FrameKind;

/// Non-fatal problem reported to the caller while loading or rendering.
///
/// The affected element is skipped; everything else still renders.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// An image device's icon could not be read or decoded.
    #[error("device #{index} '{name}': image '{}' unavailable, skipped", path.display())]
    MissingDeviceImage {
        /// Index of the device in the document.
        index: usize,
        /// Device display name.
        name: String,
        /// Icon path as stored in the document.
        path: PathBuf,
    },
    /// The logo image could not be read or decoded.
    #[error("logo '{}' unavailable, skipped", path.display())]
    MissingLogo {
        /// Logo path as stored in the document.
        path: PathBuf,
    },
    /// The overlay for the selected frame could not be read or decoded.
    #[error("{kind} frame '{}' unavailable, skipped", path.display())]
    MissingFrame {
        /// Selected frame tier.
        kind: FrameKind,
        /// Path the asset library resolved for the tier.
        path: PathBuf,
    },
    /// Text devices are present but no usable font is available.
    #[error("no font available, text devices skipped")]
    MissingFont,
    /// A stored logo path did not resolve relative to the document file.
    #[error("logo '{stored}' not found at '{}', cleared", resolved.display())]
    UnresolvedLogo {
        /// Path as it appeared in the document file.
        stored: String,
        /// Where it was looked up.
        resolved: PathBuf,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/warning.rs"]
mod tests;
