//! Error types for layout resolution.

use thiserror::Error;

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported while resolving a module specification.
///
/// All variants are local validation failures. The engine never recovers from
/// them; the caller corrects the spec and resolves again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The fixed-height sections need more room than the interior provides.
    #[error("overconstrained layout: fixed sections need {fixed:.3} mm but only {available:.3} mm is available")]
    OverconstrainedLayout {
        /// Total height requested by absolute sections (mm).
        fixed: f64,
        /// Interior height available to sections (mm).
        available: f64,
    },

    /// A section specification is malformed.
    #[error("invalid section {section}: {reason}")]
    InvalidSectionSpec {
        /// Index of the offending section (bottom to top).
        section: usize,
        /// Human readable description of the problem.
        reason: String,
    },

    /// A section asks for more depth than the module has.
    #[error("section {section} depth {depth:.3} mm exceeds module depth {module_depth:.3} mm")]
    DepthExceedsModule {
        /// Index of the offending section.
        section: usize,
        /// Requested section depth (mm).
        depth: f64,
        /// Module depth (mm).
        module_depth: f64,
    },

    /// Left and right widths of an asymmetric module do not fill the interior.
    #[error(
        "asymmetric width mismatch: left {left:.3} + right {right:.3} + divider {divider:.3} != interior {interior:.3}"
    )]
    AsymmetricWidthMismatch {
        /// Interior width of the left side (mm).
        left: f64,
        /// Interior width of the right side (mm).
        right: f64,
        /// Shared divider thickness (mm).
        divider: f64,
        /// Interior width of the whole module (mm).
        interior: f64,
    },

    /// Module-level dimensions are unusable.
    #[error("invalid module: {0}")]
    InvalidModule(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidSectionSpec`].
    pub fn invalid_section(section: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSectionSpec {
            section,
            reason: reason.into(),
        }
    }

    /// Returns true if the error concerns a single section rather than the module.
    pub fn is_section_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSectionSpec { .. } | Self::DepthExceedsModule { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overconstrained_message() {
        let err = Error::OverconstrainedLayout {
            fixed: 2500.0,
            available: 2364.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("2500.000"));
        assert!(msg.contains("2364.000"));
        assert!(!err.is_section_error());
    }

    #[test]
    fn test_invalid_section_helper() {
        let err = Error::invalid_section(2, "drawer count is zero");
        assert_eq!(
            err,
            Error::InvalidSectionSpec {
                section: 2,
                reason: "drawer count is zero".to_string()
            }
        );
        assert!(err.is_section_error());
    }
}
