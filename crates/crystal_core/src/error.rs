use thiserror::Error;

/// Failures surfaced by the visualization core.
///
/// Degenerate data (no expenses) and face overflow are deliberately absent:
/// they resolve to an empty crystal and truncation respectively.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrystalError {
    #[error("render target has no measurable size ({width}x{height})")]
    MissingRenderTarget { width: f64, height: f64 },
    #[error("initialization failed: {0}")]
    InitializationFailed(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<anyhow::Error> for CrystalError {
    fn from(err: anyhow::Error) -> Self {
        CrystalError::InitializationFailed(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::CrystalError;
    use anyhow::{anyhow, Context};

    #[test]
    fn anyhow_chain_is_flattened_into_initialization_failure() {
        let err: anyhow::Result<()> = Err(anyhow!("no webgl2")).context("creating context");
        let converted = CrystalError::from(err.expect_err("should fail"));
        match converted {
            CrystalError::InitializationFailed(message) => {
                assert!(message.contains("creating context"), "message: {message}");
                assert!(message.contains("no webgl2"), "message: {message}");
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn missing_target_reports_dimensions() {
        let err = CrystalError::MissingRenderTarget {
            width: 0.0,
            height: 240.0,
        };
        assert_eq!(err.to_string(), "render target has no measurable size (0x240)");
    }
}
