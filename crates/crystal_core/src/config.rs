use crate::error::CrystalError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What the mesh builder does with categories beyond the base polyhedron's
/// triangle budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the top-ranked categories and drop the rest.
    #[default]
    Truncate,
    /// Keep the top `F - 1` categories and fold the remainder into one
    /// "Other" face.
    MergeIntoOther,
}

/// Tunable behaviour of a mounted crystal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrystalConfig {
    /// Degrees of rotation per pixel of drag.
    pub drag_sensitivity_deg_per_px: f64,
    /// Idle yaw applied each frame, in radians.
    pub idle_yaw_per_frame: f64,
    /// Idle pitch applied each frame, in radians.
    pub idle_pitch_per_frame: f64,
    pub tooltip_offset_px: f64,
    pub currency_label: String,
    pub overflow: OverflowPolicy,
    pub log_level: String,
}

impl Default for CrystalConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity_deg_per_px: 1.0,
            idle_yaw_per_frame: 0.002,
            idle_pitch_per_frame: 0.0005,
            tooltip_offset_px: 10.0,
            currency_label: "PKR".to_string(),
            overflow: OverflowPolicy::Truncate,
            log_level: "warn".to_string(),
        }
    }
}

impl CrystalConfig {
    pub fn validate(&self) -> Result<(), CrystalError> {
        let finite = [
            ("drag_sensitivity_deg_per_px", self.drag_sensitivity_deg_per_px),
            ("idle_yaw_per_frame", self.idle_yaw_per_frame),
            ("idle_pitch_per_frame", self.idle_pitch_per_frame),
            ("tooltip_offset_px", self.tooltip_offset_px),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(CrystalError::InvalidConfig(format!("{name} must be finite")));
            }
        }
        if self.drag_sensitivity_deg_per_px <= 0.0 {
            return Err(CrystalError::InvalidConfig(
                "drag_sensitivity_deg_per_px must be positive".to_string(),
            ));
        }
        if self.tooltip_offset_px < 0.0 {
            return Err(CrystalError::InvalidConfig(
                "tooltip_offset_px must not be negative".to_string(),
            ));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, CrystalError> {
        LevelFilter::from_str(&self.log_level).map_err(|_| {
            CrystalError::InvalidConfig(format!("unknown log level '{}'", self.log_level))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CrystalConfig, OverflowPolicy};
    use crate::error::CrystalError;
    use log::LevelFilter;

    #[test]
    fn defaults_are_valid() {
        let config = CrystalConfig::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.level_filter().expect("level"), LevelFilter::Warn);
        assert_eq!(config.overflow, OverflowPolicy::Truncate);
    }

    #[test]
    fn partial_payload_keeps_remaining_defaults() {
        let config: CrystalConfig = serde_json::from_str(
            r#"{ "drag_sensitivity_deg_per_px": 0.5, "overflow": "merge_into_other" }"#,
        )
        .expect("config should parse");
        assert_eq!(config.drag_sensitivity_deg_per_px, 0.5);
        assert_eq!(config.overflow, OverflowPolicy::MergeIntoOther);
        assert_eq!(config.currency_label, "PKR");
        assert_eq!(config.idle_yaw_per_frame, 0.002);
    }

    #[test]
    fn rejects_non_finite_and_non_positive_values() {
        let config = CrystalConfig {
            idle_yaw_per_frame: f64::NAN,
            ..CrystalConfig::default()
        };
        assert!(matches!(config.validate(), Err(CrystalError::InvalidConfig(_))));

        let config = CrystalConfig {
            drag_sensitivity_deg_per_px: 0.0,
            ..CrystalConfig::default()
        };
        assert!(matches!(config.validate(), Err(CrystalError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let config = CrystalConfig {
            log_level: "chatty".to_string(),
            ..CrystalConfig::default()
        };
        let err = config.validate().expect_err("level should be rejected");
        assert!(err.to_string().contains("chatty"), "unexpected error: {err}");
    }
}
