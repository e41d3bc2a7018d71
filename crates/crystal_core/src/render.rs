//! One frame of the animation loop and the seams it runs against.

use crate::config::CrystalConfig;
use crate::error::CrystalError;
use crate::interaction::PointerState;
use crate::picking::pick;
use crate::scene::Scene;
use crate::tooltip::{tooltip_lines, tooltip_position, Cursor, TooltipState};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Host hook that arranges for the next frame to run, e.g. through
/// `requestAnimationFrame`. Tests drive frames by hand instead.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<(), CrystalError>;
}

/// Draws the current scene. Implementations must cope with a scene that has
/// no crystal.
pub trait RenderBackend {
    fn draw(&mut self, scene: &Scene) -> Result<(), CrystalError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverInfo {
    pub category: String,
    pub amount: u64,
    pub percentage: f64,
}

/// What the host should reflect in the DOM after a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub hover: Option<HoverInfo>,
    pub tooltip: TooltipState,
    pub cursor: Cursor,
}

pub fn idle_rotation(yaw: f64, pitch: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw)
}

/// Picks, updates overlay state, applies idle rotation, then draws.
pub fn render_frame(
    scene: &mut Scene,
    pointer: &PointerState,
    config: &CrystalConfig,
    backend: &mut impl RenderBackend,
) -> Result<FrameReport, CrystalError> {
    let (ndc_x, ndc_y) = pointer.normalized();

    let hit = if pointer.has_position() {
        pick(scene, ndc_x, ndc_y)
    } else {
        None
    };

    let report = match hit {
        Some(hit) => {
            let (left_px, top_px) =
                tooltip_position((ndc_x, ndc_y), scene.viewport(), config.tooltip_offset_px);
            FrameReport {
                hover: Some(HoverInfo {
                    category: hit.face.category.clone(),
                    amount: hit.face.amount,
                    percentage: hit.face.percentage(),
                }),
                tooltip: TooltipState {
                    visible: true,
                    left_px,
                    top_px,
                    lines: tooltip_lines(hit.face, &config.currency_label),
                },
                cursor: Cursor::Pointer,
            }
        }
        None => FrameReport::default(),
    };

    if !pointer.is_dragging {
        if let Some(crystal) = scene.crystal_mut() {
            crystal.rotate_local(idle_rotation(
                config.idle_yaw_per_frame,
                config.idle_pitch_per_frame,
            ));
        }
    }

    backend.draw(scene)?;
    Ok(report)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{FrameScheduler, RenderBackend};
    use crate::error::CrystalError;
    use crate::scene::Scene;

    #[derive(Debug, Default)]
    pub struct RecordingBackend {
        pub draws: usize,
        pub faces_seen: Vec<usize>,
        pub fail_next: bool,
    }

    impl RenderBackend for RecordingBackend {
        fn draw(&mut self, scene: &Scene) -> Result<(), CrystalError> {
            if self.fail_next {
                self.fail_next = false;
                return Err(CrystalError::InitializationFailed("context lost".to_string()));
            }
            self.draws += 1;
            self.faces_seen
                .push(scene.crystal().map(|c| c.faces().len()).unwrap_or(0));
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub struct ManualScheduler {
        pub requested: usize,
    }

    impl FrameScheduler for ManualScheduler {
        fn request_frame(&mut self) -> Result<(), CrystalError> {
            self.requested += 1;
            Ok(())
        }
    }
}
