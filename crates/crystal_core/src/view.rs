//! The mounted visualization: one context object per crystal on screen.

use crate::aggregate::aggregate;
use crate::config::CrystalConfig;
use crate::error::CrystalError;
use crate::interaction::{
    InteractionController, InteractionMode, PointerState, RawPosition, SurfaceRect,
};
use crate::ledger::Transaction;
use crate::mesh::{Face, MeshBuilder};
use crate::render::{render_frame, FrameReport, FrameScheduler, RenderBackend};
use crate::scene::Scene;

#[derive(Debug, Clone)]
pub struct CrystalView {
    scene: Scene,
    controller: InteractionController,
    mesh_builder: MeshBuilder,
    config: CrystalConfig,
    frames_rendered: u64,
}

impl CrystalView {
    /// Sets up the scene for a render target of the given size.
    ///
    /// Fails with [`CrystalError::MissingRenderTarget`] when the target has no
    /// measurable size and with [`CrystalError::InvalidConfig`] when `config`
    /// does not validate.
    pub fn mount(width: f64, height: f64, config: CrystalConfig) -> Result<Self, CrystalError> {
        config.validate()?;
        let scene = Scene::new(width, height)?;
        log::info!("mounted crystal view at {width}x{height}");
        Ok(Self {
            scene,
            controller: InteractionController::new(config.drag_sensitivity_deg_per_px),
            mesh_builder: MeshBuilder::new(config.overflow),
            config,
            frames_rendered: 0,
        })
    }

    /// Rebuilds the crystal from the full transaction list. Returns the number
    /// of faces now on screen.
    pub fn on_transactions_changed(&mut self, transactions: &[Transaction]) -> usize {
        let aggregation = aggregate(transactions);
        if aggregation.is_empty() {
            log::debug!("no expenses to show, clearing crystal");
        }
        let faces = self
            .mesh_builder
            .build(&aggregation.totals, aggregation.grand_total);
        let count = faces.len();
        self.scene.rebuild(faces);
        count
    }

    pub fn on_resize(&mut self, width: f64, height: f64) -> bool {
        self.scene.resize(width, height)
    }

    pub fn pointer_down(&mut self, raw: RawPosition) {
        self.controller.pointer_down(raw);
    }

    pub fn pointer_move(&mut self, raw: RawPosition, rect: &SurfaceRect) {
        self.controller
            .pointer_move(raw, rect, self.scene.crystal_mut());
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.controller.pointer_leave();
    }

    pub fn render_frame(
        &mut self,
        backend: &mut impl RenderBackend,
    ) -> Result<FrameReport, CrystalError> {
        let report = render_frame(
            &mut self.scene,
            self.controller.pointer(),
            &self.config,
            backend,
        )?;
        self.frames_rendered += 1;
        Ok(report)
    }

    /// Schedules the next frame before doing this frame's work.
    pub fn tick(
        &mut self,
        scheduler: &mut impl FrameScheduler,
        backend: &mut impl RenderBackend,
    ) -> Result<FrameReport, CrystalError> {
        scheduler.request_frame()?;
        self.render_frame(backend)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn faces(&self) -> &[Face] {
        self.scene.crystal().map(|c| c.faces()).unwrap_or(&[])
    }

    pub fn pointer(&self) -> &PointerState {
        self.controller.pointer()
    }

    pub fn mode(&self) -> InteractionMode {
        self.controller.mode()
    }

    pub fn config(&self) -> &CrystalConfig {
        &self.config
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}
