//! The `crystal_core` crate turns a ledger of transactions into an interactive
//! polyhedron whose faces stand for spending categories.
//! It has no DOM or GPU dependency; hosts plug in through two small traits.
//!
//! Key components:
//! - **Aggregate / Mesh**: per-category expense totals, ranked onto the 20 faces of an icosahedron.
//! - **Scene**: camera, lights and the single live `CrystalGroup`.
//! - **Interaction / Picking**: drag rotation by quaternion composition and ray hit tests.
//! - **Render**: `FrameScheduler` and `RenderBackend` seams plus the per-frame update.
//! - **View**: `CrystalView`, the context object a host mounts and drives.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod interaction;
pub mod ledger;
pub mod mesh;
pub mod palette;
pub mod picking;
pub mod polyhedron;
pub mod render;
pub mod scene;
pub mod tooltip;
pub mod view;

pub use config::{CrystalConfig, OverflowPolicy};
pub use error::CrystalError;
pub use ledger::{Transaction, TransactionKind};
pub use view::CrystalView;
