//! Browser bridge for `crystal_core`: WebGL2 drawing, DOM tooltip, pointer
//! events and the `requestAnimationFrame` loop.

mod crystal;
mod logger;
mod scheduler;
mod webgl;

pub use crystal::WasmCrystal;
