//! `requestAnimationFrame`-backed frame scheduler.

use crystal_core::error::CrystalError;
use crystal_core::render::FrameScheduler;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub(crate) type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Re-arms the stored frame callback with the browser on every request.
#[derive(Clone)]
pub(crate) struct AnimationFrameScheduler {
    callback: FrameCallback,
}

impl AnimationFrameScheduler {
    pub(crate) fn new() -> Self {
        Self {
            callback: Rc::new(RefCell::new(None)),
        }
    }

    pub(crate) fn set_callback(&self, callback: Closure<dyn FnMut(f64)>) {
        *self.callback.borrow_mut() = Some(callback);
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> Result<(), CrystalError> {
        let window = web_sys::window()
            .ok_or_else(|| CrystalError::InitializationFailed("no window".to_string()))?;
        let slot = self.callback.borrow();
        let callback = slot.as_ref().ok_or_else(|| {
            CrystalError::InitializationFailed("frame callback not installed".to_string())
        })?;
        window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| CrystalError::InitializationFailed(format!("{e:?}")))?;
        Ok(())
    }
}
