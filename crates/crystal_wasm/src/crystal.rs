//! JS-facing handle: mounts the crystal into a DOM container and drives it.

use crate::logger;
use crate::scheduler::AnimationFrameScheduler;
use crate::webgl::WebGlBackend;
use crystal_core::error::CrystalError;
use crystal_core::interaction::{RawPosition, SurfaceRect};
use crystal_core::render::{FrameReport, FrameScheduler};
use crystal_core::tooltip::Cursor;
use crystal_core::{CrystalConfig, CrystalView, Transaction};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement, MouseEvent};

struct Mounted {
    view: CrystalView,
    backend: WebGlBackend,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    tooltip: HtmlElement,
    cursor: Cursor,
}

impl Mounted {
    fn resize_to_container(&mut self) {
        let (width, height) = container_size(&self.container);
        if self.view.on_resize(width, height) {
            self.backend.resize(width, height);
        }
    }

    fn surface_rect(&self) -> SurfaceRect {
        let rect = self.canvas.get_bounding_client_rect();
        SurfaceRect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn apply_report(&mut self, report: &FrameReport) {
        let style = self.tooltip.style();
        if report.tooltip.visible {
            let _ = style.set_property("display", "block");
            let _ = style.set_property("left", &format!("{}px", report.tooltip.left_px));
            let _ = style.set_property("top", &format!("{}px", report.tooltip.top_px));
            self.tooltip
                .set_text_content(Some(&report.tooltip.lines.join("\n")));
        } else {
            let _ = style.set_property("display", "none");
        }

        if report.cursor != self.cursor {
            if let Some(body) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.body())
            {
                let _ = body.style().set_property("cursor", report.cursor.as_css());
            }
            self.cursor = report.cursor;
        }
    }
}

/// Per-face data handed back to the host page.
#[derive(Serialize)]
struct FaceSummary {
    category: String,
    amount: u64,
    share_of_total: f64,
    percentage: f64,
    color: String,
    geometry_index: usize,
}

#[wasm_bindgen]
pub struct WasmCrystal {
    inner: Rc<RefCell<Mounted>>,
}

#[wasm_bindgen]
impl WasmCrystal {
    /// Creates a canvas inside `container`, starts the render loop and wires
    /// pointer and window events. `config` may be `undefined` or a partial
    /// configuration object.
    pub fn mount(
        container: HtmlElement,
        tooltip: HtmlElement,
        config: JsValue,
    ) -> Result<WasmCrystal, JsValue> {
        console_error_panic_hook::set_once();

        let config = parse_config(config)?;
        logger::init(config.level_filter().map_err(to_js)?);

        let (width, height) = container_size(&container);
        let view = CrystalView::mount(width, height, config).map_err(to_js)?;

        let canvas = create_canvas()?;
        let mut backend = WebGlBackend::new(canvas.clone())
            .map_err(|e| to_js(CrystalError::from(e)))?;
        backend.resize(width, height);
        container.append_child(&canvas)?;

        let _ = tooltip.style().set_property("white-space", "pre-line");
        let _ = tooltip.style().set_property("display", "none");

        let inner = Rc::new(RefCell::new(Mounted {
            view,
            backend,
            container,
            canvas,
            tooltip,
            cursor: Cursor::Default,
        }));
        attach_listeners(&inner)?;
        start_render_loop(inner.clone())?;

        Ok(WasmCrystal { inner })
    }

    /// Rebuilds the crystal from the full transaction list and returns the
    /// number of faces drawn.
    pub fn on_transactions_changed(&self, transactions: JsValue) -> Result<usize, JsValue> {
        let transactions: Vec<Transaction> = from_value(transactions)
            .map_err(|e| JsValue::from_str(&format!("Invalid transactions: {}", e)))?;
        Ok(self
            .inner
            .borrow_mut()
            .view
            .on_transactions_changed(&transactions))
    }

    pub fn on_resize(&self) {
        self.inner.borrow_mut().resize_to_container();
    }

    pub fn face_summary(&self) -> Result<JsValue, JsValue> {
        let inner = self.inner.borrow();
        let faces: Vec<FaceSummary> = inner
            .view
            .faces()
            .iter()
            .map(|face| FaceSummary {
                category: face.category.clone(),
                amount: face.amount,
                share_of_total: face.share_of_total,
                percentage: face.percentage(),
                color: format!("#{:06x}", face.color.to_hex()),
                geometry_index: face.geometry_index,
            })
            .collect();
        to_value(&faces).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

fn to_js(err: CrystalError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_config(config: JsValue) -> Result<CrystalConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(CrystalConfig::default());
    }
    from_value(config).map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))
}

fn container_size(container: &HtmlElement) -> (f64, f64) {
    (container.client_width() as f64, container.client_height() as f64)
}

/// The canvas stays detached until a backend exists for it.
fn create_canvas() -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| to_js(CrystalError::InitializationFailed("no document".to_string())))?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| to_js(CrystalError::InitializationFailed("not a canvas".to_string())))?;
    let _ = canvas.style().set_property("display", "block");
    Ok(canvas)
}

fn attach_listeners(inner: &Rc<RefCell<Mounted>>) -> Result<(), JsValue> {
    let canvas = inner.borrow().canvas.clone();

    {
        let inner = inner.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |event: MouseEvent| {
            let raw = RawPosition::new(event.client_x() as f64, event.client_y() as f64);
            inner.borrow_mut().view.pointer_down(raw);
        }));
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let inner = inner.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |event: MouseEvent| {
            let raw = RawPosition::new(event.client_x() as f64, event.client_y() as f64);
            let mut mounted = inner.borrow_mut();
            let rect = mounted.surface_rect();
            mounted.view.pointer_move(raw, &rect);
        }));
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let inner = inner.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_event: MouseEvent| {
            inner.borrow_mut().view.pointer_up();
        }));
        canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let inner = inner.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_event: MouseEvent| {
            inner.borrow_mut().view.pointer_leave();
        }));
        canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let inner = inner.clone();
        let window = web_sys::window()
            .ok_or_else(|| to_js(CrystalError::InitializationFailed("no window".to_string())))?;
        let closure = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            inner.borrow_mut().resize_to_container();
        }));
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Remembers whether the last frame failed, so a failure that persists
/// (e.g. a lost GL context) is logged once instead of every frame.
#[derive(Debug, Default)]
struct FrameHealth {
    failing: bool,
}

impl FrameHealth {
    /// Returns true if this is the first failure since the last success.
    fn record_failure(&mut self) -> bool {
        !std::mem::replace(&mut self.failing, true)
    }

    /// Returns true if this success ends a run of failures.
    fn record_success(&mut self) -> bool {
        std::mem::replace(&mut self.failing, false)
    }
}

fn start_render_loop(inner: Rc<RefCell<Mounted>>) -> Result<(), JsValue> {
    let scheduler = AnimationFrameScheduler::new();
    let mut frame_scheduler = scheduler.clone();
    let mut health = FrameHealth::default();

    scheduler.set_callback(Closure::wrap(Box::new(move |_timestamp: f64| {
        let mut mounted = inner.borrow_mut();
        let Mounted { view, backend, .. } = &mut *mounted;
        match view.tick(&mut frame_scheduler, backend) {
            Ok(report) => {
                if health.record_success() {
                    log::info!("frame rendering recovered");
                }
                mounted.apply_report(&report);
            }
            Err(err) => {
                if health.record_failure() {
                    log::error!("frame failed: {err}");
                }
            }
        }
    }) as Box<dyn FnMut(f64)>));

    let mut first = scheduler;
    first.request_frame().map_err(to_js)
}
