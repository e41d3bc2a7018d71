//! Hover overlay contents and placement.

use crate::mesh::Face;
use crate::scene::Viewport;
use serde::{Deserialize, Serialize};

/// Pointer affordance the host should show over the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipState {
    pub visible: bool,
    pub left_px: f64,
    pub top_px: f64,
    pub lines: Vec<String>,
}

impl TooltipState {
    pub fn hidden() -> Self {
        Self::default()
    }
}

/// "PKR 12,000" style amount with thousands separators.
pub fn format_amount(currency_label: &str, amount: u64) -> String {
    let grouped = format_num::format_num!(",.0f", amount as f64);
    if currency_label.is_empty() {
        grouped
    } else {
        format!("{currency_label} {grouped}")
    }
}

pub fn tooltip_lines(face: &Face, currency_label: &str) -> Vec<String> {
    vec![
        face.category.clone(),
        format_amount(currency_label, face.amount),
        format!("({:.1}%)", face.percentage()),
    ]
}

/// Places the overlay next to the pointer, `offset_px` right of and below it.
pub fn tooltip_position(ndc: (f64, f64), viewport: Viewport, offset_px: f64) -> (f64, f64) {
    let half_w = viewport.width / 2.0;
    let half_h = viewport.height / 2.0;
    let left = ndc.0 * half_w + half_w + offset_px;
    let top = -ndc.1 * half_h + half_h + offset_px;
    (left, top)
}
