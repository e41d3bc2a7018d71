//! Maps ranked category totals onto triangles of the base polyhedron.

use crate::aggregate::CategoryTotal;
use crate::config::OverflowPolicy;
use crate::palette::{category_color, Rgb};
use crate::polyhedron::{Icosahedron, Triangle};
use serde::{Deserialize, Serialize};

pub const OTHER_CATEGORY: &str = "Other";

/// One pickable, flat-shaded triangle bound to a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub category: String,
    pub amount: u64,
    pub share_of_total: f64,
    pub color: Rgb,
    pub geometry_index: usize,
    pub triangle: Triangle,
}

impl Face {
    /// Share expressed as a percentage rounded to one decimal.
    pub fn percentage(&self) -> f64 {
        (self.share_of_total * 1000.0).round() / 10.0
    }
}

#[derive(Debug, Clone)]
pub struct MeshBuilder {
    base: Icosahedron,
    overflow: OverflowPolicy,
}

impl MeshBuilder {
    pub fn new(overflow: OverflowPolicy) -> Self {
        Self {
            base: Icosahedron::default(),
            overflow,
        }
    }

    pub fn face_budget(&self) -> usize {
        self.base.face_count()
    }

    pub fn build(&self, totals: &[CategoryTotal], grand_total: u64) -> Vec<Face> {
        if grand_total == 0 || totals.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<&CategoryTotal> = totals.iter().collect();
        ranked.sort_by(|a, b| b.amount.cmp(&a.amount));

        let budget = self.face_budget();
        let assigned: Vec<(String, u64)> = if ranked.len() <= budget {
            ranked
                .iter()
                .map(|t| (t.category.clone(), t.amount))
                .collect()
        } else {
            log::debug!(
                "{} categories exceed the {} available faces ({:?})",
                ranked.len(),
                budget,
                self.overflow
            );
            match self.overflow {
                OverflowPolicy::Truncate => ranked[..budget]
                    .iter()
                    .map(|t| (t.category.clone(), t.amount))
                    .collect(),
                OverflowPolicy::MergeIntoOther => merge_tail(&ranked, budget),
            }
        };

        assigned
            .into_iter()
            .enumerate()
            .filter_map(|(geometry_index, (category, amount))| {
                let triangle = self.base.triangle(geometry_index)?;
                Some(Face {
                    color: category_color(&category),
                    share_of_total: share(amount, grand_total),
                    category,
                    amount,
                    geometry_index,
                    triangle,
                })
            })
            .collect()
    }
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new(OverflowPolicy::default())
    }
}

/// Builds faces with the default base polyhedron.
pub fn build_faces(
    totals: &[CategoryTotal],
    grand_total: u64,
    overflow: OverflowPolicy,
) -> Vec<Face> {
    MeshBuilder::new(overflow).build(totals, grand_total)
}

fn share(amount: u64, grand_total: u64) -> f64 {
    if grand_total == 0 {
        0.0
    } else {
        amount as f64 / grand_total as f64
    }
}

// The top `budget - 1` keep their rank; everything after is summed into the
// "Other" bucket, which joins an existing "Other" entry if one was kept.
fn merge_tail(ranked: &[&CategoryTotal], budget: usize) -> Vec<(String, u64)> {
    let keep = budget.saturating_sub(1);
    let mut assigned: Vec<(String, u64)> = ranked[..keep]
        .iter()
        .map(|t| (t.category.clone(), t.amount))
        .collect();
    let remainder = ranked[keep..]
        .iter()
        .fold(0u64, |acc, t| acc.saturating_add(t.amount));

    match assigned.iter_mut().find(|(name, _)| name == OTHER_CATEGORY) {
        Some((_, amount)) => *amount = amount.saturating_add(remainder),
        None => assigned.push((OTHER_CATEGORY.to_string(), remainder)),
    }
    assigned
}
