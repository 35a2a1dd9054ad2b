use crate::config::{ConfigError, check_prop};
use crate::gradient::GradientField;
use crate::grid::GridSize;
use crate::noise::{blend, gradient_noise};

/// A gradient field seen through a grid: integer grid index -> world coordinate.
///
/// The coordinate is computed directly from the index as
/// `lower + index * span / (dim - 1)`, with the product taken in integers and
/// a single rounding division, so there is no accumulated drift and the last
/// grid column lands exactly on the upper bound.
#[derive(Clone, Copy, Debug)]
pub struct FieldView {
    pub field: GradientField,
    x_span: i64,
    y_span: i64,
    x_div: i64,
    y_div: i64,
}

impl FieldView {
    pub fn new(field: GradientField, grid: GridSize) -> Self {
        Self {
            field,
            x_span: field.x_bounds.size() as i64,
            y_span: field.y_bounds.size() as i64,
            x_div: (grid.w as i64 - 1).max(1),
            y_div: (grid.h as i64 - 1).max(1),
        }
    }

    /// Distance between adjacent grid columns / rows in world units.
    pub fn step(&self) -> (f64, f64) {
        (
            self.x_span as f64 / self.x_div as f64,
            self.y_span as f64 / self.y_div as f64,
        )
    }

    #[inline]
    pub fn world(&self, gx: i64, gy: i64) -> (f64, f64) {
        let x = self.field.x_bounds.lower as f64
            + gx.wrapping_mul(self.x_span) as f64 / self.x_div as f64;
        let y = self.field.y_bounds.lower as f64
            + gy.wrapping_mul(self.y_span) as f64 / self.y_div as f64;
        (x, y)
    }

    #[inline]
    pub fn sample(&self, gx: i64, gy: i64) -> f64 {
        let (x, y) = self.world(gx, gy);
        gradient_noise(&self.field, x, y)
    }
}

/// Noise evaluated at integer grid indices, from one field or a blend of two.
#[derive(Clone, Copy, Debug)]
pub enum NoiseSampler {
    Single(FieldView),
    /// Broad `macro_view` features blended with fine `micro_view` detail.
    /// Both fields span the same grid, so each has its own step.
    Bipartite {
        macro_view: FieldView,
        micro_view: FieldView,
        prop: f64,
    },
}

impl NoiseSampler {
    pub fn single(field: GradientField, grid: GridSize) -> Self {
        NoiseSampler::Single(FieldView::new(field, grid))
    }

    pub fn bipartite(
        macro_field: GradientField,
        micro_field: GradientField,
        prop: f64,
        grid: GridSize,
    ) -> Result<Self, ConfigError> {
        check_prop(prop)?;
        Ok(NoiseSampler::Bipartite {
            macro_view: FieldView::new(macro_field, grid),
            micro_view: FieldView::new(micro_field, grid),
            prop,
        })
    }

    /// Noise at grid index `(gx, gy)`; displacement must already be folded in.
    #[inline]
    pub fn sample(&self, gx: i64, gy: i64) -> f64 {
        match self {
            NoiseSampler::Single(view) => view.sample(gx, gy),
            NoiseSampler::Bipartite { macro_view, micro_view, prop } => {
                blend(macro_view.sample(gx, gy), micro_view.sample(gx, gy), *prop)
            }
        }
    }

    /// World coordinate of a grid index in the primary (macro) field.
    pub fn world(&self, gx: i64, gy: i64) -> (f64, f64) {
        self.primary().world(gx, gy)
    }

    pub fn primary(&self) -> &FieldView {
        match self {
            NoiseSampler::Single(view) => view,
            NoiseSampler::Bipartite { macro_view, .. } => macro_view,
        }
    }
}
