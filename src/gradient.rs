//! Hash-based gradient lattice. No table: every lattice point is evaluated
//! on demand, so the field is unbounded and can be queried out of order.
use crate::interval::Interval;

const MIX: u64 = 0x45d9_f3b;

#[inline]
fn mix(mut v: u64) -> u64 {
    v = ((v >> 16) ^ v).wrapping_mul(MIX);
    v = ((v >> 16) ^ v).wrapping_mul(MIX);
    (v >> 16) ^ v
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GradientField {
    pub seed: i32,
    /// Lattice extents the bounds were centered from.
    pub width: u32,
    pub height: u32,
    pub x_bounds: Interval,
    pub y_bounds: Interval,
}

impl GradientField {
    /// Field of `width` x `height` lattice points centered on the origin.
    pub fn new(seed: i32, width: u32, height: u32) -> Self {
        Self {
            seed,
            width,
            height,
            x_bounds: Interval::centered(width),
            y_bounds: Interval::centered(height),
        }
    }

    /// Gradient angle in whole degrees, in `[0, 360)`.
    ///
    /// The coordinate/seed product wraps in 32 bits and is then sign-extended
    /// to 64 bits before mixing; all later arithmetic wraps in 64 bits.
    /// Bounds are not consulted: the function is total over `i32 x i32`.
    #[inline]
    pub fn gradient(&self, x: i32, y: i32) -> u16 {
        let xu = mix(x.wrapping_mul(self.seed) as i64 as u64);
        let yu = mix(y.wrapping_mul(self.seed) as i64 as u64);
        (31u64.wrapping_mul(31u64.wrapping_add(xu)).wrapping_add(yu) % 360) as u16
    }

    /// Unit gradient vector `(cos θ, sin θ)` at a lattice point.
    #[inline]
    pub fn unit_vector(&self, x: i32, y: i32) -> (f64, f64) {
        let theta = (self.gradient(x, y) as f64).to_radians();
        (theta.cos(), theta.sin())
    }
}
