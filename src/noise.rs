use crate::gradient::GradientField;

/// Quintic fade `6t^5 - 15t^4 + 10t^3`.
#[inline]
pub fn smootherstep(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// 2D gradient noise over a [`GradientField`]. Output lies roughly in
/// `[-1.5, 1.5]` and is not clamped. Exactly zero on lattice points.
#[inline]
pub fn gradient_noise(field: &GradientField, x: f64, y: f64) -> f64 {
    let fx0 = x.floor();
    let fy0 = y.floor();
    let sx = x - fx0;
    let sy = y - fy0;
    let ix = fx0 as i32;
    let iy = fy0 as i32;

    let corner = |gx: i32, gy: i32, dx: f64, dy: f64| {
        let (cx, cy) = field.unit_vector(gx, gy);
        cx * dx + cy * dy
    };

    let n00 = corner(ix, iy, sx, sy);
    let n10 = corner(ix.wrapping_add(1), iy, sx - 1.0, sy);
    let n01 = corner(ix, iy.wrapping_add(1), sx, sy - 1.0);
    let n11 = corner(ix.wrapping_add(1), iy.wrapping_add(1), sx - 1.0, sy - 1.0);

    let fu = smootherstep(sx);
    let a = lerp(n00, n10, fu);
    let b = lerp(n01, n11, fu);
    lerp(a, b, smootherstep(sy))
}

/// Weighted blend of a broad and a fine noise value.
/// `prop = 1` is pure macro, `prop = 0` pure micro.
#[inline]
pub fn blend(macro_value: f64, micro_value: f64, prop: f64) -> f64 {
    macro_value * prop + micro_value * (1.0 - prop)
}
