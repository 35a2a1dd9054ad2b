use rayon::prelude::*;

use crate::mesh::SurfaceMesh;

const WATER: [u8; 4] = [0, 0, 255, 255];
const LAND: [u8; 4] = [0, 255, 0, 255];

#[inline]
fn lerp_color(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t).round() as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t).round() as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t).round() as u8,
        255,
    ]
}

/// Height range of the mesh, widened to avoid a zero divisor on flat input.
fn height_range(mesh: &SurfaceMesh) -> (f32, f32) {
    let min_h = mesh.heights().fold(f32::INFINITY, f32::min);
    let max_h = mesh.heights().fold(f32::NEG_INFINITY, f32::max);
    (min_h, (max_h - min_h).max(1e-6))
}

/// Rasterise the mesh one pixel per vertex, row `j` to image row `j`.
fn shade<F>(mesh: &SurfaceMesh, color: F) -> Vec<u8>
where
    F: Fn(f32) -> [u8; 4] + Sync,
{
    let w = mesh.size.w as usize;
    let h = mesh.size.h as usize;
    let (min_h, range) = height_range(mesh);
    let mut rgba = vec![0u8; w * h * 4];

    rgba.par_chunks_mut(w * 4).enumerate().for_each(|(y, row)| {
        for x in 0..w {
            let t = (mesh.height(x, y) - min_h) / range;
            row[x * 4..x * 4 + 4].copy_from_slice(&color(t));
        }
    });

    rgba
}

/// Grayscale heightmap, normalised to the current window.
pub fn render_heightmap(mesh: &SurfaceMesh) -> Vec<u8> {
    shade(mesh, |t| {
        let v = (t * 255.0).clamp(0.0, 255.0) as u8;
        [v, v, v, 255]
    })
}

/// Blue lowlands fading to green highlands.
pub fn render_water_land(mesh: &SurfaceMesh) -> Vec<u8> {
    shade(mesh, |t| lerp_color(WATER, LAND, t))
}
