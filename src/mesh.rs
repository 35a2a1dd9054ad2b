use rayon::prelude::*;

use crate::grid::GridSize;

/// Placeholder normal written for every vertex. Heights vary but the normal
/// does not; lighting sees a flat surface.
pub const UP: [f32; 3] = [0.0, 0.0, 1.0];

/// Row-major triangulated height surface, ready for upload.
///
/// `positions[j * w + i]` is `(x, y, height)` for grid column `i`, row `j`.
/// `x` and `y` stay fixed for the life of the mesh; panning only rewrites
/// heights.
#[derive(Clone, Debug)]
pub struct SurfaceMesh {
    pub size: GridSize,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<[u32; 3]>,
    generation: u64,
}

impl SurfaceMesh {
    /// Build the mesh. `place` gives the planar `(x, y)` of a grid index and
    /// `height` its elevation; both are evaluated once per vertex, rows in
    /// parallel.
    pub fn build<P, H>(size: GridSize, place: P, height: H) -> Self
    where
        P: Fn(usize, usize) -> (f32, f32) + Sync,
        H: Fn(usize, usize) -> f32 + Sync,
    {
        let w = size.w as usize;
        let mut positions = vec![[0.0f32; 3]; size.len()];
        positions
            .par_chunks_mut(w.max(1))
            .enumerate()
            .for_each(|(j, row)| {
                for (i, p) in row.iter_mut().enumerate() {
                    let (x, y) = place(i, j);
                    *p = [x, y, height(i, j)];
                }
            });

        Self {
            size,
            normals: vec![UP; size.len()],
            indices: triangulate(size),
            positions,
            generation: 0,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// Flat `x, y, z` triples.
    pub fn position_buffer(&self) -> &[f32] {
        self.positions.as_flattened()
    }

    pub fn normal_buffer(&self) -> &[f32] {
        self.normals.as_flattened()
    }

    pub fn index_buffer(&self) -> &[u32] {
        self.indices.as_flattened()
    }

    #[inline]
    pub fn height(&self, i: usize, j: usize) -> f32 {
        self.positions[j * self.size.w as usize + i][2]
    }

    /// Heights in row-major order.
    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.positions.iter().map(|p| p[2])
    }

    /// Bumped after every completed mutation. A reader that saw generation
    /// `n` and now sees `n + 1` knows the whole buffer was republished.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mutable height column of the position buffer, row `j`.
    pub(crate) fn height_row_mut(&mut self, j: usize) -> impl Iterator<Item = &mut f32> {
        let w = self.size.w as usize;
        self.positions[j * w..(j + 1) * w].iter_mut().map(|p| &mut p[2])
    }

    pub(crate) fn publish(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Two counter-clockwise triangles per grid cell. Cells stop one column short
/// of the right edge and one row short of the bottom, so no triangle joins the
/// last vertex of a row to the first vertex of the next.
pub fn triangulate(size: GridSize) -> Vec<[u32; 3]> {
    let w = size.w;
    let h = size.h;
    if w < 2 || h < 2 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(triangle_count(size));
    for j in 0..h - 1 {
        for i in 0..w - 1 {
            let a = j * w + i;
            let b = a + 1;
            let c = a + w;
            let d = c + 1;
            out.push([a, b, d]);
            out.push([a, d, c]);
        }
    }
    out
}

/// `2 (W - 1)(H - 1)`.
pub fn triangle_count(size: GridSize) -> usize {
    2 * (size.w as usize).saturating_sub(1) * (size.h as usize).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangles_stay_inside_rows() {
        let size = GridSize::new(4, 3);
        let tris = triangulate(size);
        assert_eq!(tris.len(), triangle_count(size));
        assert_eq!(tris.len(), 12);
        for t in &tris {
            assert!(t.iter().all(|&v| v < 12));
            assert!(t[0] != t[1] && t[1] != t[2] && t[0] != t[2]);
            let cols: Vec<u32> = t.iter().map(|v| v % 4).collect();
            let min = *cols.iter().min().unwrap();
            let max = *cols.iter().max().unwrap();
            assert!(max - min <= 1, "triangle {t:?} wraps a row");
        }
    }

    #[test]
    fn first_cell_winding() {
        let tris = triangulate(GridSize::new(3, 3));
        assert_eq!(tris[0], [0, 1, 4]);
        assert_eq!(tris[1], [0, 4, 3]);
    }

    #[test]
    fn degenerate_sizes_have_no_triangles() {
        assert!(triangulate(GridSize::new(1, 9)).is_empty());
        assert!(triangulate(GridSize::new(9, 1)).is_empty());
    }

    #[test]
    fn build_writes_every_vertex() {
        let size = GridSize::new(3, 2);
        let mesh = SurfaceMesh::build(
            size,
            |i, j| (i as f32, j as f32),
            |i, j| (i + 10 * j) as f32,
        );
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.height(2, 1), 12.0);
        assert_eq!(&mesh.position_buffer()[3..6], &[1.0, 0.0, 1.0]);
        assert_eq!(mesh.normal_buffer().len(), 18);
        assert!(mesh.normal_buffer().chunks(3).all(|n| n == UP));
        assert_eq!(mesh.index_buffer().len(), 3 * mesh.triangle_count());
        assert_eq!(mesh.generation(), 0);
    }
}
