//! Incremental panning over a fixed-size surface window.
//!
//! Heights live in a toroidal [`RingGrid`]: a pan advances the ring's
//! column/row offsets and evaluates only the columns/rows that wrap into view.
//! The row-major vertex buffer is then republished from the ring in a single
//! pass, which touches every vertex but computes no noise.
use rayon::prelude::*;
use tracing::debug;

use crate::grid::{GridSize, RingGrid};
use crate::mesh::SurfaceMesh;

/// Largest accumulated displacement on either axis. Pans that would go
/// further stop at the bound, so `index + displacement` never overflows.
pub const MAX_DISPLACEMENT: i64 = i32::MAX as i64;

fn clamp_disp(v: i64) -> i64 {
    v.clamp(-MAX_DISPLACEMENT, MAX_DISPLACEMENT)
}

/// Height of an absolute grid index (window index plus displacement).
pub trait HeightSource: Sync {
    fn height_at(&self, gx: i64, gy: i64) -> f32;
}

/// Accumulated pan from the origin, in grid steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub x_disp: i64,
    pub y_disp: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanMode {
    Noop,
    /// Only the exposed edge was evaluated.
    Incremental,
    /// The shift met or exceeded the grid dimension; every vertex was evaluated.
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanStats {
    pub mode: PanMode,
    /// Height evaluations performed.
    pub evaluated: usize,
}

impl PanStats {
    pub const NOOP: PanStats = PanStats {
        mode: PanMode::Noop,
        evaluated: 0,
    };
}

pub struct ScrollController<S> {
    source: S,
    mesh: SurfaceMesh,
    ring: RingGrid<f32>,
    state: ScrollState,
}

impl<S: HeightSource> ScrollController<S> {
    /// Build the initial window at zero displacement. `place` gives each
    /// vertex its fixed planar position.
    pub fn new<P>(source: S, size: GridSize, place: P) -> Self
    where
        P: Fn(usize, usize) -> (f32, f32) + Sync,
    {
        let mesh = SurfaceMesh::build(size, place, |i, j| {
            source.height_at(i as i64, j as i64)
        });
        let mut ring = RingGrid::new(size.w as usize, size.h as usize);
        for (dst, src) in ring.data.iter_mut().zip(mesh.heights()) {
            *dst = src;
        }
        Self {
            source,
            mesh,
            ring,
            state: ScrollState::default(),
        }
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Shift magnitudes at or beyond which a pan falls back to a full
    /// recompute: the grid width for horizontal pans, height for vertical.
    pub fn full_recompute_threshold(&self) -> (u64, u64) {
        (self.ring.w as u64, self.ring.h as u64)
    }

    /// Shift the window by `(dx, dy)` grid steps. Afterwards vertex `(i, j)`
    /// holds the height of grid index `(i + x_disp, j + y_disp)`. The
    /// displacement is clamped to `±MAX_DISPLACEMENT`.
    pub fn pan_by(&mut self, dx: i64, dy: i64) -> PanStats {
        let dx = clamp_disp(self.state.x_disp.saturating_add(dx)) - self.state.x_disp;
        let dy = clamp_disp(self.state.y_disp.saturating_add(dy)) - self.state.y_disp;
        if dx == 0 && dy == 0 {
            return PanStats::NOOP;
        }
        let (tw, th) = self.full_recompute_threshold();
        let stats = if dx.unsigned_abs() >= tw || dy.unsigned_abs() >= th {
            self.state.x_disp += dx;
            self.state.y_disp += dy;
            PanStats {
                mode: PanMode::Full,
                evaluated: self.refill(),
            }
        } else {
            // Columns are exposed before the vertical shift so they are
            // evaluated at the rows they occupy at that moment.
            let cols = self.expose_columns(dx);
            let rows = self.expose_rows(dy);
            PanStats {
                mode: PanMode::Incremental,
                evaluated: cols + rows,
            }
        };
        self.publish();
        debug!(
            dx,
            dy,
            x_disp = self.state.x_disp,
            y_disp = self.state.y_disp,
            evaluated = stats.evaluated,
            mode = ?stats.mode,
            "pan"
        );
        stats
    }

    /// Incremental move to an absolute displacement.
    pub fn pan_to(&mut self, x_disp: i64, y_disp: i64) -> PanStats {
        self.pan_by(
            clamp_disp(x_disp) - self.state.x_disp,
            clamp_disp(y_disp) - self.state.y_disp,
        )
    }

    /// Recompute every vertex at the given displacement. O(W * H); the
    /// reference the incremental path must agree with.
    pub fn recenter(&mut self, x_disp: i64, y_disp: i64) -> PanStats {
        self.state = ScrollState {
            x_disp: clamp_disp(x_disp),
            y_disp: clamp_disp(y_disp),
        };
        let evaluated = self.refill();
        self.publish();
        PanStats {
            mode: PanMode::Full,
            evaluated,
        }
    }

    pub fn move_right(&mut self, amount: i32) -> PanStats {
        self.pan_by(amount as i64, 0)
    }

    pub fn move_left(&mut self, amount: i32) -> PanStats {
        self.pan_by(-(amount as i64), 0)
    }

    pub fn move_up(&mut self, amount: i32) -> PanStats {
        self.pan_by(0, amount as i64)
    }

    pub fn move_down(&mut self, amount: i32) -> PanStats {
        self.pan_by(0, -(amount as i64))
    }

    fn expose_columns(&mut self, dx: i64) -> usize {
        if dx == 0 {
            return 0;
        }
        self.state.x_disp += dx;
        self.ring.rotate_x(dx);

        let w = self.ring.w;
        let n = dx.unsigned_abs() as usize;
        let cols = if dx > 0 { w - n..w } else { 0..n };
        let ScrollState { x_disp, y_disp } = self.state;
        for j in 0..self.ring.h {
            for i in cols.clone() {
                let v = self.source.height_at(i as i64 + x_disp, j as i64 + y_disp);
                self.ring.set(i, j, v);
            }
        }
        n * self.ring.h
    }

    fn expose_rows(&mut self, dy: i64) -> usize {
        if dy == 0 {
            return 0;
        }
        self.state.y_disp += dy;
        self.ring.rotate_y(dy);

        let h = self.ring.h;
        let n = dy.unsigned_abs() as usize;
        let rows = if dy > 0 { h - n..h } else { 0..n };
        let ScrollState { x_disp, y_disp } = self.state;
        for j in rows {
            for i in 0..self.ring.w {
                let v = self.source.height_at(i as i64 + x_disp, j as i64 + y_disp);
                self.ring.set(i, j, v);
            }
        }
        n * self.ring.w
    }

    fn refill(&mut self) -> usize {
        let w = self.ring.w;
        let ScrollState { x_disp, y_disp } = self.state;
        let source = &self.source;
        self.ring.reset_offsets();
        self.ring
            .data
            .par_chunks_mut(w.max(1))
            .enumerate()
            .for_each(|(j, row)| {
                for (i, v) in row.iter_mut().enumerate() {
                    *v = source.height_at(i as i64 + x_disp, j as i64 + y_disp);
                }
            });
        self.ring.data.len()
    }

    /// Copy the ring, in logical order, into the vertex buffer.
    fn publish(&mut self) {
        for j in 0..self.ring.h {
            let (head, tail) = self.ring.row(j);
            for (dst, src) in self.mesh.height_row_mut(j).zip(head.iter().chain(tail)) {
                *dst = *src;
            }
        }
        self.mesh.publish();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Encodes the grid index in the height so shifts can be checked exactly.
    #[derive(Default)]
    struct Tagged {
        calls: AtomicUsize,
    }

    impl HeightSource for Tagged {
        fn height_at(&self, gx: i64, gy: i64) -> f32 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            (gx * 1000 + gy) as f32
        }
    }

    fn controller(w: u32, h: u32) -> ScrollController<Tagged> {
        ScrollController::new(Tagged::default(), GridSize::new(w, h), |i, j| {
            (i as f32, j as f32)
        })
    }

    fn assert_window(c: &ScrollController<Tagged>) {
        let ScrollState { x_disp, y_disp } = c.state();
        let size = c.mesh().size;
        for j in 0..size.h as usize {
            for i in 0..size.w as usize {
                let want = ((i as i64 + x_disp) * 1000 + j as i64 + y_disp) as f32;
                assert_eq!(c.mesh().height(i, j), want, "vertex ({i}, {j})");
            }
        }
    }

    #[test]
    fn initial_build_evaluates_each_vertex_once() {
        let c = controller(6, 4);
        assert_eq!(c.source().calls.load(Ordering::Relaxed), 24);
        assert_window(&c);
    }

    #[test]
    fn right_pan_evaluates_only_exposed_columns() {
        let mut c = controller(6, 4);
        let stats = c.move_right(2);
        assert_eq!(stats, PanStats { mode: PanMode::Incremental, evaluated: 8 });
        assert_eq!(c.source().calls.load(Ordering::Relaxed), 24 + 8);
        assert_eq!(c.state(), ScrollState { x_disp: 2, y_disp: 0 });
        assert_window(&c);
        assert_eq!(c.mesh().generation(), 1);
    }

    #[test]
    fn every_direction_keeps_the_window_invariant() {
        let mut c = controller(7, 5);
        c.move_left(3);
        assert_window(&c);
        c.move_up(2);
        assert_window(&c);
        c.move_down(4);
        assert_window(&c);
        c.move_right(-1);
        assert_window(&c);
        assert_eq!(c.state(), ScrollState { x_disp: -4, y_disp: -2 });
    }

    #[test]
    fn diagonal_pan_is_exact() {
        let mut c = controller(5, 5);
        let stats = c.pan_by(2, -3);
        assert_eq!(stats.evaluated, 2 * 5 + 3 * 5);
        assert_window(&c);
        c.pan_by(-4, 4);
        assert_window(&c);
    }

    #[test]
    fn zero_is_noop() {
        let mut c = controller(4, 4);
        assert_eq!(c.move_up(0), PanStats::NOOP);
        assert_eq!(c.mesh().generation(), 0);
    }

    #[test]
    fn oversized_pan_falls_back_to_full() {
        let mut c = controller(4, 3);
        let stats = c.move_down(3);
        assert_eq!(stats, PanStats { mode: PanMode::Full, evaluated: 12 });
        assert_window(&c);
        let stats = c.move_right(100);
        assert_eq!(stats.mode, PanMode::Full);
        assert_window(&c);
        // ring offsets were reset; incremental panning still lines up
        c.move_left(1);
        c.move_up(2);
        assert_window(&c);
    }

    #[test]
    fn pan_to_and_recenter_agree() {
        let mut a = controller(6, 6);
        let mut b = controller(6, 6);
        a.pan_to(3, -5);
        a.pan_to(-1, -2);
        b.recenter(-1, -2);
        assert_eq!(a.state(), b.state());
        assert!(a.mesh().heights().eq(b.mesh().heights()));
    }

    #[test]
    fn planar_positions_do_not_move() {
        let mut c = controller(3, 3);
        let before: Vec<_> = c.mesh().positions().iter().map(|p| (p[0], p[1])).collect();
        c.pan_by(1, 1);
        let after: Vec<_> = c.mesh().positions().iter().map(|p| (p[0], p[1])).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn displacement_stops_at_the_bound() {
        let mut c = controller(5, 4);
        c.move_right(5);
        let stats = c.pan_to(i64::MIN, 0);
        assert_eq!(stats.mode, PanMode::Full);
        assert_eq!(c.state(), ScrollState { x_disp: -MAX_DISPLACEMENT, y_disp: 0 });
        assert_window(&c);

        c.pan_to(i64::MAX, i64::MAX);
        assert_eq!(
            c.state(),
            ScrollState { x_disp: MAX_DISPLACEMENT, y_disp: MAX_DISPLACEMENT }
        );
        assert_window(&c);

        // pinned at the bound: further pans in that direction do nothing
        assert_eq!(c.move_right(1), PanStats::NOOP);
        assert_eq!(c.pan_by(i64::MAX, 0), PanStats::NOOP);
        let stats = c.pan_by(i64::MAX, -2);
        assert_eq!(stats, PanStats { mode: PanMode::Incremental, evaluated: 2 * 5 });
        assert_window(&c);

        c.recenter(i64::MIN, i64::MIN);
        assert_eq!(c.state().y_disp, -MAX_DISPLACEMENT);
        assert_window(&c);
    }
}
