/// Grid dimensions in vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct GridSize {
    pub w: u32,
    pub h: u32,
}

impl GridSize {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.w as usize * self.h as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Row-major toroidal grid. Logical cell `(x, y)` lives at physical cell
/// `((x + ox) mod w, (y + oy) mod h)`, so shifting the whole window by whole
/// columns or rows is an offset change, with no data moved.
#[derive(Clone, Debug)]
pub struct RingGrid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
    ox: usize,
    oy: usize,
}

impl<T: Copy + Default> RingGrid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
            ox: 0,
            oy: 0,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        let px = wrap(x + self.ox, self.w);
        let py = wrap(y + self.oy, self.h);
        py * self.w + px
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Advance the column offset: logical column `x` now shows what was at
    /// `x + dx`. Columns that wrapped around hold stale values.
    pub fn rotate_x(&mut self, dx: i64) {
        self.ox = wrap_signed(self.ox as i64 + dx, self.w);
    }

    /// Row counterpart of [`RingGrid::rotate_x`].
    pub fn rotate_y(&mut self, dy: i64) {
        self.oy = wrap_signed(self.oy as i64 + dy, self.h);
    }

    /// Drop the offsets without moving data. Only meaningful right before
    /// every cell is overwritten.
    pub fn reset_offsets(&mut self) {
        self.ox = 0;
        self.oy = 0;
    }

    /// Logical row `y` as two physical slices: `[ox..w]` then `[0..ox]`.
    pub fn row(&self, y: usize) -> (&[T], &[T]) {
        let start = wrap(y + self.oy, self.h) * self.w;
        let row = &self.data[start..start + self.w];
        let (tail, head) = row.split_at(self.ox);
        (head, tail)
    }
}

#[inline]
fn wrap(v: usize, n: usize) -> usize {
    if v >= n { v - n } else { v }
}

#[inline]
fn wrap_signed(v: i64, n: usize) -> usize {
    v.rem_euclid(n as i64) as usize
}
