/// Closed integer range `[lower, upper]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub lower: i32,
    pub upper: i32,
}

impl Interval {
    pub fn new(lower: i32, upper: i32) -> Self {
        debug_assert!(lower <= upper);
        Self { lower, upper }
    }

    /// Bounds of a field `extent` lattice points wide centered on the origin.
    /// Division truncates, so an odd extent is symmetric: 7 -> [-3, 3].
    pub fn centered(extent: u32) -> Self {
        let half = (extent / 2) as i32;
        Self::new(-half, half)
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.upper.abs_diff(self.lower)
    }
}
