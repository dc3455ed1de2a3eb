//! Inclusive integer rectangle in Flat-local coordinates

/// Axis-aligned integer bounds, both corners inclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub min_x: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_z: i32,
}

impl Rect {
    /// Create from min and max corners
    pub fn new(min_x: i32, min_z: i32, max_x: i32, max_z: i32) -> Self {
        Self { min_x, min_z, max_x, max_z }
    }

    /// Degenerate rectangle covering a single point
    pub fn from_point(x: i32, z: i32) -> Self {
        Self::new(x, z, x, z)
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_z - self.min_z + 1
    }

    /// Number of points covered
    pub fn area(&self) -> usize {
        (self.width().max(0) as usize) * (self.height().max(0) as usize)
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    /// Expand to include point
    pub fn expand(&mut self, x: i32, z: i32) {
        self.min_x = self.min_x.min(x);
        self.min_z = self.min_z.min(z);
        self.max_x = self.max_x.max(x);
        self.max_z = self.max_z.max(z);
    }

    /// Return merged rect containing both
    pub fn merged(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_z: self.min_z.min(other.min_z),
            max_x: self.max_x.max(other.max_x),
            max_z: self.max_z.max(other.max_z),
        }
    }

    /// Grow on every side by `by` points
    pub fn grown(&self, by: i32) -> Rect {
        Rect::new(self.min_x - by, self.min_z - by, self.max_x + by, self.max_z + by)
    }

    /// Clip to a `size_x` x `size_z` buffer. None when nothing remains.
    pub fn clipped(&self, size_x: usize, size_z: usize) -> Option<Rect> {
        let r = Rect::new(
            self.min_x.max(0),
            self.min_z.max(0),
            self.max_x.min(size_x as i32 - 1),
            self.max_z.min(size_z as i32 - 1),
        );
        (r.min_x <= r.max_x && r.min_z <= r.max_z).then_some(r)
    }
}
