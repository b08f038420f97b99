use super::Coord;

/// An axis-aligned bounding box on the coordinate grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Coord,
    /// Maximum corner of the bounding box.
    pub max: Coord,
}

impl Aabb {
    /// Bounding box of a non-empty set of coordinates.
    ///
    /// Returns `None` if `coords` is empty.
    #[must_use]
    pub fn from_coords(coords: &[Coord]) -> Option<Self> {
        let first = coords.first()?;
        let mut aabb = Self {
            min: *first,
            max: *first,
        };
        for c in &coords[1..] {
            aabb.include(*c);
        }
        Some(aabb)
    }

    /// Grows the box to include `c`.
    pub fn include(&mut self, c: Coord) {
        self.min.x = self.min.x.min(c.x);
        self.min.y = self.min.y.min(c.y);
        self.max.x = self.max.x.max(c.x);
        self.max.y = self.max.y.max(c.y);
    }

    /// Returns the smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut result = *self;
        result.include(other.min);
        result.include(other.max);
        result
    }

    /// Whether the two boxes overlap. Touching boxes count as overlapping.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Whether `c` lies inside or on the boundary of the box.
    #[must_use]
    pub fn contains(&self, c: Coord) -> bool {
        c.x >= self.min.x && c.x <= self.max.x && c.y >= self.min.y && c.y <= self.max.y
    }

    /// Returns the box grown by `margin` grid units on every side.
    #[must_use]
    pub fn expanded(&self, margin: i32) -> Self {
        Self {
            min: Coord::new(self.min.x - margin, self.min.y - margin),
            max: Coord::new(self.max.x + margin, self.max.y + margin),
        }
    }
}
