#![forbid(unsafe_code)]

//! Screen-space geometric primitives.
//!
//! The overlay works in the host's pixel coordinate space (f32, origin
//! at top-left, y down). Rectangles are used for window bounds, row
//! layout, and hit testing.

/// A 2D point or offset in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Component-wise addition.
    #[inline]
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise subtraction (`self - other`).
    #[inline]
    #[must_use]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Linear interpolation between `a` and `b` by `t` in `[0, 1]`.
///
/// Used for the smoothed window clamping: positions approach their
/// bound over several frames rather than jumping.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A rectangle for window bounds, row layout, and hit testing.
///
/// `x`/`y` is the top-left corner; `width`/`height` extend right and
/// down. Zero or negative extents make an empty rectangle that
/// contains no point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Check if the rectangle has no area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    ///
    /// The left/top edges are inclusive, right/bottom exclusive, so
    /// adjacent rectangles never both claim a point.
    #[inline]
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// A copy translated by `offset`.
    #[inline]
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(29.9, 29.9));
        assert!(!r.contains(30.0, 10.0));
        assert!(!r.contains(10.0, 30.0));
        assert!(!r.contains(9.9, 15.0));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let r = Rect::new(5.0, 5.0, 0.0, 10.0);
        assert!(r.is_empty());
        assert!(!r.contains(5.0, 5.0));
    }

    #[test]
    fn adjacent_rects_share_no_point() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.contains(10.0, 5.0));
        assert!(b.contains(10.0, 5.0));
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn translated_moves_origin_only() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).translated(Vec2::new(10.0, 20.0));
        assert_eq!(r, Rect::new(11.0, 22.0, 3.0, 4.0));
    }

    proptest! {
        // Any point interpolated strictly inside a rect is contained.
        #[test]
        fn prop_interior_points_are_contained(
            x in -1e3f32..1e3, y in -1e3f32..1e3,
            w in 1.0f32..1e3, h in 1.0f32..1e3,
            tx in 0.0f32..0.99, ty in 0.0f32..0.99,
        ) {
            let r = Rect::new(x, y, w, h);
            let px = lerp(r.x, r.right(), tx);
            let py = lerp(r.y, r.bottom(), ty);
            prop_assert!(r.contains(px, py));
        }
    }
}
