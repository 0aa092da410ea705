#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are signed surface pixels with the origin at the top-left
//! of the host surface. Tips routinely land at negative offsets while their
//! position is being computed, so nothing here saturates.

/// A point on the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A width/height pair, typically the measured size of a tip view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}

/// An axis-aligned rectangle in absolute surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized rectangle at the given point.
    #[inline]
    pub const fn at_point(point: Point) -> Self {
        Self::new(point.x, point.y, 0, 0)
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// The same rectangle moved to a new origin.
    #[inline]
    #[must_use]
    pub const fn with_origin(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }
}

/// Signed pixel offsets applied after alignment-driven placement.
///
/// How each component is applied depends on the placement; see
/// [`compute_position`](crate::compute_position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub horizontal: i32,
    pub vertical: i32,
}

impl Margins {
    /// Create new margins.
    pub const fn new(horizontal: i32, vertical: i32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Margins with only a horizontal component.
    pub const fn horizontal(val: i32) -> Self {
        Self::new(val, 0)
    }

    /// Margins with only a vertical component.
    pub const fn vertical(val: i32) -> Self {
        Self::new(0, val)
    }
}

impl From<(i32, i32)> for Margins {
    fn from((horizontal, vertical): (i32, i32)) -> Self {
        Self::new(horizontal, vertical)
    }
}

/// Size hints handed to the host when it measures a tip view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeConstraints {
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
}

impl SizeConstraints {
    /// Create new size constraints.
    pub const fn new(min_width: i32, max_width: i32, min_height: i32) -> Self {
        Self {
            min_width,
            max_width,
            min_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let rect = Rect::new(-4, 10, 20, 5);
        assert_eq!(rect.right(), 16);
        assert_eq!(rect.bottom(), 15);
        assert_eq!(rect.origin(), Point::new(-4, 10));
        assert_eq!(rect.size(), Size::new(20, 5));
    }

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(5, 7)));
        assert!(!rect.contains(Point::new(6, 3)));
        assert!(!rect.contains(Point::new(2, 8)));
    }

    #[test]
    fn point_rect_is_empty_and_contains_nothing() {
        let rect = Rect::at_point(Point::new(7, 9));
        assert!(rect.is_empty());
        assert!(!rect.contains(Point::new(7, 9)));
        assert_eq!(rect, Rect::new(7, 9, 0, 0));
    }

    #[test]
    fn tuple_conversions() {
        assert_eq!(Margins::from((3, -2)), Margins::new(3, -2));
        assert_eq!(Size::from((8, 4)), Size::new(8, 4));
        assert_eq!(Point::from((1, 2)), Point::new(1, 2));
    }
}
