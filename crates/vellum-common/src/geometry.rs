//! Integer geometry used to position and clip pages.
//!
//! Coordinates follow the usual screen convention: x grows to the right,
//! y grows downward. Rectangles store their top-left corner and size;
//! `right()`/`bottom()` are exclusive bounds. A rectangle with zero or
//! negative width or height is *empty* and behaves as a no-op everywhere.

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point in the viewer's integer coordinate space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Create a point from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// A width/height pair in integer pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Size {
    /// Create a size from width and height.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Whether this size has no area.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An axis-aligned integer rectangle (top-left corner plus size).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether this rectangle has no area.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// The top-left corner.
    #[must_use]
    pub const fn top_left(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The size of the rectangle.
    #[must_use]
    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Exclusive right edge (`x + width`).
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge (`y + height`).
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// The center point (rounded down for odd sizes).
    #[must_use]
    pub const fn center(self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Area in pixels, zero for empty rectangles.
    #[must_use]
    pub fn area(self) -> i64 {
        if self.is_empty() {
            0
        } else {
            i64::from(self.width) * i64::from(self.height)
        }
    }

    /// This rectangle shifted by `delta`.
    #[must_use]
    pub const fn translated(self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// This rectangle moved so that its center lands on `center`.
    #[must_use]
    pub const fn centered_on(self, center: Point) -> Self {
        Self::new(
            center.x - self.width / 2,
            center.y - self.height / 2,
            self.width,
            self.height,
        )
    }

    /// The intersection with `other`; empty (all zeros) when the two
    /// rectangles do not overlap or either one is empty.
    #[must_use]
    pub fn intersected(self, other: Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::default();
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Self::default();
        }
        Self::new(x, y, right - x, bottom - y)
    }

    /// Whether the two rectangles overlap in a non-empty area.
    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        !self.intersected(other).is_empty()
    }

    /// Whether `other` lies entirely inside this rectangle.
    #[must_use]
    pub fn contains_rect(self, other: Self) -> bool {
        !other.is_empty()
            && self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// The parts of this rectangle not covered by `other`.
    ///
    /// Returns up to four band rectangles (above, below, left of, and
    /// right of the intersection). Returns the whole rectangle when the
    /// two do not overlap, and nothing when `other` covers it entirely.
    #[must_use]
    pub fn subtracted(self, other: Self) -> Vec<Self> {
        if self.is_empty() {
            return Vec::new();
        }
        let inter = self.intersected(other);
        if inter.is_empty() {
            return vec![self];
        }
        let mut pieces = Vec::new();
        // Band above the intersection.
        if inter.y > self.y {
            pieces.push(Self::new(self.x, self.y, self.width, inter.y - self.y));
        }
        // Band below the intersection.
        if inter.bottom() < self.bottom() {
            pieces.push(Self::new(
                self.x,
                inter.bottom(),
                self.width,
                self.bottom() - inter.bottom(),
            ));
        }
        // Left of the intersection, within its vertical band.
        if inter.x > self.x {
            pieces.push(Self::new(self.x, inter.y, inter.x - self.x, inter.height));
        }
        // Right of the intersection, within its vertical band.
        if inter.right() < self.right() {
            pieces.push(Self::new(
                inter.right(),
                inter.y,
                self.right() - inter.right(),
                inter.height,
            ));
        }
        pieces
    }
}

/// A set of axis-aligned rectangles used to track covered screen area.
///
/// This is a rectangle-region approximation: membership and coverage are
/// computed by rectangle subtraction, which is exact for axis-aligned
/// rectangular content. Adding an empty rectangle is a no-op.
#[derive(Clone, Debug, Default)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Create an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Whether no area has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Add a rectangle to the covered area.
    pub fn add(&mut self, rect: Rect) {
        if !rect.is_empty() {
            self.rects.push(rect);
        }
    }

    /// The parts of `rect` not covered by this region.
    #[must_use]
    pub fn uncovered(&self, rect: Rect) -> Vec<Rect> {
        if rect.is_empty() {
            return Vec::new();
        }
        let mut pieces = vec![rect];
        for covered in &self.rects {
            pieces = pieces
                .into_iter()
                .flat_map(|piece| piece.subtracted(*covered))
                .collect();
            if pieces.is_empty() {
                break;
            }
        }
        pieces
    }

    /// Whether this region covers `rect` entirely.
    ///
    /// An empty `rect` is trivially covered.
    #[must_use]
    pub fn covers(&self, rect: Rect) -> bool {
        self.uncovered(rect).is_empty()
    }

    /// Total covered area in pixels, counting overlapping rectangles once.
    #[must_use]
    pub fn area(&self) -> i64 {
        let mut seen = Self::new();
        let mut total = 0;
        for rect in &self.rects {
            total += seen
                .uncovered(*rect)
                .into_iter()
                .map(Rect::area)
                .sum::<i64>();
            seen.add(*rect);
        }
        total
    }
}
