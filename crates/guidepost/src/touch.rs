#![forbid(unsafe_code)]

//! Touch input on a tip view.
//!
//! Coordinates are local to the view that received the touch. A tap is a
//! press and a release that both land inside the view with no excursion
//! outside in between.

use guidepost_layout::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchKind {
    Down,
    Up,
    Move,
    /// The press left the window's reach; the gesture is abandoned.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Touch {
    pub kind: TouchKind,
    pub x: i32,
    pub y: i32,
}

impl Touch {
    pub const fn new(kind: TouchKind, x: i32, y: i32) -> Self {
        Self { kind, x, y }
    }

    pub const fn down(x: i32, y: i32) -> Self {
        Self::new(TouchKind::Down, x, y)
    }

    pub const fn up(x: i32, y: i32) -> Self {
        Self::new(TouchKind::Up, x, y)
    }

    pub const fn moved(x: i32, y: i32) -> Self {
        Self::new(TouchKind::Move, x, y)
    }

    #[inline]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    fn inside(&self, size: Size) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < size.width && self.y < size.height
    }
}

/// Press state of one tip view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressTracker {
    pressed: bool,
}

impl PressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a touch on a view of `size`. Returns `true` when the touch
    /// completes a tap.
    pub fn feed(&mut self, touch: Touch, size: Size) -> bool {
        let inside = touch.inside(size);
        match touch.kind {
            TouchKind::Down => {
                self.pressed = inside;
                false
            }
            TouchKind::Move => {
                if !inside {
                    self.pressed = false;
                }
                false
            }
            TouchKind::Up => std::mem::take(&mut self.pressed) && inside,
            TouchKind::Cancel => {
                self.pressed = false;
                false
            }
        }
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
