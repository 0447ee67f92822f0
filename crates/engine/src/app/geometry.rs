#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Axis-aligned box anchored at its top-left corner.
///
/// Containment is strict on all four sides: a point lying exactly on an edge
/// is outside. The overlap tests below sample corners rather than comparing
/// intervals, and two of them deliberately reuse the height where the width
/// would be expected; see [`Rect::quirk_right_edge_x`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    /// Box of the given extent centered on `center`.
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.x + self.w / 2.0,
            y: self.y + self.h / 2.0,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x > self.x && x < self.right() && y > self.y && y < self.bottom()
    }

    /// The x coordinate the corner samples use for this box's "right" side.
    ///
    /// This is `x + h`, not `x + w`. Collision outcomes depend on it, so it is
    /// kept as is and only ever reached through this helper. For square boxes
    /// the two agree.
    pub fn quirk_right_edge_x(&self) -> f32 {
        self.x + self.h
    }

    /// Corner-sampled overlap test.
    ///
    /// True when any of `other`'s four sampled corners lies strictly inside
    /// `self`, or any of `self`'s true corners lies strictly inside `other`.
    /// `other`'s top-right and bottom-left samples use the height-for-width
    /// quirk on the first and the true left edge on the second.
    pub fn collides(&self, other: &Rect) -> bool {
        self.contains(other.x, other.y)
            || self.contains(other.quirk_right_edge_x(), other.y)
            || self.contains(other.x, other.bottom())
            || self.contains(other.right(), other.bottom())
            || other.contains(self.x, self.y)
            || other.contains(self.right(), self.y)
            || other.contains(self.x, self.bottom())
            || other.contains(self.right(), self.bottom())
    }

    /// Top edge (both top corners) strictly inside `other`.
    pub fn collides_up(&self, other: &Rect) -> bool {
        other.contains(self.x, self.y) && other.contains(self.right(), self.y)
    }

    /// Bottom edge strictly inside `other`.
    pub fn collides_down(&self, other: &Rect) -> bool {
        other.contains(self.x, self.bottom()) && other.contains(self.right(), self.bottom())
    }

    /// Left edge strictly inside `other`.
    pub fn collides_left(&self, other: &Rect) -> bool {
        other.contains(self.x, self.y) && other.contains(self.x, self.bottom())
    }

    /// Right edge strictly inside `other`, measured at `x + h`.
    pub fn collides_right(&self, other: &Rect) -> bool {
        let edge_x = self.quirk_right_edge_x();
        other.contains(edge_x, self.y) && other.contains(edge_x, self.bottom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_strict_on_every_edge() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(5.0, 5.0));
        assert!(!rect.contains(0.0, 5.0));
        assert!(!rect.contains(10.0, 5.0));
        assert!(!rect.contains(5.0, 0.0));
        assert!(!rect.contains(5.0, 10.0));
    }

    #[test]
    fn touching_boxes_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.collides(&b));
        assert!(!b.collides(&a));
    }

    #[test]
    fn overlapping_boxes_collide_both_ways() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.collides(&b));
        assert!(b.collides(&a));
    }

    #[test]
    fn quirk_right_edge_uses_height() {
        let wide = Rect::new(0.0, 0.0, 40.0, 10.0);
        assert_eq!(wide.quirk_right_edge_x(), 10.0);
        assert_eq!(wide.right(), 40.0);
    }

    #[test]
    fn quirk_makes_wide_box_miss_right_side_penetration() {
        // Right edge truly sits inside the wall, but the sampled edge x + h
        // lands short of it.
        let actor = Rect::new(0.0, 10.0, 40.0, 10.0);
        let wall = Rect::new(30.0, 0.0, 50.0, 50.0);
        assert!(actor.collides(&wall));
        assert!(!actor.collides_right(&wall));
    }

    #[test]
    fn corner_sample_quirk_changes_overlap_for_tall_other_box() {
        // `other` is tall and thin: its sampled top-right corner (x + h, y)
        // reaches into `self` even though the true box does not.
        let target = Rect::new(20.0, -5.0, 10.0, 10.0);
        let tall = Rect::new(0.0, 0.0, 2.0, 25.0);
        assert!(target.collides(&tall));
        assert!(!tall.collides(&target));
    }

    #[test]
    fn direction_tests_report_penetrated_edges() {
        let wall = Rect::new(0.0, 0.0, 100.0, 100.0);
        let below_top = Rect::new(40.0, 90.0, 20.0, 20.0);
        assert!(below_top.collides_up(&wall));
        assert!(!below_top.collides_down(&wall));
        assert!(!below_top.collides_left(&wall));
        assert!(!below_top.collides_right(&wall));
    }

    #[test]
    fn centered_box_round_trips_center() {
        let rect = Rect::centered(Vec2::new(50.0, 20.0), 30.0, 10.0);
        assert_eq!(rect.x, 35.0);
        assert_eq!(rect.y, 15.0);
        assert_eq!(rect.center(), Vec2::new(50.0, 20.0));
    }

    #[test]
    fn negative_extent_is_clamped_to_zero() {
        let rect = Rect::new(0.0, 0.0, -3.0, -1.0);
        assert_eq!(rect.w, 0.0);
        assert_eq!(rect.h, 0.0);
    }
}
