use crate::{Point, Size};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Alignment and pixel offsets of a control inside its parent's area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Placement {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    pub horizontal_offset: i32,
    pub vertical_offset: i32,
}

impl Placement {
    pub fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal,
            vertical,
            horizontal_offset: 0,
            vertical_offset: 0,
        }
    }

    pub fn offset(mut self, horizontal: i32, vertical: i32) -> Self {
        self.horizontal_offset = horizontal;
        self.vertical_offset = vertical;
        self
    }

    pub fn resolve(&self, parent: Size, own: Size) -> Point {
        compute_position(
            self.horizontal,
            self.vertical,
            parent.width,
            parent.height,
            own.width,
            own.height,
            self.horizontal_offset,
            self.vertical_offset,
        )
    }
}

/// Top-left corner of a `self_w`×`self_h` box aligned inside a
/// `parent_w`×`parent_h` area. Centering floors; results are not clamped to
/// the parent.
#[allow(clippy::too_many_arguments)]
pub fn compute_position(
    horizontal: HorizontalAlignment,
    vertical: VerticalAlignment,
    parent_w: i32,
    parent_h: i32,
    self_w: i32,
    self_h: i32,
    horizontal_offset: i32,
    vertical_offset: i32,
) -> Point {
    let x = match horizontal {
        HorizontalAlignment::Left => 0,
        HorizontalAlignment::Center => (parent_w - self_w).div_euclid(2),
        HorizontalAlignment::Right => parent_w - self_w,
    };
    let y = match vertical {
        VerticalAlignment::Top => 0,
        VerticalAlignment::Center => (parent_h - self_h).div_euclid(2),
        VerticalAlignment::Bottom => parent_h - self_h,
    };
    Point::new(x + horizontal_offset, y + vertical_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use HorizontalAlignment as H;
    use VerticalAlignment as V;

    #[test]
    fn start_alignment_is_just_the_offset() {
        for parent in [Size::new(100, 50), Size::new(1920, 1080), Size::new(0, 0)] {
            let p = Placement::new(H::Left, V::Top)
                .offset(10, 10)
                .resolve(parent, Size::new(20, 20));
            assert_eq!(p, Point::new(10, 10));
        }
    }

    #[test]
    fn centered_equal_sizes_sit_at_origin() {
        let p = compute_position(H::Center, V::Center, 80, 40, 80, 40, 0, 0);
        assert_eq!(p, Point::ORIGIN);
    }

    #[test]
    fn center_and_end() {
        assert_eq!(
            compute_position(H::Center, V::Bottom, 100, 100, 30, 20, 0, -5),
            Point::new(35, 75)
        );
        assert_eq!(
            compute_position(H::Right, V::Center, 100, 100, 30, 21, 2, 0),
            Point::new(72, 39)
        );
    }

    #[test]
    fn center_floors_when_child_is_larger() {
        // (10 - 15) / 2 = -2.5, floored to -3
        assert_eq!(
            compute_position(H::Center, V::Top, 10, 0, 15, 0, 0, 0),
            Point::new(-3, 0)
        );
    }

    #[test]
    fn offsets_may_leave_the_parent() {
        let p = compute_position(H::Right, V::Bottom, 50, 50, 10, 10, 100, 100);
        assert_eq!(p, Point::new(140, 140));
    }

    #[test]
    fn repeated_calls_agree() {
        let a = compute_position(H::Center, V::Center, 333, 77, 41, 9, 3, -4);
        let b = compute_position(H::Center, V::Center, 333, 77, 41, 9, 3, -4);
        assert_eq!(a, b);
    }
}
