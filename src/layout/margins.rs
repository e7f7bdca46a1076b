use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;

/// Margins bound the area the flow cursor writes into. Nothing prevents a
/// drawing from crossing them (an over-long word may stick out to the right),
/// but every vertical page-break decision is taken against the bottom margin.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric<D: Into<Pt>>(vertical: D, horizontal: D) -> Margins {
        let (vertical, horizontal) = (vertical.into(), horizontal.into());
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// Copy of these margins with the left edge pushed inwards, used for the
    /// main column of the sidebar template
    pub fn with_left(&self, left: Pt) -> Margins {
        Margins { left, ..*self }
    }

    /// The writable area of a page of the given size
    pub fn content_box(&self, size: PageSize) -> Rect {
        Rect {
            x1: self.left,
            y1: self.bottom,
            x2: size.0 - self.right,
            y2: size.1 - self.top,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pagesize::LETTER;

    #[test]
    fn content_box_subtracts_margins() {
        let bx = Margins::symmetric(Pt(40.0), Pt(50.0)).content_box(LETTER);
        assert_eq!(bx.width(), Pt(512.0));
        assert_eq!(bx.height(), Pt(712.0));
        assert_eq!(bx.y2, Pt(752.0));
    }
}
