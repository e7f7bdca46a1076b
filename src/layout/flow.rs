use super::margins::Margins;
use crate::page::{Page, PageContents};
use crate::pagesize::PageSize;
use crate::units::Pt;

/// Content repeated at the top of every continuation page
#[derive(Debug, Clone, Default)]
pub struct RunningHeader {
    /// Drawn in page coordinates, the same on every page
    pub contents: Vec<PageContents>,
    /// Space the header takes below the top margin
    pub height: Pt,
}

/// A vertical cursor over a growing list of pages.
///
/// Composers ask the flow whether the next unit of content fits, and the flow
/// starts a new page (carrying the running header over, if any) when it does
/// not. `y` is the top of the next thing to draw; it only ever moves down
/// except when a page break resets it.
#[derive(Debug)]
pub struct Flow {
    size: PageSize,
    margins: Margins,
    finished: Vec<Page>,
    current: Page,
    y: Pt,
    running_header: Option<RunningHeader>,
}

impl Flow {
    pub fn new(size: PageSize, margins: Margins) -> Flow {
        Flow {
            size,
            margins,
            finished: Vec::new(),
            current: Page::new(size, margins),
            y: size.1 - margins.top,
            running_header: None,
        }
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Top of the content area on the first page
    pub fn top(&self) -> Pt {
        self.size.1 - self.margins.top
    }

    /// Where content starts on the current page, below any running header
    pub fn page_top(&self) -> Pt {
        match (&self.running_header, self.finished.is_empty()) {
            (Some(header), false) => self.top() - header.height,
            _ => self.top(),
        }
    }

    pub fn bottom(&self) -> Pt {
        self.margins.bottom
    }

    pub fn left(&self) -> Pt {
        self.margins.left
    }

    pub fn right(&self) -> Pt {
        self.size.0 - self.margins.right
    }

    pub fn content_width(&self) -> Pt {
        self.right() - self.left()
    }

    pub fn y(&self) -> Pt {
        self.y
    }

    pub fn set_y(&mut self, y: Pt) {
        self.y = y;
    }

    pub fn advance(&mut self, dy: Pt) {
        self.y -= dy;
    }

    /// Vertical space left on the current page
    pub fn remaining(&self) -> Pt {
        self.y - self.bottom()
    }

    pub fn fits(&self, height: Pt) -> bool {
        self.y - height >= self.bottom() - Pt(0.01)
    }

    /// Nothing has been drawn below the page top yet
    pub fn at_page_top(&self) -> bool {
        self.y >= self.page_top()
    }

    /// Make sure `height` fits below the cursor, breaking to a new page if it
    /// does not. A unit taller than a whole page is drawn where it is when the
    /// page is still empty. Returns whether a page break happened.
    pub fn ensure(&mut self, height: Pt) -> bool {
        if self.fits(height) || self.at_page_top() {
            return false;
        }
        self.new_page();
        true
    }

    /// Move a vertical gap down, unless the cursor sits at the top of a page
    /// or the gap would run past the bottom margin
    pub fn gap(&mut self, height: Pt) {
        if self.at_page_top() {
            return;
        }
        if self.fits(height) {
            self.advance(height);
        } else {
            self.y = self.bottom();
        }
    }

    pub fn new_page(&mut self) {
        let fresh = Page::new(self.size, self.margins);
        let done = std::mem::replace(&mut self.current, fresh);
        self.finished.push(done);
        if let Some(header) = &self.running_header {
            self.current.contents.extend(header.contents.iter().cloned());
        }
        self.y = self.page_top();
        log::debug!("page break: starting page {}", self.page_index() + 1);
    }

    /// Install content that will be drawn at the top of every page started
    /// from now on
    pub fn set_running_header(&mut self, header: RunningHeader) {
        self.running_header = Some(header);
    }

    /// Zero-based index of the current page
    pub fn page_index(&self) -> usize {
        self.finished.len()
    }

    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.current
    }

    /// All pages in order, the current one last
    pub fn into_pages(self) -> Vec<Page> {
        let mut pages = self.finished;
        pages.push(self.current);
        pages
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::colour::colours;
    use crate::page::{RuleLayout, Stroke};

    fn flow() -> Flow {
        // 100pt of usable height
        Flow::new((Pt(200.0), Pt(140.0)), Margins::all(Pt(20.0)))
    }

    #[test]
    fn ensure_breaks_only_when_needed() {
        let mut flow = flow();
        assert_eq!(flow.y(), Pt(120.0));
        assert!(!flow.ensure(Pt(60.0)));
        flow.advance(Pt(60.0));
        assert!(!flow.ensure(Pt(40.0)));
        assert!(flow.ensure(Pt(41.0)));
        assert_eq!(flow.page_count(), 2);
        assert_eq!(flow.y(), Pt(120.0));
    }

    #[test]
    fn oversized_units_do_not_loop_on_empty_pages() {
        let mut flow = flow();
        assert!(!flow.ensure(Pt(500.0)));
        assert_eq!(flow.page_count(), 1);
    }

    #[test]
    fn running_header_is_copied_to_continuation_pages() {
        let mut flow = flow();
        flow.set_running_header(RunningHeader {
            contents: vec![PageContents::Rule(RuleLayout {
                from: (Pt(20.0), Pt(110.0)),
                to: (Pt(180.0), Pt(110.0)),
                stroke: Stroke {
                    colour: colours::BLACK,
                    width: Pt(0.5),
                },
            })],
            height: Pt(15.0),
        });
        assert_eq!(flow.page_top(), Pt(120.0));
        flow.advance(Pt(90.0));
        assert!(flow.ensure(Pt(20.0)));
        assert_eq!(flow.y(), Pt(105.0));
        assert!(flow.at_page_top());

        let pages = flow.into_pages();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contents.is_empty());
        assert_eq!(pages[1].contents.len(), 1);
    }

    #[test]
    fn gaps_vanish_at_the_top_of_a_page() {
        let mut flow = flow();
        flow.gap(Pt(10.0));
        assert_eq!(flow.y(), Pt(120.0));
        flow.advance(Pt(95.0));
        flow.gap(Pt(10.0));
        assert_eq!(flow.y(), flow.bottom());
    }
}
