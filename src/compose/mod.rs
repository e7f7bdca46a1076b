//! Composers turn a profile into positioned page content.
//!
//! There is one composer for the section-based templates, driven by a
//! [TemplateSpec], and one for the card grid. Both draw through a [Pen],
//! which pairs the flow cursor with a typeface and a theme.

mod cards;
mod chips;
mod sections;
mod sidebar;
mod theme;

pub use cards::*;
pub use chips::*;
pub use sidebar::SIDEBAR_WIDTH;
pub use theme::*;

use crate::colour::Colour;
use crate::layout::{
    break_lines, contains_markup, has_bullet_markers, layout_bullets, tokenize, Flow, Line,
    LineWidths, Margins, TextMeasure, Typeface, Weight, BULLET_GLYPH,
};
use crate::model::{ProfileDocument, TemplateId};
use crate::page::{Page, RuleLayout, SpanLayout, Stroke};
use crate::pagesize::PageSize;
use crate::units::Pt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FontFamily {
    Sans,
    Serif,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeaderLayout {
    /// Name and contact line centred
    Centered,
    /// Name on the left, contact details stacked on the right
    Split,
    /// Name only; contact details live in the sidebar
    NameOnly,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Section {
    Education,
    Skills,
    Experience,
    Projects,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
        }
    }
}

/// The per-template hooks of the section composer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    pub family: FontFamily,
    pub header: HeaderLayout,
    pub sections: &'static [Section],
    pub sidebar: bool,
    pub cards: bool,
}

impl TemplateSpec {
    pub fn for_template(template: TemplateId) -> TemplateSpec {
        use Section::*;
        match template {
            TemplateId::Harvard => TemplateSpec {
                family: FontFamily::Serif,
                header: HeaderLayout::Centered,
                sections: &[Education, Skills, Experience, Projects],
                sidebar: false,
                cards: false,
            },
            TemplateId::Chronological => TemplateSpec {
                family: FontFamily::Sans,
                header: HeaderLayout::Split,
                sections: &[Experience, Projects, Education, Skills],
                sidebar: false,
                cards: false,
            },
            TemplateId::SidebarSerif => TemplateSpec {
                family: FontFamily::Serif,
                header: HeaderLayout::NameOnly,
                sections: &[Education, Experience, Projects],
                sidebar: true,
                cards: false,
            },
            TemplateId::CardGrid => TemplateSpec {
                family: FontFamily::Sans,
                header: HeaderLayout::Split,
                sections: &[Skills],
                sidebar: false,
                cards: true,
            },
        }
    }
}

/// A selected entry with its text already resolved against any enhancements
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub title: String,
    pub meta: Option<String>,
    pub body: String,
}

/// Everything a composer needs to know about what to draw
#[derive(Debug, Clone)]
pub struct ComposeInput<'a> {
    pub profile: &'a ProfileDocument,
    pub experiences: Vec<EntryView>,
    pub projects: Vec<EntryView>,
}

/// The laid-out pages and some facts about them
#[derive(Debug)]
pub struct ComposeOutcome {
    pub pages: Vec<Page>,
    /// Experience and project entries that made it onto a page
    pub entries_rendered: usize,
    /// How far content reaches down the first page
    pub first_page_height: Pt,
}

/// Lay out a whole résumé
pub fn compose(
    input: &ComposeInput,
    face: &Typeface,
    theme: &Theme,
    template: &TemplateSpec,
    size: PageSize,
    margins: Margins,
) -> ComposeOutcome {
    let margins = if template.sidebar {
        margins.with_left(SIDEBAR_WIDTH + margins.left)
    } else {
        margins
    };
    let mut pen = Pen::new(Flow::new(size, margins), face, theme);

    if template.sidebar {
        sidebar::draw_sidebar(&mut pen, input.profile);
    }

    if template.cards {
        cards::compose_cards(&mut pen, input, template);
    } else {
        sections::compose_sections(&mut pen, input, template);
    }

    pen.finish()
}

/// Draws into the flow with a fixed typeface and theme
pub(crate) struct Pen<'a> {
    pub flow: Flow,
    pub face: &'a Typeface,
    pub theme: &'a Theme,
    pub entries_rendered: usize,
    lowest: Pt,
}

impl<'a> Pen<'a> {
    pub fn new(flow: Flow, face: &'a Typeface, theme: &'a Theme) -> Pen<'a> {
        let lowest = flow.y();
        Pen {
            flow,
            face,
            theme,
            entries_rendered: 0,
            lowest,
        }
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        self.face
    }

    pub fn line_height(&self, size: Pt) -> Pt {
        self.face.line_height(Weight::Regular, size)
    }

    pub fn left(&self) -> Pt {
        self.flow.left()
    }

    pub fn width(&self) -> Pt {
        self.flow.content_width()
    }

    pub fn page(&mut self) -> &mut Page {
        self.flow.page_mut()
    }

    // the lowest point drawn on the first page, for the insufficient content check
    fn note_extent(&mut self) {
        if self.flow.page_index() == 0 {
            self.lowest = self.lowest.min(self.flow.y());
        }
    }

    pub fn note_y(&mut self, y: Pt) {
        if self.flow.page_index() == 0 {
            self.lowest = self.lowest.min(y);
        }
    }

    /// Draw a single run of text whose line box starts at `top`
    pub fn run(&mut self, text: &str, weight: Weight, size: Pt, colour: Colour, x: Pt, top: Pt) {
        let baseline = top - self.face.baseline_offset(Weight::Regular, size);
        let font = self.face.span_font(weight, size);
        self.page().add_span(SpanLayout {
            text: text.to_string(),
            font,
            colour,
            coords: (x, baseline),
        });
    }

    /// Draw a broken line whose line box starts at `top`
    pub fn line_at(&mut self, line: &Line, size: Pt, colour: Colour, x: Pt, top: Pt) {
        for placement in line.placements.iter() {
            self.run(
                &placement.text,
                placement.weight,
                size,
                colour,
                x + placement.x,
                top,
            );
        }
    }

    /// Draw lines at the cursor, breaking pages between lines as needed
    pub fn lines(&mut self, lines: &[Line], size: Pt, colour: Colour, x: Pt) {
        let line_height = self.line_height(size);
        for line in lines {
            self.flow.ensure(line_height);
            let top = self.flow.y();
            self.line_at(line, size, colour, x, top);
            self.flow.advance(line_height);
            self.note_extent();
        }
    }

    /// Draw a single run at the cursor and move below it
    pub fn text_line(&mut self, text: &str, weight: Weight, size: Pt, colour: Colour, x: Pt) {
        let line_height = self.line_height(size);
        self.flow.ensure(line_height);
        let top = self.flow.y();
        self.run(text, weight, size, colour, x, top);
        self.flow.advance(line_height);
        self.note_extent();
    }

    pub fn rule(&mut self, x1: Pt, x2: Pt, y: Pt, colour: Colour) {
        let width = self.theme.rule_width();
        self.note_y(y);
        self.flow.page_mut().add_rule(RuleLayout {
            from: (x1, y),
            to: (x2, y),
            stroke: Stroke { colour, width },
        });
    }

    /// Markdown-aware paragraphs, one per non-empty input line
    pub fn paragraphs(&mut self, text: &str, size: Pt, x: Pt, width: Pt, justify: bool) {
        let colour = self.theme.text();
        for paragraph in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let lines = break_lines(
                &tokenize(paragraph),
                self.measure(),
                size,
                LineWidths::uniform(width),
                justify,
            );
            self.lines(&lines, size, colour, x);
        }
    }

    /// A bulleted list with a hanging indent
    pub fn bullets(&mut self, text: &str, size: Pt, x: Pt, width: Pt) {
        let indent = self.theme.bullet_indent();
        let items = layout_bullets(text, self.measure(), size, width, indent, true);
        let line_height = self.line_height(size);
        let colour = self.theme.text();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.flow.gap(size * 0.15);
            }
            for (j, line) in item.lines.iter().enumerate() {
                self.flow.ensure(line_height);
                let top = self.flow.y();
                if j == 0 {
                    self.run(BULLET_GLYPH, Weight::Regular, size, colour, x + size * 0.2, top);
                }
                self.line_at(line, size, colour, x + indent, top);
                self.flow.advance(line_height);
                self.note_extent();
            }
        }
    }

    /// An entry body: paragraphs when it carries inline markup and no list
    /// markers, bullets otherwise
    pub fn body(&mut self, text: &str, x: Pt, width: Pt) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let size = self.theme.body;
        if contains_markup(text) && !has_bullet_markers(text) {
            self.paragraphs(text, size, x, width, true);
        } else {
            self.bullets(text, size, x, width);
        }
    }

    pub fn finish(mut self) -> ComposeOutcome {
        self.note_extent();
        let first_page_height = self.flow.top() - self.lowest;
        ComposeOutcome {
            first_page_height,
            entries_rendered: self.entries_rendered,
            pages: self.flow.into_pages(),
        }
    }
}
