use crate::colour::Colour;
use crate::content::render_contents;
use crate::font::Font;
use crate::layout::Margins;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};

/// The font and size a span of text is drawn with
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A run of text in a single font and colour, positioned by its baseline origin
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// Outline of a shape
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Stroke {
    pub colour: Colour,
    pub width: Pt,
}

/// A filled and/or stroked rectangle, optionally with rounded corners
#[derive(Clone, PartialEq, Debug)]
pub struct BoxLayout {
    pub rect: Rect,
    pub fill: Option<Colour>,
    pub stroke: Option<Stroke>,
    pub corner_radius: Pt,
}

/// A straight stroked line
#[derive(Clone, PartialEq, Debug)]
pub struct RuleLayout {
    pub from: (Pt, Pt),
    pub to: (Pt, Pt),
    pub stroke: Stroke,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(Vec<SpanLayout>),
    Box(BoxLayout),
    Rule(RuleLayout),
}

/// A single fixed-size canvas. Content is recorded in drawing order and only
/// turned into PDF operators when the document is written.
#[derive(Clone, Debug)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// Everything drawn on the page, in painting order
    pub contents: Vec<PageContents>,
}

impl Page {
    /// Create a new page with the given size and margins
    pub fn new(size: PageSize, margins: Margins) -> Page {
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: size.0,
                y2: size.1,
            },
            content_box: margins.content_box(size),
            contents: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        if span.text.is_empty() {
            return;
        }
        // consecutive spans share one text object
        if let Some(PageContents::Text(spans)) = self.contents.last_mut() {
            spans.push(span);
        } else {
            self.contents.push(PageContents::Text(vec![span]));
        }
    }

    pub fn add_box(&mut self, layout: BoxLayout) {
        self.contents.push(PageContents::Box(layout));
    }

    pub fn add_rule(&mut self, layout: RuleLayout) {
        self.contents.push(PageContents::Rule(layout));
    }

    /// Every span on the page, in drawing order
    pub fn spans(&self) -> impl Iterator<Item = &SpanLayout> {
        self.contents
            .iter()
            .filter_map(|c| match c {
                PageContents::Text(spans) => Some(spans.iter()),
                _ => None,
            })
            .flatten()
    }

    /// The page's text, spans joined by single spaces. Handy for assertions
    /// and debugging; it does not reproduce the visual line structure.
    pub fn text(&self) -> String {
        self.spans()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        writer: &mut Pdf,
    ) -> Result<(), std::io::Error> {
        let (Some(id), Some(parent)) = (
            refs.get(RefType::Page(page_index)),
            refs.get(RefType::PageTree),
        ) else {
            return Err(std::io::Error::other(
                "page references are generated before pages are written",
            ));
        };
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (font_id, _) in fonts.iter() {
            if let Some(font_ref) = refs.get(RefType::Font(font_id.index())) {
                resource_fonts.pair(Name(format!("F{}", font_id.index()).as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = render_contents(&self.contents, fonts)?;
        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}
