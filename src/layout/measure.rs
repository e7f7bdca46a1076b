use crate::document::Document;
use crate::font::Font;
use crate::page::SpanFont;
use crate::units::Pt;
use id_arena::Id;

/// The font variants the layout engine distinguishes. There is deliberately no
/// italic: only regular and bold faces are registered, so italic requests are
/// measured and drawn with the regular face.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Weight {
    #[default]
    Regular,
    Bold,
}

/// Text measurement service used by every layout function.
///
/// Implementations must be pure: the same arguments always give the same
/// width, which is what lets card heights be estimated before drawing.
pub trait TextMeasure {
    /// Rendered width of `text` on a single line
    fn width(&self, weight: Weight, size: Pt, text: &str) -> Pt;

    /// Distance between consecutive baselines
    fn line_height(&self, weight: Weight, size: Pt) -> Pt;

    /// Distance from the top of a line box to the glyph tops
    fn ascent(&self, weight: Weight, size: Pt) -> Pt;

    /// Offset from the top of a line box down to its baseline. The glyph box
    /// (ascent to descent) is centred in the line box.
    fn baseline_offset(&self, weight: Weight, size: Pt) -> Pt {
        let line_height = self.line_height(weight, size);
        let glyph_box = self.ascent(weight, size) + self.descent(weight, size).abs();
        self.ascent(weight, size) + (line_height - glyph_box) / 2.0
    }

    /// Distance below the baseline, as a negative number
    fn descent(&self, weight: Weight, size: Pt) -> Pt;
}

/// A regular/bold font pair registered in a document
#[derive(Clone, Debug)]
pub struct Typeface {
    regular: (Id<Font>, Font),
    bold: (Id<Font>, Font),
    line_spacing: f32,
}

impl Typeface {
    /// Add both fonts to the document and remember their ids
    pub fn register(document: &mut Document, regular: Font, bold: Font) -> Typeface {
        let regular_id = document.add_font(regular.clone());
        let bold_id = document.add_font(bold.clone());
        Typeface {
            regular: (regular_id, regular),
            bold: (bold_id, bold),
            line_spacing: 1.0,
        }
    }

    /// Scale every line height by `spacing`, as word processors do with
    /// "1.15" or "1.5" line spacing
    pub fn with_line_spacing(mut self, spacing: f32) -> Typeface {
        self.line_spacing = spacing;
        self
    }

    fn font(&self, weight: Weight) -> &Font {
        match weight {
            Weight::Regular => &self.regular.1,
            Weight::Bold => &self.bold.1,
        }
    }

    pub fn font_id(&self, weight: Weight) -> Id<Font> {
        match weight {
            Weight::Regular => self.regular.0,
            Weight::Bold => self.bold.0,
        }
    }

    pub fn span_font(&self, weight: Weight, size: Pt) -> SpanFont {
        SpanFont {
            id: self.font_id(weight),
            size,
        }
    }
}

impl TextMeasure for Typeface {
    fn width(&self, weight: Weight, size: Pt, text: &str) -> Pt {
        self.font(weight).width_of_text(text, size)
    }

    fn line_height(&self, weight: Weight, size: Pt) -> Pt {
        self.font(weight).line_height(size) * self.line_spacing
    }

    fn ascent(&self, weight: Weight, size: Pt) -> Pt {
        self.font(weight).ascent(size)
    }

    fn descent(&self, weight: Weight, size: Pt) -> Pt {
        self.font(weight).descent(size)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Every character is half an em wide (bold: 0.6 em), lines are 1.2 em.
    /// Makes wrap arithmetic in tests exact.
    pub(crate) struct FixedAdvance;

    impl TextMeasure for FixedAdvance {
        fn width(&self, weight: Weight, size: Pt, text: &str) -> Pt {
            let advance = match weight {
                Weight::Regular => 0.5,
                Weight::Bold => 0.6,
            };
            size * (advance * text.chars().count() as f32)
        }

        fn line_height(&self, _weight: Weight, size: Pt) -> Pt {
            size * 1.2
        }

        fn ascent(&self, _weight: Weight, size: Pt) -> Pt {
            size * 0.8
        }

        fn descent(&self, _weight: Weight, size: Pt) -> Pt {
            size * -0.2
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::standard::StandardFont;

    #[test]
    fn typeface_measures_each_weight_with_its_own_font() {
        let mut doc = Document::default();
        let face = Typeface::register(
            &mut doc,
            Font::Standard(StandardFont::Helvetica),
            Font::Standard(StandardFont::HelveticaBold),
        );
        assert_eq!(doc.fonts.len(), 2);
        let regular = face.width(Weight::Regular, Pt(10.0), "Python");
        let bold = face.width(Weight::Bold, Pt(10.0), "Python");
        assert!(bold > regular);
        assert_ne!(face.font_id(Weight::Regular), face.font_id(Weight::Bold));
    }

    #[test]
    fn line_spacing_scales_line_height_only() {
        let mut doc = Document::default();
        let face = Typeface::register(
            &mut doc,
            Font::Standard(StandardFont::TimesRoman),
            Font::Standard(StandardFont::TimesBold),
        );
        let single = face.line_height(Weight::Regular, Pt(10.0));
        let width = face.width(Weight::Regular, Pt(10.0), "Apollo");
        let face = face.with_line_spacing(1.5);
        assert!((face.line_height(Weight::Regular, Pt(10.0)) - single * 1.5).abs() < Pt(1e-4));
        assert_eq!(face.width(Weight::Regular, Pt(10.0), "Apollo"), width);
        // the glyph box stays centred in the taller line
        let offset = face.baseline_offset(Weight::Regular, Pt(10.0));
        assert!(offset > face.ascent(Weight::Regular, Pt(10.0)));
    }

    #[test]
    fn baseline_sits_inside_the_line_box() {
        let offset = testing::FixedAdvance.baseline_offset(Weight::Regular, Pt(10.0));
        assert!((offset.0 - 9.0).abs() < 1e-4);
    }
}
