use crate::colour::{colours, AccentColour, Colour};
use crate::layout::Weight;
use crate::model::StyleConfig;
use crate::units::Pt;

/// Sizes, weights and colours derived from a [StyleConfig]
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub body: Pt,
    pub section_title: Pt,
    pub name: Pt,
    pub meta: Pt,
    pub accent: AccentColour,
    pub use_bold: bool,
}

impl Theme {
    pub fn from_style(style: &StyleConfig) -> Theme {
        let base = style.font_size_pt.pt();
        Theme {
            body: base,
            section_title: (base + Pt(2.0)).max(Pt(11.0)),
            name: (base * 1.8).max(Pt(18.0)),
            meta: (base - Pt(1.0)).max(Pt(8.0)),
            accent: style.accent_color,
            use_bold: style.use_bold,
        }
    }

    /// Weight of headings, names and entry titles
    pub fn heading_weight(&self) -> Weight {
        if self.use_bold {
            Weight::Bold
        } else {
            Weight::Regular
        }
    }

    /// Weight of dates and other meta text. Italic has no face of its own and
    /// falls back to regular.
    pub fn meta_weight(&self) -> Weight {
        Weight::Regular
    }

    pub fn text(&self) -> Colour {
        colours::TEXT
    }

    pub fn muted(&self) -> Colour {
        colours::MUTED
    }

    /// Headings in the accent colour; a black accent keeps body text colour
    pub fn accent(&self) -> Colour {
        match self.accent {
            AccentColour::Black => colours::TEXT,
            accent => accent.base(),
        }
    }

    pub fn section_gap(&self) -> Pt {
        self.body * 0.9
    }

    pub fn entry_gap(&self) -> Pt {
        self.body * 0.55
    }

    pub fn bullet_indent(&self) -> Pt {
        self.body * 1.1
    }

    pub fn rule_width(&self) -> Pt {
        Pt(0.6)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::FontSize;

    fn style(size: u8) -> StyleConfig {
        StyleConfig {
            font_size_pt: FontSize::try_from(size).expect("allowed size"),
            ..StyleConfig::default()
        }
    }

    #[test]
    fn sizes_scale_with_floors() {
        let small = Theme::from_style(&style(8));
        assert_eq!(small.section_title, Pt(11.0));
        assert_eq!(small.name, Pt(18.0));
        assert_eq!(small.meta, Pt(8.0));

        let large = Theme::from_style(&style(14));
        assert_eq!(large.section_title, Pt(16.0));
        assert!((large.name - Pt(25.2)).abs() < Pt(0.001));
        assert_eq!(large.meta, Pt(13.0));
    }

    #[test]
    fn bold_off_and_italic_requests_keep_regular_faces() {
        let theme = Theme::from_style(&StyleConfig {
            use_bold: false,
            use_italic: true,
            ..StyleConfig::default()
        });
        assert_eq!(theme.heading_weight(), Weight::Regular);
        assert_eq!(theme.meta_weight(), Weight::Regular);
    }
}
