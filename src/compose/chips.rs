use super::Pen;
use crate::layout::{TextMeasure, Weight};
use crate::page::{BoxLayout, Stroke};
use crate::rect::Rect;
use crate::units::Pt;

/// One skill, drawn as a rounded pill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub text: String,
    pub weight: Weight,
}

/// Split a skills string on commas, semicolons and newlines. A skill wrapped
/// in `**` becomes a bold chip; one wrapped in `*` loses its delimiters.
pub fn parse_chips(skills: &str) -> Vec<Chip> {
    skills
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|skill| {
            let (text, weight) = if let Some(inner) = skill
                .strip_prefix("**")
                .and_then(|s| s.strip_suffix("**"))
            {
                (inner.trim(), Weight::Bold)
            } else if let Some(inner) = skill
                .strip_prefix('*')
                .and_then(|s| s.strip_suffix('*'))
            {
                (inner.trim(), Weight::Regular)
            } else {
                (skill, Weight::Regular)
            };
            (!text.is_empty()).then(|| Chip {
                text: text.to_string(),
                weight,
            })
        })
        .collect()
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChipMetrics {
    pub padding_x: Pt,
    pub padding_y: Pt,
    /// Horizontal space between chips in a row
    pub gap: Pt,
    pub row_gap: Pt,
    pub radius: Pt,
}

impl ChipMetrics {
    pub fn for_size(size: Pt) -> ChipMetrics {
        ChipMetrics {
            padding_x: size * 0.6,
            padding_y: size * 0.25,
            gap: size * 0.45,
            row_gap: size * 0.45,
            radius: size * 0.5,
        }
    }
}

/// A chip positioned relative to the left edge of its row
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedChip {
    pub chip: Chip,
    pub x: Pt,
    pub width: Pt,
}

/// Flow chips left to right, wrapping into a new row when the next chip would
/// cross `max_width`. A chip wider than a whole row is clamped to the row.
pub fn layout_chips(
    chips: Vec<Chip>,
    measure: &dyn TextMeasure,
    size: Pt,
    max_width: Pt,
    metrics: ChipMetrics,
) -> Vec<Vec<PlacedChip>> {
    let mut rows: Vec<Vec<PlacedChip>> = Vec::new();
    let mut row: Vec<PlacedChip> = Vec::new();
    let mut x = Pt::ZERO;

    for chip in chips {
        let width = (measure.width(chip.weight, size, &chip.text) + metrics.padding_x * 2.0)
            .min(max_width);
        if !row.is_empty() && x + width > max_width {
            rows.push(std::mem::take(&mut row));
            x = Pt::ZERO;
        }
        row.push(PlacedChip { chip, x, width });
        x += width + metrics.gap;
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

/// Draw a skills string as chips at the cursor. Each row is checked against
/// the bottom margin before it is drawn. Returns the cursor position below the
/// block.
pub(crate) fn draw_chips(pen: &mut Pen, skills: &str, x: Pt, width: Pt) -> Pt {
    let theme = pen.theme;
    let size = theme.meta;
    let metrics = ChipMetrics::for_size(size);
    let height = pen.line_height(size) + metrics.padding_y * 2.0;
    let rows = layout_chips(parse_chips(skills), pen.measure(), size, width, metrics);

    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            pen.flow.advance(metrics.row_gap);
        }
        pen.flow.ensure(height);
        let top = pen.flow.y();
        for placed in row.iter() {
            pen.page().add_box(BoxLayout {
                rect: Rect::from_top_left(x + placed.x, top, placed.width, height),
                fill: Some(theme.accent.wash()),
                stroke: Some(Stroke {
                    colour: theme.accent.light(),
                    width: Pt(0.5),
                }),
                corner_radius: metrics.radius,
            });
            pen.run(
                &placed.chip.text,
                placed.chip.weight,
                size,
                theme.text(),
                x + placed.x + metrics.padding_x,
                top - metrics.padding_y,
            );
        }
        pen.flow.advance(height);
        pen.note_y(pen.flow.y());
    }
    pen.flow.y()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::testing::FixedAdvance;

    #[test]
    fn emphasis_delimiters_are_stripped() {
        let chips = parse_chips("**Python**, Go, *Rust*");
        assert_eq!(
            chips,
            vec![
                Chip {
                    text: "Python".to_string(),
                    weight: Weight::Bold
                },
                Chip {
                    text: "Go".to_string(),
                    weight: Weight::Regular
                },
                Chip {
                    text: "Rust".to_string(),
                    weight: Weight::Regular
                },
            ]
        );
    }

    #[test]
    fn separators_and_blanks() {
        let chips = parse_chips("SQL;\nGit ,, ** **");
        let texts: Vec<&str> = chips.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["SQL", "Git"]);
    }

    #[test]
    fn chips_wrap_into_rows() {
        let metrics = ChipMetrics {
            padding_x: Pt(5.0),
            padding_y: Pt(2.0),
            gap: Pt(5.0),
            row_gap: Pt(5.0),
            radius: Pt(3.0),
        };
        // each "abcd" chip is 20 + 10 = 30 wide
        let chips = parse_chips("abcd, abcd, abcd, abcd");
        let rows = layout_chips(chips, &FixedAdvance, Pt(10.0), Pt(100.0), metrics);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0][2].x, Pt(70.0));
        assert_eq!(rows[1][0].x, Pt::ZERO);
    }

    #[test]
    fn oversized_chips_are_clamped() {
        let metrics = ChipMetrics::for_size(Pt(10.0));
        let rows = layout_chips(
            parse_chips("an extremely long skill description"),
            &FixedAdvance,
            Pt(10.0),
            Pt(50.0),
            metrics,
        );
        assert_eq!(rows[0][0].width, Pt(50.0));
    }
}
