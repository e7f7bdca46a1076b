use super::markdown::tokenize;
use super::measure::TextMeasure;
use super::text::{break_lines, Line, LineWidths};
use crate::units::Pt;

/// The glyph drawn in front of every bullet item
pub const BULLET_GLYPH: &str = "\u{2022}";

/// A bullet item broken into lines. Line placements are relative to the
/// item's text column, i.e. already offset by the hanging indent.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletItem {
    pub lines: Vec<Line>,
}

/// Whether any line of `text` starts with a bullet marker or contains a
/// bullet glyph
pub fn has_bullet_markers(text: &str) -> bool {
    text.lines()
        .any(|line| line.contains('\u{2022}') || strip_marker(line.trim_start()).is_some())
}

// leading "•", or "-", "*", "–", "—" followed by whitespace
fn strip_marker(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix('\u{2022}') {
        return Some(rest.trim_start());
    }
    for marker in ['-', '*', '\u{2013}', '\u{2014}'] {
        if let Some(rest) = line.strip_prefix(marker) {
            if rest.starts_with(char::is_whitespace) {
                return Some(rest.trim_start());
            }
        }
    }
    None
}

/// Split free text into bullet items.
///
/// With explicit markers, every marked line starts an item, unmarked lines
/// stand alone, and a "•" inside a line starts a further item. Without
/// markers every non-empty line is an item, and text without line breaks is
/// a single item.
pub fn split_bullet_items(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n");
    let lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    if has_bullet_markers(&text) {
        lines
            .flat_map(|line| {
                let line = strip_marker(line).unwrap_or(line);
                line.split('\u{2022}')
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    } else {
        lines.map(str::to_string).collect()
    }
}

/// Lay out `text` as a bulleted list. Every item's text hangs at `indent`
/// from the glyph column and wraps within `max_width - indent`.
pub fn layout_bullets(
    text: &str,
    measure: &dyn TextMeasure,
    size: Pt,
    max_width: Pt,
    indent: Pt,
    justify: bool,
) -> Vec<BulletItem> {
    let widths = LineWidths::uniform(max_width - indent);
    split_bullet_items(text)
        .iter()
        .map(|item| BulletItem {
            lines: break_lines(&tokenize(item), measure, size, widths, justify),
        })
        .filter(|item| !item.lines.is_empty())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::measure::testing::FixedAdvance;
    use crate::layout::measure::Weight;

    #[test]
    fn marked_lines_become_items() {
        let text = "- Built the parser\n• Shipped v2 • Cut latency\n\n* Mentored two engineers";
        assert_eq!(
            split_bullet_items(text),
            vec![
                "Built the parser",
                "Shipped v2",
                "Cut latency",
                "Mentored two engineers"
            ]
        );
    }

    #[test]
    fn unmarked_text_splits_on_lines() {
        assert_eq!(
            split_bullet_items("First thing\r\nSecond thing\n"),
            vec!["First thing", "Second thing"]
        );
        assert_eq!(split_bullet_items("  just one  "), vec!["just one"]);
        assert!(split_bullet_items(" \n \n").is_empty());
    }

    #[test]
    fn bold_lead_is_not_a_marker() {
        assert!(!has_bullet_markers("**Lead** engineer"));
        assert!(!has_bullet_markers("-5% churn"));
        assert!(has_bullet_markers("  - indented"));
    }

    #[test]
    fn items_wrap_inside_the_hanging_indent() {
        let items = layout_bullets(
            "- aaaa bbbb cccc\n- **dd**",
            &FixedAdvance,
            Pt(10.0),
            Pt(60.0),
            Pt(10.0),
            false,
        );
        assert_eq!(items.len(), 2);
        let first: Vec<&str> = items[0].lines.iter().map(|l| l.text()).collect();
        assert_eq!(first, vec!["aaaa bbbb", "cccc"]);
        assert_eq!(items[1].lines[0].placements[0].weight, Weight::Bold);
    }
}
