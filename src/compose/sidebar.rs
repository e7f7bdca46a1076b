use super::chips::parse_chips;
use super::Pen;
use crate::layout::{wrap_breaking_words, Weight};
use crate::model::ProfileDocument;
use crate::page::BoxLayout;
use crate::rect::Rect;
use crate::units::Pt;

/// Width of the shaded column, measured from the left page edge
pub const SIDEBAR_WIDTH: Pt = Pt(190.0);

const INSET: Pt = Pt(18.0);

/// Draw the contact, skills and languages column on the first page. It has
/// its own cursor, independent of the main flow, and content that does not fit
/// above the bottom margin is dropped.
pub(crate) fn draw_sidebar(pen: &mut Pen, profile: &ProfileDocument) {
    let theme = pen.theme;
    let (_, page_height) = pen.flow.size();
    let margins = pen.flow.margins();

    pen.page().add_box(BoxLayout {
        rect: Rect {
            x1: Pt::ZERO,
            y1: Pt::ZERO,
            x2: SIDEBAR_WIDTH,
            y2: page_height,
        },
        fill: Some(theme.accent.wash()),
        stroke: None,
        corner_radius: Pt::ZERO,
    });

    let skills: Vec<String> = parse_chips(&profile.skills_text)
        .into_iter()
        .map(|chip| chip.text)
        .collect();
    let languages: Vec<String> = profile
        .languages
        .as_deref()
        .map(|l| parse_chips(l).into_iter().map(|chip| chip.text).collect())
        .unwrap_or_default();
    let contact: Vec<String> = profile
        .contact
        .items()
        .into_iter()
        .map(str::to_string)
        .collect();
    let blocks = [
        ("Contact", contact),
        ("Skills", skills),
        ("Languages", languages),
    ];

    let size = theme.meta;
    let line_height = pen.line_height(size);
    let label_height = pen.line_height(theme.body);
    let inner = SIDEBAR_WIDTH - INSET * 2.0;
    let bottom = margins.bottom;
    let mut y = page_height - margins.top;
    let mut truncated = false;

    'blocks: for (i, (label, items)) in blocks.iter().enumerate() {
        if items.is_empty() {
            continue;
        }
        if i > 0 && y < page_height - margins.top {
            y -= label_height * 0.6;
        }
        if y - label_height - line_height < bottom {
            truncated = true;
            break 'blocks;
        }
        pen.run(
            &label.to_uppercase(),
            theme.heading_weight(),
            theme.body,
            theme.accent(),
            INSET,
            y,
        );
        y -= label_height + Pt(2.0);

        for item in items.iter() {
            for line in wrap_breaking_words(item, Weight::Regular, pen.measure(), size, inner) {
                if y - line_height < bottom {
                    truncated = true;
                    break 'blocks;
                }
                pen.run(&line, Weight::Regular, size, theme.text(), INSET, y);
                y -= line_height;
            }
        }
    }

    if truncated {
        log::warn!("sidebar content does not fit on the first page and was truncated");
    }
}
