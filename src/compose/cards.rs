use super::chips::draw_chips;
use super::sections::{header, section_title};
use super::{ComposeInput, Pen, Section, TemplateSpec, Theme};
use crate::colour::colours;
use crate::layout::{
    break_lines, break_plain, contains_markup, has_bullet_markers, layout_bullets, tokenize,
    BulletItem, Line, LineWidths, RunningHeader, TextMeasure, Weight, BULLET_GLYPH,
};
use crate::page::{BoxLayout, PageContents, RuleLayout, SpanLayout, Stroke};
use crate::rect::Rect;
use crate::units::Pt;

/// Horizontal space between the two card columns
pub const COLUMN_GAP: Pt = Pt(14.0);
/// Vertical space between cards in a column
pub const CARD_GAP: Pt = Pt(10.0);

/// One entry in the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub meta_right: Option<String>,
    pub body: String,
    pub is_bullet_body: bool,
    /// Filled in by [Card::estimate]
    pub estimated_height: Pt,
}

impl Card {
    pub fn new<S: Into<String>>(title: S, meta_right: Option<String>, body: S) -> Card {
        let body = body.into();
        let is_bullet_body = !(contains_markup(&body) && !has_bullet_markers(&body));
        Card {
            title: title.into(),
            meta_right: meta_right.filter(|m| !m.trim().is_empty()),
            body,
            is_bullet_body,
            estimated_height: Pt::ZERO,
        }
    }

    /// Lay the card out and remember its height. The returned layout is the
    /// one that gets drawn, so the estimate is exact.
    pub fn estimate(
        &mut self,
        measure: &dyn TextMeasure,
        theme: &Theme,
        geometry: CardGeometry,
    ) -> CardLayout {
        let layout = CardLayout::new(self, measure, theme, geometry);
        self.estimated_height = layout.height;
        layout
    }
}

/// Card chrome dimensions
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CardGeometry {
    pub width: Pt,
    pub padding: Pt,
    /// Height of the accent bar along the top edge
    pub bar: Pt,
    pub radius: Pt,
}

impl CardGeometry {
    pub fn for_width(width: Pt) -> CardGeometry {
        CardGeometry {
            width,
            padding: Pt(8.0),
            bar: Pt(3.0),
            radius: Pt(4.0),
        }
    }

    pub fn inner_width(&self) -> Pt {
        self.width - self.padding * 2.0
    }
}

/// One line of card body text
#[derive(Debug, Clone, PartialEq)]
pub struct BodyRow {
    pub line: Line,
    /// First line of a bullet item; draws the glyph
    pub glyph: bool,
    /// Sits at the bullet indent
    pub indented: bool,
}

fn bullet_rows(items: Vec<BulletItem>) -> Vec<BodyRow> {
    items
        .into_iter()
        .flat_map(|item| {
            item.lines
                .into_iter()
                .enumerate()
                .map(|(i, line)| BodyRow {
                    line,
                    glyph: i == 0,
                    indented: true,
                })
        })
        .collect()
}

/// Everything needed to draw a card, computed once
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub title_lines: Vec<Line>,
    /// Meta text and its width
    pub meta: Option<(String, Pt)>,
    /// Whether the meta text shares the first title line
    pub meta_inline: bool,
    pub rows: Vec<BodyRow>,
    pub height: Pt,
    pub geometry: CardGeometry,
    title_size: Pt,
    body_size: Pt,
    indent: Pt,
    title_height: Pt,
    body_height: Pt,
    meta_height: Pt,
}

impl CardLayout {
    pub fn new(
        card: &Card,
        measure: &dyn TextMeasure,
        theme: &Theme,
        geometry: CardGeometry,
    ) -> CardLayout {
        let inner = geometry.inner_width();
        let title_size = theme.body + Pt(1.0);
        let body_size = theme.body;
        let title_height = measure.line_height(Weight::Regular, title_size);
        let body_height = measure.line_height(Weight::Regular, body_size);
        let meta_height = measure.line_height(Weight::Regular, theme.meta);
        let indent = theme.bullet_indent();

        let meta = card
            .meta_right
            .as_deref()
            .map(|m| (m.to_string(), measure.width(theme.meta_weight(), theme.meta, m)));
        let first_width = match &meta {
            Some((_, width)) => inner - *width - Pt(8.0),
            None => inner,
        };
        let meta_inline = meta.is_some() && first_width >= inner * 0.35;
        let widths = LineWidths {
            first: if meta_inline { first_width } else { inner },
            rest: inner,
        };
        let title_lines = break_plain(
            &card.title,
            theme.heading_weight(),
            measure,
            title_size,
            widths,
            false,
        );

        let rows = if card.is_bullet_body {
            bullet_rows(layout_bullets(
                &card.body, measure, body_size, inner, indent, true,
            ))
        } else {
            card.body
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .flat_map(|p| {
                    break_lines(&tokenize(p), measure, body_size, LineWidths::uniform(inner), true)
                })
                .map(|line| BodyRow {
                    line,
                    glyph: false,
                    indented: false,
                })
                .collect()
        };

        let mut layout = CardLayout {
            title_lines,
            meta,
            meta_inline,
            rows,
            height: Pt::ZERO,
            geometry,
            title_size,
            body_size,
            indent,
            title_height,
            body_height,
            meta_height,
        };
        layout.height = layout.measure_height();
        layout
    }

    fn chrome_height(&self) -> Pt {
        let mut height = self.geometry.bar + self.geometry.padding * 2.0;
        height += self.title_height * self.title_lines.len() as f32;
        if self.meta.is_some() && !self.meta_inline {
            height += self.meta_height;
        }
        if !self.rows.is_empty() {
            height += Pt(4.0);
        }
        height
    }

    fn measure_height(&self) -> Pt {
        self.chrome_height() + self.body_height * self.rows.len() as f32
    }

    /// Split a card too tall for `available` into a part that fits and a
    /// continuation carrying the remaining body rows under the same title.
    /// Returns `None` when not even one body row fits, or nothing needs to move.
    pub fn split(&self, available: Pt) -> Option<(CardLayout, CardLayout)> {
        let room = available - self.chrome_height();
        if room < self.body_height {
            return None;
        }
        let fits = ((room + Pt(0.01)) / self.body_height).floor() as usize;
        if fits == 0 || fits >= self.rows.len() {
            return None;
        }
        let mut head = self.clone();
        let mut tail = self.clone();
        tail.rows = head.rows.split_off(fits);
        head.height = head.measure_height();
        tail.height = tail.measure_height();
        Some((head, tail))
    }

    /// Draw the card with its top left corner at (`x`, `top`)
    pub(crate) fn draw(&self, pen: &mut Pen, x: Pt, top: Pt) {
        let theme = pen.theme;
        let geometry = self.geometry;
        pen.page().add_box(BoxLayout {
            rect: Rect::from_top_left(x, top, geometry.width, self.height),
            fill: Some(theme.accent.wash()),
            stroke: Some(Stroke {
                colour: theme.accent.light(),
                width: Pt(0.75),
            }),
            corner_radius: geometry.radius,
        });
        pen.page().add_box(BoxLayout {
            rect: Rect::from_top_left(x, top, geometry.width, geometry.bar),
            fill: Some(theme.accent.dark()),
            stroke: None,
            corner_radius: Pt::ZERO,
        });

        let inner_x = x + geometry.padding;
        let mut y = top - geometry.bar - geometry.padding;
        let (title_height, body_height) = (self.title_height, self.body_height);
        let title_colour = theme.accent.dark();

        for (i, line) in self.title_lines.iter().enumerate() {
            pen.line_at(line, self.title_size, title_colour, inner_x, y);
            if i == 0 && self.meta_inline {
                if let Some((meta, width)) = &self.meta {
                    let meta_x = inner_x + geometry.inner_width() - *width;
                    let offset = (title_height - pen.line_height(theme.meta)) / 2.0;
                    pen.run(
                        meta,
                        theme.meta_weight(),
                        theme.meta,
                        theme.muted(),
                        meta_x,
                        y - offset,
                    );
                }
            }
            y -= title_height;
        }
        if let (Some((meta, _)), false) = (&self.meta, self.meta_inline) {
            pen.run(
                meta,
                theme.meta_weight(),
                theme.meta,
                theme.muted(),
                inner_x,
                y,
            );
            y -= pen.line_height(theme.meta);
        }

        y -= Pt(4.0);
        for row in self.rows.iter() {
            if row.glyph {
                pen.run(
                    BULLET_GLYPH,
                    Weight::Regular,
                    self.body_size,
                    theme.text(),
                    inner_x + self.body_size * 0.2,
                    y,
                );
            }
            let row_x = if row.indented {
                inner_x + self.indent
            } else {
                inner_x
            };
            pen.line_at(&row.line, self.body_size, theme.text(), row_x, y);
            y -= body_height;
        }
        pen.note_y(top - self.height);
    }
}

/// Decides which of two columns each card goes in.
///
/// Each card goes to the column with more space left; when both have the same
/// space the column not used last wins. Greedy placement into the shorter
/// column keeps the heights of the two columns within one card of each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBalancer {
    cursors: [Pt; 2],
    top: Pt,
    bottom: Pt,
    gap: Pt,
    preferred: usize,
}

impl ColumnBalancer {
    pub fn new(top: Pt, bottom: Pt, gap: Pt) -> ColumnBalancer {
        ColumnBalancer {
            cursors: [top, top],
            top,
            bottom,
            gap,
            preferred: 0,
        }
    }

    pub fn remaining(&self, column: usize) -> Pt {
        self.cursors[column] - self.bottom
    }

    /// Height used in a column, including the gap after each card
    pub fn consumed(&self, column: usize) -> Pt {
        self.top - self.cursors[column]
    }

    /// No card placed since the last reset
    pub fn is_empty(&self) -> bool {
        self.cursors.iter().all(|&c| c >= self.top)
    }

    pub fn column_is_empty(&self, column: usize) -> bool {
        self.cursors[column] >= self.top
    }

    pub fn choose(&self) -> usize {
        let (a, b) = (self.remaining(0), self.remaining(1));
        if (a - b).abs() < Pt(0.01) {
            self.preferred
        } else if a > b {
            0
        } else {
            1
        }
    }

    /// The column a card of `height` should go in, if it fits on this page
    pub fn fits(&self, height: Pt) -> Option<usize> {
        let column = self.choose();
        (self.remaining(column) + Pt(0.01) >= height).then_some(column)
    }

    /// Place a card and return the top of its slot
    pub fn place(&mut self, column: usize, height: Pt) -> Pt {
        let top = self.cursors[column];
        self.cursors[column] -= height + self.gap;
        self.preferred = 1 - column;
        top
    }

    /// Start over on a fresh page
    pub fn reset(&mut self, top: Pt) {
        self.top = top;
        self.cursors = [top, top];
        self.preferred = 0;
    }

    /// The lowest card bottom across both columns
    pub fn lowest(&self) -> Pt {
        let lowest = self.cursors[0].min(self.cursors[1]);
        if self.is_empty() {
            lowest
        } else {
            lowest + self.gap
        }
    }
}

pub(crate) fn compose_cards(pen: &mut Pen, input: &ComposeInput, template: &TemplateSpec) {
    let theme = pen.theme;
    let profile = input.profile;
    header(pen, profile, template.header);
    install_running_header(pen, &profile.name);

    let (x, width) = (pen.left(), pen.width());
    if template.sections.contains(&Section::Skills) && !profile.skills_text.trim().is_empty() {
        section_title(pen, Section::Skills.title());
        draw_chips(pen, &profile.skills_text, x, width);
    }
    if let Some(languages) = profile
        .languages
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        pen.flow.gap(Pt(4.0));
        let text = format!("**Languages:** {}", languages.replace('\n', " "));
        pen.paragraphs(&text, theme.body, x, width, false);
    }

    let mut cards: Vec<(Card, bool)> = Vec::new();
    let education = &profile.education;
    if !education.is_empty() {
        let (title, body) = if education.school.trim().is_empty() {
            (education.major.trim(), "")
        } else {
            (education.school.trim(), education.major.trim())
        };
        cards.push((Card::new(title, education.study_period.clone(), body), false));
    }
    for entry in input.experiences.iter().chain(input.projects.iter()) {
        cards.push((
            Card::new(entry.title.as_str(), entry.meta.clone(), entry.body.as_str()),
            true,
        ));
    }
    if cards.is_empty() {
        return;
    }

    pen.flow.gap(theme.section_gap());
    let column_width = (width - COLUMN_GAP) / 2.0;
    let geometry = CardGeometry::for_width(column_width);
    let mut balancer = ColumnBalancer::new(pen.flow.y(), pen.flow.bottom(), CARD_GAP);

    for (mut card, is_entry) in cards {
        let mut pending = Some(card.estimate(pen.measure(), theme, geometry));
        while let Some(layout) = pending.take() {
            let column = match balancer.fits(layout.height) {
                Some(column) => column,
                None if pen.flow.at_page_top()
                    && balancer.column_is_empty(balancer.choose()) =>
                {
                    // taller than a whole page: fill this column, continue in the next
                    let column = balancer.choose();
                    match layout.split(balancer.remaining(column)) {
                        Some((head, tail)) => {
                            place_card(pen, &mut balancer, &head, column, x, column_width);
                            pending = Some(tail);
                            continue;
                        }
                        None => column,
                    }
                }
                None => {
                    pen.flow.new_page();
                    balancer.reset(pen.flow.y());
                    pending = Some(layout);
                    continue;
                }
            };
            place_card(pen, &mut balancer, &layout, column, x, column_width);
        }
        log::debug!(
            "card {:?} ({}pt) placed, now on page {}",
            card.title,
            card.estimated_height,
            pen.flow.page_index() + 1
        );
        if is_entry {
            pen.entries_rendered += 1;
        }
    }
    pen.flow.set_y(balancer.lowest());
}

fn place_card(
    pen: &mut Pen,
    balancer: &mut ColumnBalancer,
    layout: &CardLayout,
    column: usize,
    x: Pt,
    column_width: Pt,
) {
    let top = balancer.place(column, layout.height);
    let card_x = x + (column_width + COLUMN_GAP) * column as f32;
    layout.draw(pen, card_x, top);
}

// name and a rule, repeated on continuation pages
fn install_running_header(pen: &mut Pen, name: &str) {
    let theme = pen.theme;
    let size = theme.body + Pt(1.0);
    let line_height = pen.line_height(size);
    let top = pen.flow.top();
    let (x, width) = (pen.left(), pen.width());
    let baseline = top - pen.face.baseline_offset(Weight::Regular, size);

    let mut contents = Vec::new();
    if !name.trim().is_empty() {
        contents.push(PageContents::Text(vec![SpanLayout {
            text: name.trim().to_string(),
            font: pen.face.span_font(theme.heading_weight(), size),
            colour: theme.accent(),
            coords: (x, baseline),
        }]));
    }
    let rule_y = top - line_height - Pt(2.0);
    contents.push(PageContents::Rule(RuleLayout {
        from: (x, rule_y),
        to: (x + width, rule_y),
        stroke: Stroke {
            colour: colours::MUTED,
            width: theme.rule_width(),
        },
    }));
    pen.flow.set_running_header(RunningHeader {
        contents,
        height: line_height + Pt(10.0),
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::testing::FixedAdvance;
    use crate::model::StyleConfig;

    #[test]
    fn estimate_matches_the_layout_height() {
        let theme = Theme::from_style(&StyleConfig::default());
        let geometry = CardGeometry::for_width(Pt(250.0));
        let mut card = Card::new(
            "Compiler",
            Some("2021".to_string()),
            "- Wrote the parser\n- Wrote the **type checker** and a long tail of diagnostics",
        );
        assert!(card.is_bullet_body);
        let layout = card.estimate(&FixedAdvance, &theme, geometry);
        assert_eq!(card.estimated_height, layout.height);
        assert!(layout.meta_inline);

        assert_eq!(layout.rows.iter().filter(|r| r.glyph).count(), 2);
        // 11pt body, 1.2 line height; 12pt title
        let expected = Pt(3.0 + 16.0 + 14.4 + 4.0) + Pt(13.2) * layout.rows.len() as f32;
        assert!((layout.height - expected).abs() < Pt(0.01));
    }

    #[test]
    fn tall_cards_split_between_body_rows() {
        let theme = Theme::from_style(&StyleConfig::default());
        let body: String = (0..30).map(|i| format!("- item {i}\n")).collect();
        let mut card = Card::new("Long", None, body.as_str());
        let layout = card.estimate(&FixedAdvance, &theme, CardGeometry::for_width(Pt(250.0)));
        assert_eq!(layout.rows.len(), 30);

        // chrome is 3 + 16 + 14.4 + 4 = 37.4; room for ten rows
        let (head, tail) = layout.split(Pt(37.4 + 132.5)).expect("splits");
        assert_eq!(head.rows.len(), 10);
        assert_eq!(tail.rows.len(), 20);
        assert!(head.height <= Pt(37.4 + 132.5));
        assert_eq!(tail.title_lines, layout.title_lines);

        assert!(layout.split(Pt(40.0)).is_none());
        assert!(layout.split(Pt(10_000.0)).is_none());
    }

    #[test]
    fn paragraph_bodies_skip_bullets() {
        let card = Card::new("Notes", None, "Built **everything** myself");
        assert!(!card.is_bullet_body);
    }

    #[test]
    fn cards_fall_into_the_column_with_more_room() {
        let mut balancer = ColumnBalancer::new(Pt(700.0), Pt(40.0), Pt::ZERO);
        assert_eq!(balancer.fits(Pt(100.0)), Some(0));
        assert_eq!(balancer.place(0, Pt(100.0)), Pt(700.0));
        assert!(!balancer.column_is_empty(0));
        assert!(balancer.column_is_empty(1));
        assert_eq!(balancer.fits(Pt(50.0)), Some(1));
        balancer.place(1, Pt(50.0));
        // column 1 still has more room
        assert_eq!(balancer.fits(Pt(30.0)), Some(1));
        assert_eq!(balancer.place(1, Pt(30.0)), Pt(650.0));
        assert_eq!(balancer.fits(Pt(1000.0)), None);
    }

    #[test]
    fn column_heights_stay_within_one_card() {
        let heights = [
            120.0, 40.0, 75.0, 200.0, 33.0, 90.0, 61.0, 150.0, 12.0, 88.0, 47.0,
        ];
        let mut balancer = ColumnBalancer::new(Pt(10_000.0), Pt::ZERO, Pt::ZERO);
        for h in heights {
            let column = balancer.fits(Pt(h)).expect("tall enough");
            balancer.place(column, Pt(h));
        }
        let diff = (balancer.consumed(0) - balancer.consumed(1)).abs();
        assert!(diff <= Pt(200.0));
        let total: f32 = heights.iter().sum();
        assert!(((balancer.consumed(0) + balancer.consumed(1)).0 - total).abs() < 0.01);
    }
}
