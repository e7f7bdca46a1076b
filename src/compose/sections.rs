use super::{ComposeInput, EntryView, HeaderLayout, Pen, Section, TemplateSpec};
use crate::layout::{break_plain, LineWidths, TextMeasure, Weight};
use crate::model::{Education, ProfileDocument};
use crate::units::Pt;

// minimum space between an entry title and its right-aligned date
const HEADER_GAP: Pt = Pt(12.0);

pub(crate) fn compose_sections(pen: &mut Pen, input: &ComposeInput, template: &TemplateSpec) {
    header(pen, input.profile, template.header);

    for section in template.sections.iter().copied() {
        match section {
            Section::Education => education(pen, &input.profile.education),
            Section::Skills => skills(pen, input.profile),
            Section::Experience => entries(pen, section, &input.experiences),
            Section::Projects => entries(pen, section, &input.projects),
        }
    }
}

/// Name and contact block at the top of the first page
pub(crate) fn header(pen: &mut Pen, profile: &ProfileDocument, layout: HeaderLayout) {
    let theme = pen.theme;
    let (x, width) = (pen.left(), pen.width());
    let name = profile.name.trim();
    let name_height = pen.line_height(theme.name);
    let meta_height = pen.line_height(theme.meta);
    let contact = profile.contact.items();

    match layout {
        HeaderLayout::Centered => {
            if !name.is_empty() {
                let name_width = pen.face.width(theme.heading_weight(), theme.name, name);
                let top = pen.flow.y();
                pen.run(
                    name,
                    theme.heading_weight(),
                    theme.name,
                    theme.accent(),
                    x + ((width - name_width) / 2.0).max(Pt::ZERO),
                    top,
                );
                pen.flow.advance(name_height);
            }
            let joined = contact.join("  |  ");
            let lines = break_plain(
                &joined,
                theme.meta_weight(),
                pen.measure(),
                theme.meta,
                LineWidths::uniform(width),
                false,
            );
            for line in lines.iter() {
                let top = pen.flow.y();
                let offset = ((width - line.width) / 2.0).max(Pt::ZERO);
                pen.line_at(line, theme.meta, theme.muted(), x + offset, top);
                pen.flow.advance(meta_height);
            }
        }
        HeaderLayout::Split => {
            let top = pen.flow.y();
            if !name.is_empty() {
                pen.run(
                    name,
                    theme.heading_weight(),
                    theme.name,
                    theme.accent(),
                    x,
                    top,
                );
            }
            let mut contact_top = top;
            for item in contact.iter() {
                let item_width = pen.face.width(theme.meta_weight(), theme.meta, item);
                pen.run(
                    item,
                    theme.meta_weight(),
                    theme.meta,
                    theme.muted(),
                    x + width - item_width,
                    contact_top,
                );
                contact_top -= meta_height;
            }
            let bottom = (top - name_height).min(contact_top);
            pen.flow.set_y(bottom);
            pen.flow.advance(Pt(4.0));
            let y = pen.flow.y();
            pen.rule(x, x + width, y, theme.accent());
        }
        HeaderLayout::NameOnly => {
            if !name.is_empty() {
                let top = pen.flow.y();
                pen.run(
                    name,
                    theme.heading_weight(),
                    theme.name,
                    theme.accent(),
                    x,
                    top,
                );
                pen.flow.advance(name_height);
            }
        }
    }
    pen.note_y(pen.flow.y());
}

/// Uppercased, accent-coloured title with a rule under it. The title is kept
/// on the same page as at least the first line that follows it.
pub(crate) fn section_title(pen: &mut Pen, title: &str) {
    let theme = pen.theme;
    let title_height = pen.line_height(theme.section_title);
    let follow = pen.line_height(theme.body) * 2.0;

    pen.flow.gap(theme.section_gap());
    pen.flow.ensure(title_height + Pt(4.0) + follow);

    let (x, width) = (pen.left(), pen.width());
    let top = pen.flow.y();
    pen.run(
        &title.to_uppercase(),
        theme.heading_weight(),
        theme.section_title,
        theme.accent(),
        x,
        top,
    );
    pen.flow.advance(title_height + Pt(1.0));
    let y = pen.flow.y();
    pen.rule(x, x + width, y, theme.accent());
    pen.flow.advance(Pt(3.0));
}

/// Bold title on the left, date on the right. The pair shrinks in half-point
/// steps until it fits on one line; when even the meta size is too large, the
/// date moves to a line of its own.
pub(crate) fn entry_header(pen: &mut Pen, left: &str, right: Option<&str>) {
    let theme = pen.theme;
    let (x, width) = (pen.left(), pen.width());
    let weight = theme.heading_weight();
    let body_height = pen.line_height(theme.body);
    let right = right.map(str::trim).filter(|r| !r.is_empty());

    let Some(right) = right else {
        let lines = break_plain(
            left,
            weight,
            pen.measure(),
            theme.body,
            LineWidths::uniform(width),
            false,
        );
        pen.flow.ensure(body_height * 2.0);
        pen.lines(&lines, theme.body, theme.text(), x);
        return;
    };

    let fitting = fitting_header_size(
        pen.measure(),
        theme.body,
        theme.meta,
        weight,
        left,
        right,
        width,
    );
    if let Some(size) = fitting {
        let line_height = pen.line_height(size);
        pen.flow.ensure(line_height + body_height);
        let top = pen.flow.y();
        let right_width = pen.face.width(theme.meta_weight(), size, right);
        pen.run(left, weight, size, theme.text(), x, top);
        pen.run(
            right,
            theme.meta_weight(),
            size,
            theme.muted(),
            x + width - right_width,
            top,
        );
        pen.flow.advance(line_height);
        pen.note_y(pen.flow.y());
        return;
    }

    let lines = break_plain(
        left,
        weight,
        pen.measure(),
        theme.body,
        LineWidths::uniform(width),
        false,
    );
    pen.flow.ensure(body_height * 2.0);
    pen.lines(&lines, theme.body, theme.text(), x);
    let right_width = pen.face.width(theme.meta_weight(), theme.meta, right);
    pen.text_line(
        right,
        theme.meta_weight(),
        theme.meta,
        theme.muted(),
        x + (width - right_width).max(Pt::ZERO),
    );
}

/// The largest size between `start` and `floor`, in half-point steps, at which
/// `left` and `right` fit side by side
pub(crate) fn fitting_header_size(
    measure: &dyn TextMeasure,
    start: Pt,
    floor: Pt,
    weight: Weight,
    left: &str,
    right: &str,
    width: Pt,
) -> Option<Pt> {
    let mut size = start;
    loop {
        let needed = measure.width(weight, size, left)
            + measure.width(Weight::Regular, size, right)
            + HEADER_GAP;
        if needed <= width {
            return Some(size);
        }
        if size <= floor {
            return None;
        }
        size = (size - Pt(0.5)).max(floor);
    }
}

fn education(pen: &mut Pen, education: &Education) {
    if education.is_empty() {
        return;
    }
    section_title(pen, Section::Education.title());
    let school = education.school.trim();
    let major = education.major.trim();
    let title = if school.is_empty() { major } else { school };
    entry_header(pen, title, education.study_period.as_deref());
    if !school.is_empty() && !major.is_empty() {
        let lines = break_plain(
            major,
            Weight::Regular,
            pen.measure(),
            pen.theme.body,
            LineWidths::uniform(pen.width()),
            false,
        );
        let (theme, x) = (pen.theme, pen.left());
        pen.lines(&lines, theme.body, theme.text(), x);
    }
}

fn skills(pen: &mut Pen, profile: &ProfileDocument) {
    let skills = profile.skills_text.trim();
    let languages = profile
        .languages
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());
    if skills.is_empty() && languages.is_none() {
        return;
    }
    section_title(pen, Section::Skills.title());

    let theme = pen.theme;
    let (x, width) = (pen.left(), pen.width());
    if !skills.is_empty() {
        if skills.contains('*') {
            pen.paragraphs(skills, theme.body, x, width, false);
        } else {
            for paragraph in skills.lines().map(str::trim).filter(|l| !l.is_empty()) {
                let lines = break_plain(
                    paragraph,
                    Weight::Regular,
                    pen.measure(),
                    theme.body,
                    LineWidths::uniform(width),
                    false,
                );
                pen.lines(&lines, theme.body, theme.text(), x);
            }
        }
    }
    if let Some(languages) = languages {
        let text = format!("**Languages:** {}", languages.replace('\n', " "));
        pen.paragraphs(&text, theme.body, x, width, false);
    }
}

fn entries(pen: &mut Pen, section: Section, entries: &[EntryView]) {
    if entries.is_empty() {
        return;
    }
    section_title(pen, section.title());
    let (x, width) = (pen.left(), pen.width());
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            pen.flow.gap(pen.theme.entry_gap());
        }
        entry_header(pen, &entry.title, entry.meta.as_deref());
        pen.body(&entry.body, x, width);
        pen.entries_rendered += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compose::test_support::{helvetica, profile};
    use crate::compose::{compose, Theme};
    use crate::layout::testing::FixedAdvance;
    use crate::layout::Margins;
    use crate::model::{StyleConfig, TemplateId};
    use crate::pagesize::LETTER;

    #[test]
    fn header_text_shrinks_before_giving_up() {
        // 10pt: 5pt per char regular, 6pt bold
        let left = "aaaaaaaaaa"; // 60pt bold at 10pt
        let right = "bbbbbbbbbb"; // 50pt at 10pt
        let fits = fitting_header_size(
            &FixedAdvance,
            Pt(10.0),
            Pt(9.0),
            Weight::Bold,
            left,
            right,
            Pt(123.0),
        );
        assert_eq!(fits, Some(Pt(10.0)));

        // at 9.5pt: 57 + 47.5 + 12 = 116.5
        let shrunk = fitting_header_size(
            &FixedAdvance,
            Pt(10.0),
            Pt(9.0),
            Weight::Bold,
            left,
            right,
            Pt(117.0),
        );
        assert_eq!(shrunk, Some(Pt(9.5)));

        let hopeless = fitting_header_size(
            &FixedAdvance,
            Pt(10.0),
            Pt(9.0),
            Weight::Bold,
            left,
            right,
            Pt(60.0),
        );
        assert_eq!(hopeless, None);
    }

    #[test]
    fn sections_follow_the_template_order() {
        let (_doc, face) = helvetica();
        let theme = Theme::from_style(&StyleConfig::default());
        let profile = profile();
        let input = ComposeInput {
            profile: &profile,
            experiences: vec![EntryView {
                title: "Programmer".to_string(),
                meta: Some("1842".to_string()),
                body: "- Annotated the memoir".to_string(),
            }],
            projects: vec![],
        };
        let outcome = compose(
            &input,
            &face,
            &theme,
            &TemplateSpec::for_template(TemplateId::Chronological),
            LETTER,
            Margins::all(Pt(40.0)),
        );
        assert_eq!(outcome.pages.len(), 1);
        assert_eq!(outcome.entries_rendered, 1);
        let text = outcome.pages[0].text();
        let experience = text.find("EXPERIENCE").expect("experience title");
        let skills = text.find("SKILLS").expect("skills title");
        assert!(experience < skills);
        assert!(!text.contains("PROJECTS"));
    }
}
