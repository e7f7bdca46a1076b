//! Turns recorded page contents into a PDF content stream.

use crate::colour::Colour;
use crate::font::Font;
use crate::page::{BoxLayout, PageContents, RuleLayout, SpanFont, SpanLayout, Stroke};
use crate::units::Pt;
use id_arena::Arena;
use std::io::Write;

// control point distance for approximating a quarter circle with a cubic
const KAPPA: f32 = 0.552_284_8;

/// Renders page contents to a PDF content stream, converting the high-level
/// items recorded by the composers into low-level PDF operators.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(spans) => render_text_spans(&mut content, spans, fonts)?,
            PageContents::Box(layout) => render_box(&mut content, layout)?,
            PageContents::Rule(layout) => render_rule(&mut content, layout)?,
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), std::io::Error> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;

    let mut current_font: SpanFont = first.font;
    let mut current_colour: Colour = first.colour;
    write_font(content, current_font)?;
    write_fill(content, current_colour)?;

    for span in spans.iter() {
        let Some(font) = fonts.get(span.font.id) else {
            log::warn!("skipping span drawn with an unregistered font: {:?}", span.text);
            continue;
        };
        if span.font != current_font {
            current_font = span.font;
            write_font(content, current_font)?;
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            write_fill(content, current_colour)?;
        }

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
        write!(content, "<")?;
        font.write_encoded(&span.text, content)?;
        write!(content, "> Tj\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_box(content: &mut Vec<u8>, layout: &BoxLayout) -> Result<(), std::io::Error> {
    let op = match (layout.fill, layout.stroke) {
        (Some(_), Some(_)) => "B",
        (Some(_), None) => "f",
        (None, Some(_)) => "S",
        (None, None) => return Ok(()),
    };

    write!(content, "q\n")?;
    if let Some(fill) = layout.fill {
        write_fill(content, fill)?;
    }
    if let Some(stroke) = layout.stroke {
        write_stroke(content, stroke)?;
    }

    let rect = layout.rect;
    let radius = layout
        .corner_radius
        .min(rect.width() / 2.0)
        .min(rect.height() / 2.0)
        .max(Pt(0.0));
    if radius <= Pt(0.0) {
        write!(
            content,
            "{} {} {} {} re\n",
            rect.x1,
            rect.y1,
            rect.width(),
            rect.height()
        )?;
    } else {
        let (x1, y1, x2, y2, r) = (rect.x1.0, rect.y1.0, rect.x2.0, rect.y2.0, radius.0);
        let k = r * KAPPA;
        write!(content, "{} {} m\n", x1 + r, y1)?;
        write!(content, "{} {} l\n", x2 - r, y1)?;
        write!(content, "{} {} {} {} {} {} c\n", x2 - r + k, y1, x2, y1 + r - k, x2, y1 + r)?;
        write!(content, "{} {} l\n", x2, y2 - r)?;
        write!(content, "{} {} {} {} {} {} c\n", x2, y2 - r + k, x2 - r + k, y2, x2 - r, y2)?;
        write!(content, "{} {} l\n", x1 + r, y2)?;
        write!(content, "{} {} {} {} {} {} c\n", x1 + r - k, y2, x1, y2 - r + k, x1, y2 - r)?;
        write!(content, "{} {} l\n", x1, y1 + r)?;
        write!(content, "{} {} {} {} {} {} c\n", x1, y1 + r - k, x1 + r - k, y1, x1 + r, y1)?;
        write!(content, "h\n")?;
    }
    write!(content, "{op}\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_rule(content: &mut Vec<u8>, layout: &RuleLayout) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    write_stroke(content, layout.stroke)?;
    write!(content, "{} {} m\n", layout.from.0, layout.from.1)?;
    write!(content, "{} {} l\n", layout.to.0, layout.to.1)?;
    write!(content, "S\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_font(content: &mut Vec<u8>, font: SpanFont) -> Result<(), std::io::Error> {
    write!(content, "/F{} {} Tf\n", font.id.index(), font.size)
}

#[allow(clippy::write_with_newline)]
fn write_fill(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
        Colour::Grey { g } => write!(content, "{g} g\n"),
    }
}

#[allow(clippy::write_with_newline)]
fn write_stroke(content: &mut Vec<u8>, stroke: Stroke) -> Result<(), std::io::Error> {
    write!(content, "{} w\n", stroke.width)?;
    match stroke.colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} RG\n"),
        Colour::Grey { g } => write!(content, "{g} G\n"),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::colour::colours;
    use crate::rect::Rect;
    use crate::standard::StandardFont;

    #[test]
    fn spans_become_text_objects() {
        let mut fonts: Arena<Font> = Arena::new();
        let id = fonts.alloc(Font::Standard(StandardFont::Helvetica));
        let contents = vec![PageContents::Text(vec![SpanLayout {
            text: "Hi".to_string(),
            font: SpanFont { id, size: Pt(11.0) },
            colour: colours::BLACK,
            coords: (Pt(50.0), Pt(700.0)),
        }])];
        let stream = String::from_utf8(render_contents(&contents, &fonts).expect("renders"))
            .expect("ascii");
        assert_eq!(stream, "q\n/F0 11 Tf\n0 g\nBT\n50 700 Td\n<4869> Tj\nET\nQ\n");
    }

    #[test]
    fn rounded_boxes_use_curves() {
        let fonts: Arena<Font> = Arena::new();
        let contents = vec![PageContents::Box(BoxLayout {
            rect: Rect::from_top_left(Pt(10.0), Pt(100.0), Pt(40.0), Pt(16.0)),
            fill: Some(colours::WHITE),
            stroke: Some(Stroke {
                colour: colours::BLACK,
                width: Pt(0.5),
            }),
            corner_radius: Pt(4.0),
        })];
        let stream = String::from_utf8(render_contents(&contents, &fonts).expect("renders"))
            .expect("ascii");
        assert_eq!(stream.matches(" c\n").count(), 4);
        assert!(stream.ends_with("h\nB\nQ\n"));
    }
}
