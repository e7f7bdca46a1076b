use super::markdown::{plain_tokens, Emphasis, Token, TokenKind};
use super::measure::{TextMeasure, Weight};
use crate::units::Pt;

// widths are accumulated in f32; allow a hair of slack when comparing to the limit
const EPSILON: Pt = Pt(0.01);

/// A piece of a laid-out line: one word (or word fragment with a single
/// emphasis), positioned relative to the line's left edge
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub text: String,
    pub weight: Weight,
    pub x: Pt,
    pub width: Pt,
}

/// One output line of the line breaker
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub placements: Vec<Placement>,
    /// Width of the line with single spaces between words
    pub natural_width: Pt,
    /// Width after justification; equal to `natural_width` for ragged lines
    pub width: Pt,
    pub justified: bool,
    text: String,
}

impl Line {
    /// The line's words separated by single spaces
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The width available to the first line and to every following line. Card
/// titles use a narrower first line to leave room for right-aligned meta text.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineWidths {
    pub first: Pt,
    pub rest: Pt,
}

impl LineWidths {
    pub fn uniform(width: Pt) -> LineWidths {
        LineWidths {
            first: width,
            rest: width,
        }
    }

    fn for_line(&self, index: usize) -> Pt {
        if index == 0 {
            self.first
        } else {
            self.rest
        }
    }
}

/// Words that touch with no whitespace between them ("**Rust**," is a bold
/// "Rust" and a regular ",") and so must stay on the same line
struct Chunk {
    pieces: Vec<(String, Weight, Pt)>,
    width: Pt,
}

/// Greedily break `tokens` into lines no wider than `widths`.
///
/// A line gets as many whole words as fit with single spaces between them. A
/// word wider than the whole line is placed alone on its own line and allowed
/// to overflow. When `justify` is set, every line except the last and except
/// lines holding a single word has its inter-word gaps stretched equally so
/// that its width matches the available width.
pub fn break_lines(
    tokens: &[Token],
    measure: &dyn TextMeasure,
    size: Pt,
    widths: LineWidths,
    justify: bool,
) -> Vec<Line> {
    let space_width = measure.width(Weight::Regular, size, " ");

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut glued = false;
    for token in tokens {
        match token.kind {
            TokenKind::Space => glued = false,
            TokenKind::Word => {
                let weight = token.emphasis.weight();
                let width = measure.width(weight, size, &token.text);
                let piece = (token.text.clone(), weight, width);
                match chunks.last_mut() {
                    Some(chunk) if glued => {
                        chunk.width += width;
                        chunk.pieces.push(piece);
                    }
                    _ => chunks.push(Chunk {
                        pieces: vec![piece],
                        width,
                    }),
                }
                glued = true;
            }
        }
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Chunk> = Vec::new();
    let mut current_width = Pt(0.0);
    for chunk in chunks {
        let max_width = widths.for_line(lines.len());
        if current.is_empty() {
            current_width = chunk.width;
            current.push(chunk);
        } else if current_width + space_width + chunk.width <= max_width + EPSILON {
            current_width += space_width + chunk.width;
            current.push(chunk);
        } else {
            let line = finish_line(
                std::mem::take(&mut current),
                current_width,
                space_width,
                max_width,
                justify,
            );
            lines.push(line);
            current_width = chunk.width;
            current.push(chunk);
        }
    }
    if !current.is_empty() {
        let max_width = widths.for_line(lines.len());
        // the final line is never stretched
        lines.push(finish_line(
            current,
            current_width,
            space_width,
            max_width,
            false,
        ));
    }

    lines
}

fn finish_line(
    chunks: Vec<Chunk>,
    natural_width: Pt,
    space_width: Pt,
    max_width: Pt,
    justify: bool,
) -> Line {
    let gaps = chunks.len().saturating_sub(1);
    let extra = if justify && gaps > 0 && natural_width < max_width {
        (max_width - natural_width) / gaps as f32
    } else {
        Pt(0.0)
    };

    let mut placements: Vec<Placement> = Vec::new();
    let mut text = String::new();
    let mut x = Pt(0.0);
    for (i, chunk) in chunks.into_iter().enumerate() {
        if i > 0 {
            x += space_width + extra;
            text.push(' ');
        }
        for (piece, weight, width) in chunk.pieces {
            text.push_str(&piece);
            match placements.last_mut() {
                // ragged regular text can be drawn as one run; the space advance
                // the viewer uses is the one we measured
                Some(last)
                    if extra == Pt(0.0)
                        && weight == Weight::Regular
                        && last.weight == Weight::Regular =>
                {
                    let gap = x - (last.x + last.width);
                    if gap > EPSILON {
                        last.text.push(' ');
                    }
                    last.text.push_str(&piece);
                    last.width = x + width - last.x;
                }
                _ => placements.push(Placement {
                    text: piece,
                    weight,
                    x,
                    width,
                }),
            }
            x += width;
        }
    }

    Line {
        placements,
        natural_width,
        width: natural_width + extra * gaps as f32,
        justified: extra > Pt(0.0),
        text,
    }
}

/// Break text with no markup into lines, every word in `weight`
pub fn break_plain(
    text: &str,
    weight: Weight,
    measure: &dyn TextMeasure,
    size: Pt,
    widths: LineWidths,
    justify: bool,
) -> Vec<Line> {
    let emphasis = match weight {
        Weight::Regular => Emphasis::None,
        Weight::Bold => Emphasis::Bold,
    };
    break_lines(&plain_tokens(text, emphasis), measure, size, widths, justify)
}

/// Wrap text at word boundaries like [break_plain], but split any word wider
/// than `max_width` at character boundaries instead of letting it overflow.
/// Narrow columns holding URLs and e-mail addresses need this.
pub fn wrap_breaking_words(
    text: &str,
    weight: Weight,
    measure: &dyn TextMeasure,
    size: Pt,
    max_width: Pt,
) -> Vec<String> {
    let space_width = measure.width(weight, size, " ");
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = Pt(0.0);

    for word in text.split_whitespace() {
        let word_width = measure.width(weight, size, word);
        if word_width > max_width + EPSILON {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut piece = String::new();
            let mut piece_width = Pt(0.0);
            for ch in word.chars() {
                let mut buf = [0u8; 4];
                let ch_width = measure.width(weight, size, ch.encode_utf8(&mut buf));
                if !piece.is_empty() && piece_width + ch_width > max_width + EPSILON {
                    lines.push(std::mem::take(&mut piece));
                    piece_width = Pt(0.0);
                }
                piece.push(ch);
                piece_width += ch_width;
            }
            current = piece;
            current_width = piece_width;
        } else if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width + EPSILON {
            current.push(' ');
            current.push_str(word);
            current_width += space_width + word_width;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::markdown::tokenize;
    use crate::layout::measure::testing::FixedAdvance;

    const SIZE: Pt = Pt(10.0);

    #[test]
    fn lines_never_exceed_the_available_width() {
        let text = lipsum::lipsum_words(120);
        let width = Pt(150.0);
        let lines = break_plain(
            &text,
            Weight::Regular,
            &FixedAdvance,
            SIZE,
            LineWidths::uniform(width),
            false,
        );
        assert!(lines.len() > 5);
        for line in lines.iter() {
            assert!(line.natural_width <= width + EPSILON, "{}", line.text());
        }
        let rejoined: Vec<&str> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(
            rejoined.join(" "),
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        );
    }

    #[test]
    fn justified_lines_fill_the_width_except_the_last() {
        // 5pt per char, 5pt per space: "aaaa bbbb" is 45pt
        let lines = break_plain(
            "aaaa bbbb cccc dddd eeee",
            Weight::Regular,
            &FixedAdvance,
            SIZE,
            LineWidths::uniform(Pt(100.0)),
            true,
        );
        assert_eq!(lines.len(), 2);
        assert!(lines[0].justified);
        assert!((lines[0].width - Pt(100.0)).abs() < Pt(0.001));
        let last_word = lines[0].placements.last().expect("has words");
        assert!((last_word.x + last_word.width - Pt(100.0)).abs() < Pt(0.001));

        assert!(!lines[1].justified);
        assert_eq!(lines[1].width, lines[1].natural_width);
    }

    #[test]
    fn oversized_words_sit_alone_on_their_line() {
        let lines = break_plain(
            "a supercalifragilisticexpialidocious b",
            Weight::Regular,
            &FixedAdvance,
            SIZE,
            LineWidths::uniform(Pt(50.0)),
            true,
        );
        let texts: Vec<&str> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["a", "supercalifragilisticexpialidocious", "b"]);
        // single-word lines are never stretched
        assert!(lines.iter().all(|l| !l.justified));
    }

    #[test]
    fn first_line_can_be_narrower() {
        let lines = break_plain(
            "aaaa bbbb cccc",
            Weight::Regular,
            &FixedAdvance,
            SIZE,
            LineWidths {
                first: Pt(25.0),
                rest: Pt(100.0),
            },
            false,
        );
        let texts: Vec<&str> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["aaaa", "bbbb cccc"]);
    }

    #[test]
    fn bold_words_keep_their_weight_and_punctuation_stays_attached() {
        let tokens = tokenize("Shipped **Rust**, then Go");
        let lines = break_lines(
            &tokens,
            &FixedAdvance,
            SIZE,
            LineWidths::uniform(Pt(1000.0)),
            false,
        );
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.text(), "Shipped Rust, then Go");
        let bold: Vec<&str> = line
            .placements
            .iter()
            .filter(|p| p.weight == Weight::Bold)
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(bold, vec!["Rust"]);
        // "," follows "Rust" directly: bold is 6pt per char
        let comma = line
            .placements
            .iter()
            .find(|p| p.text.starts_with(','))
            .expect("comma run");
        assert!((comma.x - Pt(35.0 + 5.0 + 24.0)).abs() < Pt(0.001));
    }

    #[test]
    fn ragged_regular_words_merge_into_runs() {
        let lines = break_plain(
            "one two three",
            Weight::Regular,
            &FixedAdvance,
            SIZE,
            LineWidths::uniform(Pt(1000.0)),
            false,
        );
        assert_eq!(lines[0].placements.len(), 1);
        assert_eq!(lines[0].placements[0].text, "one two three");
        assert!((lines[0].placements[0].width - Pt(65.0)).abs() < Pt(0.001));
    }

    #[test]
    fn long_words_are_split_when_breaking_is_allowed() {
        let lines = wrap_breaking_words(
            "mail: someone@example.com",
            Weight::Regular,
            &FixedAdvance,
            SIZE,
            Pt(50.0),
        );
        assert_eq!(lines, vec!["mail:", "someone@ex", "ample.com"]);
    }
}
