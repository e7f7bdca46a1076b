//! Metrics for the PDF base-14 fonts the renderer uses when no TrueType fonts
//! are supplied.
//!
//! Base-14 fonts are not embedded; every conforming viewer ships them. Only
//! their advance widths are needed to lay text out. Widths are in 1/1000 em
//! and come from the Adobe AFM files. Text is encoded as WinAnsi, so anything
//! outside that code page is drawn (and measured) as `?`.

/// The four base-14 faces the templates draw with
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
}

// index = (char as usize) - 32, covering 0x20 (space) through 0x7E (~)
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

// Latin-1 letters 0xC0..=0xFF measured as their unaccented base letter
const LATIN1_BASE: &[u8; 64] =
    b"AAAAAAACEEEEIIIIDNOOOOOxOUUUUYPsaaaaaaaceeeeiiiidnooooo/ouuuuypy";

impl StandardFont {
    /// The PostScript name written as the font's `/BaseFont`
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
        }
    }

    fn table(&self) -> &'static [u16; 95] {
        match self {
            StandardFont::Helvetica => &HELVETICA,
            StandardFont::HelveticaBold => &HELVETICA_BOLD,
            StandardFont::TimesRoman => &TIMES_ROMAN,
            StandardFont::TimesBold => &TIMES_BOLD,
        }
    }

    fn is_times(&self) -> bool {
        matches!(self, StandardFont::TimesRoman | StandardFont::TimesBold)
    }

    fn is_bold(&self) -> bool {
        matches!(self, StandardFont::HelveticaBold | StandardFont::TimesBold)
    }

    pub fn ascender(&self) -> i16 {
        if self.is_times() {
            683
        } else {
            718
        }
    }

    pub fn descender(&self) -> i16 {
        if self.is_times() {
            -217
        } else {
            -207
        }
    }

    /// Chosen so that ascender - descender + line gap is 1.2 em
    pub fn line_gap(&self) -> i16 {
        if self.is_times() {
            300
        } else {
            275
        }
    }

    /// Advance width of the WinAnsi code `code` in 1/1000 em
    pub fn advance_of_code(&self, code: u8) -> u16 {
        let table = self.table();
        match code {
            0x20..=0x7e => table[(code - 0x20) as usize],
            // bullet
            0x95 => 350,
            // en dash
            0x96 => table[(b'0' - 0x20) as usize],
            // em dash, ellipsis
            0x97 | 0x85 => 1000,
            // single curly quotes
            0x91 | 0x92 => match (self.is_times(), self.is_bold()) {
                (false, false) => 222,
                (false, true) => 278,
                (true, _) => 333,
            },
            // double curly quotes
            0x93 | 0x94 => match (self.is_times(), self.is_bold()) {
                (false, false) => 333,
                (true, false) => 444,
                (_, true) => 500,
            },
            0xc0..=0xff => {
                let base = LATIN1_BASE[(code - 0xc0) as usize];
                table[(base - 0x20) as usize]
            }
            // remaining symbols take the figure width
            _ => table[(b'0' - 0x20) as usize],
        }
    }

    /// Advance width of `ch` in 1/1000 em, as it will actually be drawn
    pub fn advance(&self, ch: char) -> u16 {
        self.advance_of_code(encode_win_ansi(ch))
    }
}

/// Map a character onto its WinAnsiEncoding code, substituting `?` for
/// anything the encoding cannot represent
pub fn encode_win_ansi(ch: char) -> u8 {
    match ch {
        ' '..='~' => ch as u8,
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        '€' => 0x80,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        _ => b'?',
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ascii_advances_come_from_the_tables() {
        assert_eq!(StandardFont::Helvetica.advance(' '), 278);
        assert_eq!(StandardFont::Helvetica.advance('m'), 833);
        assert_eq!(StandardFont::HelveticaBold.advance('b'), 611);
        assert_eq!(StandardFont::TimesRoman.advance('a'), 444);
        assert_eq!(StandardFont::TimesBold.advance('W'), 1000);
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let word = "Python";
        let regular: u32 = word.chars().map(|c| StandardFont::Helvetica.advance(c) as u32).sum();
        let bold: u32 = word
            .chars()
            .map(|c| StandardFont::HelveticaBold.advance(c) as u32)
            .sum();
        assert!(bold > regular);
    }

    #[test]
    fn unencodable_characters_become_question_marks() {
        assert_eq!(encode_win_ansi('•'), 0x95);
        assert_eq!(encode_win_ansi('é'), 0xe9);
        assert_eq!(encode_win_ansi('漢'), b'?');
        assert_eq!(
            StandardFont::Helvetica.advance('漢'),
            StandardFont::Helvetica.advance('?')
        );
        assert_eq!(
            StandardFont::Helvetica.advance('é'),
            StandardFont::Helvetica.advance('e')
        );
    }
}
