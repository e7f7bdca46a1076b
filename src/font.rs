use crate::{
    refs::{ObjectReferences, RefType},
    standard::{encode_win_ansi, StandardFont},
    Pt, RenderError,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

/// A font a document can draw with.
///
/// Standard fonts are referenced by name and cost nothing in the output.
/// TrueType fonts are embedded in their entirety as CID fonts. The parsed face
/// is immutable, so one `Arc<TrueTypeFont>` can be shared by any number of
/// concurrent renders.
#[derive(Clone)]
pub enum Font {
    Standard(StandardFont),
    TrueType(Arc<TrueTypeFont>),
}

impl Font {
    fn units_per_em(&self) -> f32 {
        match self {
            Font::Standard(_) => 1000.0,
            Font::TrueType(ttf) => ttf.face.as_face_ref().units_per_em() as f32,
        }
    }

    fn advance_units(&self, ch: char) -> f32 {
        match self {
            Font::Standard(font) => font.advance(ch) as f32,
            Font::TrueType(ttf) => ttf.advance(ch) as f32,
        }
    }

    /// Calculate the width of a given string of text at the given font size
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        let scaling = size / self.units_per_em();
        text.chars().map(|ch| scaling * self.advance_units(ch)).sum()
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Pt {
        let ascender = match self {
            Font::Standard(font) => font.ascender(),
            Font::TrueType(ttf) => ttf.face.as_face_ref().ascender(),
        };
        size / self.units_per_em() * ascender as f32
    }

    /// Distance from the baseline to the bottom of the font. Usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        let descender = match self {
            Font::Standard(font) => font.descender(),
            Font::TrueType(ttf) => ttf.face.as_face_ref().descender(),
        };
        size / self.units_per_em() * descender as f32
    }

    /// How far to move down from one baseline to the next
    pub fn line_height(&self, size: Pt) -> Pt {
        let line_gap = match self {
            Font::Standard(font) => font.line_gap(),
            Font::TrueType(ttf) => ttf.face.as_face_ref().line_gap(),
        };
        let leading = size / self.units_per_em() * line_gap as f32;
        leading + self.ascent(size) - self.descent(size)
    }

    /// Write the body of a hex string (without the angle brackets) that shows
    /// `text` in this font
    pub(crate) fn write_encoded(&self, text: &str, out: &mut Vec<u8>) -> std::io::Result<()> {
        match self {
            Font::Standard(_) => {
                for ch in text.chars() {
                    write!(out, "{:02x}", encode_win_ansi(ch))?;
                }
            }
            Font::TrueType(ttf) => {
                for ch in text.chars() {
                    write!(out, "{:04x}", ttf.glyph_or_fallback(ch).0)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        match self {
            Font::Standard(font) => {
                let font_id = refs.gen(RefType::Font(font_index));
                writer
                    .type1_font(font_id)
                    .base_font(Name(font.base_font().as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            Font::TrueType(ttf) => ttf.write(refs, font_index, writer),
        }
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Font::Standard(font) => write!(f, "Font::Standard({})", font.base_font()),
            Font::TrueType(ttf) => write!(f, "Font::TrueType({})", ttf.name()),
        }
    }
}

/// A parsed TrueType or OpenType font, embedded whole when written
pub struct TrueTypeFont {
    face: OwnedFace,
}

impl TrueTypeFont {
    /// Parse a font from raw bytes
    pub fn load(bytes: Vec<u8>) -> Result<TrueTypeFont, RenderError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(TrueTypeFont { face })
    }

    /// Read and parse a font file
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<TrueTypeFont, RenderError> {
        TrueTypeFont::load(std::fs::read(path)?)
    }

    fn find_name(&self, name_id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Full name of the font, or a placeholder for fonts without a name table
    pub fn name(&self) -> String {
        self.find_name(owned_ttf_parser::name_id::FULL_NAME)
            .unwrap_or_else(|| "Embedded".to_string())
    }

    pub fn family(&self) -> String {
        self.find_name(owned_ttf_parser::name_id::FAMILY)
            .unwrap_or_else(|| self.name())
    }

    /// Glyph for `ch`, falling back to U+FFFD, then `?`, then `.notdef`
    fn glyph_or_fallback(&self, ch: char) -> GlyphId {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .unwrap_or(GlyphId(0))
    }

    fn advance(&self, ch: char) -> u16 {
        self.face
            .as_face_ref()
            .glyph_hor_advance(self.glyph_or_fallback(ch))
            .unwrap_or_default()
    }

    // glyph id -> (char, (advance, height))
    fn glyph_table(&self) -> HashMap<u16, (char, (u16, i16))> {
        let face = self.face.as_face_ref();
        let mut map: HashMap<u16, (char, (u16, i16))> = HashMap::new();
        let Some(cmap) = face.tables().cmap else {
            return map;
        };

        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                let Ok(ch) = char::try_from(codepoint) else {
                    return;
                };
                let Some(gid) = subtable.glyph_index(codepoint).filter(|gid| gid.0 > 0) else {
                    return;
                };
                if map.contains_key(&gid.0) {
                    return;
                }
                if let Some(advance) = face.glyph_hor_advance(gid) {
                    let height = face
                        .glyph_bounding_box(gid)
                        .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                        .unwrap_or(1000);
                    map.insert(gid.0, (ch, (advance, height)));
                }
            });
        }

        map
    }

    fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let glyphs = self.glyph_table();
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, &glyphs, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, &glyphs, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }

    fn write_cid(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &HashMap<u16, (char, (u16, i16))>,
        writer: &mut Pdf,
    ) -> Ref {
        let descriptor_id = self.write_descriptor(refs, font_index, glyphs, writer);
        let id = refs.gen(RefType::CidFont(font_index));
        let scaling = 1000.0 / self.face.as_face_ref().units_per_em() as f32;

        // the most frequent advance becomes the default width
        let mut width_counts: HashMap<u16, usize> = HashMap::new();
        for (_, (width, _)) in glyphs.values() {
            *width_counts.entry(*width).or_insert(0) += 1;
        }
        let default_width = width_counts
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(&width, _)| width as f32 * scaling)
            .unwrap_or(1000.0);

        let mut cid_widths: Vec<(u16, f32)> = glyphs
            .iter()
            .map(|(&gid, &(_, (width, _)))| (gid, width as f32 * scaling))
            .collect();
        cid_widths.sort_by_key(|(gid, _)| *gid);

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);
        cid_font.default_width(default_width);

        // runs of consecutive glyph ids share one array
        let mut widths = cid_font.widths();
        let mut run: Vec<f32> = Vec::new();
        let mut run_start: u16 = 0;
        for (gid, width) in cid_widths {
            if !run.is_empty() && gid as usize != run_start as usize + run.len() {
                widths.consecutive(run_start, run.drain(..));
            }
            if run.is_empty() {
                run_start = gid;
            }
            run.push(width);
        }
        if !run.is_empty() {
            widths.consecutive(run_start, run);
        }
        widths.finish();

        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));
        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &HashMap<u16, (char, (u16, i16))>,
        writer: &mut Pdf,
    ) -> Ref {
        let face = self.face.as_face_ref();
        let data_id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let max_width = glyphs.values().map(|&(_, (w, _))| w).max().unwrap_or_default();
        let max_height = glyphs.values().map(|&(_, (_, h))| h).max().unwrap_or_default();
        let sum_width: usize = glyphs.values().map(|&(_, (w, _))| w as usize).sum();
        let avg_width = sum_width as f32 / glyphs.len().max(1) as f32;
        let scaling = 1000.0 / face.units_per_em() as f32;

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let name = self.name();
        let family = self.family();
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(name.as_bytes()));
        descriptor.family(Str(family.as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags = FontFlags::empty();
        flags.set(FontFlags::FIXED_PITCH, face.is_monospaced());
        flags.set(FontFlags::ITALIC, face.is_italic());
        flags.set(FontFlags::NON_SYMBOLIC, true);
        descriptor.flags(flags);

        descriptor.bbox(pdf_writer::Rect {
            x1: 0.0,
            y1: face.descender() as f32 * scaling,
            x2: max_width as f32 * scaling,
            y2: max_height as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        let cap_height = face.capital_height().unwrap_or(face.ascender());
        descriptor.cap_height(cap_height as f32 * scaling);
        descriptor.x_height(face.x_height().unwrap_or(cap_height) as f32 * scaling);
        // TrueType has no stem width; 80 is the usual regular-weight estimate
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.missing_width(max_width as f32 * scaling);
        descriptor.font_file2(data_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &HashMap<u16, (char, (u16, i16))>,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo\n\
             << /Registry (Adobe)\n\
             /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let mut ids: Vec<(u16, char)> = glyphs.iter().map(|(&gid, &(ch, _))| (gid, ch)).collect();
        ids.sort_by_key(|&(gid, _)| gid);

        // bfchar blocks hold at most 100 entries sharing a high byte
        let mut blocks: Vec<Vec<(u16, char)>> = Vec::new();
        for (gid, ch) in ids {
            let starts_block = match blocks.last() {
                Some(block) => block.len() >= 100 || block[0].0 >> 8 != gid >> 8,
                None => true,
            };
            if starts_block {
                blocks.push(Vec::new());
            }
            if let Some(block) = blocks.last_mut() {
                block.push((gid, ch));
            }
        }

        for block in blocks {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for (gid, ch) in block {
                map.push_str(&format!("<{gid:04x}> <{:04x}>\n", ch as u32));
            }
            map.push_str("endbfchar\n");
        }
        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn standard_fonts_measure_with_afm_widths() {
        let font = Font::Standard(StandardFont::Helvetica);
        // "mi" = 833 + 222 thousandths of an em
        assert!((font.width_of_text("mi", Pt(10.0)).0 - 10.55).abs() < 1e-4);
        assert!((font.line_height(Pt(10.0)).0 - 12.0).abs() < 1e-4);
    }

    #[test]
    fn standard_text_is_hex_encoded_win_ansi() {
        let font = Font::Standard(StandardFont::TimesRoman);
        let mut out = Vec::new();
        font.write_encoded("A•", &mut out).expect("can encode");
        assert_eq!(out, b"4195");
    }

    #[test]
    fn garbage_bytes_are_a_font_error() {
        assert!(matches!(
            TrueTypeFont::load(vec![0, 1, 2, 3]),
            Err(RenderError::Font(_))
        ));
    }
}
