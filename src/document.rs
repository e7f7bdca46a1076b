use crate::{
    font::Font,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
    RenderError,
};
use id_arena::{Arena, Id};
use pdf_writer::{Pdf, Ref};
use std::io::Write;

/// Anything smaller than this cannot be a real résumé; the emitter treats it
/// as a failed render rather than shipping it.
pub const MIN_DOCUMENT_BYTES: usize = 800;

/// A document stores everything that will end up in the PDF, then renders it
/// out with a call to [Document::write] or [Document::to_bytes]
#[derive(Default, Debug)]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<Font>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// Add a font to the document. Fonts are shared by every page; the returned id is how
    /// spans refer to it.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Pages in document order
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.page_order.iter().filter_map(|id| self.pages.get(*id))
    }

    /// Write the entire document to the writer. The document is rendered in memory
    /// first, as pdf-writer builds the whole file before handing it out.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), RenderError> {
        let bytes = self.render()?;
        w.write_all(bytes.as_slice()).map_err(Into::into)
    }

    /// Render the document and check that the result is plausibly a real document
    pub fn to_bytes(self) -> Result<Vec<u8>, RenderError> {
        let bytes = self.render()?;
        if bytes.len() < MIN_DOCUMENT_BYTES {
            return Err(RenderError::Emitter {
                size: bytes.len(),
                minimum: MIN_DOCUMENT_BYTES,
            });
        }
        Ok(bytes)
    }

    fn render(self) -> Result<Vec<u8>, RenderError> {
        let Document {
            info,
            pages,
            page_order,
            fonts,
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, font) in fonts.iter() {
            font.write(&mut refs, id, &mut writer);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages
                .get(*id)
                .ok_or_else(|| std::io::Error::other(format!("page {page_index} is missing")))?;
            page.write(&mut refs, page_index, &fonts, &mut writer)?;
        }

        writer.catalog(catalog_id).pages(page_tree_id);

        let bytes = writer.finish();
        log::debug!(
            "emitted {} bytes across {} pages",
            bytes.len(),
            page_order.len()
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::Margins;
    use crate::pagesize::LETTER;
    use crate::units::Pt;

    #[test]
    fn empty_documents_are_rejected_as_implausible() {
        let mut doc = Document::default();
        doc.add_page(Page::new(LETTER, Margins::all(Pt(36.0))));
        match doc.to_bytes() {
            Err(RenderError::Emitter { size, minimum }) => {
                assert!(size < minimum);
                assert_eq!(minimum, MIN_DOCUMENT_BYTES);
            }
            other => panic!("expected an emitter error, got {other:?}"),
        }
    }

    #[test]
    fn write_produces_a_pdf_header() {
        let mut doc = Document::default();
        doc.add_page(Page::new(LETTER, Margins::all(Pt(36.0))));
        let mut out = Vec::new();
        doc.write(&mut out).expect("can write");
        assert!(out.starts_with(b"%PDF-"));
    }
}
