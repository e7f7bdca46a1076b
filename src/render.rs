//! The public entry point: validate a request, compose it with the chosen
//! template and serialize the result.

use crate::compose::{compose, ComposeInput, EntryView, FontFamily, TemplateSpec, Theme};
use crate::document::Document;
use crate::enhance::{EnhancementIntent, Enhancements, EntryRef, TextEnhancer};
use crate::error::{RenderError, Result};
use crate::font::{Font, TrueTypeFont};
use crate::info::Info;
use crate::layout::{Margins, Typeface};
use crate::model::{ProfileDocument, Selection, StyleConfig, TemplateId};
use crate::pagesize::{PageSize, LETTER};
use crate::standard::StandardFont;
use crate::units::Pt;
use std::collections::BTreeSet;
use std::sync::Arc;

/// More entries than this do not fit a résumé and are refused outright
pub const MAX_SELECTED_ENTRIES: usize = 7;

/// A single page whose content reaches less than this far down is treated as
/// empty
pub const MIN_CONTENT_HEIGHT: Pt = Pt(48.0);

/// Where glyph metrics and outlines come from
#[derive(Clone, Default)]
pub enum FontSource {
    /// The PDF base-14 fonts: Times for serif templates, Helvetica otherwise.
    /// Nothing is embedded.
    #[default]
    Standard,
    /// Caller-supplied fonts, used by every template and embedded in the output
    TrueType {
        regular: Arc<TrueTypeFont>,
        bold: Arc<TrueTypeFont>,
    },
}

impl FontSource {
    fn fonts(&self, family: FontFamily) -> (Font, Font) {
        match (self, family) {
            (FontSource::Standard, FontFamily::Serif) => (
                Font::Standard(StandardFont::TimesRoman),
                Font::Standard(StandardFont::TimesBold),
            ),
            (FontSource::Standard, FontFamily::Sans) => (
                Font::Standard(StandardFont::Helvetica),
                Font::Standard(StandardFont::HelveticaBold),
            ),
            (FontSource::TrueType { regular, bold }, _) => (
                Font::TrueType(Arc::clone(regular)),
                Font::TrueType(Arc::clone(bold)),
            ),
        }
    }
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontSource::Standard => f.write_str("Standard"),
            FontSource::TrueType { regular, bold } => f
                .debug_struct("TrueType")
                .field("regular", &regular.name())
                .field("bold", &bold.name())
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub page_size: PageSize,
    pub margins: Margins,
    pub fonts: FontSource,
    /// Multiplier on the fonts' natural line height
    pub line_spacing: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            page_size: LETTER,
            margins: Margins::all(Pt(72.0)),
            fonts: FontSource::default(),
            line_spacing: 1.15,
        }
    }
}

/// A finished PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl RenderedDocument {
    pub const MIME_TYPE: &'static str = "application/pdf";
}

/// Renders résumés. Holds no per-render state, so one renderer can serve any
/// number of requests, concurrently if its enhancer allows.
#[derive(Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
    enhancer: Option<Arc<dyn TextEnhancer + Send + Sync>>,
    target_role: Option<String>,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Renderer {
        Renderer {
            options,
            enhancer: None,
            target_role: None,
        }
    }

    /// Rewrite entry bodies through `enhancer` before laying them out
    pub fn with_enhancer(mut self, enhancer: Arc<dyn TextEnhancer + Send + Sync>) -> Renderer {
        self.enhancer = Some(enhancer);
        self
    }

    /// Ask the enhancer for text targeted at a role rather than general text
    pub fn with_target_role<S: Into<String>>(mut self, role: S) -> Renderer {
        self.target_role = Some(role.into());
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render with the template named in `style`
    pub fn render(
        &self,
        profile: &ProfileDocument,
        selection: &Selection,
        style: &StyleConfig,
    ) -> Result<RenderedDocument> {
        self.render_template(profile, selection, style, style.template)
    }

    pub fn render_template(
        &self,
        profile: &ProfileDocument,
        selection: &Selection,
        style: &StyleConfig,
        template: TemplateId,
    ) -> Result<RenderedDocument> {
        validate_selection(selection)?;
        let enhancements = match &self.enhancer {
            Some(enhancer) => {
                let intent = EnhancementIntent {
                    density: style.content_density,
                    target_role: self.target_role.clone(),
                };
                Enhancements::collect(enhancer.as_ref(), profile, selection, &intent)
            }
            None => Enhancements::default(),
        };
        self.render_with(profile, selection, style, template, &enhancements)
    }

    /// Render with enhancements the caller already has
    pub fn render_with(
        &self,
        profile: &ProfileDocument,
        selection: &Selection,
        style: &StyleConfig,
        template: TemplateId,
        enhancements: &Enhancements,
    ) -> Result<RenderedDocument> {
        let document = self.compose(profile, selection, style, template, enhancements)?;
        let page_count = document.page_count();
        let bytes = document.to_bytes()?;
        log::info!(
            "rendered {} template: {} pages, {} bytes",
            template,
            page_count,
            bytes.len()
        );
        Ok(RenderedDocument { bytes, page_count })
    }

    /// Lay out the résumé without serializing it, so its pages can be inspected
    pub fn compose(
        &self,
        profile: &ProfileDocument,
        selection: &Selection,
        style: &StyleConfig,
        template: TemplateId,
        enhancements: &Enhancements,
    ) -> Result<Document> {
        validate_selection(selection)?;
        log::info!(
            "composing {} template with {} selected entries",
            template,
            selection.len()
        );

        let (experiences, projects) = entry_views(profile, selection, enhancements);
        let input = ComposeInput {
            profile,
            experiences,
            projects,
        };

        let spec = TemplateSpec::for_template(template);
        let theme = Theme::from_style(style);
        let mut document = Document::default();
        document.set_info(Info::for_resume(&profile.name, template.name()));
        let (regular, bold) = self.options.fonts.fonts(spec.family);
        let face = Typeface::register(&mut document, regular, bold)
            .with_line_spacing(self.options.line_spacing);

        let outcome = compose(
            &input,
            &face,
            &theme,
            &spec,
            self.options.page_size,
            self.options.margins,
        );

        if outcome.entries_rendered == 0 {
            return Err(RenderError::ContentInsufficient(
                "none of the selected entries exist in the profile".to_string(),
            ));
        }
        if outcome.pages.len() == 1 && outcome.first_page_height < MIN_CONTENT_HEIGHT {
            return Err(RenderError::ContentInsufficient(format!(
                "content only reaches {}pt down the page",
                outcome.first_page_height
            )));
        }

        for page in outcome.pages {
            document.add_page(page);
        }
        Ok(document)
    }
}

/// Render with default options and no enhancer
pub fn render_document(
    profile: &ProfileDocument,
    selection: &Selection,
    style: &StyleConfig,
    template: TemplateId,
) -> Result<RenderedDocument> {
    Renderer::default().render_template(profile, selection, style, template)
}

/// Reject selections that are empty, too long, or name an entry twice
pub fn validate_selection(selection: &Selection) -> Result<()> {
    if selection.is_empty() {
        return Err(RenderError::Validation(
            "select at least one project or experience".to_string(),
        ));
    }
    if selection.len() > MAX_SELECTED_ENTRIES {
        return Err(RenderError::Validation(format!(
            "{} entries selected; at most {MAX_SELECTED_ENTRIES} are allowed",
            selection.len()
        )));
    }
    for (kind, indices) in [
        ("project", &selection.projects),
        ("experience", &selection.experiences),
    ] {
        let mut seen = BTreeSet::new();
        if let Some(duplicate) = indices.iter().find(|&&i| !seen.insert(i)) {
            return Err(RenderError::Validation(format!(
                "{kind} {duplicate} is selected more than once"
            )));
        }
    }
    Ok(())
}

// selected entries in selection order, with enhanced text resolved
fn entry_views(
    profile: &ProfileDocument,
    selection: &Selection,
    enhancements: &Enhancements,
) -> (Vec<EntryView>, Vec<EntryView>) {
    let experiences = selection
        .experiences
        .iter()
        .filter_map(|&i| {
            let Some(entry) = profile.experiences.get(i) else {
                log::warn!("ignoring selected experience {i}: the profile has no such entry");
                return None;
            };
            Some(EntryView {
                title: entry.heading(),
                meta: entry.period(),
                body: enhancements
                    .resolve(EntryRef::Experience(i), &entry.body)
                    .to_string(),
            })
        })
        .collect();

    let projects = selection
        .projects
        .iter()
        .filter_map(|&i| {
            let Some(entry) = profile.projects.get(i) else {
                log::warn!("ignoring selected project {i}: the profile has no such entry");
                return None;
            };
            Some(EntryView {
                title: entry.name.trim().to_string(),
                meta: None,
                body: enhancements
                    .resolve(EntryRef::Project(i), &entry.body)
                    .to_string(),
            })
        })
        .collect();

    (experiences, projects)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{ExperienceEntry, ProjectEntry};

    fn profile() -> ProfileDocument {
        ProfileDocument {
            name: "Katherine Johnson".to_string(),
            skills_text: "Orbital mechanics, Geometry".to_string(),
            projects: vec![
                ProjectEntry {
                    name: "Friendship 7".to_string(),
                    body: "- Verified the trajectory by hand\n- Checked the IBM 7090 output"
                        .to_string(),
                },
                ProjectEntry {
                    name: "Apollo 11".to_string(),
                    body: "- Computed the lunar rendezvous".to_string(),
                },
            ],
            experiences: vec![ExperienceEntry {
                company_name: "NASA".to_string(),
                role: "Research mathematician".to_string(),
                time_from: "1958".to_string(),
                time_to: "1986".to_string(),
                body: "- Calculated launch windows".to_string(),
            }],
            ..ProfileDocument::default()
        }
    }

    #[test]
    fn selections_are_validated_before_layout() {
        let empty = validate_selection(&Selection::default()).expect_err("empty");
        assert_eq!(empty.kind(), ErrorKind::Validation);

        let too_many = Selection::new(vec![0, 1, 2, 3, 4], vec![0, 1, 2]);
        assert!(matches!(
            validate_selection(&too_many),
            Err(RenderError::Validation(_))
        ));

        let duplicated = Selection::new(vec![1, 1], vec![]);
        assert!(validate_selection(&duplicated).is_err());

        assert!(validate_selection(&Selection::new(vec![0, 1, 2, 3], vec![0, 1, 2])).is_ok());
    }

    #[test]
    fn entries_render_in_selection_order() {
        let document = Renderer::default()
            .compose(
                &profile(),
                &Selection::new(vec![1, 0], vec![]),
                &StyleConfig::default(),
                TemplateId::Harvard,
                &Enhancements::default(),
            )
            .expect("composes");
        let text: String = document.pages().map(|p| p.text()).collect();
        let apollo = text.find("Apollo 11").expect("apollo");
        let friendship = text.find("Friendship 7").expect("friendship");
        assert!(apollo < friendship);
    }

    #[test]
    fn missing_entries_are_skipped_but_not_all_of_them() {
        let renderer = Renderer::default();
        let style = StyleConfig::default();
        let document = renderer
            .compose(
                &profile(),
                &Selection::new(vec![0, 9], vec![]),
                &style,
                TemplateId::Harvard,
                &Enhancements::default(),
            )
            .expect("one entry exists");
        assert_eq!(document.page_count(), 1);

        let err = renderer
            .compose(
                &profile(),
                &Selection::new(vec![9], vec![4]),
                &style,
                TemplateId::Harvard,
                &Enhancements::default(),
            )
            .expect_err("nothing to render");
        assert_eq!(err.kind(), ErrorKind::ContentInsufficient);
    }

    #[test]
    fn enhanced_text_replaces_the_original() {
        let enhancements = Enhancements::new()
            .with_general(EntryRef::Experience(0), "- Calculated **every** launch window");
        let document = Renderer::default()
            .compose(
                &profile(),
                &Selection::new(vec![], vec![0]),
                &StyleConfig::default(),
                TemplateId::Chronological,
                &enhancements,
            )
            .expect("composes");
        let text: String = document.pages().map(|p| p.text()).collect();
        assert!(text.contains("every"));
        assert!(!text.contains("Calculated launch windows"));
    }
}
