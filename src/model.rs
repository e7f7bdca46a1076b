//! Input data: the profile being rendered, which entries to include, and how
//! the result should look. Everything deserializes from camelCase JSON.

use crate::colour::AccentColour;
use crate::units::Pt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    pub name: String,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub education: Education,
    #[serde(default)]
    pub skills_text: String,
    #[serde(default)]
    pub languages: Option<String>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub experiences: Vec<ExperienceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub work_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

impl Contact {
    /// Non-empty contact details in display order
    pub fn items(&self) -> Vec<&str> {
        std::iter::once(self.email.as_str())
            .chain(self.work_email.as_deref())
            .chain(self.phone.as_deref())
            .chain(self.website.as_deref())
            .chain(self.linkedin.as_deref())
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub study_period: Option<String>,
}

impl Education {
    pub fn is_empty(&self) -> bool {
        self.school.trim().is_empty() && self.major.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub time_from: String,
    #[serde(default)]
    pub time_to: String,
    #[serde(default)]
    pub body: String,
}

impl ExperienceEntry {
    /// "Role, Company", or whichever of the two is present
    pub fn heading(&self) -> String {
        match (self.role.trim(), self.company_name.trim()) {
            ("", company) => company.to_string(),
            (role, "") => role.to_string(),
            (role, company) => format!("{role}, {company}"),
        }
    }

    /// "From – To"; an open-ended period reads "From – Present"
    pub fn period(&self) -> Option<String> {
        match (self.time_from.trim(), self.time_to.trim()) {
            ("", "") => None,
            (from, "") => Some(format!("{from} \u{2013} Present")),
            ("", to) => Some(to.to_string()),
            (from, to) => Some(format!("{from} \u{2013} {to}")),
        }
    }
}

/// Which entries to render, by index into the profile's lists, in the order
/// they should appear
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default, alias = "selectedProjects")]
    pub projects: Vec<usize>,
    #[serde(default, alias = "selectedExperiences")]
    pub experiences: Vec<usize>,
}

impl Selection {
    pub fn new(projects: Vec<usize>, experiences: Vec<usize>) -> Selection {
        Selection {
            projects,
            experiences,
        }
    }

    pub fn len(&self) -> usize {
        self.projects.len() + self.experiences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.experiences.is_empty()
    }
}

/// Body font size in points, restricted to the sizes the templates are
/// tuned for
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FontSize(u8);

impl FontSize {
    pub const ALLOWED: [u8; 6] = [8, 9, 10, 11, 12, 14];

    pub fn pt(self) -> Pt {
        Pt(self.0 as f32)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for FontSize {
    fn default() -> Self {
        FontSize(11)
    }
}

impl TryFrom<u8> for FontSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if FontSize::ALLOWED.contains(&value) {
            Ok(FontSize(value))
        } else {
            Err(format!(
                "font size {value}pt is not one of {:?}",
                FontSize::ALLOWED
            ))
        }
    }
}

impl From<FontSize> for u8 {
    fn from(size: FontSize) -> u8 {
        size.0
    }
}

/// How much detail the text enhancer is asked for. Has no effect on layout.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentDensity {
    Concise,
    #[default]
    Balanced,
    Detailed,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    #[default]
    Harvard,
    Chronological,
    SidebarSerif,
    CardGrid,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Harvard,
        TemplateId::Chronological,
        TemplateId::SidebarSerif,
        TemplateId::CardGrid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemplateId::Harvard => "harvard",
            TemplateId::Chronological => "chronological",
            TemplateId::SidebarSerif => "sidebar-serif",
            TemplateId::CardGrid => "card-grid",
        }
    }
}

impl std::str::FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown template `{s}`"))
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    pub font_size_pt: FontSize,
    pub use_bold: bool,
    pub use_italic: bool,
    pub accent_color: AccentColour,
    pub content_density: ContentDensity,
    pub template: TemplateId,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            font_size_pt: FontSize::default(),
            use_bold: true,
            use_italic: false,
            accent_color: AccentColour::default(),
            content_density: ContentDensity::default(),
            template: TemplateId::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn profiles_load_from_camel_case_json() {
        let profile: ProfileDocument = serde_json::from_str(
            r#"{
                "name": "Ada Lovelace",
                "contact": { "email": "ada@example.com", "linkedin": " " },
                "education": { "school": "University of London", "major": "Mathematics" },
                "skillsText": "Analysis, **Engines**",
                "experiences": [{
                    "companyName": "Analytical Engines Ltd",
                    "role": "Programmer",
                    "timeFrom": "1842",
                    "timeTo": "",
                    "body": "- Wrote the first program"
                }]
            }"#,
        )
        .expect("valid profile");
        assert_eq!(profile.contact.items(), vec!["ada@example.com"]);
        assert!(profile.projects.is_empty());
        let job = &profile.experiences[0];
        assert_eq!(job.heading(), "Programmer, Analytical Engines Ltd");
        assert_eq!(job.period().as_deref(), Some("1842 \u{2013} Present"));
    }

    #[test]
    fn font_sizes_outside_the_menu_are_rejected() {
        let style: StyleConfig =
            serde_json::from_str(r#"{ "fontSizePt": 12, "template": "card-grid" }"#)
                .expect("valid style");
        assert_eq!(style.font_size_pt.pt(), Pt(12.0));
        assert!(style.use_bold);
        assert_eq!(style.template, TemplateId::CardGrid);

        assert!(serde_json::from_str::<StyleConfig>(r#"{ "fontSizePt": 13 }"#).is_err());
        assert!(FontSize::try_from(7).is_err());
    }

    #[test]
    fn selections_accept_the_long_field_names() {
        let selection: Selection =
            serde_json::from_str(r#"{ "selectedProjects": [2, 0], "experiences": [1] }"#)
                .expect("valid selection");
        assert_eq!(selection, Selection::new(vec![2, 0], vec![1]));
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn template_names_round_trip() {
        for template in TemplateId::ALL {
            assert_eq!(template.name().parse::<TemplateId>(), Ok(template));
        }
    }
}
