use crate::refs::{ObjectReferences, RefType};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// Document metadata written to the PDF info dictionary
#[derive(Default, Debug, Clone)]
pub struct Info {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Comma separated, as Adobe Acrobat suggests
    pub keywords: Option<String>,
}

impl Info {
    /// Metadata for a résumé of the named person
    pub fn for_resume(name: &str, template: &str) -> Info {
        let name = name.trim();
        Info {
            title: Some(if name.is_empty() {
                "Résumé".to_string()
            } else {
                format!("{name} - Résumé")
            }),
            author: (!name.is_empty()).then(|| name.to_string()),
            subject: Some("Résumé".to_string()),
            keywords: Some(format!("resume, {template}")),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(author) = &self.author {
            info.author(TextStr(author.as_str()));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        if let Some(keywords) = &self.keywords {
            info.keywords(TextStr(keywords.as_str()));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));

        use chrono::prelude::*;
        let now = Local::now();
        let offset = now.offset().fix().local_minus_utc();
        let offset_hours = offset / (60 * 60);
        let offset_minutes = ((offset - offset_hours * 60 * 60) / 60).abs();
        let date = PDate::new(now.year() as u16)
            .month(now.month() as u8)
            .day(now.day() as u8)
            .hour(now.hour() as u8)
            .minute(now.minute() as u8)
            .second(now.second() as u8)
            .utc_offset_hour(offset_hours as i8)
            .utc_offset_minute(offset_minutes as u8);
        info.creation_date(date);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resume_metadata_names_the_person() {
        let info = Info::for_resume("  Ada Lovelace ", "harvard");
        assert_eq!(info.title.as_deref(), Some("Ada Lovelace - Résumé"));
        assert_eq!(info.author.as_deref(), Some("Ada Lovelace"));

        let anonymous = Info::for_resume("", "card-grid");
        assert_eq!(anonymous.title.as_deref(), Some("Résumé"));
        assert!(anonymous.author.is_none());
    }
}
