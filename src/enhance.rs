//! Optional rewritten entry text supplied by an external text enhancer.
//!
//! The layout engine never talks to a language model itself. It takes an
//! [Enhancements] map, immutable once built, and resolves each entry's body
//! as targeted text, else general text, else the original.

use crate::error::ErrorKind;
use crate::model::{ContentDensity, ProfileDocument, Selection};
use std::collections::BTreeMap;
use thiserror::Error;

/// How many times a malformed enhancer response is retried in total
pub const MAX_ENHANCE_ATTEMPTS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnhanceError {
    /// The enhancer answered, but with something unusable. Worth retrying.
    #[error("malformed enhancement response: {0}")]
    Malformed(String),

    /// The enhancer could not be reached or refused the request
    #[error("enhancement service unavailable: {0}")]
    Unavailable(String),
}

impl EnhanceError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::UpstreamEnhancement
    }
}

/// What the enhancer is asked to optimise for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnhancementIntent {
    pub density: ContentDensity,
    /// A job description or role title; when present the output is stored as
    /// targeted text rather than general text
    pub target_role: Option<String>,
}

/// An external service that rewrites entry text
pub trait TextEnhancer {
    fn enhance(&self, content: &str, intent: &EnhancementIntent) -> Result<String, EnhanceError>;
}

/// Identifies one profile entry
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryRef {
    Project(usize),
    Experience(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enhancements {
    general: BTreeMap<EntryRef, String>,
    targeted: BTreeMap<EntryRef, String>,
}

impl Enhancements {
    pub fn new() -> Enhancements {
        Enhancements::default()
    }

    pub fn with_general<S: Into<String>>(mut self, entry: EntryRef, text: S) -> Enhancements {
        self.general.insert(entry, text.into());
        self
    }

    pub fn with_targeted<S: Into<String>>(mut self, entry: EntryRef, text: S) -> Enhancements {
        self.targeted.insert(entry, text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.targeted.is_empty()
    }

    /// The text to render for `entry`. Blank enhancements are ignored.
    pub fn resolve<'a>(&'a self, entry: EntryRef, original: &'a str) -> &'a str {
        self.targeted
            .get(&entry)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.general.get(&entry).filter(|t| !t.trim().is_empty()))
            .map(String::as_str)
            .unwrap_or(original)
    }

    /// Combine two maps; entries in `other` win
    pub fn merge(mut self, other: Enhancements) -> Enhancements {
        self.general.extend(other.general);
        self.targeted.extend(other.targeted);
        self
    }

    /// Ask `enhancer` for a rewrite of every selected entry that exists in the
    /// profile. Failures are logged and leave the entry's original text in
    /// place; they never fail the render.
    pub fn collect(
        enhancer: &dyn TextEnhancer,
        profile: &ProfileDocument,
        selection: &Selection,
        intent: &EnhancementIntent,
    ) -> Enhancements {
        let projects = selection.projects.iter().filter_map(|&i| {
            profile
                .projects
                .get(i)
                .map(|p| (EntryRef::Project(i), p.body.as_str()))
        });
        let experiences = selection.experiences.iter().filter_map(|&i| {
            profile
                .experiences
                .get(i)
                .map(|e| (EntryRef::Experience(i), e.body.as_str()))
        });

        let mut enhancements = Enhancements::new();
        for (entry, body) in experiences.chain(projects) {
            if body.trim().is_empty() {
                continue;
            }
            match enhance_with_retry(enhancer, body, intent) {
                Ok(text) => {
                    let map = match intent.target_role {
                        Some(_) => &mut enhancements.targeted,
                        None => &mut enhancements.general,
                    };
                    map.insert(entry, text);
                }
                Err(e) => {
                    log::warn!("keeping original text for {entry:?}: {e}");
                }
            }
        }
        enhancements
    }
}

/// Call the enhancer, retrying malformed (including blank) responses up to
/// [MAX_ENHANCE_ATTEMPTS] times in total. Unavailability is not retried.
pub fn enhance_with_retry(
    enhancer: &dyn TextEnhancer,
    content: &str,
    intent: &EnhancementIntent,
) -> Result<String, EnhanceError> {
    let mut last_error = EnhanceError::Malformed("no attempt made".to_string());
    for attempt in 1..=MAX_ENHANCE_ATTEMPTS {
        match enhancer.enhance(content, intent) {
            Ok(text) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => {
                last_error = EnhanceError::Malformed("empty response".to_string());
            }
            Err(e @ EnhanceError::Unavailable(_)) => return Err(e),
            Err(e) => last_error = e,
        }
        log::debug!("enhancement attempt {attempt}/{MAX_ENHANCE_ATTEMPTS} failed: {last_error}");
    }
    Err(last_error)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{ExperienceEntry, ProjectEntry};
    use std::cell::Cell;

    struct Flaky {
        calls: Cell<usize>,
        fail_first: usize,
    }

    impl TextEnhancer for Flaky {
        fn enhance(&self, content: &str, _: &EnhancementIntent) -> Result<String, EnhanceError> {
            self.calls.set(self.calls.get() + 1);
            if self.calls.get() <= self.fail_first {
                Err(EnhanceError::Malformed("not json".to_string()))
            } else {
                Ok(format!("- {}", content.to_uppercase()))
            }
        }
    }

    struct Down;

    impl TextEnhancer for Down {
        fn enhance(&self, _: &str, _: &EnhancementIntent) -> Result<String, EnhanceError> {
            Err(EnhanceError::Unavailable("connection refused".to_string()))
        }
    }

    fn profile() -> ProfileDocument {
        ProfileDocument {
            name: "Grace Hopper".to_string(),
            projects: vec![ProjectEntry {
                name: "Compiler".to_string(),
                body: "wrote a compiler".to_string(),
            }],
            experiences: vec![ExperienceEntry {
                company_name: "Navy".to_string(),
                body: "found a moth".to_string(),
                ..ExperienceEntry::default()
            }],
            ..ProfileDocument::default()
        }
    }

    #[test]
    fn resolution_prefers_targeted_then_general_then_original() {
        let entry = EntryRef::Project(0);
        let none = Enhancements::new();
        assert_eq!(none.resolve(entry, "original"), "original");

        let general = Enhancements::new().with_general(entry, "general");
        assert_eq!(general.resolve(entry, "original"), "general");

        let both = general.clone().with_targeted(entry, "targeted");
        assert_eq!(both.resolve(entry, "original"), "targeted");
        assert_eq!(both.resolve(EntryRef::Project(1), "other"), "other");

        let blank = Enhancements::new().with_targeted(entry, "  ");
        assert_eq!(blank.resolve(entry, "original"), "original");
    }

    #[test]
    fn malformed_responses_are_retried() {
        let flaky = Flaky {
            calls: Cell::new(0),
            fail_first: 2,
        };
        let text = enhance_with_retry(&flaky, "abc", &EnhancementIntent::default())
            .expect("third attempt succeeds");
        assert_eq!(text, "- ABC");
        assert_eq!(flaky.calls.get(), 3);

        let hopeless = Flaky {
            calls: Cell::new(0),
            fail_first: 10,
        };
        let err = enhance_with_retry(&hopeless, "abc", &EnhancementIntent::default())
            .expect_err("gives up");
        assert_eq!(hopeless.calls.get(), MAX_ENHANCE_ATTEMPTS);
        assert_eq!(err.kind(), ErrorKind::UpstreamEnhancement);
    }

    #[test]
    fn collect_fills_targeted_or_general_by_intent() {
        let profile = profile();
        let selection = Selection::new(vec![0, 5], vec![0]);
        let enhancer = Flaky {
            calls: Cell::new(0),
            fail_first: 0,
        };

        let general = Enhancements::collect(
            &enhancer,
            &profile,
            &selection,
            &EnhancementIntent::default(),
        );
        assert_eq!(
            general.resolve(EntryRef::Project(0), "x"),
            "- WROTE A COMPILER"
        );
        assert_eq!(general.resolve(EntryRef::Experience(0), "x"), "- FOUND A MOTH");

        let intent = EnhancementIntent {
            target_role: Some("Compiler engineer".to_string()),
            ..EnhancementIntent::default()
        };
        let targeted = Enhancements::collect(&enhancer, &profile, &selection, &intent);
        let merged = Enhancements::new()
            .with_general(EntryRef::Project(0), "general")
            .merge(targeted);
        assert_eq!(
            merged.resolve(EntryRef::Project(0), "x"),
            "- WROTE A COMPILER"
        );
    }

    #[test]
    fn unavailable_enhancer_leaves_originals() {
        let enhancements = Enhancements::collect(
            &Down,
            &profile(),
            &Selection::new(vec![0], vec![]),
            &EnhancementIntent::default(),
        );
        assert!(enhancements.is_empty());
    }
}
