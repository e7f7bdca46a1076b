//! Résumé layout and pagination.
//!
//! Takes a [ProfileDocument], a [Selection] of its entries and a
//! [StyleConfig], lays the content out on fixed-size pages with one of the
//! built-in templates and serializes the result as a PDF.
//!
//! ```no_run
//! use cvpress::{render_document, ProfileDocument, Selection, StyleConfig, TemplateId};
//!
//! let profile: ProfileDocument =
//!     serde_json::from_str(&std::fs::read_to_string("profile.json")?)?;
//! let selection = Selection::new(vec![0], vec![0, 1]);
//! let pdf = render_document(&profile, &selection, &StyleConfig::default(), TemplateId::Harvard)?;
//! std::fs::write("resume.pdf", pdf.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod colour;
pub use colour::*;

/// Template composers: sections, sidebar, card grid and skill chips
pub mod compose;

mod content;

mod document;
pub use document::*;

/// Optional rewritten entry text from an external enhancer
pub mod enhance;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod info;
pub use info::*;

/// Utility functions and structures to lay out text on pages
pub mod layout;

mod model;
pub use model::*;

mod page;
pub use page::*;

/// Standard page sizes
pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod render;
pub use render::*;

mod standard;
pub use standard::StandardFont;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
