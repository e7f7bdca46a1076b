//! Layout primitives shared by every template.
//!
//! - [`tokenize`] turns the small markdown subset into word and space tokens
//! - [`break_lines`] greedily breaks tokens into lines and can justify them
//! - [`layout_bullets`] splits free text into items with a hanging indent
//! - [`Flow`] tracks the vertical cursor and starts new pages
//!
//! All measurement goes through the [`TextMeasure`] trait so layout can be
//! tested without real fonts.

mod bullets;
mod flow;
mod margins;
mod markdown;
mod measure;
mod text;

pub use bullets::*;
pub use flow::*;
pub use margins::*;
pub use markdown::*;
pub use measure::*;
pub use text::*;

#[cfg(test)]
pub(crate) use measure::testing;
