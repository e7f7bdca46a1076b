//! Page sizes the renderer can target.
//!
//! All sizes are portrait (width, height) in points.

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

/// US Letter, 8.5 × 11 inches. The default résumé page.
pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));

/// US Legal, 8.5 × 14 inches
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));

/// ISO A4 (converted from mm to points)
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
