//! Shared constants for bilingual assembly
//!
//! Size ceilings, unit conversion and the fixed geometry of the generated
//! table-of-contents page. The TOC renderers, the page-number stamper and the
//! annotation linker all read the same geometry so their positions agree.

// =============================================================================
// Limits
// =============================================================================

/// Maximum size of one HTML body accepted for rendering (5 MiB)
pub const MAX_HTML_BYTES: usize = 5 * 1024 * 1024;

/// Maximum size of a single TOC metadata field
pub const MAX_TOC_FIELD_BYTES: usize = 4 * 1024;

/// Default timeout for a single render call
pub const DEFAULT_RENDER_TIMEOUT_MS: u64 = 60_000;

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// CSS pixels per millimeter (96 dpi)
pub const PX_PER_MM: f32 = 96.0 / 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// TOC Page Geometry (millimeters from the top-left corner)
// =============================================================================

/// Horizontal margin on both sides of the TOC page
pub const TOC_MARGIN_X_MM: f32 = 25.0;

/// Baseline area of the main title
pub const TOC_TITLE_TOP_MM: f32 = 40.0;

/// Gap between stacked header lines (title, secondary title, client, dates)
pub const TOC_HEADER_LINE_MM: f32 = 12.0;

/// Top edge of the first entry row
pub const TOC_ENTRIES_TOP_MM: f32 = 120.0;

/// Height of one entry row
pub const TOC_ROW_HEIGHT_MM: f32 = 16.0;

/// Font size of the main title
pub const TOC_TITLE_FONT_SIZE: f32 = 24.0;

/// Font size of secondary header lines
pub const TOC_SUBTITLE_FONT_SIZE: f32 = 14.0;

/// Font size of entry labels and page numbers
pub const TOC_ENTRY_FONT_SIZE: f32 = 12.0;

/// Approximate advance width of Helvetica glyphs relative to font size
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.556;

/// Resource name of the font used for stamped page numbers
pub const STAMP_FONT_NAME: &str = "FBlnNum";
