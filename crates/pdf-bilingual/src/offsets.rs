//! Section boundaries of the combined document

use crate::types::*;

/// Compute absolute page ranges for the TOC and both language sections.
///
/// `pages_en` and `pages_ja` are the rendered page counts of the English and
/// Japanese bodies; `first_language` decides which one directly follows the
/// TOC. Every section must have at least one page.
pub fn compute_ranges(
    toc_pages: usize,
    pages_en: usize,
    pages_ja: usize,
    first_language: Language,
) -> Result<SectionRanges> {
    if toc_pages == 0 {
        return Err(BilingualError::EmptySection(Section::Toc));
    }
    if pages_en == 0 {
        return Err(BilingualError::EmptySection(Section::Body(Language::En)));
    }
    if pages_ja == 0 {
        return Err(BilingualError::EmptySection(Section::Body(Language::Ja)));
    }

    let second_language = first_language.other();
    let pages_for = |language: Language| match language {
        Language::En => pages_en,
        Language::Ja => pages_ja,
    };

    let toc = PageRange {
        section: Section::Toc,
        start_page: 1,
        page_count: toc_pages,
    };
    let first = PageRange {
        section: Section::Body(first_language),
        start_page: toc_pages + 1,
        page_count: pages_for(first_language),
    };
    let second = PageRange {
        section: Section::Body(second_language),
        start_page: first.start_page + first.page_count,
        page_count: pages_for(second_language),
    };

    Ok(SectionRanges { toc, first, second })
}

/// Human-readable page reference for a TOC entry.
///
/// Single-page sections read `p. 5`, longer ones `pp. 5-9`. Only ASCII is
/// produced so the text can be drawn with a builtin font.
pub fn format_page_range(range: &PageRange) -> String {
    if range.start_page == range.end_page() {
        format!("p. {}", range.start_page)
    } else {
        format!("pp. {}-{}", range.start_page, range.end_page())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_are_contiguous() {
        let ranges = compute_ranges(2, 7, 4, Language::Ja).unwrap();
        let mut expected_start = 1;
        for range in ranges.iter() {
            assert_eq!(range.start_page, expected_start);
            expected_start = range.end_page() + 1;
        }
        assert_eq!(expected_start - 1, ranges.total_pages());
    }

    #[test]
    fn test_format_single_and_multiple_pages() {
        let single = PageRange {
            section: Section::Body(Language::En),
            start_page: 2,
            page_count: 1,
        };
        assert_eq!(single.end_page(), single.start_page);
        assert_eq!(format_page_range(&single), "p. 2");

        let multiple = PageRange {
            page_count: 3,
            ..single
        };
        assert_eq!(format_page_range(&multiple), "pp. 2-4");
    }
}
