//! Footer year.

use chrono::{Datelike, Local};
use glyphfall_core::Dom;

use crate::YEAR_ID;

/// Current local calendar year.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Write `year` into the year element. Returns `false` if there is none.
pub fn stamp_year<D: Dom + ?Sized>(dom: &mut D, year: i32) -> bool {
    match dom.element_by_id(YEAR_ID) {
        Some(el) => {
            dom.set_text(el, &year.to_string());
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfall_core::PageDocument;

    #[test]
    fn test_stamp_year() {
        let mut doc = PageDocument::new();
        assert!(!stamp_year(&mut doc, 2026));

        let el = doc.insert(Some(YEAR_ID), &[]);
        assert!(stamp_year(&mut doc, 2026));
        assert_eq!(doc.text(el), Some("2026"));
    }

    #[test]
    fn test_current_year_is_plausible() {
        assert!(current_year() >= 2024);
    }
}
