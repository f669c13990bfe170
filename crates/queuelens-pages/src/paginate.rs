use std::collections::BTreeSet;

use queuelens_types::{PageNumber, PageWindow};

/// Above this many pages the number list is compressed with ellipses
const FULL_LIST_MAX_PAGES: i64 = 10;

/// Pages shown on each side of the current page in a compressed list
const NEIGHBOURS: i64 = 2;

/// One page of an in-memory sequence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

/// Slice `items` to the requested page, clamping the page number
pub fn paginate<T>(items: Vec<T>, page: i64, limit: usize) -> Paginated<T> {
    let window = PageWindow::new(items.len(), limit, page);
    let range = window.range();
    let items = items
        .into_iter()
        .skip(range.start)
        .take(range.len())
        .collect();
    Paginated { items, window }
}

/// Page numbers to display for `current` out of `total`.
///
/// Short lists are shown in full. Longer ones keep the first and last
/// page plus two pages either side of the current one, with an ellipsis
/// wherever numbers are skipped.
pub fn generate_page_numbers(current: i64, total: i64) -> Vec<PageNumber> {
    if total < 1 {
        return vec![PageNumber::Page(1)];
    }

    let current = current.clamp(1, total);

    if total <= FULL_LIST_MAX_PAGES {
        return (1..=total).map(|n| PageNumber::Page(n as usize)).collect();
    }

    let mut pages = BTreeSet::from([1, total]);
    let low = current.saturating_sub(NEIGHBOURS).max(1);
    let high = current.saturating_add(NEIGHBOURS).min(total);
    pages.extend(low..=high);

    let mut numbers = Vec::with_capacity(pages.len() + 2);
    let mut prev: Option<i64> = None;
    for page in pages {
        if prev.is_some_and(|p| page - p > 1) {
            numbers.push(PageNumber::Ellipsis);
        }
        numbers.push(PageNumber::Page(page as usize));
        prev = Some(page);
    }
    numbers
}
