//! Page-number pagination over an ordered list.

use serde::{Serialize, Serializer};

/// Posts shown on one page of any listing.
pub const POSTS_PER_PAGE: usize = 10;

/// Splits an ordered list into fixed-size pages.
///
/// Page numbers are 1-based. A missing or malformed number selects the
/// first page, numbers below 1 are clamped to 1 and numbers past the end
/// select the last page. An empty list still has one (empty) page.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    per_page: usize,
}

impl<T> Paginator<T> {
    pub fn new(items: Vec<T>, per_page: usize) -> Self {
        Self {
            items,
            per_page: per_page.max(1),
        }
    }

    /// Total number of items across all pages.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn num_pages(&self) -> usize {
        self.items.len().div_ceil(self.per_page).max(1)
    }

    /// Resolve a raw `page` query value to a page number in range.
    pub fn validate_number(&self, raw: Option<&str>) -> usize {
        let requested = raw
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(1);
        let last = self.num_pages() as i64;
        requested.clamp(1, last) as usize
    }

    /// The page for a raw `page` query value, consuming the paginator.
    pub fn get_page(self, raw: Option<&str>) -> Page<T> {
        let number = self.validate_number(raw);
        self.page(number)
    }

    /// The page with the given number, which must already be in range.
    fn page(self, number: usize) -> Page<T> {
        let count = self.items.len();
        let num_pages = self.num_pages();
        let start = (number - 1) * self.per_page;
        let end = (start + self.per_page).min(count);

        let object_list: Vec<T> = self
            .items
            .into_iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect();

        Page {
            object_list,
            number,
            num_pages,
            count,
            per_page: self.per_page,
        }
    }
}

/// One page of results plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    /// Total number of items across all pages.
    pub count: usize,
    per_page: usize,
}

impl<T> Page<T> {
    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_next() || self.has_previous()
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }

    /// 1-based index of the first item on this page, 0 when there are none.
    pub fn start_index(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            (self.number - 1) * self.per_page + 1
        }
    }

    /// 1-based index of the last item on this page.
    pub fn end_index(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            self.start_index() + self.len() - 1
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.object_list.iter()
    }

    /// Same page metadata over different items, e.g. enriched views of these ones.
    pub fn with_items<U>(&self, items: Vec<U>) -> Page<U> {
        debug_assert_eq!(items.len(), self.object_list.len());
        Page {
            object_list: items,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }

    /// Navigation summary for renderers.
    pub fn nav(&self) -> PageNav {
        PageNav {
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_next: self.has_next(),
            has_previous: self.has_previous(),
            next_page_number: self.next_page_number(),
            previous_page_number: self.previous_page_number(),
            start_index: self.start_index(),
            end_index: self.end_index(),
        }
    }
}

/// Serializable navigation metadata of a [`Page`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNav {
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<usize>,
    pub previous_page_number: Option<usize>,
    pub start_index: usize,
    pub end_index: usize,
}

impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a, T> {
            object_list: &'a [T],
            #[serde(flatten)]
            nav: PageNav,
        }

        Repr {
            object_list: &self.object_list,
            nav: self.nav(),
        }
        .serialize(serializer)
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator(n: usize) -> Paginator<usize> {
        Paginator::new((1..=n).collect(), POSTS_PER_PAGE)
    }

    #[test]
    fn test_thirteen_items_split_ten_and_three() {
        let first = paginator(13).get_page(None);
        assert_eq!(first.len(), 10);
        assert_eq!(first.num_pages, 2);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let second = paginator(13).get_page(Some("2"));
        assert_eq!(second.len(), 3);
        assert_eq!(second.object_list, vec![11, 12, 13]);
        assert!(!second.has_next());
        assert_eq!(second.previous_page_number(), Some(1));
        assert_eq!((second.start_index(), second.end_index()), (11, 13));
    }

    #[test]
    fn test_out_of_range_selects_last_page() {
        let page = paginator(13).get_page(Some("99"));
        assert_eq!(page.number, 2);
        assert_eq!(page.len(), 3);
    }

    #[test]
    fn test_below_one_and_malformed_select_first_page() {
        for raw in ["0", "-4", "abc", ""] {
            let page = paginator(13).get_page(Some(raw));
            assert_eq!(page.number, 1, "raw page {raw:?}");
            assert_eq!(page.len(), 10);
        }
    }

    #[test]
    fn test_empty_list_has_one_empty_page() {
        let page = paginator(0).get_page(Some("3"));
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.is_empty());
        assert!(!page.has_other_pages());
        assert_eq!((page.start_index(), page.end_index()), (0, 0));
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let p = paginator(20);
        assert_eq!(p.num_pages(), 2);
        assert_eq!(p.get_page(Some("2")).len(), 10);
    }

    #[test]
    fn test_with_items_keeps_metadata() {
        let page = paginator(13).get_page(Some("2"));
        let labels = page.with_items(page.iter().map(|n| format!("#{n}")).collect());
        assert_eq!(labels.object_list, vec!["#11", "#12", "#13"]);
        assert_eq!(labels.nav(), page.nav());
    }

    #[test]
    fn test_serializes_items_with_navigation() {
        let page = paginator(13).get_page(Some("2"));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["object_list"], serde_json::json!([11, 12, 13]));
        assert_eq!(json["number"], 2);
        assert_eq!(json["has_previous"], true);
        assert_eq!(json["has_next"], false);
        assert_eq!(json["next_page_number"], serde_json::Value::Null);
    }
}
