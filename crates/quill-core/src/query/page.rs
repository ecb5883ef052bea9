use serde::{Deserialize, Serialize};

/// One page of an ordered result set, with enough metadata to navigate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    /// 1-based.
    pub page_index: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, page_index: u64, page_size: u64) -> Self {
        Self {
            items,
            total_count,
            page_index,
            page_size,
        }
    }

    /// Slice one page out of a fully ordered result set.
    ///
    /// A page index past the end yields an empty item list with correct
    /// metadata, never an error.
    pub fn paginate(mut ordered: Vec<T>, page_index: u64, page_size: u64) -> Self {
        let total_count = ordered.len() as u64;
        let start = page_index.saturating_sub(1).saturating_mul(page_size);
        let items = if start >= total_count {
            Vec::new()
        } else {
            let end = (start + page_size).min(total_count);
            ordered.drain(start as usize..end as usize).collect()
        };
        Self::new(items, total_count, page_index, page_size)
    }

    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size.max(1))
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page_index < self.total_pages()
    }

    /// Transform items while keeping pagination metadata intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 7, 1, 3);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_previous_page());
        assert!(page.has_next_page());
    }

    #[test]
    fn paginate_middle_page() {
        let page = Page::paginate((1..=10).collect(), 2, 4);
        assert_eq!(page.items, vec![5, 6, 7, 8]);
        assert_eq!(page.total_count, 10);
        assert!(page.has_previous_page());
        assert!(page.has_next_page());
    }

    #[test]
    fn page_beyond_end_is_empty_not_an_error() {
        let page = Page::paginate(vec![1, 2, 3], 5, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages(), 2);
        assert!(!page.has_next_page());
    }

    #[test]
    fn zero_page_index_does_not_underflow() {
        // Callers validate first, but the function is public.
        let page = Page::paginate(vec![1, 2, 3], 0, 2);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total_count, 3);
    }

    #[test]
    fn last_partial_page() {
        let page = Page::paginate((1..=10).collect(), 3, 4);
        assert_eq!(page.items, vec![9, 10]);
        assert!(!page.has_next_page());
    }
}
