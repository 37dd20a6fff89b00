//! Fixed-size pagination over an ordered slice.
//!
//! Page numbers are 1-based and always clamped into `1..=total_pages`;
//! `total_pages` is at least 1 so an empty list still has a (blank) first
//! page. Range indices are 1-based for display, and `0..0` for an empty list.

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub number: usize,
    pub total_pages: usize,
    pub range_start: usize,
    pub range_end: usize,
    pub total_items: usize,
}

/// Page metadata without the borrowed slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub number: usize,
    pub total_pages: usize,
    pub range_start: usize,
    pub range_end: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    /// True when there is nothing to show; views render a "no records" state.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            number: self.number,
            total_pages: self.total_pages,
            range_start: self.range_start,
            range_end: self.range_end,
            total_items: self.total_items,
        }
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

pub fn page<T>(items: &[T], page_number: usize, page_size: usize) -> Page<'_, T> {
    let size = page_size.max(1);
    let total_pages = total_pages(items.len(), size);
    let number = page_number.clamp(1, total_pages);

    let start = ((number - 1) * size).min(items.len());
    let end = (number * size).min(items.len());
    let slice = &items[start..end];

    let (range_start, range_end) = if slice.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    Page {
        items: slice,
        number,
        total_pages,
        range_start,
        range_end,
        total_items: items.len(),
    }
}

/// Current page of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    number: usize,
    size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    pub fn new(size: usize) -> Self {
        Self {
            number: 1,
            size: size.max(1),
        }
    }

    pub fn at(mut self, number: usize) -> Self {
        self.number = number.max(1);
        self
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Any filter change starts over from the first page.
    pub fn reset(&mut self) {
        self.number = 1;
    }

    pub fn next(&mut self, total_items: usize) {
        self.number = (self.number + 1).min(total_pages(total_items, self.size));
    }

    pub fn prev(&mut self) {
        self.number = self.number.saturating_sub(1).max(1);
    }

    /// Pulls the page number back into range after the list shrank.
    pub fn clamp(&mut self, total_items: usize) {
        self.number = self.number.clamp(1, total_pages(total_items, self.size));
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        page(items, self.number, self.size)
    }
}
