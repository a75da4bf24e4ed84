//! Page windows over ordered lists.
//!
//! A [`PageWindow`] knows nothing about what the items are; the same type
//! drives the date list, the session list and the conversation view.

use std::ops::Range;

/// A bounded view into an ordered list, sized to one screen.
///
/// When `count > 0`, `start_index <= selected_index < start_index + page_size`
/// and `selected_index < count` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    count: usize,
    page_size: usize,
    start_index: usize,
    selected_index: usize,
}

impl PageWindow {
    /// Window `count` items at `page_size`, with `selected_index` selected.
    ///
    /// The selection is clamped into range. The window starts on the page
    /// holding the selection, pulled back so it never runs past the end of
    /// the list. A page size of zero is treated as one.
    #[must_use]
    pub fn new(count: usize, page_size: usize, selected_index: usize) -> Self {
        let page_size = page_size.max(1);
        if count == 0 {
            return Self {
                count,
                page_size,
                start_index: 0,
                selected_index: 0,
            };
        }

        let selected_index = selected_index.min(count - 1);
        let start_index = ((selected_index / page_size) * page_size)
            .min(count.saturating_sub(page_size));

        Self {
            count,
            page_size,
            start_index,
            selected_index,
        }
    }

    /// An empty window.
    #[must_use]
    pub fn empty(page_size: usize) -> Self {
        Self::new(0, page_size, 0)
    }

    /// Number of items in the full list.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Items per page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// First visible index.
    #[must_use]
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Absolute index of the selected item.
    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Whether the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Indices currently on screen.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        self.start_index..(self.start_index + self.page_size).min(self.count)
    }

    /// 1-based page number of the window.
    #[must_use]
    pub fn current_page(&self) -> usize {
        if self.count == 0 {
            return 1;
        }
        // The last window may be pulled back; report the selection's page.
        self.selected_index / self.page_size + 1
    }

    /// Total number of pages.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.count.div_ceil(self.page_size).max(1)
    }

    /// Whether a page indicator should be shown.
    #[must_use]
    pub fn needs_indicator(&self) -> bool {
        self.count > self.page_size
    }

    /// Move the selection up one item. No wraparound.
    pub fn step_up(&mut self) {
        self.select(self.selected_index.saturating_sub(1));
    }

    /// Move the selection down one item. No wraparound.
    pub fn step_down(&mut self) {
        self.select(self.selected_index.saturating_add(1));
    }

    /// Move the selection up one page.
    pub fn page_up(&mut self) {
        self.select(self.selected_index.saturating_sub(self.page_size));
    }

    /// Move the selection down one page.
    pub fn page_down(&mut self) {
        self.select(self.selected_index.saturating_add(self.page_size));
    }

    /// Select the first item.
    pub fn home(&mut self) {
        self.select(0);
    }

    /// Select the last item.
    pub fn end(&mut self) {
        self.select(self.count.saturating_sub(1));
    }

    /// Select an absolute index, clamped, and re-window.
    pub fn select(&mut self, index: usize) {
        if self.count == 0 {
            return;
        }
        *self = Self::new(self.count, self.page_size, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(25, 10, 0, 0)]
    #[case(25, 10, 9, 0)]
    #[case(25, 10, 10, 10)]
    #[case(25, 10, 19, 10)]
    // Last page is pulled back so it stays full.
    #[case(25, 10, 24, 15)]
    #[case(25, 10, 20, 15)]
    #[case(5, 10, 4, 0)]
    #[case(30, 10, 29, 20)]
    fn test_start_index(
        #[case] count: usize,
        #[case] page_size: usize,
        #[case] selected: usize,
        #[case] expected_start: usize,
    ) {
        let window = PageWindow::new(count, page_size, selected);
        assert_eq!(window.start_index(), expected_start);
        assert_eq!(window.selected_index(), selected);
    }

    #[test]
    fn test_empty_window_is_inert() {
        let mut window = PageWindow::empty(10);
        window.step_down();
        window.page_down();
        window.end();
        window.step_up();
        assert!(window.is_empty());
        assert_eq!(window.selected_index(), 0);
        assert_eq!(window.visible_range(), 0..0);
        assert_eq!(window.total_pages(), 1);
    }

    #[test]
    fn test_step_bounds_are_noops() {
        let mut window = PageWindow::new(3, 10, 0);
        window.step_up();
        assert_eq!(window.selected_index(), 0);

        window.end();
        window.step_down();
        assert_eq!(window.selected_index(), 2);
    }

    #[test]
    fn test_page_moves_clamp() {
        let mut window = PageWindow::new(25, 10, 3);
        window.page_down();
        assert_eq!(window.selected_index(), 13);
        window.page_down();
        assert_eq!(window.selected_index(), 23);
        window.page_down();
        assert_eq!(window.selected_index(), 24);
        window.page_up();
        assert_eq!(window.selected_index(), 14);
        window.page_up();
        window.page_up();
        assert_eq!(window.selected_index(), 0);
    }

    #[test]
    fn test_single_steps_cross_page_boundary() {
        let mut window = PageWindow::new(25, 10, 9);
        window.step_down();
        assert_eq!(window.selected_index(), 10);
        assert_eq!(window.start_index(), 10);
        window.step_up();
        assert_eq!(window.start_index(), 0);
    }

    #[test]
    fn test_selection_is_clamped() {
        let window = PageWindow::new(4, 10, 99);
        assert_eq!(window.selected_index(), 3);
    }

    #[test]
    fn test_zero_page_size() {
        let window = PageWindow::new(3, 0, 2);
        assert_eq!(window.page_size(), 1);
        assert_eq!(window.visible_range(), 2..3);
    }

    #[test]
    fn test_page_indicator() {
        let window = PageWindow::new(25, 10, 24);
        assert!(window.needs_indicator());
        assert_eq!(window.current_page(), 3);
        assert_eq!(window.total_pages(), 3);
        assert!(!PageWindow::new(10, 10, 0).needs_indicator());
    }
}
