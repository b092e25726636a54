//! Cursor + scroll window over a list of items.

pub struct ScrollableList<T> {
    pub items: Vec<T>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl<T> ScrollableList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            scroll_offset: 0,
        }
    }

    /// Replace the items, keeping the cursor in range.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        self.selected = (self.selected + n).min(self.items.len().saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    pub fn select_where(&mut self, pred: impl Fn(&T) -> bool) -> bool {
        match self.items.iter().position(pred) {
            Some(pos) => {
                self.selected = pos;
                true
            }
            None => false,
        }
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    /// `(index, &item)` pairs visible in `height` rows.  Call
    /// `ensure_visible` first.
    pub fn visible_items(&self, height: usize) -> Vec<(usize, &T)> {
        if height == 0 {
            return Vec::new();
        }
        self.items
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(height)
            .collect()
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    /// Click at `row` within the rendered area.  True if the cursor moved
    /// onto an item.
    pub fn handle_click(&mut self, row: usize) -> bool {
        let target = self.scroll_offset + row;
        if target < self.items.len() {
            self.selected = target;
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for ScrollableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(n: usize) -> ScrollableList<usize> {
        let mut l = ScrollableList::new();
        l.set_items((0..n).collect());
        l
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut l = list(3);
        l.select_up(5);
        assert_eq!(l.selected, 0);
        l.select_down(10);
        assert_eq!(l.selected, 2);

        let mut empty: ScrollableList<usize> = ScrollableList::new();
        empty.select_down(1);
        assert_eq!(empty.selected, 0);
        assert!(empty.selected_item().is_none());
    }

    #[test]
    fn test_shrinking_items_clamps_cursor() {
        let mut l = list(20);
        l.select_last();
        l.ensure_visible(5);
        l.set_items((0..4).collect());
        assert_eq!(l.selected, 3);
        assert!(l.scroll_offset <= l.selected);
    }

    #[test]
    fn test_scroll_window_follows_cursor() {
        let mut l = list(20);
        l.select_down(7);
        l.ensure_visible(5);
        assert_eq!(l.scroll_offset, 3);
        let rows: Vec<usize> = l.visible_items(5).into_iter().map(|(i, _)| i).collect();
        assert_eq!(rows, vec![3, 4, 5, 6, 7]);

        l.select_up(6);
        l.ensure_visible(5);
        assert_eq!(l.scroll_offset, 1);
    }

    #[test]
    fn test_click_and_select_where() {
        let mut l = list(10);
        l.scroll_offset = 4;
        assert!(l.handle_click(2));
        assert_eq!(l.selected, 6);
        assert!(!l.handle_click(9));

        assert!(l.select_where(|&x| x == 8));
        assert_eq!(l.selected_item(), Some(&8));
        assert!(!l.select_where(|&x| x == 99));
    }
}
