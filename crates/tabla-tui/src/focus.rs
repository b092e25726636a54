//! FocusRing: manages keyboard focus cycling between components.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.items.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new(vec![ComponentId::ChannelList, ComponentId::SchedulePanel])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_both_ways() {
        let mut ring = FocusRing::default();
        assert!(ring.is_focused(ComponentId::ChannelList));
        assert_eq!(ring.next(), Some(ComponentId::SchedulePanel));
        assert_eq!(ring.next(), Some(ComponentId::ChannelList));
        assert_eq!(ring.prev(), Some(ComponentId::SchedulePanel));
    }

    #[test]
    fn test_set_and_empty() {
        let mut ring = FocusRing::default();
        ring.set(ComponentId::SchedulePanel);
        assert!(ring.is_focused(ComponentId::SchedulePanel));

        let mut empty = FocusRing::new(Vec::new());
        assert_eq!(empty.next(), None);
        assert_eq!(empty.current(), None);
    }
}
