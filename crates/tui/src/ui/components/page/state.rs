use std::collections::VecDeque;

use navmenu_types::TargetId;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

/// How many activations the pane remembers.
pub const HISTORY_LIMIT: usize = 8;

#[derive(Debug)]
pub struct PageState {
    pub focus: FocusFlag,
    pub last_area: Rect,
    current: Option<String>,
    /// Most recent first.
    history: VecDeque<String>,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

impl PageState {
    pub fn new() -> Self {
        Self {
            focus: FocusFlag::named("page"),
            last_area: Rect::default(),
            current: None,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn navigate(&mut self, target: &TargetId, href: &str) {
        self.current = Some(href.to_string());
        self.record(format!("{target} → {href}"));
    }

    pub fn record(&mut self, line: String) {
        self.history.push_front(line);
        self.history.truncate(HISTORY_LIMIT);
    }
}

impl HasFocus for PageState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_updates_current_page_and_history() {
        let mut page = PageState::new();
        page.navigate(&TargetId::from("profile"), "/page/profile");
        page.navigate(&TargetId::from("add-teacher"), "/page/create/teacher");
        assert_eq!(page.current(), Some("/page/create/teacher"));
        let history: Vec<_> = page.history().collect();
        assert_eq!(history, vec!["add-teacher → /page/create/teacher", "profile → /page/profile"]);
    }

    #[test]
    fn history_is_bounded() {
        let mut page = PageState::new();
        for index in 0..(HISTORY_LIMIT + 3) {
            page.record(format!("entry {index}"));
        }
        assert_eq!(page.history().count(), HISTORY_LIMIT);
        assert_eq!(page.history().next(), Some("entry 10"));
    }
}
