//! Search bar input state

/// Text shown while the query is empty
pub const SEARCH_HINT: &str = "Search the feed...";

/// Query text plus focus of the search bar.
///
/// The bar never searches on its own; it only decides whether a submit
/// should reach the caller's search action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchBar {
    query: String,
    focused: bool,
}

impl SearchBar {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn insert(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn backspace(&mut self) {
        self.query.pop();
    }

    /// The clear button: empties the query, keeps focus
    pub fn clear(&mut self) {
        self.query.clear();
    }

    /// Keyboard search action. Ignored while a search runs.
    pub fn on_search_action(&self, search_in_progress: bool) -> Option<String> {
        if search_in_progress {
            return None;
        }
        Some(self.query.clone())
    }

    /// The submit button always hands the query to the search action
    pub fn on_submit_button(&self) -> String {
        self.query.clone()
    }

    /// Whether the bar should grab focus when first shown
    pub fn should_autofocus(has_results: bool, search_in_progress: bool) -> bool {
        !has_results && !search_in_progress
    }
}
