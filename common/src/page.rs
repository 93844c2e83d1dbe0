use serde::{Deserialize, Serialize};

/// Paging envelope returned by the collection endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Drop every entry matching `pred` and return how many went.
    /// `total_elements` is reduced by the same amount so it tracks the local view.
    pub fn remove_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.content.len();
        self.content.retain(|item| !pred(item));
        let removed = before - self.content.len();
        self.total_elements = self.total_elements.saturating_sub(removed as u64);
        removed
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
