use serde::{Deserialize, Serialize};
use crate::movie::Movie;

/// One page of a paginated list or search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}

impl MoviePage {
    /// Whether the server reports pages after `page`.
    pub fn has_more_after(&self, page: u32) -> bool {
        self.total_pages > page
    }
}
