use serde_derive::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct PaginatedResult<T> {
    pub data: T,
    pub pagination: Option<Pagination>,
}

impl<T> PaginatedResult<T> {
    pub fn new(data: T, pagination: Option<Pagination>) -> Self {
        Self { data, pagination }
    }
}
