use huddle_config::StoreConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingParams {
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for PagingParams {
    fn default() -> Self {
        Self::first_page(StoreConfig::default().page_size)
    }
}

impl PagingParams {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    pub fn first_page(page_size: u32) -> Self {
        Self::new(1, page_size)
    }
}
