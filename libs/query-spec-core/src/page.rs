use serde::{Deserialize, Serialize};

use crate::PageBounds;

#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page_number: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageInfo {
    /// Derive page info from the total match count and the applied bounds.
    /// Without bounds the whole result is one page.
    pub fn from_bounds(total_count: u64, bounds: Option<&PageBounds>) -> Self {
        match bounds {
            Some(b) => {
                let total_pages = total_count.div_ceil(b.page_size.max(1));
                Self {
                    page_number: b.page_number,
                    page_size: b.page_size,
                    total_count,
                    total_pages,
                    has_previous: b.page_number > 1,
                    has_next: b.page_number < total_pages,
                }
            }
            None => Self {
                page_number: 1,
                page_size: total_count,
                total_count,
                total_pages: u64::from(total_count > 0),
                has_previous: false,
                has_next: false,
            },
        }
    }
}

#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Create a new page with items and page info
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    /// Create an empty page for the given bounds
    pub fn empty(bounds: Option<&PageBounds>) -> Self {
        Self {
            items: Vec::new(),
            page_info: PageInfo::from_bounds(0, bounds),
        }
    }

    /// Map items while preserving page_info (entity -> result shape projection)
    pub fn map_items<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(&mut f).collect(),
            page_info: self.page_info,
        }
    }
}
