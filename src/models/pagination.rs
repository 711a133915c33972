use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// 1-based page number, defaulting to the first page
    pub fn number(&self) -> Result<u64, ApiError> {
        match self.page.as_deref() {
            None | Some("") => Ok(1),
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| ApiError::NotFound("Invalid page.".to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Fails for a page past the last one; page 1 always exists
    pub fn new(number: u64, count: u64, results: Vec<T>) -> Result<Self, ApiError> {
        let pages = count.div_ceil(PAGE_SIZE).max(1);
        if number > pages {
            return Err(ApiError::NotFound("Invalid page.".to_string()));
        }

        Ok(Self {
            count,
            next: (number < pages).then_some(number + 1),
            previous: (number > 1).then_some(number - 1),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number() {
        assert_eq!(PageQuery::default().number().unwrap(), 1);
        let query = PageQuery {
            page: Some("3".to_string()),
        };
        assert_eq!(query.number().unwrap(), 3);
        let query = PageQuery {
            page: Some("0".to_string()),
        };
        assert!(query.number().is_err());
    }

    #[test]
    fn test_page_links() {
        let page = Page::new(2, 25, vec![0; 10]).unwrap();
        assert_eq!(page.previous, Some(1));
        assert_eq!(page.next, Some(3));

        let last = Page::new(3, 25, vec![0; 5]).unwrap();
        assert_eq!(last.next, None);

        assert!(Page::new(4, 25, Vec::<i32>::new()).is_err());
        assert!(Page::new(1, 0, Vec::<i32>::new()).is_ok());
    }
}
