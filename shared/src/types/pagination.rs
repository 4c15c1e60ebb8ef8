//! Limit/offset paging for list endpoints

use serde::{Deserialize, Serialize};

/// Page size used when the caller gives none, or zero
pub const DEFAULT_LIMIT: u32 = 15;

/// Largest page a caller may request
pub const MAX_LIMIT: u32 = 100;

/// A window into an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default)]
    pub offset: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }.normalized()
    }

    /// Zero limit means the default; anything above [`MAX_LIMIT`] is capped
    pub fn normalized(self) -> Self {
        let limit = match self.limit {
            0 => DEFAULT_LIMIT,
            n => n.min(MAX_LIMIT),
        };
        Self { limit, ..self }
    }

    pub fn offset_usize(&self) -> usize {
        self.offset as usize
    }

    pub fn limit_usize(&self) -> usize {
        self.limit as usize
    }
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_normalization() {
        assert_eq!(Page::new(0, 5), Page { limit: 15, offset: 5 });
        assert_eq!(Page::new(500, 0).limit, MAX_LIMIT);
        assert_eq!(Page::new(20, 40), Page { limit: 20, offset: 40 });
    }

    #[test]
    fn test_page_defaults_when_deserialized_empty() {
        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page, Page::default());

        let page: Page = serde_json::from_str(r#"{"offset": 30}"#).unwrap();
        assert_eq!(page, Page { limit: 15, offset: 30 });
    }
}
