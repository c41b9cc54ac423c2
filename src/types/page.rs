use serde::{Deserialize, Serialize};

use super::Character;

/// Pagination envelope returned with every page.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub pages: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// A decoded response body: `{ info, results }`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub info: PageInfo,
    #[serde(default)]
    pub results: Vec<Character>,
}
