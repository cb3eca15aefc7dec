pub mod codec;

use serde::{Deserialize, Serialize};

/// How multiple keyword terms combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Every term must match
    #[default]
    All,
    /// Any term matching is enough
    Any,
}

/// Semantic file-type bucket for filtering.
///
/// `Folder` matches directory records regardless of extension; `Other`
/// matches file records whose extension falls in none of the buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Image,
    Document,
    Video,
    Audio,
    Archive,
    Code,
    Executable,
    Folder,
    Other,
}

impl Category {
    /// Accepts the lowercase bucket names used on the CLI surface.
    pub fn parse(s: &str) -> Option<Category> {
        match s {
            "image" => Some(Category::Image),
            "document" => Some(Category::Document),
            "video" => Some(Category::Video),
            "audio" => Some(Category::Audio),
            "archive" => Some(Category::Archive),
            "code" => Some(Category::Code),
            "executable" => Some(Category::Executable),
            "folder" => Some(Category::Folder),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    LastWrite,
    Size,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Whitespace-separated keyword phrase; empty means empty result
    pub keywords: String,
    pub match_mode: MatchMode,
    pub category: Option<Category>,
    /// Inclusive size bounds in bytes
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    /// Inclusive last-write bounds in unix seconds
    pub min_time: Option<u64>,
    pub max_time: Option<u64>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    /// Applied after sorting
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub path: String,
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub mtime_secs: u64,
    /// Last-write time rendered for display
    pub mtime: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    /// Matches before the limit was applied
    pub total: u64,
}

/// Outcome of an incremental reload or a forced rebuild.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReloadStats {
    pub added: u64,
    pub updated: u64,
    pub removed: u64,
    pub unchanged: u64,
    pub total: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum DaemonRequest {
    Search(SearchRequest),
    /// Incremental re-scan of the configured roots
    Reload,
    /// Forced full re-scan, replacing the catalog
    Rebuild,
    Ping,
    Status,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub roots: Vec<String>,
    pub catalog_path: String,
    pub files: u64,
    pub directories: u64,
    pub last_update: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum DaemonResponse {
    SearchResult(SearchResponse),
    ReloadResult(ReloadStats),
    Pong,
    Status(StatusReport),
    Error(String),
}
