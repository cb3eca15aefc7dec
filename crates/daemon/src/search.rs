use scout_engine::{Catalog, run_search};
use scout_protocol::{SearchHit, SearchRequest, SearchResponse};

/// Run one search against a catalog snapshot and project the matches
/// into wire hits. The limit is applied after sorting so `total`
/// reports the pre-limit match count.
pub fn execute_search(catalog: &Catalog, req: &SearchRequest) -> SearchResponse {
    let matches = run_search(catalog, req);
    let total = matches.len() as u64;

    let limit = req.limit.unwrap_or(usize::MAX);
    let hits: Vec<SearchHit> = matches
        .into_iter()
        .take(limit)
        .map(|record| SearchHit {
            path: record.full_path.to_string_lossy().into_owned(),
            name: record.name.clone(),
            is_dir: record.is_dir(),
            size: record.size,
            mtime_secs: record.mtime_secs,
            mtime: record.mtime_display(),
        })
        .collect();

    SearchResponse { hits, total }
}
