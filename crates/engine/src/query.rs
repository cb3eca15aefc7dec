use std::cmp::Ordering;

use scout_fs::Record;
use scout_protocol::{Category, MatchMode, SearchRequest, SortDirection, SortKey};

use crate::catalog::Catalog;

const IMAGE_EXTS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "ico", "svg",
];
const DOCUMENT_EXTS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "rtf", "odt", "ods", "odp",
];
const VIDEO_EXTS: &[&str] = &[
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "3gp",
];
const AUDIO_EXTS: &[&str] = &["mp3", "wav", "flac", "aac", "ogg", "wma", "m4a"];
const ARCHIVE_EXTS: &[&str] = &["zip", "rar", "7z", "tar", "gz", "bz2"];
const CODE_EXTS: &[&str] = &[
    "py", "js", "html", "css", "cpp", "c", "java", "cs", "php", "vb", "xml", "json", "yaml", "yml",
];
const EXECUTABLE_EXTS: &[&str] = &["exe", "msi", "bat", "cmd", "ps1"];

fn bucket_exts(category: Category) -> &'static [&'static str] {
    match category {
        Category::Image => IMAGE_EXTS,
        Category::Document => DOCUMENT_EXTS,
        Category::Video => VIDEO_EXTS,
        Category::Audio => AUDIO_EXTS,
        Category::Archive => ARCHIVE_EXTS,
        Category::Code => CODE_EXTS,
        Category::Executable => EXECUTABLE_EXTS,
        // Folder and Other have no extension table
        Category::Folder | Category::Other => &[],
    }
}

fn in_any_bucket(ext: &str) -> bool {
    if ext.is_empty() {
        return false;
    }
    [
        IMAGE_EXTS,
        DOCUMENT_EXTS,
        VIDEO_EXTS,
        AUDIO_EXTS,
        ARCHIVE_EXTS,
        CODE_EXTS,
        EXECUTABLE_EXTS,
    ]
    .iter()
    .any(|exts| exts.contains(&ext))
}

fn category_matches(category: Category, record: &Record) -> bool {
    match category {
        Category::Folder => record.is_dir(),
        Category::Other => !record.is_dir() && !in_any_bucket(&record.ext),
        bucketed => !record.is_dir() && bucket_exts(bucketed).contains(&record.ext.as_str()),
    }
}

fn sort_cmp(a: &Record, b: &Record, key: SortKey) -> Ordering {
    match key {
        SortKey::LastWrite => a.mtime_secs.cmp(&b.mtime_secs),
        SortKey::Size => a.size.cmp(&b.size),
        SortKey::Name => a.name_lower.cmp(&b.name_lower),
    }
}

/// Run one search as a single linear pass over the catalog, then a
/// stable sort of the matches.
///
/// Per-record filter order: category, keyword predicate, size bounds,
/// time bounds. The keyword haystack is the lowercased name; for the
/// `folder` category it additionally includes the lowercased full
/// path, so path-segment terms match.
///
/// An empty keyword phrase yields an empty result without scanning.
/// Returns the full sorted match list; the caller applies any limit so
/// it can still report the pre-limit total.
pub fn run_search<'a>(catalog: &'a Catalog, req: &SearchRequest) -> Vec<&'a Record> {
    let terms: Vec<String> = req
        .keywords
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if terms.is_empty() {
        return Vec::new();
    }

    let path_in_haystack = req.category == Some(Category::Folder);
    let mut hits: Vec<&Record> = Vec::new();

    for record in catalog.records() {
        if let Some(category) = req.category {
            if !category_matches(category, record) {
                continue;
            }
        }

        let path_lower = path_in_haystack
            .then(|| record.full_path.to_string_lossy().to_lowercase());
        let term_hit = |term: &String| {
            record.name_lower.contains(term.as_str())
                || path_lower
                    .as_deref()
                    .is_some_and(|p| p.contains(term.as_str()))
        };
        let matched = match req.match_mode {
            MatchMode::All => terms.iter().all(term_hit),
            MatchMode::Any => terms.iter().any(term_hit),
        };
        if !matched {
            continue;
        }

        if req.min_size.is_some_and(|min| record.size < min)
            || req.max_size.is_some_and(|max| record.size > max)
        {
            continue;
        }

        if req.min_time.is_some_and(|min| record.mtime_secs < min)
            || req.max_time.is_some_and(|max| record.mtime_secs > max)
        {
            continue;
        }

        hits.push(record);
    }

    // Reversed comparator rather than sort-then-reverse, so equal keys
    // keep catalog order in both directions.
    hits.sort_by(|a, b| match req.sort_direction {
        SortDirection::Ascending => sort_cmp(a, b, req.sort_key),
        SortDirection::Descending => sort_cmp(b, a, req.sort_key),
    });

    hits
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
