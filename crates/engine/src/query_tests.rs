use super::*;
use scout_fs::RecordKind;
use scout_protocol::SearchRequest;
use std::path::{Path, PathBuf};

fn file(path: &str, size: u64, mtime: u64) -> Record {
    let p = Path::new(path);
    let name = p.file_name().and_then(|os| os.to_str()).unwrap().to_owned();
    let ext = p
        .extension()
        .and_then(|os| os.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    Record::new(RecordKind::File, PathBuf::from(path), name, ext, size, mtime)
}

fn dir(path: &str, mtime: u64) -> Record {
    let p = Path::new(path);
    let name = p.file_name().and_then(|os| os.to_str()).unwrap().to_owned();
    Record::new(
        RecordKind::Directory,
        PathBuf::from(path),
        name,
        String::new(),
        0,
        mtime,
    )
}

fn sample_catalog() -> Catalog {
    Catalog::from_records(vec![
        file("/root/report.pdf", 2048, 200),
        file("/root/photo.png", 4096, 300),
        file("/root/notes.md", 100, 400),
        file("/root/setup.exe", 9000, 100),
        dir("/root/projects/reports", 150),
    ])
}

fn names(hits: &[&Record]) -> Vec<String> {
    hits.iter().map(|r| r.name.clone()).collect()
}

fn req(keywords: &str) -> SearchRequest {
    SearchRequest {
        keywords: keywords.to_owned(),
        ..Default::default()
    }
}

#[test]
fn empty_phrase_yields_empty_result() {
    let catalog = sample_catalog();
    assert!(run_search(&catalog, &req("")).is_empty());
    assert!(run_search(&catalog, &req("   ")).is_empty());
}

#[test]
fn and_requires_every_term_or_matches_any() {
    let catalog = Catalog::from_records(vec![file("/root/foo.txt", 1, 1)]);

    let mut request = req("foo bar");
    request.match_mode = MatchMode::All;
    assert!(run_search(&catalog, &request).is_empty());

    request.match_mode = MatchMode::Any;
    assert_eq!(names(&run_search(&catalog, &request)), vec!["foo.txt"]);
}

#[test]
fn matching_is_case_insensitive() {
    let catalog = Catalog::from_records(vec![file("/root/Report.PDF", 1, 1)]);
    assert_eq!(run_search(&catalog, &req("REPORT")).len(), 1);
}

#[test]
fn document_category_narrows_to_its_extensions() {
    let catalog = sample_catalog();

    let mut request = req("report");
    request.category = Some(Category::Document);

    let hits = run_search(&catalog, &request);
    assert_eq!(names(&hits), vec!["report.pdf"]);
}

#[test]
fn or_mode_without_category_matches_both_sample_files() {
    let catalog = Catalog::from_records(vec![
        file("/root/report.pdf", 2048, 200),
        file("/root/photo.png", 4096, 300),
    ]);

    let mut request = req("o");
    request.match_mode = MatchMode::Any;
    request.sort_key = SortKey::Name;
    request.sort_direction = SortDirection::Ascending;

    assert_eq!(
        names(&run_search(&catalog, &request)),
        vec!["photo.png", "report.pdf"]
    );
}

#[test]
fn folder_category_matches_path_segments() {
    let catalog = sample_catalog();

    let mut request = req("projects");
    request.category = Some(Category::Folder);

    // "projects" appears only in the directory's path, not its name.
    let hits = run_search(&catalog, &request);
    assert_eq!(names(&hits), vec!["reports"]);
}

#[test]
fn file_haystack_is_the_name_only() {
    let catalog = sample_catalog();

    // Every file lives under /root, but "root" is in no file name.
    let hits = run_search(&catalog, &req("root"));
    assert!(hits.is_empty());
}

#[test]
fn other_category_catches_unbucketed_extensions() {
    let catalog = sample_catalog();

    let mut request = req("notes");
    request.category = Some(Category::Other);
    assert_eq!(names(&run_search(&catalog, &request)), vec!["notes.md"]);

    // Directories never fall into Other.
    request.keywords = "reports".to_owned();
    assert!(run_search(&catalog, &request).is_empty());
}

#[test]
fn size_bounds_are_inclusive() {
    let catalog = sample_catalog();

    let mut request = req("o");
    request.match_mode = MatchMode::Any;
    request.min_size = Some(2048);
    request.max_size = Some(4096);
    request.sort_key = SortKey::Size;
    request.sort_direction = SortDirection::Ascending;

    assert_eq!(
        names(&run_search(&catalog, &request)),
        vec!["report.pdf", "photo.png"]
    );
}

#[test]
fn time_bounds_are_inclusive() {
    let catalog = sample_catalog();

    let mut request = req("o");
    request.match_mode = MatchMode::Any;
    request.min_time = Some(200);
    request.max_time = Some(300);
    request.sort_key = SortKey::LastWrite;
    request.sort_direction = SortDirection::Ascending;

    assert_eq!(
        names(&run_search(&catalog, &request)),
        vec!["report.pdf", "photo.png"]
    );
}

#[test]
fn default_sort_is_last_write_descending() {
    let catalog = sample_catalog();

    let mut request = req("e");
    request.match_mode = MatchMode::Any;

    let hits = run_search(&catalog, &request);
    let times: Vec<u64> = hits.iter().map(|r| r.mtime_secs).collect();
    let mut sorted = times.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(times, sorted);
}

#[test]
fn equal_keys_keep_catalog_order_in_both_directions() {
    let catalog = Catalog::from_records(vec![
        file("/root/a.txt", 10, 50),
        file("/root/b.txt", 10, 50),
        file("/root/c.txt", 10, 50),
    ]);

    let mut request = req("txt");
    request.sort_key = SortKey::Size;

    request.sort_direction = SortDirection::Ascending;
    assert_eq!(
        names(&run_search(&catalog, &request)),
        vec!["a.txt", "b.txt", "c.txt"]
    );

    request.sort_direction = SortDirection::Descending;
    assert_eq!(
        names(&run_search(&catalog, &request)),
        vec!["a.txt", "b.txt", "c.txt"],
        "ties must keep catalog order, not reverse"
    );
}
