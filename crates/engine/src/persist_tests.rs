use super::*;
use scout_fs::RecordKind;

fn sample_catalog() -> Catalog {
    let mk = |kind, path: &str, name: &str, ext: &str, size, mtime| {
        Record::new(
            kind,
            PathBuf::from(path),
            name.to_owned(),
            ext.to_owned(),
            size,
            mtime,
        )
    };
    Catalog::from_records(vec![
        mk(RecordKind::Directory, "/root/docs", "docs", "", 0, 100),
        mk(
            RecordKind::File,
            "/root/docs/report.pdf",
            "report.pdf",
            "pdf",
            2048,
            200,
        ),
        mk(
            RecordKind::File,
            "/root/photo.png",
            "photo.png",
            "png",
            4096,
            300,
        ),
    ])
}

fn skip_dirs() -> Vec<String> {
    vec!["temp".to_owned(), "windows".to_owned()]
}

#[test]
fn round_trip_reproduces_sequence_and_meta() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("catalog.bin");

    let catalog = sample_catalog();
    let meta = SnapshotMeta::new(vec![PathBuf::from("/root")], skip_dirs(), catalog.len() as u64);

    write_snapshot_atomic(&path, &meta, &catalog).expect("write");

    match load_snapshot(&path, &skip_dirs()).expect("load io") {
        SnapshotCompatibility::Loaded {
            meta: loaded_meta,
            catalog: loaded,
        } => {
            assert_eq!(loaded_meta, meta);
            assert_eq!(loaded.records(), catalog.records());
            // Map is rebuilt from the sequence.
            assert_eq!(
                loaded.get(Path::new("/root/docs/report.pdf")).map(|r| r.size),
                Some(2048)
            );
        }
        _ => panic!("round trip should load"),
    }
}

#[test]
fn missing_file_reports_missing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("nope.bin");

    assert!(matches!(
        load_snapshot(&path, &skip_dirs()).expect("load io"),
        SnapshotCompatibility::Missing
    ));
}

#[test]
fn skip_rule_change_invalidates_the_snapshot() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("catalog.bin");

    let catalog = sample_catalog();
    let stored = vec!["windows".to_owned()];
    let meta = SnapshotMeta::new(vec![PathBuf::from("/root")], stored.clone(), catalog.len() as u64);
    write_snapshot_atomic(&path, &meta, &catalog).expect("write");

    // Policy gained "temp"; the old data may hide never-backfilled subtrees.
    let current = vec!["temp".to_owned(), "windows".to_owned()];
    match load_snapshot(&path, &current).expect("load io") {
        SnapshotCompatibility::SkipRulesMismatch { on_disk } => {
            assert_eq!(on_disk, stored);
        }
        _ => panic!("changed skip set must reject the snapshot"),
    }
}

#[test]
fn version_mismatch_is_detected_from_the_header() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("catalog.bin");

    let catalog = sample_catalog();
    let meta = SnapshotMeta::new(vec![PathBuf::from("/root")], skip_dirs(), catalog.len() as u64);
    write_snapshot_atomic(&path, &meta, &catalog).expect("write");

    // Bump the on-disk format version field.
    let mut raw = fs::read(&path).expect("read");
    raw[4..8].copy_from_slice(&(SNAPSHOT_VERSION + 1).to_le_bytes());
    fs::write(&path, &raw).expect("rewrite");

    match load_snapshot(&path, &skip_dirs()).expect("load io") {
        SnapshotCompatibility::VersionMismatch { on_disk, expected } => {
            assert_eq!(on_disk, SNAPSHOT_VERSION + 1);
            assert_eq!(expected, SNAPSHOT_VERSION);
        }
        _ => panic!("header version mismatch must be reported"),
    }
}

#[test]
fn bad_magic_truncation_and_bit_rot_are_corrupt_not_errors() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("catalog.bin");

    let catalog = sample_catalog();
    let meta = SnapshotMeta::new(vec![PathBuf::from("/root")], skip_dirs(), catalog.len() as u64);
    write_snapshot_atomic(&path, &meta, &catalog).expect("write");
    let good = fs::read(&path).expect("read");

    // Wrong magic
    let mut bad = good.clone();
    bad[0..4].copy_from_slice(b"NOPE");
    fs::write(&path, &bad).expect("write bad magic");
    assert!(matches!(
        load_snapshot(&path, &skip_dirs()).expect("load io"),
        SnapshotCompatibility::Corrupt
    ));

    // Truncated mid-body
    fs::write(&path, &good[..good.len() / 2]).expect("write truncated");
    assert!(matches!(
        load_snapshot(&path, &skip_dirs()).expect("load io"),
        SnapshotCompatibility::Corrupt
    ));

    // Shorter than the header
    fs::write(&path, &good[..6]).expect("write tiny");
    assert!(matches!(
        load_snapshot(&path, &skip_dirs()).expect("load io"),
        SnapshotCompatibility::Corrupt
    ));

    // Flipped byte in the compressed body fails the crc
    let mut rotten = good.clone();
    let last = rotten.len() - 1;
    rotten[last] ^= 0xFF;
    fs::write(&path, &rotten).expect("write rotten");
    assert!(matches!(
        load_snapshot(&path, &skip_dirs()).expect("load io"),
        SnapshotCompatibility::Corrupt
    ));
}

#[test]
fn touch_refreshes_update_time_and_count() {
    let mut meta = SnapshotMeta::new(vec![PathBuf::from("/root")], skip_dirs(), 3);
    let created = meta.created_secs;

    meta.touch(7);
    assert_eq!(meta.record_count, 7);
    assert_eq!(meta.created_secs, created);
    assert!(meta.updated_secs >= created);
}
