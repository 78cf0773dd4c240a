//! End-to-end scans against real directory trees.

use std::fs;
use std::path::Path;

use dupecheck::duplicates::{DupeFinder, FinderConfig, FinderError};
use dupecheck::scanner::WalkerConfig;
use tempfile::TempDir;

fn finder_for(config: WalkerConfig) -> DupeFinder {
    DupeFinder::new(FinderConfig::default().with_walker_config(config))
}

fn write(dir: &Path, name: &str, content: &[u8]) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_identical_pair_forms_one_cluster() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"same content");
    write(dir.path(), "b.txt", b"same content");
    write(dir.path(), "c.txt", b"something else entirely");

    let finder = finder_for(WalkerConfig::default());
    let (clusters, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].len(), 2);
    let paths = clusters[0].paths();
    assert!(paths.contains(&dir.path().join("a.txt")));
    assert!(paths.contains(&dir.path().join("b.txt")));

    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.clusters, 1);
    assert_eq!(summary.reclaimable_space, "same content".len() as u64);
    assert!(!summary.has_errors());
}

#[test]
fn test_three_identical_files_form_single_cluster() {
    let dir = TempDir::new().unwrap();
    for name in ["x1.bin", "x2.bin", "x3.bin"] {
        write(dir.path(), name, &[7u8; 4096]);
    }

    let finder = finder_for(WalkerConfig::default());
    let (clusters, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].len(), 3);
    // Two redundant copies of 4096 bytes each.
    assert_eq!(summary.reclaimable_space, 2 * 4096);
}

#[test]
fn test_same_size_different_content_is_not_a_match() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.bin", &[0u8; 1024]);
    write(dir.path(), "b.bin", &[1u8; 1024]);

    let finder = finder_for(WalkerConfig::default());
    let (clusters, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(clusters.is_empty());
    assert_eq!(summary.candidate_pairs, 1);
    assert_eq!(summary.matching_pairs, 0);
}

#[test]
fn test_unique_sizes_skip_comparison_entirely() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"1");
    write(dir.path(), "b.txt", b"22");
    write(dir.path(), "c.txt", b"333");

    let finder = finder_for(WalkerConfig::default());
    let (clusters, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(clusters.is_empty());
    assert_eq!(summary.eliminated_by_size, 3);
    assert_eq!(summary.candidate_pairs, 0);
    assert_eq!(summary.compared_pairs, 0);
}

#[test]
fn test_empty_directory_finds_nothing() {
    let dir = TempDir::new().unwrap();

    let finder = finder_for(WalkerConfig::default());
    let (clusters, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(clusters.is_empty());
    assert_eq!(summary.total_files, 0);
}

#[test]
fn test_empty_files_are_exact_duplicates() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "empty1", b"");
    write(dir.path(), "empty2", b"");

    let finder = finder_for(WalkerConfig::default());
    let (clusters, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].len(), 2);
}

#[test]
fn test_flat_scan_ignores_subdirectories() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "top.txt", b"payload");
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write(&sub, "nested.txt", b"payload");

    let finder = finder_for(WalkerConfig::default());
    let (clusters, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert!(clusters.is_empty());
    assert_eq!(summary.total_files, 1);

    let finder = finder_for(WalkerConfig {
        recursive: true,
        ..Default::default()
    });
    let (clusters, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_size_filters_exclude_files_before_comparison() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "small_a", &[9u8; 10]);
    write(dir.path(), "small_b", &[9u8; 10]);
    write(dir.path(), "big_a", &[8u8; 5000]);
    write(dir.path(), "big_b", &[8u8; 5000]);

    let finder = finder_for(WalkerConfig {
        min_size: Some(100),
        ..Default::default()
    });
    let (clusters, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].files[0].size, 5000);
}

#[test]
fn test_ignore_patterns_exclude_matching_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "keep_a.txt", b"dup");
    write(dir.path(), "keep_b.txt", b"dup");
    write(dir.path(), "skip_a.tmp", b"dup");
    write(dir.path(), "skip_b.tmp", b"dup");

    let finder = finder_for(WalkerConfig {
        ignore_patterns: vec!["*.tmp".to_string()],
        ..Default::default()
    });
    let (clusters, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(clusters.len(), 1);
    for path in clusters[0].paths() {
        assert_eq!(path.extension().unwrap(), "txt");
    }
}

#[test]
fn test_missing_path_is_fatal() {
    let finder = finder_for(WalkerConfig::default());
    let result = finder.find_duplicates(Path::new("/nonexistent/dupecheck/test/path"));
    assert!(matches!(result, Err(FinderError::PathNotFound(_))));
}

#[test]
fn test_file_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, b"x").unwrap();

    let finder = finder_for(WalkerConfig::default());
    let result = finder.find_duplicates(&file);
    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}

#[test]
fn test_cluster_output_is_deterministic() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "z.txt", b"first group");
    write(dir.path(), "y.txt", b"first group");
    write(dir.path(), "b.txt", b"second group!");
    write(dir.path(), "a.txt", b"second group!");

    let finder = finder_for(WalkerConfig::default());
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    let paths = |clusters: &[dupecheck::duplicates::Cluster]| -> Vec<Vec<std::path::PathBuf>> {
        clusters.iter().map(|c| c.paths()).collect()
    };
    assert_eq!(paths(&first), paths(&second));

    // Members sorted by path, clusters sorted by first member.
    assert_eq!(first[0].files[0].path, dir.path().join("a.txt"));
    assert_eq!(first[1].files[0].path, dir.path().join("y.txt"));
}

#[test]
fn test_similarity_ranks_identical_first() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"abcdefgh");
    write(dir.path(), "b.txt", b"abcdefgh");
    write(dir.path(), "c.txt", b"abcdwxyz");

    let finder = finder_for(WalkerConfig::default());
    let (pairs, summary) = finder.rank_similar(dir.path(), 0.5).unwrap();

    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.candidate_pairs, 3);
    assert!(!pairs.is_empty());
    assert!((pairs[0].ratio - 1.0).abs() < f64::EPSILON);
    assert!((pairs[0].percent() - 100.0).abs() < f64::EPSILON);
    // Descending order throughout.
    for window in pairs.windows(2) {
        assert!(window[0].ratio >= window[1].ratio);
    }
}

#[test]
fn test_similarity_threshold_filters_pairs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", &[b'a'; 100]);
    write(dir.path(), "b.txt", &[b'b'; 100]);

    let finder = finder_for(WalkerConfig::default());

    // Disjoint byte histograms score 0; at threshold 0 the pair shows up.
    let (pairs, _) = finder.rank_similar(dir.path(), 0.0).unwrap();
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].ratio.abs() < f64::EPSILON);

    let (pairs, _) = finder.rank_similar(dir.path(), 0.5).unwrap();
    assert!(pairs.is_empty());
}

#[test]
fn test_similarity_compares_across_different_sizes() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "short.txt", b"aaaa");
    write(dir.path(), "long.txt", b"aaaaaaaa");

    let finder = finder_for(WalkerConfig::default());
    let (pairs, _) = finder.rank_similar(dir.path(), 0.5).unwrap();

    // 2 * min-overlap(4) / total(12)
    assert_eq!(pairs.len(), 1);
    assert!((pairs[0].ratio - 2.0 / 3.0).abs() < 1e-9);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_counted_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.bin", &[5u8; 256]);
    write(dir.path(), "b.bin", &[5u8; 256]);
    let locked = dir.path().join("locked.bin");
    fs::write(&locked, [5u8; 256]).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::File::open(&locked).is_ok() {
        // Running as root; permissions cannot make the file unreadable.
        return;
    }

    let finder = finder_for(WalkerConfig::default());
    let (clusters, summary) = finder.find_duplicates(dir.path()).unwrap();

    // a and b still pair up; pairs involving the unreadable file fail.
    assert_eq!(clusters.len(), 1);
    assert!(!summary.compare_errors.is_empty());
    assert!(summary.has_errors());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_strict_mode_escalates_compare_errors() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let locked = dir.path().join("locked.bin");
    fs::write(&locked, [5u8; 256]).unwrap();
    write(dir.path(), "other.bin", &[5u8; 256]);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::File::open(&locked).is_ok() {
        // Running as root; permissions cannot make the file unreadable.
        return;
    }

    let finder = DupeFinder::new(FinderConfig::default().with_strict(true));
    let result = finder.find_duplicates(dir.path());
    assert!(matches!(result, Err(FinderError::Compare(_))));

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}
