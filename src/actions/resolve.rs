//! Dedup resolution: keep one member of each cluster, delete the rest.
//!
//! The core operation ([`resolve_cluster`]) is prompt-free so it can be
//! tested and scripted; [`resolve_interactively`] drives it from a
//! dialoguer selection, one cluster at a time. Nothing is deleted
//! unless a cluster is explicitly confirmed, and skipping leaves the
//! cluster untouched.

use dialoguer::{theme::ColorfulTheme, Select};
use yansi::Paint;

use crate::duplicates::Cluster;

use super::delete::{delete_file, BatchDeleteResult, DeleteConfig, DeleteError};

/// Delete every member of `cluster` except the one at `keep`.
///
/// `keep` is a zero-based index into the cluster's members. Per-file
/// failures are reported in the batch result and do not stop the
/// remaining deletions.
///
/// # Errors
///
/// Returns [`DeleteError::AllCopiesWouldBeDeleted`] if `keep` does not
/// name a member; no file is touched in that case.
pub fn resolve_cluster(
    cluster: &Cluster,
    keep: usize,
    config: &DeleteConfig,
) -> Result<BatchDeleteResult, DeleteError> {
    if keep >= cluster.len() {
        return Err(DeleteError::AllCopiesWouldBeDeleted);
    }

    let mut batch = BatchDeleteResult::default();

    for (idx, file) in cluster.files.iter().enumerate() {
        if idx == keep {
            continue;
        }

        match delete_file(file, config) {
            Ok(result) => {
                batch.bytes_freed += result.size;
                batch.successes.push(result);
            }
            Err(e) => {
                log::warn!("Failed to delete {}: {}", file.path.display(), e);
                batch.failures.push((file.path.clone(), e.to_string()));
            }
        }
    }

    log::info!(
        "Resolved cluster of {}: kept {}, {}",
        cluster.len(),
        cluster.files[keep].path.display(),
        batch.summary()
    );

    Ok(batch)
}

/// Walk all clusters, prompting the operator for each one.
///
/// Members are listed with stable 1-based labels; the default choice is
/// "Skip". Per-cluster failures (including a failed prompt, e.g. when
/// stdin closes) are reported and resolution continues with the next
/// cluster.
///
/// Returns the total number of files deleted.
pub fn resolve_interactively(clusters: &[Cluster], config: &DeleteConfig) -> usize {
    let theme = ColorfulTheme::default();
    let mut deleted = 0;

    for (n, cluster) in clusters.iter().enumerate() {
        println!(
            "\n{} {} of {} ({} files, {} reclaimable)",
            "Cluster".bold(),
            n + 1,
            clusters.len(),
            cluster.len(),
            bytesize::ByteSize(cluster.wasted_space())
        );

        // "Skip" first so it is both the default and the escape hatch.
        let mut items = vec!["Skip (keep all)".to_string()];
        items.extend(
            cluster
                .files
                .iter()
                .enumerate()
                .map(|(i, f)| format!("{}. keep {}", i + 1, f.path.display())),
        );

        let selection = Select::with_theme(&theme)
            .with_prompt("Which file should be kept?")
            .items(&items)
            .default(0)
            .interact_opt();

        let keep = match selection {
            Ok(Some(0)) | Ok(None) => {
                log::debug!("Cluster {} skipped", n + 1);
                continue;
            }
            Ok(Some(choice)) => choice - 1,
            Err(e) => {
                log::warn!("Prompt failed, skipping cluster {}: {}", n + 1, e);
                continue;
            }
        };

        match resolve_cluster(cluster, keep, config) {
            Ok(batch) => {
                deleted += batch.successes.len();
                for (path, message) in &batch.failures {
                    eprintln!("{} {}: {}", "failed".red(), path.display(), message);
                }
                println!("{}", batch.summary());
            }
            Err(e) => eprintln!("{} {}", "error:".red(), e),
        }
    }

    deleted
}

/// Resolve every cluster without prompting, keeping the first member.
///
/// Clusters are sorted with members in path order, so "first" is the
/// lexicographically smallest path. Used by `--yes`.
///
/// Returns the total number of files deleted.
pub fn resolve_keep_first(clusters: &[Cluster], config: &DeleteConfig) -> usize {
    let mut deleted = 0;

    for (n, cluster) in clusters.iter().enumerate() {
        match resolve_cluster(cluster, 0, config) {
            Ok(batch) => {
                deleted += batch.successes.len();
                for (path, message) in &batch.failures {
                    eprintln!("{} {}: {}", "failed".red(), path.display(), message);
                }
            }
            Err(e) => eprintln!("{} cluster {}: {}", "error:".red(), n + 1, e),
        }
    }

    deleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileRef;
    use std::fs;
    use std::time::SystemTime;
    use tempfile::tempdir;

    fn cluster_on_disk(dir: &std::path::Path, names: &[&str]) -> Cluster {
        let files = names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, b"same bytes").unwrap();
                FileRef::capture(path).unwrap()
            })
            .collect();
        Cluster { files }
    }

    #[test]
    fn test_resolve_keeps_selection_deletes_rest() {
        let dir = tempdir().unwrap();
        let cluster = cluster_on_disk(dir.path(), &["a", "b", "c"]);

        // Keep "b" (index 1): a and c are removed, b remains.
        let batch = resolve_cluster(&cluster, 1, &DeleteConfig::permanent()).unwrap();

        assert_eq!(batch.successes.len(), 2);
        assert!(batch.all_succeeded());
        assert!(!dir.path().join("a").exists());
        assert!(dir.path().join("b").exists());
        assert!(!dir.path().join("c").exists());
    }

    #[test]
    fn test_resolve_invalid_keep_touches_nothing() {
        let dir = tempdir().unwrap();
        let cluster = cluster_on_disk(dir.path(), &["a", "b"]);

        let err = resolve_cluster(&cluster, 2, &DeleteConfig::permanent()).unwrap_err();

        assert!(matches!(err, DeleteError::AllCopiesWouldBeDeleted));
        assert!(dir.path().join("a").exists());
        assert!(dir.path().join("b").exists());
    }

    #[test]
    fn test_resolve_reports_per_file_failures_and_continues() {
        let dir = tempdir().unwrap();
        let cluster = cluster_on_disk(dir.path(), &["a", "b", "c"]);

        // Remove "c" behind the resolver's back; resolution must report
        // the failure and still delete b.
        fs::remove_file(dir.path().join("c")).unwrap();
        let config = DeleteConfig::permanent().with_verify_snapshot(false);
        let batch = resolve_cluster(&cluster, 0, &config).unwrap();

        assert_eq!(batch.successes.len(), 1);
        assert_eq!(batch.failures.len(), 1);
        assert!(dir.path().join("a").exists());
    }

    #[test]
    fn test_resolve_snapshot_mismatch_reported_not_fatal() {
        let dir = tempdir().unwrap();
        let cluster = cluster_on_disk(dir.path(), &["a", "b"]);

        // Modify "b" after capture; verification must refuse to delete it.
        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(dir.path().join("b"), b"different length now").unwrap();
        let later = SystemTime::now() + std::time::Duration::from_secs(5);
        filetime::set_file_mtime(
            dir.path().join("b"),
            filetime::FileTime::from_system_time(later),
        )
        .unwrap();

        let batch = resolve_cluster(&cluster, 0, &DeleteConfig::permanent()).unwrap();

        assert!(batch.successes.is_empty());
        assert_eq!(batch.failures.len(), 1);
        assert!(dir.path().join("b").exists());
    }
}
