use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dupecheck::duplicates::{cluster_matches, compare_exact, group_by_size, similarity, Pair};
use dupecheck::scanner::{FileRef, Walker, WalkerConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tempfile::TempDir;

// Helper to create a test directory with a specific structure
fn setup_test_dir(depth: usize, files_per_dir: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    create_dir_recursive(temp_dir.path().to_path_buf(), depth, files_per_dir);
    temp_dir
}

fn create_dir_recursive(path: PathBuf, depth: usize, files_per_dir: usize) {
    if depth == 0 {
        return;
    }

    if !path.exists() {
        fs::create_dir_all(&path).expect("Failed to create dir");
    }

    for i in 0..files_per_dir {
        let file_path = path.join(format!("file_{}.txt", i));
        fs::write(file_path, "some content to make it a real file").expect("Failed to write file");
    }

    if depth > 1 {
        for i in 0..2 {
            // 2 subdirectories per level
            let sub_dir = path.join(format!("dir_{}", i));
            create_dir_recursive(sub_dir, depth - 1, files_per_dir);
        }
    }
}

fn synthetic_files(count: usize, distinct_sizes: u64) -> Vec<FileRef> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| {
            FileRef::new(
                PathBuf::from(format!("/fake/path/{}", i)),
                rng.gen_range(0..distinct_sizes),
                SystemTime::now(),
            )
        })
        .collect()
}

// 1. Directory Walking Benchmarks
fn bench_walker(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 10); // depth 4, 10 files per dir -> roughly 150 files
    let config = WalkerConfig {
        recursive: true,
        ..Default::default()
    };

    c.bench_function("walker_150_files", |b| {
        b.iter(|| {
            let walker = Walker::new(temp_dir.path(), config.clone());
            let files: Vec<_> = walker.walk().collect();
            black_box(files);
        })
    });
}

// 2. Size Prefilter Benchmarks
fn bench_prefilter(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefilter");

    for count in [1_000, 10_000] {
        let files = synthetic_files(count, count as u64 / 4);
        group.bench_function(format!("group_by_size_{}", count), |b| {
            b.iter(|| {
                let (groups, stats) = group_by_size(&files);
                black_box((groups, stats));
            });
        });
    }
    group.finish();
}

// 3. Pairwise Comparison Benchmarks
fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");

    for size_kb in [1, 1024] {
        let data = vec![b'a'; size_kb * 1024];
        let temp_dir = TempDir::new().unwrap();
        let path_a = temp_dir.path().join("a.dat");
        let path_b = temp_dir.path().join("b.dat");
        fs::write(&path_a, &data).expect("Failed to write bench file");
        fs::write(&path_b, &data).expect("Failed to write bench file");

        let file_a = FileRef::capture(path_a).unwrap();
        let file_b = FileRef::capture(path_b).unwrap();

        group.bench_function(format!("exact_match_{}KB", size_kb), |b| {
            b.iter(|| {
                let matched = compare_exact(&file_a, &file_b).unwrap();
                black_box(matched);
            });
        });

        group.bench_function(format!("similarity_{}KB", size_kb), |b| {
            b.iter(|| {
                let ratio = similarity(&file_a, &file_b).unwrap();
                black_box(ratio);
            });
        });

        // Keep the TempDir alive through the iterations above.
        black_box(temp_dir);
    }
    group.finish();
}

// 4. Clustering Benchmarks
fn bench_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");

    for count in [1_000, 10_000] {
        let files = synthetic_files(count, u64::MAX);
        // Chain every 10 files into one component
        let edges: Vec<Pair> = (0..count - 1)
            .filter(|i| i % 10 != 9)
            .map(|i| Pair::new(i, i + 1))
            .collect();

        group.bench_function(format!("cluster_matches_{}", count), |b| {
            b.iter(|| {
                let clusters = cluster_matches(&files, &edges);
                black_box(clusters);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_walker,
    bench_prefilter,
    bench_compare,
    bench_clustering
);
criterion_main!(benches);
