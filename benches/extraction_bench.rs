use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use yt_collect::mock::MockPagedClient;
use yt_collect::{extract_batch, get_comments, Page};
use yt_core::FieldSelection;
use yt_modeling::{accuracy_score, f1_score, ConfusionMatrix};

fn video_item(i: usize) -> Value {
    json!({
        "id": format!("video{}", i),
        "snippet": {"title": format!("Video {}", i), "publishedAt": "2023-09-10T12:00:00Z"},
        "contentDetails": {"duration": "PT4M13S", "definition": "hd"},
        "statistics": {"viewCount": (i * 17).to_string(), "likeCount": i.to_string()}
    })
}

/// Benchmark flattening a full 50-item videos.list batch
fn bench_extract_batch(c: &mut Criterion) {
    let items: Vec<Value> = (0..50).map(video_item).collect();
    let selection = FieldSelection::new()
        .with_snippet(["title", "publishedAt"])
        .with_content(["duration"])
        .with_statistics(["viewCount", "likeCount", "commentCount"]);

    c.bench_function("extract_batch_50", |b| {
        b.iter(|| extract_batch(black_box(&items), black_box(&selection)))
    });
}

/// Benchmark following comment pages through the collector
fn bench_comment_pagination(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("comment_pagination");

    for pages in [1usize, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(pages), &pages, |b, &pages| {
            b.iter(|| {
                let client = MockPagedClient::new(comment_pages(pages));
                rt.block_on(async { get_comments(&client, black_box("video0")).await })
            })
        });
    }

    group.finish();
}

fn comment_pages(pages: usize) -> Vec<Page> {
    (0..pages)
        .map(|p| {
            let items = (0..100)
                .map(|i| {
                    json!({
                        "snippet": {"topLevelComment": {"snippet": {
                            "authorDisplayName": format!("user{}", i),
                            "publishedAt": "2023-09-10T12:00:00Z",
                            "textOriginal": "nice"
                        }}}
                    })
                })
                .collect();
            if p + 1 == pages {
                Page::last(items)
            } else {
                Page::with_next(items, &format!("page{}", p + 1))
            }
        })
        .collect()
}

/// Benchmark scoring a large prediction vector
fn bench_metrics(c: &mut Criterion) {
    let y_true: Vec<i64> = (0..10_000).map(|i| (i % 2) as i64).collect();
    let y_pred: Vec<i64> = (0..10_000).map(|i| ((i / 3) % 2) as i64).collect();

    c.bench_function("score_10k_predictions", |b| {
        b.iter(|| {
            let accuracy = accuracy_score(black_box(&y_true), black_box(&y_pred));
            let f1 = f1_score(&y_true, &y_pred);
            let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred);
            (accuracy, f1, cm)
        })
    });
}

criterion_group!(benches, bench_extract_batch, bench_comment_pagination, bench_metrics);
criterion_main!(benches);
