use std::time::Instant;

use crate::model::VessloApp;
use crate::search::search;
use crate::updates::{sections, SortOption};

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

fn synthetic_apps(count: usize) -> Vec<VessloApp> {
    (0..count)
        .map(|i| VessloApp {
            id: i.to_string(),
            name: format!("Application {i:04}"),
            bundle_id: Some(format!("com.example.app{i}")),
            version: Some("1.0".to_string()),
            target_version: (i % 3 == 0).then(|| "1.1".to_string()),
            developer: Some(format!("Developer {}", i % 40)),
            path: format!("/Applications/Application {i:04}.app"),
            icon: None,
            tags: vec![format!("group-{}", i % 12), "daily".to_string()],
            memo: (i % 5 == 0).then(|| format!("note number {i}")),
            sources: match i % 4 {
                0 => vec!["Brew".to_string()],
                1 => vec!["Sparkle".to_string()],
                2 => vec!["App Store".to_string()],
                _ => Vec::new(),
            },
            app_store_id: None,
            homebrew_cask: (i % 4 == 0).then(|| format!("app-{i}")),
        })
        .collect()
}

#[test]
fn warm_query_p95_under_20ms() {
    let apps = synthetic_apps(500);

    for _ in 0..30 {
        let _ = search(&apps, "note");
        let _ = sections(&apps, SortOption::Name);
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(80);
        for _ in 0..80 {
            let start = Instant::now();
            let _ = search(&apps, "developer 1");
            let _ = sections(&apps, SortOption::Developer);
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 20.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 20.0ms); batches={batch_p95:?}",
    );
}
