// Parallel group scoring — shared model, blocking workers, ordered output.
//
// Groups are independent once the model is loaded: the analyzer is shared
// read-only behind an Arc and each group is scored on a blocking thread
// (the work is pure CPU). The stream is `buffered`, not `buffer_unordered`,
// because result order must match input group order — callers append rows
// group by group into one output table.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::analyzer::GroupAnalyzer;
use crate::group::GroupData;
use crate::scoring::pairwise::PairScoreRow;

/// One group's scored rows, tagged with the group id.
#[derive(Debug, Clone)]
pub struct GroupResult {
    pub group_id: String,
    pub rows: Vec<PairScoreRow>,
}

/// Score all groups against a shared analyzer, `concurrency` groups at a
/// time. Results come back in input order regardless of completion order.
pub async fn run(
    analyzer: Arc<dyn GroupAnalyzer>,
    groups: Vec<GroupData>,
    concurrency: usize,
) -> Result<Vec<GroupResult>> {
    let total = groups.len();
    let concurrency = concurrency.max(1);
    println!("Scoring {total} groups ({concurrency} concurrent)...");

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Scoring [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    let progress = pb.clone();
    let results: Vec<Result<GroupResult>> = stream::iter(groups.into_iter().map(|group| {
        let analyzer = Arc::clone(&analyzer);
        let progress = progress.clone();
        async move {
            let result = tokio::task::spawn_blocking(move || {
                let rows = analyzer.process(&group)?;
                Ok::<GroupResult, crate::error::LssError>(GroupResult {
                    group_id: group.id,
                    rows,
                })
            })
            .await
            .context("spawn_blocking panicked")??;
            progress.inc(1);
            Ok(result)
        }
    }))
    .buffered(concurrency)
    .collect()
    .await;
    pb.finish_and_clear();

    let mut out = Vec::with_capacity(total);
    for result in results {
        out.push(result?);
    }

    info!(groups = out.len(), "All groups scored");
    Ok(out)
}
