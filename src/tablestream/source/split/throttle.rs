//! Cooperative pacing between boundary queries.

use crate::tablestream::source::table::TablePath;
use std::time::Duration;

/// Sleep once every this many boundary queries
const PACE_EVERY: usize = 10;
/// How long each pacing sleep lasts
const PACE_SLEEP: Duration = Duration::from_millis(100);

/// Best-effort politeness toward the source server during long chunking
/// passes: sleep 100 ms every 10 boundary queries and log progress.
///
/// Pure function of the iteration count; no shared state. Dropping the
/// future at the await point abandons the pass without side effects.
pub(crate) async fn pace_queries(count: usize, table_path: &TablePath) {
    if count % PACE_EVERY == 0 {
        tokio::time::sleep(PACE_SLEEP).await;
        log::info!(
            "Dynamic chunk splitter has split {} chunks for table {}",
            count,
            table_path
        );
    }
}
