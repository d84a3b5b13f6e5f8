//! Ownership and atomic replacement of the published rate table.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult, LoadError};
use crate::grid::{self, GridSource};
use crate::models::{RateTable, ReloadSummary};

/// Owns the rate table currently in service.
///
/// Readers take a snapshot with [`current_table`](Self::current_table) and
/// never block. Writers are serialised: a reload holds the writer lock from
/// the moment it reads its source until its table is published, so tables
/// are published in the order their sources were read. Readers never take
/// that lock. A reader that took a snapshot before a swap keeps using that
/// snapshot until it drops it.
///
/// # Example
///
/// ```
/// use milk_rate_engine::grid::CellGridSource;
/// use milk_rate_engine::reload::ReloadController;
///
/// let controller = ReloadController::new();
/// assert!(controller.current_table().is_empty());
///
/// let source = CellGridSource::new("inline", vec![vec!["FAT", "8.5"], vec!["4.0", "45.0"]]);
/// let summary = controller.reload(&source).unwrap();
///
/// assert_eq!(summary.row_count, 1);
/// assert_eq!(controller.current_table().version(), summary.version);
/// ```
#[derive(Debug)]
pub struct ReloadController {
    shared: Arc<Published>,
}

#[derive(Debug)]
struct Published {
    current: ArcSwap<RateTable>,
    /// Last assigned version; held for the whole of a reload.
    writer: Mutex<u64>,
}

impl ReloadController {
    /// Creates a controller serving the empty table.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Published {
                current: ArcSwap::from_pointee(RateTable::empty()),
                writer: Mutex::new(0),
            }),
        }
    }

    /// Returns the table currently in service.
    pub fn current_table(&self) -> Arc<RateTable> {
        self.shared.current.load_full()
    }

    /// Publishes an already loaded table, replacing the one in service.
    ///
    /// Waits for any reload in progress to finish first.
    pub fn publish(&self, table: RateTable) -> ReloadSummary {
        let mut last_version = self.shared.writer.lock();
        self.shared.publish_locked(&mut last_version, table)
    }

    /// Loads a table from `source` and publishes it.
    ///
    /// On failure the table in service is left untouched and the load error
    /// is returned.
    pub fn reload(&self, source: &dyn GridSource) -> EngineResult<ReloadSummary> {
        self.shared.reload(source, None)
    }

    /// Reloads on the blocking thread pool.
    ///
    /// Dropping the returned future before the parse has finished cancels
    /// the publish; the table in service is left as is.
    pub async fn reload_async(&self, source: Arc<dyn GridSource>) -> EngineResult<ReloadSummary> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let _cancel_on_drop = CancelOnDrop(Arc::clone(&cancelled));

        let shared = Arc::clone(&self.shared);
        let task_source = Arc::clone(&source);
        tokio::task::spawn_blocking(move || {
            shared.reload(task_source.as_ref(), Some(cancelled.as_ref()))
        })
        .await
        .unwrap_or_else(|join_error| {
            Err(LoadError::SourceUnreadable {
                source_name: source.describe(),
                message: format!("load task failed: {}", join_error),
            }
            .into())
        })
    }
}

impl Published {
    fn reload(
        &self,
        source: &dyn GridSource,
        cancelled: Option<&AtomicBool>,
    ) -> EngineResult<ReloadSummary> {
        let mut last_version = self.writer.lock();

        let table = grid::load(source).map_err(|err| self.reject(source, err))?;
        if cancelled.is_some_and(|flag| flag.load(Ordering::Acquire)) {
            debug!(source = %source.describe(), "Reload cancelled before publish");
            return Err(LoadError::Cancelled {
                source_name: source.describe(),
            }
            .into());
        }

        Ok(self.publish_locked(&mut last_version, table))
    }

    fn publish_locked(&self, last_version: &mut u64, table: RateTable) -> ReloadSummary {
        *last_version += 1;

        let table = table.with_version(*last_version);
        let summary = ReloadSummary {
            success: true,
            row_count: table.row_count(),
            column_count: table.column_count(),
            version: table.version(),
            loaded_at: table.loaded_at(),
        };
        self.current.store(Arc::new(table));

        info!(
            version = summary.version,
            rows = summary.row_count,
            columns = summary.column_count,
            "Published rate table"
        );
        summary
    }

    fn reject(&self, source: &dyn GridSource, err: LoadError) -> EngineError {
        warn!(
            source = %source.describe(),
            error = %err,
            serving_version = self.current.load().version(),
            "Rate table reload failed, keeping current table"
        );
        err.into()
    }
}

impl Default for ReloadController {
    fn default() -> Self {
        Self::new()
    }
}

struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::resolve;
    use crate::grid::CellGridSource;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn small_source() -> CellGridSource {
        CellGridSource::new(
            "small",
            vec![
                vec!["FAT", "8.5", "9.0"],
                vec!["4.0", "45.0", "46.5"],
                vec!["4.5", "47.0", "48.2"],
            ],
        )
    }

    fn large_source() -> CellGridSource {
        CellGridSource::new(
            "large",
            vec![
                vec!["FAT", "8.5", "9.0", "9.5"],
                vec!["4.0", "50.0", "51.0", "52.0"],
                vec!["4.5", "53.0", "54.0", "55.0"],
                vec!["5.0", "56.0", "57.0", "58.0"],
            ],
        )
    }

    fn ragged_source() -> CellGridSource {
        CellGridSource::new(
            "ragged",
            vec![vec!["FAT", "8.5", "9.0"], vec!["4.0", "45.0"]],
        )
    }

    /// Serves rate 1.0 on a slow first read and 2.0 on every later read.
    #[derive(Default)]
    struct ChangingSource {
        reads: AtomicUsize,
        first_read_started: AtomicBool,
    }

    impl GridSource for ChangingSource {
        fn describe(&self) -> String {
            "changing".to_string()
        }

        fn read_cells(&self) -> Result<Vec<Vec<String>>, LoadError> {
            let rate = if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
                self.first_read_started.store(true, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(150));
                "1.0"
            } else {
                "2.0"
            };
            Ok(vec![
                vec!["FAT".to_string(), "8.5".to_string()],
                vec!["4.0".to_string(), rate.to_string()],
            ])
        }
    }

    /// Sleeps on every read.
    struct SlowSource;

    impl GridSource for SlowSource {
        fn describe(&self) -> String {
            "slow".to_string()
        }

        fn read_cells(&self) -> Result<Vec<Vec<String>>, LoadError> {
            thread::sleep(Duration::from_millis(200));
            Ok(vec![
                vec!["FAT".to_string(), "8.5".to_string()],
                vec!["4.0".to_string(), "99.0".to_string()],
            ])
        }
    }

    #[test]
    fn test_new_controller_serves_empty_table() {
        let controller = ReloadController::new();
        let table = controller.current_table();

        assert!(table.is_empty());
        assert!(matches!(
            resolve(&table, dec("4.0"), dec("8.5")),
            Err(EngineError::RateUnavailable { .. })
        ));
    }

    #[test]
    fn test_reload_replaces_dimensions() {
        let controller = ReloadController::new();

        let first = controller.reload(&small_source()).unwrap();
        assert_eq!((first.row_count, first.column_count), (2, 2));
        assert!(first.success);

        let second = controller.reload(&large_source()).unwrap();
        assert_eq!((second.row_count, second.column_count), (3, 3));
        assert_eq!(second.version, first.version + 1);

        let table = controller.current_table();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.source(), "large");
    }

    #[test]
    fn test_failed_reload_keeps_previous_table() {
        let controller = ReloadController::new();
        controller.reload(&small_source()).unwrap();
        let before = controller.current_table();

        let result = controller.reload(&ragged_source());
        assert!(matches!(
            result,
            Err(EngineError::Load(LoadError::RaggedRow { row: 1, .. }))
        ));

        let after = controller.current_table();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(resolve(&after, dec("4.0"), dec("9.0")).unwrap(), dec("46.5"));
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let controller = ReloadController::new();
        controller.reload(&small_source()).unwrap();

        let snapshot = controller.current_table();
        controller.reload(&large_source()).unwrap();

        assert_eq!(resolve(&snapshot, dec("4.0"), dec("8.5")).unwrap(), dec("45.0"));
        assert_eq!(
            resolve(&controller.current_table(), dec("4.0"), dec("8.5")).unwrap(),
            dec("50.0")
        );
    }

    #[test]
    fn test_concurrent_readers_see_consistent_tables() {
        let controller = Arc::new(ReloadController::new());
        controller.reload(&small_source()).unwrap();
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let controller = Arc::clone(&controller);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    while !done.load(Ordering::Relaxed) {
                        let table = controller.current_table();
                        let rate = resolve(&table, dec("5.0"), dec("9.5")).unwrap();
                        // A table's dimensions and contents always agree.
                        match table.row_count() {
                            2 => assert_eq!(rate, dec("48.2")),
                            3 => assert_eq!(rate, dec("58.0")),
                            rows => panic!("unexpected table with {} rows", rows),
                        }
                        assert_eq!(table.row_count(), table.fat_axis().len());
                    }
                })
            })
            .collect();

        for i in 0..200 {
            if i % 2 == 0 {
                controller.reload(&large_source()).unwrap();
            } else {
                controller.reload(&small_source()).unwrap();
            }
        }
        done.store(true, Ordering::Relaxed);

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(controller.current_table().version(), 201);
    }

    #[test]
    fn test_overlapping_reloads_publish_in_read_order() {
        let controller = Arc::new(ReloadController::new());
        let source = Arc::new(ChangingSource::default());

        let first = {
            let controller = Arc::clone(&controller);
            let source = Arc::clone(&source);
            thread::spawn(move || controller.reload(source.as_ref()).unwrap())
        };
        while !source.first_read_started.load(Ordering::SeqCst) {
            thread::yield_now();
        }
        let second = controller.reload(source.as_ref()).unwrap();
        let first = first.join().unwrap();

        // The slow first read finishes first and the later read is published last.
        assert!(first.version < second.version);
        let table = controller.current_table();
        assert_eq!(table.version(), second.version);
        assert_eq!(table.rate_at(0, 0), Some(dec("2.0")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_overlapping_async_reloads_keep_latest_read() {
        let controller = ReloadController::new();
        let source: Arc<dyn GridSource> = Arc::new(ChangingSource::default());

        let (a, b) = tokio::join!(
            controller.reload_async(Arc::clone(&source)),
            controller.reload_async(Arc::clone(&source))
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        let table = controller.current_table();
        assert_eq!(table.version(), a.version.max(b.version));
        assert_eq!(table.rate_at(0, 0), Some(dec("2.0")));
    }

    #[tokio::test]
    async fn test_dropped_reload_async_does_not_publish() {
        let controller = Arc::new(ReloadController::new());
        controller.reload(&small_source()).unwrap();

        let source: Arc<dyn GridSource> = Arc::new(SlowSource);
        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), controller.reload_async(source)).await;
        assert!(timed_out.is_err());

        // Let the abandoned parse finish on the blocking pool.
        tokio::time::sleep(Duration::from_millis(400)).await;

        let table = controller.current_table();
        assert_eq!(table.version(), 1);
        assert_eq!(table.source(), "small");
    }

    #[tokio::test]
    async fn test_reload_async_publishes_table() {
        let controller = ReloadController::new();
        let source: Arc<dyn GridSource> = Arc::new(large_source());

        let summary = controller.reload_async(source).await.unwrap();
        assert_eq!(summary.row_count, 3);
        assert_eq!(controller.current_table().version(), summary.version);
    }

    #[tokio::test]
    async fn test_reload_async_failure_keeps_table() {
        let controller = ReloadController::new();
        controller.reload(&small_source()).unwrap();

        let source: Arc<dyn GridSource> = Arc::new(ragged_source());
        assert!(controller.reload_async(source).await.is_err());
        assert_eq!(controller.current_table().row_count(), 2);
    }
}
