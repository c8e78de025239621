//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Drives each stream through filter, validation and reporting
//! - `SyncConfig` - Configuration for sync operations
//! - `Message` / `MessageSink` - Output messages and where they go
//!
//! Kinds always run in the order users, posts, comments so that post IDs are
//! known before comments are checked against them.

mod types;

pub use types::{Annotation, Message, MessageSink, RelationshipMode, SyncConfig, SyncStats};

use crate::error::Result;
use crate::filter::StreamFilter;
use crate::pagination::PaginationState;
use crate::report::{Disposition, ValidationReport};
use crate::source::RecordSource;
use crate::stream::{EntityKind, Record};
use crate::validation::{fields, KnownPostIds, RecordValidator, Verdict, VerdictStatus};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What one pass over a stream observed
struct StreamOutcome {
    /// Positive integer IDs of every post read (posts only)
    post_ids: KnownPostIds,
    /// Whether the collection was read to the end
    exhausted: bool,
}

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    /// Record source
    source: Box<dyn RecordSource>,
    /// Rule sets per kind
    validator: RecordValidator,
    /// Post-ID parity filter
    filter: StreamFilter,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine with default rules and filter
    pub fn new(source: impl RecordSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    /// Create a new sync engine from a boxed source
    pub fn from_boxed(source: Box<dyn RecordSource>) -> Self {
        Self {
            source,
            validator: RecordValidator::default(),
            filter: StreamFilter::default(),
            config: SyncConfig::default(),
            stats: SyncStats::default(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the record validator
    #[must_use]
    pub fn with_validator(mut self, validator: RecordValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Set the stream filter
    #[must_use]
    pub fn with_filter(mut self, filter: StreamFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Run the selected kinds and return the run's validation report
    ///
    /// A source failure aborts the run; messages already emitted stay emitted.
    pub async fn run(
        &mut self,
        kinds: &[EntityKind],
        sink: &mut dyn MessageSink,
    ) -> Result<ValidationReport> {
        let start = Instant::now();
        let kinds: BTreeSet<EntityKind> = kinds.iter().copied().collect();
        let mut report = ValidationReport::new(self.config.report);
        let mut posts_read: Option<StreamOutcome> = None;

        for kind in kinds.iter().copied() {
            let known_posts = if kind == EntityKind::Comment {
                self.known_posts_for_comments(posts_read.as_ref()).await?
            } else {
                None
            };

            sink.emit(Message::schema(kind))?;
            let outcome = self
                .sync_stream(kind, known_posts.as_ref(), &mut report, sink)
                .await?;
            if kind == EntityKind::Post {
                posts_read = Some(outcome);
            }
        }

        sink.flush()?;
        self.stats.set_duration(start.elapsed().as_millis() as u64);
        Ok(report)
    }

    /// Resolve the known post set before the comments stream starts
    async fn known_posts_for_comments(
        &mut self,
        posts_read: Option<&StreamOutcome>,
    ) -> Result<Option<KnownPostIds>> {
        match (self.config.relationship_mode, posts_read) {
            (RelationshipMode::InRun, Some(posts)) => Ok(Some(posts.post_ids.clone())),
            (RelationshipMode::InRun, None) => {
                debug!("Posts not in this run; comment relationships stay unchecked");
                Ok(None)
            }
            (RelationshipMode::Prefetch, Some(posts)) if posts.exhausted => {
                Ok(Some(posts.post_ids.clone()))
            }
            (RelationshipMode::Prefetch, _) => self.collect_post_ids().await,
        }
    }

    /// Read the whole posts collection for its IDs without emitting anything
    ///
    /// Returns `None` when the source holds no posts collection at all.
    pub async fn collect_post_ids(&mut self) -> Result<Option<KnownPostIds>> {
        if !self.source.has_collection(EntityKind::Post) {
            debug!("Source has no posts; comment relationships stay unchecked");
            return Ok(None);
        }

        let mut ids = KnownPostIds::new();
        let mut state = PaginationState::new();

        while let Some(page) = self
            .source
            .fetch_page(EntityKind::Post, &mut state)
            .await?
        {
            self.stats.add_page();
            ids.extend(page.iter().filter_map(post_id));
        }

        debug!("Collected {} post IDs", ids.len());
        Ok(Some(ids))
    }

    /// Sync a single stream
    async fn sync_stream(
        &mut self,
        kind: EntityKind,
        known_posts: Option<&KnownPostIds>,
        report: &mut ValidationReport,
        sink: &mut dyn MessageSink,
    ) -> Result<StreamOutcome> {
        info!("Starting sync for stream: {}", kind.stream_name());

        let mut outcome = StreamOutcome {
            post_ids: KnownPostIds::new(),
            exhausted: false,
        };
        let mut state = PaginationState::new();
        let mut read = 0usize;

        'pages: loop {
            let Some(page) = self.source.fetch_page(kind, &mut state).await? else {
                outcome.exhausted = true;
                break;
            };
            self.stats.add_page();
            debug!("Page {}: {} {}", state.page, page.len(), kind.stream_name());

            for record in page {
                if self.config.max_records > 0 && read >= self.config.max_records {
                    debug!(
                        "Reached max_records ({}) for {}",
                        self.config.max_records,
                        kind.stream_name()
                    );
                    break 'pages;
                }
                read += 1;
                self.stats.add_fetched(1);

                if kind == EntityKind::Post {
                    outcome.post_ids.extend(post_id(&record));
                }

                if !self.filter.decide(&record).is_forward() {
                    report.record_filtered(kind);
                    self.stats.add_filtered();
                    continue;
                }

                let verdict = self.validator.validate(&record, known_posts);
                let disposition = report.record(&record, &verdict);
                self.dispatch(record, &verdict, disposition, sink)?;
            }
        }

        self.stats.add_stream();
        let stats = report.stats(kind);
        info!(
            "Completed sync for {}: {} read, {} valid, {} invalid, {} unverified, {} filtered, {} dropped",
            kind.stream_name(),
            read,
            stats.valid,
            stats.invalid,
            stats.unverified,
            stats.filtered,
            stats.dropped
        );

        Ok(outcome)
    }

    /// Emit, flag or drop a validated record
    fn dispatch(
        &mut self,
        record: Record,
        verdict: &Verdict,
        disposition: Disposition,
        sink: &mut dyn MessageSink,
    ) -> Result<()> {
        match verdict.status() {
            VerdictStatus::Invalid => warn!(
                "Invalid {} record {}: {}",
                record.kind(),
                record.id_value(),
                verdict
                    .violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            ),
            VerdictStatus::Unverified => debug!(
                "Unverified {} record {}: post relationship not checked",
                record.kind(),
                record.id_value()
            ),
            VerdictStatus::Valid => {}
        }

        let annotation = match disposition {
            Disposition::Drop => {
                self.stats.add_dropped();
                return Ok(());
            }
            Disposition::Forward => None,
            Disposition::Flag => Some(Annotation::from_verdict(verdict)),
        };

        sink.emit(Message::record(record, annotation))?;
        self.stats.add_emitted();
        Ok(())
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("validator", &self.validator)
            .field("filter", &self.filter)
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Post ID usable as a relationship target
fn post_id(record: &Record) -> Option<u64> {
    fields::positive_id(record.get("id"), "id").ok()
}
