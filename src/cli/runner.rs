//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::engine::{MessageSink, SyncEngine};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::metrics;
use crate::output::{read_tap_output, write_json_file, MessageWriter, MessageWriterConfig};
use crate::report::ReportSummary;
use crate::source::{MemorySource, RecordSource, RestSource};
use crate::stream::{Catalog, EntityKind};
use crate::types::Parity;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Options of the `read` command
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Comma-separated stream names
    pub streams: Option<String>,
    /// Force strict mode
    pub strict: bool,
    /// Override the violation cap
    pub report_cap: Option<usize>,
    /// Override the post id parity
    pub parity: Option<Parity>,
    /// Per-stream record limit
    pub max_records: Option<usize>,
    /// Message destination (stdout when unset)
    pub output: Option<PathBuf>,
    /// Report destination
    pub report: Option<PathBuf>,
    /// Replay source
    pub input: Option<PathBuf>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(),
            Commands::Check => self.check().await,
            Commands::Discover => self.discover(),
            Commands::Read {
                streams,
                strict,
                report_cap,
                parity,
                max_records,
                output,
                report,
                input,
            } => {
                let options = ReadOptions {
                    streams: streams.clone(),
                    strict: *strict,
                    report_cap: *report_cap,
                    parity: *parity,
                    max_records: *max_records,
                    output: output.clone(),
                    report: report.clone(),
                    input: input.clone(),
                };
                self.read(&options).await.map(|_| ())
            }
            Commands::Analyze { input } => self.analyze(input),
        }
    }

    /// Load and validate configuration
    fn load_config(&self) -> Result<TapConfig> {
        TapConfig::load(self.cli.config.as_deref(), self.cli.config_json.as_deref())
    }

    /// Show configuration specification
    fn spec(&self) -> Result<()> {
        self.output_message(&json!({
            "type": "SPEC",
            "spec": {
                "documentationUrl": "https://jsonplaceholder.typicode.com/guide/",
                "connectionSpecification": TapConfig::spec_json()
            }
        }));
        Ok(())
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = HttpClient::with_config(config.http_client_config())?;

        info!("Checking connection to {}", config.api_url);
        let request = RequestConfig::new().query("_limit", "1");
        let status = match client
            .get_collection(EntityKind::User.path(), request)
            .await
        {
            Ok(_) => json!({
                "status": "SUCCEEDED",
                "message": "Connection successful"
            }),
            Err(e) => json!({
                "status": "FAILED",
                "message": format!("Connection failed: {e}")
            }),
        };

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": status
        }));
        Ok(())
    }

    /// Discover streams
    fn discover(&self) -> Result<()> {
        self.output_message(&json!({
            "type": "CATALOG",
            "catalog": Catalog::discover()
        }));
        Ok(())
    }

    /// Read streams and return the validation summary
    pub async fn read(&self, options: &ReadOptions) -> Result<ReportSummary> {
        let mut config = self.load_config()?;
        if options.strict {
            config.strict = true;
        }
        if let Some(cap) = options.report_cap {
            config.violation_report_cap = cap;
        }
        if let Some(parity) = options.parity {
            config.filter.post_id_parity = parity;
        }

        let kinds = EntityKind::parse_list(options.streams.as_deref().unwrap_or_default())?;
        let source = Self::build_source(&config, options.input.as_deref())?;

        let mut engine = SyncEngine::from_boxed(source)
            .with_config(config.sync_config(options.max_records.unwrap_or(0)))
            .with_validator(config.validator())
            .with_filter(config.stream_filter());

        let writer_config =
            MessageWriterConfig::new().with_pretty(self.cli.format == OutputFormat::Pretty);
        let mut sink: Box<dyn MessageSink> = match &options.output {
            Some(path) => Box::new(MessageWriter::create(path, writer_config)?),
            None => Box::new(MessageWriter::stdout(writer_config)),
        };

        let result = engine.run(&kinds, sink.as_mut()).await;
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                if e.is_source_error() {
                    error!(
                        "Extraction aborted by the API after {} emitted records",
                        engine.stats().records_emitted
                    );
                }
                return Err(e);
            }
        };
        let summary = report.summary();
        Self::log_summary(&summary);

        if let Some(path) = &options.report {
            write_json_file(
                path,
                &json!({
                    "report": summary,
                    "sync": engine.stats()
                }),
            )?;
            info!("Validation report written to {}", path.display());
        }

        Ok(summary)
    }

    /// Compute metrics for a captured output
    fn analyze(&self, input: &Path) -> Result<()> {
        let output = read_tap_output(input)?;
        let analysis = metrics::analyze(&output)?;
        self.output_message(&json!({
            "type": "ANALYSIS",
            "analysis": analysis
        }));
        Ok(())
    }

    /// Pick the record source: replay file or API
    fn build_source(config: &TapConfig, input: Option<&Path>) -> Result<Box<dyn RecordSource>> {
        match input {
            Some(path) => {
                let output = read_tap_output(path)?;
                info!("Replaying {} records from {}", output.total(), path.display());
                Ok(Box::new(MemorySource::from_collections(
                    output.into_collections(),
                )))
            }
            None => {
                let client = HttpClient::with_config(config.http_client_config())?;
                Ok(Box::new(
                    RestSource::new(client).with_page_size(config.http.page_size),
                ))
            }
        }
    }

    /// Log the end-of-run summary
    fn log_summary(summary: &ReportSummary) {
        for (stream, stats) in &summary.streams {
            info!(
                "{stream}: {} seen, {} valid, {} invalid, {} unverified, {} filtered, {} dropped",
                stats.seen, stats.valid, stats.invalid, stats.unverified, stats.filtered, stats.dropped
            );
        }
        info!(
            "Validation summary: {} records, {} invalid, {} violations, {:.1}% valid",
            summary.total_seen, summary.total_invalid, summary.total_violations, summary.validity_rate
        );
        if summary.evicted_samples > 0 {
            warn!(
                "{} violation entries were evicted by the report cap",
                summary.evicted_samples
            );
        }
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
