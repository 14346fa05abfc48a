//! Ingestion driver: runs a combinator over a log's jobs

use crate::catalog::CatalogReport;
use crate::combinator::Combinator;
use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::jobs::JobSlices;
use chemlog_domain::{LogStream, Program, ResultRecord};
use serde::Serialize;
use tracing::{debug, info, info_span};

/// Runs each job's catalog over its slice into one shared record
#[derive(Debug, Clone)]
pub struct Ingestion {
    combinator: Combinator,
    config: IngestConfig,
}

/// Result of an ingestion session
#[derive(Debug, Clone, Serialize)]
pub struct IngestionReport {
    /// Program the log came from
    pub program: Program,

    /// Name of the combinator that drove the session
    pub combinator: String,

    /// Every property extracted across all jobs
    pub record: ResultRecord,

    /// One catalog report per job, in job order
    pub jobs: Vec<CatalogReport>,
}

impl IngestionReport {
    /// Render the report as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Ingestion {
    /// Create a driver for `combinator`
    pub fn new(combinator: Combinator, config: IngestConfig) -> Self {
        Self { combinator, config }
    }

    /// Combinator driving this session
    pub fn combinator(&self) -> &Combinator {
        &self.combinator
    }

    /// Run job `i`'s catalog over `jobs[i]`, strictly in order
    ///
    /// # Errors
    ///
    /// * `IngestError::Config` - invalid configuration
    /// * `IngestError::JobCountMismatch` - `jobs` does not have one slice per job
    /// * `IngestError::LogTooLarge` - slices exceed `max_log_bytes` together
    pub fn run(&self, program: Program, jobs: &[LogStream]) -> Result<IngestionReport, IngestError> {
        self.config.validate().map_err(IngestError::Config)?;

        if jobs.len() != self.combinator.len() {
            return Err(IngestError::JobCountMismatch {
                expected: self.combinator.len(),
                actual: jobs.len(),
            });
        }

        let total: usize = jobs.iter().map(LogStream::len).sum();
        if total > self.config.max_log_bytes {
            return Err(IngestError::LogTooLarge(total, self.config.max_log_bytes));
        }

        let mut record = ResultRecord::with_policy(self.config.merge_policy);
        let session = info_span!("ingest", session_id = %record.session(), program = %program);
        let _session = session.enter();

        info!(
            "Starting ingestion: {} ({} jobs, merge policy {})",
            self.combinator.name(),
            jobs.len(),
            self.config.merge_policy.as_str()
        );

        let mut reports = Vec::with_capacity(jobs.len());
        for (index, (catalog, log)) in self.combinator.jobs().iter().zip(jobs).enumerate() {
            let job = info_span!("job", index);
            let _job = job.enter();
            debug!("Job {}/{}: {} lines", index + 1, jobs.len(), log.line_count());
            reports.push(catalog.run(log, program, &mut record));
        }

        info!("Ingestion complete: {} properties present", record.len());

        Ok(IngestionReport {
            program,
            combinator: self.combinator.name().to_string(),
            record,
            jobs: reports,
        })
    }
}

/// Ingest a whole log with the standard catalog
///
/// Detects the program when `program` is `None`, splits the log into jobs
/// per `config.job_split` and runs an automatic combinator over them.
pub fn ingest(log: &LogStream, program: Option<Program>, config: &IngestConfig) -> Result<IngestionReport, IngestError> {
    config.validate().map_err(IngestError::Config)?;
    if log.len() > config.max_log_bytes {
        return Err(IngestError::LogTooLarge(log.len(), config.max_log_bytes));
    }

    let program = match program {
        Some(program) => program,
        None => Program::detect(log).ok_or(IngestError::UndetectedProgram)?,
    };

    let slices = JobSlices::split(log, program, config.job_split);
    let combinator = Combinator::auto(&slices)?;
    Ingestion::new(combinator, config.clone()).run(program, slices.slices())
}
