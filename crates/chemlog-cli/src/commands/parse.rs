//! Parse command implementation.

use crate::cli::ParseArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chemlog_domain::{LogStream, Program};
use chemlog_extractor::{ingest, IngestConfig, IngestError, IngestionReport};
use std::fs::File;
use std::io::{BufReader, Read};
use tracing::{debug, info};

/// Execute the parse command.
pub fn execute_parse(args: ParseArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let report = parse_file(&args, &config.ingest)?;

    let output = if args.report {
        formatter.format_report(&report)?
    } else {
        formatter.format_record(&report)?
    };
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

/// Read and ingest the file named by `args`, with argument overrides applied
/// on top of the configured defaults.
fn parse_file(args: &ParseArgs, defaults: &IngestConfig) -> Result<IngestionReport> {
    let program = args.program.as_deref().map(str::parse::<Program>).transpose()?;

    let mut ingest_config = defaults.clone();
    if let Some(split) = args.split {
        ingest_config.job_split = split.into();
    }
    if let Some(merge) = args.merge {
        ingest_config.merge_policy = merge.into();
    }
    debug!(?ingest_config, "Effective ingestion settings");

    let file = File::open(&args.file)?;
    let metadata = file.metadata()?;
    if metadata.is_dir() {
        return Err(CliError::InvalidInput(format!("{} is a directory", args.file.display())));
    }
    let limit = ingest_config.max_log_bytes;
    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    if size > limit {
        return Err(IngestError::LogTooLarge(size, limit).into());
    }

    // Pipes report no length, so cap the read one byte past the limit
    let reader = BufReader::new(file).take((limit as u64).saturating_add(1));
    let log = LogStream::from_reader(reader)?;
    info!(path = %args.file.display(), bytes = log.len(), "Read log file");

    Ok(ingest(&log, program, &ingest_config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{MergeArg, SplitArg};
    use chemlog_domain::{MergePolicy, PropertyKey, PropertyValue};
    use std::io::Write;
    use std::path::PathBuf;

    const TWO_JOBS: &str = "\
 Entering Gaussian System, Link 0=g16
 NAtoms=      2 NActive=      2
 SCF Done:  E(RHF) =  -1.11000000000     A.U. after    4 cycles
 Normal termination of Gaussian 16 at Mon Jan  1 00:00:00 2024.
 SCF Done:  E(RHF) =  -1.12000000000     A.U. after    3 cycles
 Normal termination of Gaussian 16 at Mon Jan  1 00:01:00 2024.
";

    fn args(file: PathBuf) -> ParseArgs {
        ParseArgs {
            file,
            program: None,
            split: None,
            merge: None,
            report: false,
        }
    }

    fn write_log(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_uses_configured_defaults() {
        let file = write_log(TWO_JOBS);
        let report = parse_file(&args(file.path().to_path_buf()), &IngestConfig::default()).unwrap();

        assert_eq!(report.jobs.len(), 2);
        assert_eq!(report.record.get(PropertyKey::Natom), Some(&PropertyValue::Int(2)));
        assert_eq!(report.record.get(PropertyKey::ScfEnergies).unwrap().as_float_list().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_overrides() {
        let file = write_log(TWO_JOBS);
        let mut parse_args = args(file.path().to_path_buf());
        parse_args.split = Some(SplitArg::Jobs);
        parse_args.merge = Some(MergeArg::Accumulate);

        let report = parse_file(&parse_args, &IngestConfig::single_job()).unwrap();

        assert_eq!(report.record.policy(), MergePolicy::Accumulate);
        assert_eq!(report.record.get(PropertyKey::ScfEnergies).unwrap().as_float_list().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_program_name() {
        let file = write_log(TWO_JOBS);
        let mut parse_args = args(file.path().to_path_buf());
        parse_args.program = Some("notaprogram".to_string());

        let result = parse_file(&parse_args, &IngestConfig::default());
        assert!(matches!(result, Err(CliError::Domain(_))));
    }

    #[test]
    fn test_oversized_file_is_rejected_before_reading() {
        let file = write_log(TWO_JOBS);
        let config = IngestConfig { max_log_bytes: 16, ..IngestConfig::default() };

        let result = parse_file(&args(file.path().to_path_buf()), &config);
        match result {
            Err(CliError::Ingest(IngestError::LogTooLarge(size, 16))) => assert_eq!(size, TWO_JOBS.len()),
            other => panic!("Expected LogTooLarge, got {:?}", other.map(|report| report.jobs.len())),
        }
    }

    #[test]
    fn test_directory_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_file(&args(dir.path().to_path_buf()), &IngestConfig::default());
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = parse_file(&args(PathBuf::from("/nonexistent/run.log")), &IngestConfig::default());
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
