//! Detect command implementation.

use crate::cli::DetectArgs;
use crate::error::Result;
use crate::output::Formatter;
use chemlog_domain::{LogStream, Program};
use std::fs::File;
use std::io::BufReader;

/// Execute the detect command.
pub fn execute_detect(args: DetectArgs, formatter: &Formatter) -> Result<()> {
    let program = detect_file(&args)?;
    let output = formatter.format_program(program)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

fn detect_file(args: &DetectArgs) -> Result<Option<Program>> {
    let log = LogStream::from_reader(BufReader::new(File::open(&args.file)?))?;
    Ok(Program::detect(&log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_orca() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "                                 * O   R   C   A *").unwrap();

        let args = DetectArgs { file: file.path().to_path_buf() };
        assert_eq!(detect_file(&args).unwrap(), Some(Program::Orca));
    }

    #[test]
    fn test_detect_unknown() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "plain text").unwrap();

        let args = DetectArgs { file: file.path().to_path_buf() };
        assert_eq!(detect_file(&args).unwrap(), None);
    }
}
