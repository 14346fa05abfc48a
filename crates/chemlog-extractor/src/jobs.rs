//! Splitting a log into per-job slices

use crate::config::JobSplit;
use chemlog_domain::{JobTree, LogStream, Program};

/// A log cut into the jobs it contains
///
/// Always holds at least one slice; an empty log is one empty job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSlices {
    slices: Vec<LogStream>,
}

impl JobSlices {
    /// Split `log` according to `strategy`
    pub fn split(log: &LogStream, program: Program, strategy: JobSplit) -> Self {
        let slices = match (strategy, terminator(program)) {
            (JobSplit::ByTerminator, Some(marker)) => split_after(log.as_str(), marker),
            _ => vec![log.clone()],
        };
        Self { slices }
    }

    /// Slices, in log order
    pub fn slices(&self) -> &[LogStream] {
        &self.slices
    }

    /// Number of slices
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Always false
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Take the slices
    pub fn into_inner(self) -> Vec<LogStream> {
        self.slices
    }
}

impl JobTree for JobSlices {
    fn num_nodes(&self) -> usize {
        self.slices.len()
    }
}

/// Line written when a job of `program` finishes
fn terminator(program: Program) -> Option<&'static str> {
    match program {
        Program::Gaussian => Some("Normal termination of Gaussian"),
        Program::Orca => Some("ORCA TERMINATED NORMALLY"),
        _ => None,
    }
}

/// Cut after every line containing `marker`
fn split_after(text: &str, marker: &str) -> Vec<LogStream> {
    let mut slices = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        current.push_str(line);
        if line.contains(marker) {
            slices.push(LogStream::new(std::mem::take(&mut current)));
        }
    }

    // Trailing text only counts as a job if it says something
    let trailing = LogStream::new(current);
    if !trailing.is_blank() || slices.is_empty() {
        slices.push(trailing);
    }

    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GAUSSIAN_JOBS: &str = "\
 Entering Gaussian System
 SCF Done:  E(RHF) =  -1.0
 Normal termination of Gaussian 16 at Mon Jan  1 00:00:00 2024.
 Entering Gaussian System
 SCF Done:  E(RHF) =  -1.1
 Normal termination of Gaussian 16 at Mon Jan  1 00:01:00 2024.
";

    #[test]
    fn test_split_on_gaussian_terminator() {
        let slices = JobSlices::split(&LogStream::new(TWO_GAUSSIAN_JOBS), Program::Gaussian, JobSplit::ByTerminator);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices.num_nodes(), 2);
        assert!(slices.slices()[0].contains("-1.0"));
        assert!(slices.slices()[1].contains("-1.1"));
        assert!(!slices.slices()[1].contains("-1.0"));
    }

    #[test]
    fn test_blank_tail_is_dropped() {
        let text = format!("{}\n   \n\n", TWO_GAUSSIAN_JOBS);
        let slices = JobSlices::split(&LogStream::new(text), Program::Gaussian, JobSplit::ByTerminator);
        assert_eq!(slices.len(), 2);
    }

    #[test]
    fn test_unterminated_tail_is_a_job() {
        let text = format!("{} Entering Gaussian System\n SCF Done:  E(RHF) =  -1.2\n", TWO_GAUSSIAN_JOBS);
        let slices = JobSlices::split(&LogStream::new(text), Program::Gaussian, JobSplit::ByTerminator);
        assert_eq!(slices.len(), 3);
        assert!(slices.slices()[2].contains("-1.2"));
    }

    #[test]
    fn test_whole_strategy_keeps_one_slice() {
        let slices = JobSlices::split(&LogStream::new(TWO_GAUSSIAN_JOBS), Program::Gaussian, JobSplit::Whole);
        assert_eq!(slices.len(), 1);
    }

    #[test]
    fn test_program_without_terminator_keeps_one_slice() {
        let slices = JobSlices::split(&LogStream::new(TWO_GAUSSIAN_JOBS), Program::Psi4, JobSplit::ByTerminator);
        assert_eq!(slices.len(), 1);
    }

    #[test]
    fn test_empty_log_is_one_job() {
        let slices = JobSlices::split(&LogStream::default(), Program::Orca, JobSplit::ByTerminator);
        assert_eq!(slices.len(), 1);
        assert!(slices.slices()[0].is_empty());
    }

    #[test]
    fn test_orca_terminator() {
        let text = "stuff\n****ORCA TERMINATED NORMALLY****\n";
        let slices = JobSlices::split(&LogStream::new(text), Program::Orca, JobSplit::ByTerminator);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices.into_inner()[0].as_str(), text);
    }
}
