use crate::error::{ProcessingError, Result};
use crate::models::Scenario;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;

/// Runs independent (model, scenario) jobs on a sized rayon pool.
///
/// Results come back in input order whatever the worker count.
pub struct ParallelProcessor {
    max_workers: usize,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Process every run, stopping at the first error
    pub fn process_runs<T, F>(
        &self,
        runs: &[(String, Scenario)],
        progress: Option<&ProgressReporter>,
        job: F,
    ) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&str, Scenario) -> Result<T> + Sync + Send,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        pool.install(|| {
            runs.par_iter()
                .map(|(model, scenario)| {
                    let result = job(model, *scenario);

                    if let Some(p) = progress {
                        p.increment(1);
                    }

                    result
                })
                .collect()
        })
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs() -> Vec<(String, Scenario)> {
        ["ACCESS-ESM1-5", "MIROC6", "INM-CM5"]
            .iter()
            .flat_map(|m| Scenario::ALL.iter().map(move |s| (m.to_string(), *s)))
            .collect()
    }

    #[test]
    fn test_results_keep_input_order() -> Result<()> {
        let runs = runs();
        let sequential =
            ParallelProcessor::new(1).process_runs(&runs, None, |m, s| Ok(format!("{m}/{s}")))?;
        let parallel =
            ParallelProcessor::new(4).process_runs(&runs, None, |m, s| Ok(format!("{m}/{s}")))?;

        assert_eq!(sequential, parallel);
        assert_eq!(sequential[0], "ACCESS-ESM1-5/ssp245");
        assert_eq!(sequential.len(), 9);
        Ok(())
    }

    #[test]
    fn test_error_aborts_batch() {
        let result = ParallelProcessor::new(2).process_runs(&runs(), None, |m, _| {
            if m == "MIROC6" {
                Err(ProcessingError::MissingData(m.to_string()))
            } else {
                Ok(())
            }
        });
        assert!(matches!(result, Err(ProcessingError::MissingData(_))));
    }

    #[test]
    fn test_zero_workers_is_one() {
        assert_eq!(ParallelProcessor::new(0).max_workers(), 1);
    }
}
