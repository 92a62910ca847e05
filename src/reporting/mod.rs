//! # Reporting Module
//!
//! Progress reporting for long-running stages and the CSV result sink.
//!
//! A stage is identified by its index. Callers announce the stage size with
//! `report_max_value`, then bracket the work with `report_start` and
//! `report_stop`, calling `report_value` with the running count in between.

use log::info;
use web_time::Instant;

pub mod result_writer;

pub use result_writer::ResultWriter;

pub trait ProgressReporter {
    fn report_max_value(&mut self, stage: usize, max: usize);
    fn report_start(&mut self, stage: usize);
    fn report_value(&mut self, stage: usize, value: usize);
    fn report_stop(&mut self, stage: usize);
}

/// Ignores every report. Used by batch workers, whose progress is tracked per
/// seed instead of per chunk.
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn report_max_value(&mut self, _stage: usize, _max: usize) {}
    fn report_start(&mut self, _stage: usize) {}
    fn report_value(&mut self, _stage: usize, _value: usize) {}
    fn report_stop(&mut self, _stage: usize) {}
}

struct StageProgress {
    name: String,
    max: usize,
    value: usize,
    last_logged_step: usize,
    started: Option<Instant>,
}

/// Number of progress lines logged between the start and the end of a stage.
const LOG_STEPS: usize = 10;

/// Logs stage start, every tenth of progress, and stage completion with the
/// elapsed time.
pub struct LogProgressReporter {
    stages: Vec<StageProgress>,
}

impl LogProgressReporter {
    /// Creates a reporter with one stage per name, in stage index order.
    pub fn new(stage_names: &[&str]) -> Self {
        LogProgressReporter {
            stages: stage_names
                .iter()
                .map(|name| StageProgress {
                    name: name.to_string(),
                    max: 0,
                    value: 0,
                    last_logged_step: 0,
                    started: None,
                })
                .collect(),
        }
    }

    /// The last value reported for `stage`.
    pub fn value(&self, stage: usize) -> Option<usize> {
        self.stages.get(stage).map(|progress| progress.value)
    }
}

impl ProgressReporter for LogProgressReporter {
    fn report_max_value(&mut self, stage: usize, max: usize) {
        if let Some(progress) = self.stages.get_mut(stage) {
            progress.max = max;
        }
    }

    fn report_start(&mut self, stage: usize) {
        if let Some(progress) = self.stages.get_mut(stage) {
            progress.value = 0;
            progress.last_logged_step = 0;
            progress.started = Some(Instant::now());
            info!("{}: started ({} total)", progress.name, progress.max);
        }
    }

    fn report_value(&mut self, stage: usize, value: usize) {
        let Some(progress) = self.stages.get_mut(stage) else {
            return;
        };
        progress.value = value;
        if progress.max == 0 {
            return;
        }
        let step = value.min(progress.max) * LOG_STEPS / progress.max;
        if step > progress.last_logged_step && step < LOG_STEPS {
            progress.last_logged_step = step;
            info!(
                "{}: {}/{} ({}%)",
                progress.name,
                value,
                progress.max,
                step * 100 / LOG_STEPS
            );
        }
    }

    fn report_stop(&mut self, stage: usize) {
        if let Some(progress) = self.stages.get_mut(stage) {
            let elapsed = progress
                .started
                .take()
                .map(|started| started.elapsed().as_secs_f32())
                .unwrap_or_default();
            info!(
                "{}: finished {}/{} in {:.3}s",
                progress.name, progress.value, progress.max, elapsed
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn log_reporter_tracks_values_per_stage() {
        let mut reporter = LogProgressReporter::new(&["first", "second"]);
        reporter.report_max_value(0, 4);
        reporter.report_start(0);
        for value in 1..=4 {
            reporter.report_value(0, value);
        }
        reporter.report_stop(0);
        assert_eq!(reporter.value(0), Some(4));
        assert_eq!(reporter.value(1), Some(0));
        assert_eq!(reporter.value(2), None);
    }

    #[test]
    fn unknown_stages_are_ignored() {
        let mut reporter = LogProgressReporter::new(&[]);
        reporter.report_max_value(3, 10);
        reporter.report_start(3);
        reporter.report_value(3, 5);
        reporter.report_stop(3);

        let mut silent = SilentProgressReporter;
        silent.report_value(0, 1);
    }
}
