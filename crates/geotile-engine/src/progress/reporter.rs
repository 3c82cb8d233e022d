use super::CancelFlag;

/// Expected number of steps of a progress run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProgressTotal {
    Known(u32),
    /// Used when the step count is only known once the run ends (tiles shrink at
    /// the extent's edges).
    Indeterminate,
}

pub trait ProgressReporter {
    /// Advances by one step. Returns `true` when the caller should stop.
    fn update(&mut self) -> bool;
}

pub trait ProgressFactory {
    fn create(&self, total: ProgressTotal, label: &str) -> Box<dyn ProgressReporter>;
}

/// Logs progress through the `log` facade and polls a `CancelFlag`.
#[derive(Debug)]
pub struct LoggingProgress {
    label: String,
    total: ProgressTotal,
    completed: u32,
    cancel: CancelFlag,
}

impl LoggingProgress {
    pub fn new(total: ProgressTotal, label: impl Into<String>, cancel: CancelFlag) -> Self {
        Self {
            label: label.into(),
            total,
            completed: 0,
            cancel,
        }
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Completion in [0, 100]; `None` while the total is unknown.
    pub fn percentage(&self) -> Option<f32> {
        match self.total {
            ProgressTotal::Known(0) => Some(100.0),
            ProgressTotal::Known(total) => {
                Some((self.completed.min(total) as f32 / total as f32) * 100.0)
            }
            ProgressTotal::Indeterminate => None,
        }
    }
}

impl ProgressReporter for LoggingProgress {
    fn update(&mut self) -> bool {
        self.completed = self.completed.saturating_add(1);
        match self.percentage() {
            Some(pct) => log::debug!("{}: step {} ({pct:.0}%)", self.label, self.completed),
            None => log::debug!("{}: step {}", self.label, self.completed),
        }
        let cancelled = self.cancel.is_cancelled();
        if cancelled {
            log::info!("{}: cancelled after {} steps", self.label, self.completed);
        }
        cancelled
    }
}

impl Drop for LoggingProgress {
    fn drop(&mut self) {
        log::info!("{}: {} steps", self.label, self.completed);
    }
}

/// Default factory of the render pipeline.
#[derive(Debug, Clone, Default)]
pub struct LoggingProgressFactory {
    cancel: CancelFlag,
}

impl LoggingProgressFactory {
    pub fn new(cancel: CancelFlag) -> Self {
        Self { cancel }
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }
}

impl ProgressFactory for LoggingProgressFactory {
    fn create(&self, total: ProgressTotal, label: &str) -> Box<dyn ProgressReporter> {
        Box::new(LoggingProgress::new(total, label, self.cancel.clone()))
    }
}
