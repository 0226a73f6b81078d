use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

const TICK: Duration = Duration::from_millis(100);

/// Stderr feedback while a request is outstanding. Does nothing when the
/// terminal cannot show it.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    fn styled(
        make: impl FnOnce() -> ProgressBar,
        template: &str,
        fallback: ProgressStyle,
        message: &str,
    ) -> Self {
        if !ui::terminal().progress {
            return Self { bar: None };
        }
        let bar = make();
        bar.set_style(ProgressStyle::with_template(template).unwrap_or(fallback));
        bar.enable_steady_tick(TICK);
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    /// Indeterminate wait: probes and uploads.
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        Self::styled(
            ProgressBar::new_spinner,
            "{spinner:.cyan} {msg} {elapsed:.dim}",
            ProgressStyle::default_spinner(),
            message,
        )
    }

    /// Rows loaded so far out of the `limit` the caller asked for.
    #[must_use]
    pub fn rows(limit: usize) -> Self {
        Self::styled(
            || ProgressBar::new(u64::try_from(limit).unwrap_or(u64::MAX)),
            "{spinner:.cyan} {pos}/{len} rows {msg}",
            ProgressStyle::default_bar(),
            "",
        )
    }

    pub fn set_rows(&self, rows: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(u64::try_from(rows).unwrap_or(u64::MAX));
        }
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}
