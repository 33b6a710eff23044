use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// How the simulated download is executed and how it talks back to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Loop runs inside the UI event handler. The window freezes until it ends.
    #[default]
    DoWorkOnUiThread,
    /// Loop runs on a worker that pokes the form's widgets directly.
    DoWorkInSeparateThreadButIncorrectly,
    /// Loop runs on a worker and posts every widget change back to the UI thread.
    DoWorkInSeparateThread,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::DoWorkOnUiThread,
        Strategy::DoWorkInSeparateThreadButIncorrectly,
        Strategy::DoWorkInSeparateThread,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::DoWorkOnUiThread => "DoWorkOnUIThread",
            Strategy::DoWorkInSeparateThreadButIncorrectly => {
                "DoWorkInSeparateThreadButIncorrectly"
            }
            Strategy::DoWorkInSeparateThread => "DoWorkInSeparateThread",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Completed share of the download, always within `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ProgressFraction(f32);

impl ProgressFraction {
    pub const ZERO: ProgressFraction = ProgressFraction(0.0);
    pub const COMPLETE: ProgressFraction = ProgressFraction(1.0);

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn from_units(completed: u32, total: u32) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        Self::new(completed as f32 / total as f32)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Progress bar position on a `0..=100` scale, truncated like an integer bar.
    pub fn percent(self) -> u8 {
        (100.0 * self.0) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// What a finished run reports through the reset path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub strategy: Strategy,
    pub completed_units: u32,
    pub total_units: u32,
    pub outcome: RunOutcome,
}

/// Counter and cancel flag shared between the form and the loop.
///
/// Both fields are plain relaxed atomics: the flag is polled cooperatively at
/// each iteration boundary and nothing else is ordered against it.
#[derive(Debug, Default)]
pub struct DownloadState {
    completed_units: AtomicU32,
    cancel_requested: AtomicBool,
}

impl DownloadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) {
        self.completed_units.store(0, Ordering::Relaxed);
        self.cancel_requested.store(false, Ordering::Relaxed);
    }

    pub fn advance(&self) -> u32 {
        self.completed_units.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn completed_units(&self) -> u32 {
        self.completed_units.load(Ordering::Relaxed)
    }

    pub fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Relaxed);
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.begin();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_from_units() {
        assert_eq!(ProgressFraction::from_units(0, 200), ProgressFraction::ZERO);
        assert_eq!(ProgressFraction::from_units(50, 200).value(), 0.25);
        assert_eq!(ProgressFraction::from_units(200, 200), ProgressFraction::COMPLETE);
        assert_eq!(ProgressFraction::from_units(3, 0), ProgressFraction::ZERO);
    }

    #[test]
    fn test_fraction_is_clamped() {
        assert_eq!(ProgressFraction::new(1.7), ProgressFraction::COMPLETE);
        assert_eq!(ProgressFraction::new(-0.2), ProgressFraction::ZERO);
        assert_eq!(ProgressFraction::new(f32::NAN), ProgressFraction::ZERO);
    }

    #[test]
    fn test_percent_truncates() {
        assert_eq!(ProgressFraction::from_units(1, 200).percent(), 0);
        assert_eq!(ProgressFraction::from_units(21, 200).percent(), 10);
        assert_eq!(ProgressFraction::COMPLETE.percent(), 100);
    }

    #[test]
    fn test_strategy_labels() {
        let labels: Vec<_> = Strategy::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            labels,
            [
                "DoWorkOnUIThread",
                "DoWorkInSeparateThreadButIncorrectly",
                "DoWorkInSeparateThread"
            ]
        );
        assert_eq!(Strategy::default(), Strategy::DoWorkOnUiThread);
    }

    #[test]
    fn test_download_state_lifecycle() {
        let state = DownloadState::new();
        assert_eq!(state.advance(), 1);
        assert_eq!(state.advance(), 2);
        state.request_cancel();
        assert!(state.cancel_requested());

        state.begin();
        assert_eq!(state.completed_units(), 0);
        assert!(!state.cancel_requested());
    }
}
