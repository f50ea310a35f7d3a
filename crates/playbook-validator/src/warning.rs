//! Non-fatal findings.
//!
//! Warnings never block validation. They are collected in a [`Warnings`]
//! accumulator threaded through each stage and handed back to the caller
//! with the outcome, whether the call succeeded or not.

use std::fmt;

/// A non-fatal finding about a playbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybookWarning {
    /// Settings declare no `name`.
    MissingName,
    /// Scheduled playbook with no `log…` notification channel.
    NoLogMonitor,
    /// Executions exist but nothing asserts on them.
    MissingAssertions,
}

impl PlaybookWarning {
    /// Stable identifier for machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            PlaybookWarning::MissingName => "MissingNameWarning",
            PlaybookWarning::NoLogMonitor => "NoLogMonitorWarning",
            PlaybookWarning::MissingAssertions => "MissingAssertionsWarning",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PlaybookWarning::MissingName => "Playbook has no name",
            PlaybookWarning::NoLogMonitor => {
                "Scheduled playbook has no log notification channel"
            }
            PlaybookWarning::MissingAssertions => "Playbook has no assertions",
        }
    }
}

impl fmt::Display for PlaybookWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

/// Ordered warning accumulator.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Warnings {
    items: Vec<PlaybookWarning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and emit it as a tracing event.
    pub fn push(&mut self, warning: PlaybookWarning) {
        tracing::warn!(kind = warning.kind(), "{}", warning.message());
        self.items.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, warning: PlaybookWarning) -> bool {
        self.items.contains(&warning)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaybookWarning> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<PlaybookWarning> {
        self.items
    }
}
