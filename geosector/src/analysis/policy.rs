//! How per-record persistence failures are treated.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::AnalysisError;
use crate::log::Logger;
use crate::store::{EntityKind, StoreError};

/// Reaction to a failed store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistencePolicy {
    /// Log the failure, count it, skip the record and its children.
    #[default]
    LogAndContinue,
    /// Abort the run on the first failure.
    Strict,
}

impl PersistencePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistencePolicy::LogAndContinue => "continue",
            PersistencePolicy::Strict => "strict",
        }
    }

    /// Route one store result through the policy.
    ///
    /// Success passes the value through. A failure is logged at error level
    /// and counted in `tally`; under [`Strict`](Self::Strict) it is then
    /// returned as [`AnalysisError::Persistence`], otherwise the caller gets
    /// `Ok(None)` and moves on.
    pub fn apply<T>(
        &self,
        result: Result<T, StoreError>,
        stage: Stage,
        kind: EntityKind,
        logger: &dyn Logger,
        tally: &mut PersistenceTally,
    ) -> Result<Option<T>, AnalysisError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                crate::log_error!(
                    logger,
                    "Failed to create {} during {} stage: {}",
                    kind,
                    stage,
                    source
                );
                tally.failed += 1;
                match self {
                    PersistencePolicy::LogAndContinue => Ok(None),
                    PersistencePolicy::Strict => Err(AnalysisError::Persistence { stage, source }),
                }
            }
        }
    }
}

impl fmt::Display for PersistencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersistencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" | "log-and-continue" | "log_and_continue" => {
                Ok(PersistencePolicy::LogAndContinue)
            }
            "strict" => Ok(PersistencePolicy::Strict),
            other => Err(format!(
                "unknown error policy '{}' (expected 'continue' or 'strict')",
                other
            )),
        }
    }
}

/// Pipeline stage, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Features,
    Grid,
    Sectors,
    Coverage,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Features => "features",
            Stage::Grid => "grid",
            Stage::Sectors => "sectors",
            Stage::Coverage => "coverage",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count of records lost to persistence failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistenceTally {
    /// Store calls that returned an error.
    pub failed: usize,
    /// Records never attempted because their parent failed.
    pub skipped: usize,
}

impl PersistenceTally {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    pub fn merge(&mut self, other: PersistenceTally) {
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Result of one pipeline stage plus the failures it absorbed.
#[derive(Debug, Clone)]
pub struct StageOutput<T> {
    pub value: T,
    pub tally: PersistenceTally,
}
