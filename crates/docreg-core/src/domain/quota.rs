//! Admission quota
//!
//! A [`Quota`] is the immutable pair of window length and the number of
//! submissions admitted per window. It is fixed when the submitter is built.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Unit in which a window length is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl WindowUnit {
    /// Returns the duration of `count` units
    pub fn times(self, count: u32) -> Duration {
        let count = u64::from(count);
        match self {
            WindowUnit::Milliseconds => Duration::from_millis(count),
            WindowUnit::Seconds => Duration::from_secs(count),
            WindowUnit::Minutes => Duration::from_secs(count * 60),
            WindowUnit::Hours => Duration::from_secs(count * 3_600),
            WindowUnit::Days => Duration::from_secs(count * 86_400),
        }
    }
}

impl std::fmt::Display for WindowUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowUnit::Milliseconds => write!(f, "milliseconds"),
            WindowUnit::Seconds => write!(f, "seconds"),
            WindowUnit::Minutes => write!(f, "minutes"),
            WindowUnit::Hours => write!(f, "hours"),
            WindowUnit::Days => write!(f, "days"),
        }
    }
}

/// Window length and admissions allowed per window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    window: Duration,
    max_admissions: u32,
}

impl Quota {
    /// Creates a quota from an explicit window length.
    ///
    /// Both values must be positive.
    pub fn new(window: Duration, max_admissions: u32) -> Result<Self, DomainError> {
        if window.is_zero() {
            return Err(DomainError::InvalidQuota(
                "window must be greater than zero".to_string(),
            ));
        }
        if max_admissions == 0 {
            return Err(DomainError::InvalidQuota(
                "max_admissions must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            window,
            max_admissions,
        })
    }

    /// Creates a quota whose window is `count` units long
    ///
    /// # Example
    ///
    /// ```
    /// use docreg_core::domain::{Quota, WindowUnit};
    ///
    /// // At most 5 submissions per minute
    /// let quota = Quota::per_unit(WindowUnit::Minutes, 1, 5).unwrap();
    /// assert_eq!(quota.window().as_secs(), 60);
    /// ```
    pub fn per_unit(
        unit: WindowUnit,
        count: u32,
        max_admissions: u32,
    ) -> Result<Self, DomainError> {
        if count == 0 {
            return Err(DomainError::InvalidQuota(format!(
                "window count of {unit} must be greater than zero"
            )));
        }
        Self::new(unit.times(count), max_admissions)
    }

    /// Length of one admission window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admissions permitted within one window
    pub fn max_admissions(&self) -> u32 {
        self.max_admissions
    }
}
