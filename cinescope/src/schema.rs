//! Declarative field constraints for request and response bodies.
//!
//! Models implement [`Validate`] by running their fields through a
//! [`Checker`], which records every violated constraint rather than stopping
//! at the first one. A failed check surfaces as [`ValidationError`], kept
//! distinct from a status mismatch so a test can tell "wrong status" apart
//! from "right status, malformed payload".

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Display;

/// Email shape accepted by the auth service.
pub static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("valid email regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub reason: String,
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{schema} failed validation: {}", violations.iter().join("; "))]
pub struct ValidationError {
    pub schema: &'static str,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Validate::validate)
    }
}

pub struct Checker {
    schema: &'static str,
    violations: Vec<Violation>,
}

impl Checker {
    pub fn new(schema: &'static str) -> Checker {
        Checker {
            schema,
            violations: Vec::new(),
        }
    }

    fn violate(&mut self, field: &'static str, reason: impl Into<String>) {
        self.violations.push(Violation {
            field,
            reason: reason.into(),
        });
    }

    /// Character count within `min..=max`.
    pub fn length(mut self, field: &'static str, value: &str, min: usize, max: Option<usize>) -> Self {
        let len = value.chars().count();
        if len < min {
            self.violate(field, format!("length {len} is shorter than {min}"));
        }
        if let Some(max) = max.filter(|max| len > *max) {
            self.violate(field, format!("length {len} is longer than {max}"));
        }
        self
    }

    pub fn range<T>(mut self, field: &'static str, value: T, min: Option<T>, max: Option<T>) -> Self
    where
        T: PartialOrd + Display + Copy,
    {
        if let Some(min) = min.filter(|min| value < *min) {
            self.violate(field, format!("{value} is less than {min}"));
        }
        if let Some(max) = max.filter(|max| value > *max) {
            self.violate(field, format!("{value} is greater than {max}"));
        }
        self
    }

    /// [`Checker::range`] for optional fields; `None` always passes.
    pub fn opt_range<T>(self, field: &'static str, value: Option<T>, min: Option<T>, max: Option<T>) -> Self
    where
        T: PartialOrd + Display + Copy,
    {
        match value {
            Some(value) => self.range(field, value, min, max),
            None => self,
        }
    }

    pub fn pattern(mut self, field: &'static str, value: &str, pattern: &Regex) -> Self {
        if !pattern.is_match(value) {
            self.violate(field, format!("{value:?} does not match {}", pattern.as_str()));
        }
        self
    }

    pub fn contains(mut self, field: &'static str, value: &str, needle: &str) -> Self {
        if !value.contains(needle) {
            self.violate(field, format!("{value:?} does not contain {needle:?}"));
        }
        self
    }

    /// ISO-8601 date, local date-time, or offset date-time.
    pub fn iso8601(mut self, field: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            if !is_iso8601(value) {
                self.violate(field, format!("{value:?} is not an ISO-8601 timestamp"));
            }
        }
        self
    }

    pub fn rule(mut self, field: &'static str, ok: bool, reason: impl Into<String>) -> Self {
        if !ok {
            self.violate(field, reason);
        }
        self
    }

    /// Folds the violations of a nested value into this checker.
    pub fn nested<T: Validate>(mut self, value: &T) -> Self {
        if let Err(e) = value.validate() {
            self.violations.extend(e.violations);
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                schema: self.schema,
                violations: self.violations,
            })
        }
    }
}

fn is_iso8601(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
