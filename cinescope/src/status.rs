//! Status-code contract of a single call.
//!
//! Every dispatched request carries an [`ExpectedStatus`]: either one code or
//! a set of acceptable codes. A response whose status is not a member fails
//! the call with [`Error::UnexpectedStatus`]. There are no retries at this
//! layer; a mismatch is an assertion failure, not a transient fault.

use itertools::Itertools;
use reqwest::StatusCode;
use std::fmt;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedStatus {
    One(u16),
    AnyOf(Vec<u16>),
}

impl Default for ExpectedStatus {
    fn default() -> Self {
        ExpectedStatus::One(StatusCode::OK.as_u16())
    }
}

impl ExpectedStatus {
    pub fn any_of<I, S>(codes: I) -> ExpectedStatus
    where
        I: IntoIterator<Item = S>,
        S: Into<ExpectedStatus>,
    {
        ExpectedStatus::AnyOf(
            codes
                .into_iter()
                .flat_map(|code| {
                    let expected: ExpectedStatus = code.into();
                    expected.codes().to_vec()
                })
                .collect(),
        )
    }

    pub fn codes(&self) -> &[u16] {
        match self {
            ExpectedStatus::One(code) => std::slice::from_ref(code),
            ExpectedStatus::AnyOf(codes) => codes,
        }
    }

    pub fn contains(&self, status: StatusCode) -> bool {
        self.codes().contains(&status.as_u16())
    }

    /// An expectation no response could satisfy is rejected up front.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.codes().is_empty() {
            return Err(Error::EmptyExpectedStatus);
        }
        Ok(())
    }

    /// Accepts `actual` iff it is a member of the expectation.
    pub fn check(&self, actual: StatusCode) -> Result<()> {
        self.ensure_non_empty()?;
        if self.contains(actual) {
            Ok(())
        } else {
            Err(Error::UnexpectedStatus {
                actual,
                expected: self.clone(),
            })
        }
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedStatus::One(code) => write!(f, "{code}"),
            ExpectedStatus::AnyOf(codes) => write!(f, "[{}]", codes.iter().join(", ")),
        }
    }
}

impl From<u16> for ExpectedStatus {
    fn from(code: u16) -> Self {
        ExpectedStatus::One(code)
    }
}

impl From<StatusCode> for ExpectedStatus {
    fn from(code: StatusCode) -> Self {
        ExpectedStatus::One(code.as_u16())
    }
}

impl<const N: usize> From<[u16; N]> for ExpectedStatus {
    fn from(codes: [u16; N]) -> Self {
        ExpectedStatus::AnyOf(codes.to_vec())
    }
}

impl<const N: usize> From<[StatusCode; N]> for ExpectedStatus {
    fn from(codes: [StatusCode; N]) -> Self {
        ExpectedStatus::AnyOf(codes.iter().map(StatusCode::as_u16).collect())
    }
}

impl From<&[u16]> for ExpectedStatus {
    fn from(codes: &[u16]) -> Self {
        ExpectedStatus::AnyOf(codes.to_vec())
    }
}

impl From<Vec<u16>> for ExpectedStatus {
    fn from(codes: Vec<u16>) -> Self {
        ExpectedStatus::AnyOf(codes)
    }
}
