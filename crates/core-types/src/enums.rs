use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Customer gender as recorded in the source data.
///
/// Source values that are blank or outside the known set map to
/// `Unspecified` rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Gender {
    /// Parses a raw source value, falling back to `Unspecified`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unspecified => "Unspecified",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer age bracket.
///
/// The declaration order is the semantic order: demographic breakdowns always
/// present Youth, then Adults, then Seniors, regardless of input row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    Youth,
    Adults,
    Seniors,
}

impl AgeGroup {
    /// All brackets in their fixed presentation order.
    pub const ORDERED: [AgeGroup; 3] = [AgeGroup::Youth, AgeGroup::Adults, AgeGroup::Seniors];

    /// Parses a raw source value. Values outside the known brackets yield
    /// `None`; callers decide whether to drop or default such rows.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "youth" => Some(AgeGroup::Youth),
            "adults" => Some(AgeGroup::Adults),
            "seniors" => Some(AgeGroup::Seniors),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Youth => "Youth",
            AgeGroup::Adults => "Adults",
            AgeGroup::Seniors => "Seniors",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The customer attribute a demographic breakdown groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    Gender,
    AgeGroup,
    State,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Gender => "gender",
            Dimension::AgeGroup => "age_group",
            Dimension::State => "state",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gender" => Ok(Dimension::Gender),
            "age_group" | "age-group" => Ok(Dimension::AgeGroup),
            "state" => Ok(Dimension::State),
            other => Err(CoreError::InvalidInput(
                "dimension".to_string(),
                format!("'{other}' is not one of gender, age_group, state"),
            )),
        }
    }
}
