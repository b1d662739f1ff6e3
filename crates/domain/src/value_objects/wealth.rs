//! Starting wealth declared by a class or background.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::dice::DiceFormula;
use crate::error::DomainError;

/// Gold a source grants instead of its itemized equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WealthValue {
    /// A flat amount of gold pieces
    Fixed { gp: u32 },
    /// A dice formula such as "5d4*10"
    Formula { formula: DiceFormula },
}

impl WealthValue {
    /// Amount shown without rolling: the flat value, or the formula's average.
    pub fn fixed_amount(&self) -> u32 {
        match self {
            Self::Fixed { gp } => *gp,
            Self::Formula { formula } => formula.average().max(0) as u32,
        }
    }

    pub fn formula(&self) -> Option<&DiceFormula> {
        match self {
            Self::Fixed { .. } => None,
            Self::Formula { formula } => Some(formula),
        }
    }
}

impl fmt::Display for WealthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed { gp } => write!(f, "{} gp", gp),
            Self::Formula { formula } => write!(f, "{} gp", formula),
        }
    }
}

impl FromStr for WealthValue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_suffix("gp")
            .or_else(|| trimmed.strip_suffix("GP"))
            .unwrap_or(trimmed)
            .trim();
        if trimmed.is_empty() {
            return Err(DomainError::parse("Empty wealth value"));
        }
        if let Ok(gp) = trimmed.parse::<u32>() {
            return Ok(Self::Fixed { gp });
        }
        let formula = DiceFormula::parse(trimmed)?;
        Ok(Self::Formula { formula })
    }
}
