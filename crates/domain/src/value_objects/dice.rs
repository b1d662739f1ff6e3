//! Dice formulas for rolled starting wealth, e.g. "5d4*10" or "2d4".

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    #[error("Empty dice formula")]
    Empty,
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    #[error("Die size must be at least 2")]
    InvalidDieSize,
    #[error("Multiplier must be at least 1")]
    InvalidMultiplier,
}

/// `NdS+k`, scaled by `*m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    pub dice_count: u8,
    pub die_size: u8,
    pub modifier: i32,
    pub multiplier: u32,
}

impl DiceFormula {
    pub fn new(
        dice_count: u8,
        die_size: u8,
        modifier: i32,
        multiplier: u32,
    ) -> Result<Self, DiceParseError> {
        if dice_count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if die_size < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        if multiplier == 0 {
            return Err(DiceParseError::InvalidMultiplier);
        }
        Ok(Self {
            dice_count,
            die_size,
            modifier,
            multiplier,
        })
    }

    /// Accepts "5d4*10", "5d4 x 10", "5d4×10", "1d6+2", "2d6-1" and "d8".
    /// Case and whitespace are ignored.
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let compact: String = input
            .to_lowercase()
            .replace('×', "*")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if compact.is_empty() {
            return Err(DiceParseError::Empty);
        }
        let invalid = || DiceParseError::InvalidFormat(input.trim().to_string());

        let (dice, multiplier) = match compact.rsplit_once(['*', 'x']) {
            Some((dice, factor)) => (dice, factor.parse::<u32>().map_err(|_| invalid())?),
            None => (compact.as_str(), 1),
        };
        let (count, rest) = dice.split_once('d').ok_or_else(invalid)?;
        let (size, modifier) = match rest.find(['+', '-']) {
            Some(0) => return Err(invalid()),
            Some(pos) => (
                &rest[..pos],
                rest[pos..].parse::<i32>().map_err(|_| invalid())?,
            ),
            None => (rest, 0),
        };

        let dice_count = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| invalid())?
        };
        let die_size = size.parse().map_err(|_| invalid())?;
        Self::new(dice_count, die_size, modifier, multiplier)
    }

    /// Roll the dice, drawing each die from `roll_die(1, die_size)`.
    ///
    /// Randomness is injected so the domain layer stays deterministic in tests.
    pub fn roll_with<F>(&self, mut roll_die: F) -> DiceRollResult
    where
        F: FnMut(i32, i32) -> i32,
    {
        let individual_rolls: Vec<i32> = (0..self.dice_count)
            .map(|_| roll_die(1, self.die_size as i32).clamp(1, self.die_size as i32))
            .collect();

        let dice_total: i32 = individual_rolls.iter().sum();
        let total = ((dice_total + self.modifier) * self.multiplier as i32).max(0);

        DiceRollResult {
            formula: self.clone(),
            individual_rolls,
            dice_total,
            total,
        }
    }

    pub fn min_roll(&self) -> i32 {
        ((self.dice_count as i32 + self.modifier) * self.multiplier as i32).max(0)
    }

    pub fn max_roll(&self) -> i32 {
        ((self.dice_count as i32 * self.die_size as i32 + self.modifier) * self.multiplier as i32)
            .max(0)
    }

    /// Expected value, rounded down
    pub fn average(&self) -> i32 {
        let doubled = self.dice_count as i32 * (self.die_size as i32 + 1) + 2 * self.modifier;
        (doubled * self.multiplier as i32 / 2).max(0)
    }

    pub fn display(&self) -> String {
        let mut out = format!("{}d{}", self.dice_count, self.die_size);
        if self.modifier > 0 {
            out.push_str(&format!("+{}", self.modifier));
        } else if self.modifier < 0 {
            out.push_str(&self.modifier.to_string());
        }
        if self.multiplier != 1 {
            out.push_str(&format!("*{}", self.multiplier));
        }
        out
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRollResult {
    pub formula: DiceFormula,
    pub individual_rolls: Vec<i32>,
    /// Sum of the dice before modifier and multiplier.
    pub dice_total: i32,
    pub total: i32,
}

impl DiceRollResult {
    /// "5d4[1, 2, 3, 4, 2] * 10 = 120"
    pub fn breakdown(&self) -> String {
        let rolls: Vec<String> = self.individual_rolls.iter().map(|r| r.to_string()).collect();
        let mut out = format!(
            "{}d{}[{}]",
            self.formula.dice_count,
            self.formula.die_size,
            rolls.join(", ")
        );
        if self.formula.modifier > 0 {
            out.push_str(&format!(" + {}", self.formula.modifier));
        } else if self.formula.modifier < 0 {
            out.push_str(&format!(" - {}", -self.formula.modifier));
        }
        if self.formula.multiplier != 1 {
            out.push_str(&format!(" * {}", self.formula.multiplier));
        }
        format!("{} = {}", out, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let formula = DiceFormula::parse("2d4").unwrap();
        assert_eq!(formula.dice_count, 2);
        assert_eq!(formula.die_size, 4);
        assert_eq!(formula.modifier, 0);
        assert_eq!(formula.multiplier, 1);
    }

    #[test]
    fn test_parse_shorthand() {
        let formula = DiceFormula::parse("d8").unwrap();
        assert_eq!(formula.dice_count, 1);
        assert_eq!(formula.die_size, 8);
    }

    #[test]
    fn test_parse_multiplier_forms() {
        for input in ["5d4*10", "5d4 * 10", "5d4 x 10", "5d4×10", "5D4X10"] {
            let formula = DiceFormula::parse(input).unwrap();
            assert_eq!(formula.dice_count, 5, "{}", input);
            assert_eq!(formula.die_size, 4, "{}", input);
            assert_eq!(formula.multiplier, 10, "{}", input);
        }
    }

    #[test]
    fn test_parse_modifier_and_multiplier() {
        let formula = DiceFormula::parse("1d6+2*5").unwrap();
        assert_eq!(formula.modifier, 2);
        assert_eq!(formula.multiplier, 5);

        let formula = DiceFormula::parse("2d6-1").unwrap();
        assert_eq!(formula.modifier, -1);
    }

    #[test]
    fn test_parse_rejects_a_leading_sign_in_the_die_size() {
        assert!(matches!(
            DiceFormula::parse("2d-6"),
            Err(DiceParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(DiceFormula::parse(""), Err(DiceParseError::Empty)));
        assert!(matches!(
            DiceFormula::parse("20"),
            Err(DiceParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            DiceFormula::parse("0d4"),
            Err(DiceParseError::InvalidDiceCount)
        ));
        assert!(matches!(
            DiceFormula::parse("1d1"),
            Err(DiceParseError::InvalidDieSize)
        ));
        assert!(matches!(
            DiceFormula::parse("4d4*0"),
            Err(DiceParseError::InvalidMultiplier)
        ));
    }

    #[test]
    fn test_roll_with_fixed_dice() {
        let formula = DiceFormula::parse("5d4*10").unwrap();
        let result = formula.roll_with(|_, _| 3);
        assert_eq!(result.individual_rolls, vec![3, 3, 3, 3, 3]);
        assert_eq!(result.dice_total, 15);
        assert_eq!(result.total, 150);
        assert_eq!(result.breakdown(), "5d4[3, 3, 3, 3, 3] * 10 = 150");
    }

    #[test]
    fn test_roll_clamps_out_of_range_dice() {
        let formula = DiceFormula::parse("2d6").unwrap();
        let result = formula.roll_with(|_, _| 99);
        assert_eq!(result.total, 12);
    }

    #[test]
    fn test_bounds_and_average() {
        let formula = DiceFormula::parse("5d4*10").unwrap();
        assert_eq!(formula.min_roll(), 50);
        assert_eq!(formula.max_roll(), 200);
        assert_eq!(formula.average(), 125);

        let formula = DiceFormula::parse("2d4").unwrap();
        assert_eq!(formula.average(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(DiceFormula::new(5, 4, 0, 10).unwrap().display(), "5d4*10");
        assert_eq!(DiceFormula::new(1, 20, 5, 1).unwrap().display(), "1d20+5");
        assert_eq!(DiceFormula::new(1, 20, -3, 1).unwrap().display(), "1d20-3");
    }
}
