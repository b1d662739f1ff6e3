//! Coinage carried by containers and granted by the wealth option.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub pp: u32,
    #[serde(default)]
    pub gp: u32,
    #[serde(default)]
    pub ep: u32,
    #[serde(default)]
    pub sp: u32,
    #[serde(default)]
    pub cp: u32,
}

impl Currency {
    pub fn gold(gp: u32) -> Self {
        Self {
            gp,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Add for Currency {
    type Output = Currency;

    fn add(self, rhs: Currency) -> Currency {
        Currency {
            pp: self.pp.saturating_add(rhs.pp),
            gp: self.gp.saturating_add(rhs.gp),
            ep: self.ep.saturating_add(rhs.ep),
            sp: self.sp.saturating_add(rhs.sp),
            cp: self.cp.saturating_add(rhs.cp),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            (self.pp, "pp"),
            (self.gp, "gp"),
            (self.ep, "ep"),
            (self.sp, "sp"),
            (self.cp, "cp"),
        ]
        .iter()
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, unit)| format!("{} {}", amount, unit))
        .collect();

        if parts.is_empty() {
            write!(f, "0 gp")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_skips_empty_denominations() {
        let purse = Currency {
            gp: 10,
            sp: 5,
            ..Default::default()
        };
        assert_eq!(purse.to_string(), "10 gp, 5 sp");
        assert_eq!(Currency::default().to_string(), "0 gp");
    }

    #[test]
    fn add_sums_each_denomination() {
        let total = Currency::gold(15) + Currency { cp: 3, ..Default::default() };
        assert_eq!(total.gp, 15);
        assert_eq!(total.cp, 3);
        assert!(!total.is_empty());
    }

    #[test]
    fn missing_fields_deserialize_as_zero() {
        let purse: Currency = serde_json::from_str(r#"{"gp": 12}"#).unwrap();
        assert_eq!(purse, Currency::gold(12));
    }
}
