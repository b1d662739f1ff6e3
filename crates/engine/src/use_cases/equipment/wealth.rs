//! Starting wealth as an alternative to itemized equipment.

use std::sync::Arc;

use outfitter_domain::{DiceRollResult, SourceKind, WealthValue};

use super::controls::{ControlId, WealthControl};
use super::error::WealthError;
use crate::infrastructure::app_settings::Ruleset;
use crate::infrastructure::ports::{ChatPort, RandomPort, RollAnnouncement};

pub struct WealthService {
    ruleset: Ruleset,
    publish_rolls: bool,
    random: Arc<dyn RandomPort>,
    chat: Arc<dyn ChatPort>,
}

impl WealthService {
    pub fn new(
        ruleset: Ruleset,
        publish_rolls: bool,
        random: Arc<dyn RandomPort>,
        chat: Arc<dyn ChatPort>,
    ) -> Self {
        Self {
            ruleset,
            publish_rolls,
            random,
            chat,
        }
    }

    pub fn ruleset(&self) -> Ruleset {
        self.ruleset
    }

    /// The wealth option for a source.
    ///
    /// Under the legacy ruleset a formula must be rolled; everything else
    /// shows a fixed amount (a formula's average when no roll is asked for).
    pub fn control_for(&self, source: SourceKind, value: &WealthValue) -> WealthControl {
        let requires_roll = self.ruleset.requires_roll() && value.formula().is_some();
        let (label, fixed_amount) = if requires_roll {
            (format!("Roll {} for starting wealth instead", value), None)
        } else {
            let amount = value.fixed_amount();
            (format!("Take {} gp instead of equipment", amount), Some(amount))
        };

        WealthControl {
            id: ControlId::wealth(source),
            source,
            label,
            value: value.clone(),
            requires_roll,
            fixed_amount,
        }
    }

    /// Roll a wealth formula and, when configured, announce it in chat.
    ///
    /// Chat failures are logged; the roll still counts.
    pub async fn roll(
        &self,
        control: &WealthControl,
        source_name: &str,
    ) -> Result<DiceRollResult, WealthError> {
        let formula = match control.value.formula() {
            Some(formula) if control.requires_roll => formula,
            _ => return Err(WealthError::RollNotRequired),
        };

        let roll = formula.roll_with(|min, max| self.random.gen_range(min, max));
        tracing::info!(
            source = %control.source,
            formula = %formula.display(),
            total = roll.total,
            "Rolled starting wealth"
        );

        if self.publish_rolls {
            let announcement = RollAnnouncement {
                source: control.source,
                source_name: source_name.to_string(),
                roll: roll.clone(),
            };
            if let Err(e) = self.chat.publish_roll(announcement).await {
                tracing::warn!(
                    source = %control.source,
                    error = %e,
                    "Failed to publish wealth roll"
                );
            }
        }

        Ok(roll)
    }
}
