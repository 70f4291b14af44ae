//! Stamina-driven action switching.
//!
//! With automation enabled, the engine checks stamina once per processed
//! tick. At or below the low threshold it switches to the low action; at or
//! above the high threshold it switches to the high action. Targets are
//! plain [`ActionId`] values, never references into the catalog.

use fieldops_types::ActionId;
use serde::{Deserialize, Serialize};

/// Which threshold a setting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Stamina has recovered.
    High,
    /// Stamina has run down.
    Low,
}

impl Threshold {
    /// Upper-case label used in console lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Low => "LOW",
        }
    }
}

/// Automation targets and thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Automation {
    /// Whether switching happens at all.
    pub enabled: bool,
    /// Action started when stamina reaches the high threshold.
    pub high_action: Option<ActionId>,
    /// Action started when stamina falls to the low threshold.
    pub low_action: Option<ActionId>,
    /// High stamina threshold.
    pub high_threshold: f64,
    /// Low stamina threshold.
    pub low_threshold: f64,
}

impl Automation {
    /// Set the action for one threshold.
    pub const fn set_action(&mut self, which: Threshold, id: ActionId) {
        match which {
            Threshold::High => self.high_action = Some(id),
            Threshold::Low => self.low_action = Some(id),
        }
    }

    /// Set one stamina threshold.
    pub const fn set_threshold(&mut self, which: Threshold, value: f64) {
        match which {
            Threshold::High => self.high_threshold = value,
            Threshold::Low => self.low_threshold = value,
        }
    }

    /// Whether both actions are configured.
    pub const fn is_configured(&self) -> bool {
        self.high_action.is_some() && self.low_action.is_some()
    }

    /// The action to switch to, if any.
    ///
    /// The low check runs first. When it does not apply (stamina above the
    /// low threshold, or the low action already running) the high check
    /// runs. Returns `None` when disabled or when neither applies.
    pub fn target(&self, stamina: f64, running: Option<ActionId>) -> Option<ActionId> {
        if !self.enabled {
            return None;
        }
        self.low_action
            .filter(|&low| stamina <= self.low_threshold && running != Some(low))
            .or_else(|| {
                self.high_action
                    .filter(|&high| stamina >= self.high_threshold && running != Some(high))
            })
    }
}

#[cfg(test)]
mod tests {
    use fieldops_types::{ContractName, GeneralActionName};

    use super::*;

    const TRAIN: ActionId = ActionId::General(GeneralActionName::Training);
    const HUNT: ActionId = ActionId::Contract(ContractName::BountyHunter);

    fn configured() -> Automation {
        let mut automation = Automation::default();
        automation.set_action(Threshold::Low, TRAIN);
        automation.set_action(Threshold::High, HUNT);
        automation.set_threshold(Threshold::Low, 10.0);
        automation.set_threshold(Threshold::High, 50.0);
        automation.enabled = true;
        automation
    }

    #[test]
    fn disabled_never_switches() {
        let automation = Automation {
            enabled: false,
            ..configured()
        };
        assert_eq!(automation.target(0.0, None), None);
    }

    #[test]
    fn low_stamina_switches_to_low_action() {
        let automation = configured();
        assert_eq!(automation.target(10.0, Some(HUNT)), Some(TRAIN));
        assert_eq!(automation.target(5.0, Some(TRAIN)), None);
    }

    #[test]
    fn recovered_stamina_switches_to_high_action() {
        let automation = configured();
        assert_eq!(automation.target(50.0, Some(TRAIN)), Some(HUNT));
        assert_eq!(automation.target(60.0, Some(HUNT)), None);
    }

    #[test]
    fn between_thresholds_keeps_running() {
        assert_eq!(configured().target(30.0, Some(TRAIN)), None);
    }

    #[test]
    fn inverted_thresholds_fall_through_to_high_action() {
        let mut automation = configured();
        automation.set_threshold(Threshold::Low, 50.0);
        automation.set_threshold(Threshold::High, 10.0);
        // Both thresholds match; low wins until it is already running.
        assert_eq!(automation.target(30.0, None), Some(TRAIN));
        assert_eq!(automation.target(30.0, Some(TRAIN)), Some(HUNT));
        assert_eq!(automation.target(30.0, Some(HUNT)), Some(TRAIN));
    }

    #[test]
    fn configured_needs_both_actions() {
        let mut automation = Automation::default();
        automation.set_action(Threshold::Low, TRAIN);
        assert!(!automation.is_configured());
        automation.set_action(Threshold::High, HUNT);
        assert!(automation.is_configured());
    }
}
