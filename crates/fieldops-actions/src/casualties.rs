//! Support team roster and casualty resolution.
//!
//! Operations and black operations may send part of the team along. After
//! every such resolution a number of team members in `[0, max]` is lost,
//! where `max` is the whole sent team on failure and half of it (rounded
//! up) on success.

use fieldops_world::random_int_inclusive;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Team size and lifetime losses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    /// Team members available.
    pub size: u32,
    /// Team members lost over the whole session.
    pub lost: u32,
}

impl TeamRoster {
    /// Add one recruited member.
    pub const fn recruit(&mut self) {
        self.size = self.size.saturating_add(1);
    }

    /// Roll casualties for an action that sent `team_count` members.
    ///
    /// Returns the number actually lost, which never exceeds the roster.
    pub fn resolve_casualties(&mut self, team_count: u32, success: bool, rng: &mut impl Rng) -> u32 {
        if team_count == 0 {
            return 0;
        }
        let max_losses = if success {
            team_count.div_ceil(2)
        } else {
            team_count
        };
        let rolled = random_int_inclusive(rng, 0, i64::from(max_losses));
        let losses = u32::try_from(rolled).unwrap_or(0).min(self.size);
        self.size = self.size.saturating_sub(losses);
        self.lost = self.lost.saturating_add(losses);
        if losses > 0 {
            tracing::debug!(losses, remaining = self.size, "Team casualties");
        }
        losses
    }
}
