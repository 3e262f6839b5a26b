//! Hold lifecycle: state machine, derived liveness, and extension caps.
//!
//! A hold is a time-bounded exclusive claim on a (professional, date,
//! time-range) slot while a client completes checkout. The single
//! authoritative liveness rule is [`is_effectively_active`]: a hold counts
//! iff its status is ACTIVE *and* its expiry is in the future. Lazy expiry
//! on read and the periodic sweep both merely persist that derived fact.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Default hold lifetime when a salon has not configured its own.
pub const DEFAULT_HOLD_DURATION_MINUTES: i32 = 10;

/// Default single-extension size.
pub const DEFAULT_EXTENSION_MINUTES: i32 = 5;

/// Total hold lifetime is capped at `base * 3 / 2` regardless of how many
/// extensions are requested, preventing slot-squatting via repeated small
/// extensions.
pub const MAX_LIFETIME_NUMERATOR: i64 = 3;
pub const MAX_LIFETIME_DENOMINATOR: i64 = 2;

/// Hold status. `Active` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldStatus {
    Active,
    Converted,
    Released,
    Expired,
}

impl HoldStatus {
    /// Database/text representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Converted => "CONVERTED",
            Self::Released => "RELEASED",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(Self::Active),
            "CONVERTED" => Some(Self::Converted),
            "RELEASED" => Some(Self::Released),
            "EXPIRED" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Valid target states reachable from `self`. Terminal states return an
    /// empty slice because no further transitions are allowed.
    pub fn valid_transitions(self) -> &'static [HoldStatus] {
        match self {
            Self::Active => &[Self::Converted, Self::Released, Self::Expired],
            Self::Converted | Self::Released | Self::Expired => &[],
        }
    }

    pub fn can_transition(self, to: HoldStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a transition, returning an error message for invalid ones.
    pub fn validate_transition(self, to: HoldStatus) -> Result<(), String> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(format!(
                "Invalid hold transition: {} -> {}",
                self.as_str(),
                to.as_str()
            ))
        }
    }
}

/// The authoritative liveness rule: a hold occupies its slot iff it is
/// ACTIVE and its expiry has not passed.
pub fn is_effectively_active(status: HoldStatus, expires_at: Timestamp, now: Timestamp) -> bool {
    status == HoldStatus::Active && expires_at > now
}

/// Lifetime cap in minutes for a hold with the given base duration.
pub fn max_lifetime_minutes(base_duration_minutes: i32) -> i32 {
    (i64::from(base_duration_minutes) * MAX_LIFETIME_NUMERATOR / MAX_LIFETIME_DENOMINATOR) as i32
}

/// Check whether extending a hold by `extra_minutes` stays within the
/// lifetime cap of `1.5 x base_duration_minutes`.
///
/// `created_at`/`expires_at` bound the hold's current lifetime; extensions
/// already granted are therefore counted automatically.
pub fn validate_extension(
    created_at: Timestamp,
    expires_at: Timestamp,
    extra_minutes: i32,
    base_duration_minutes: i32,
) -> Result<(), String> {
    if extra_minutes <= 0 {
        return Err("extension minutes must be positive".to_string());
    }
    let current_secs = (expires_at - created_at).num_seconds();
    let requested_secs = current_secs + i64::from(extra_minutes) * 60;
    let cap_secs = i64::from(max_lifetime_minutes(base_duration_minutes)) * 60;
    if requested_secs > cap_secs {
        return Err(format!(
            "Extension denied: total hold time would be {} minutes, above the {} minute cap",
            requested_secs / 60,
            cap_secs / 60
        ));
    }
    Ok(())
}
