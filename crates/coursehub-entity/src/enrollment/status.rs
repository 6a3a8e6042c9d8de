//! Enrollment status enumeration and transition table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of an enrollment request.
///
/// `Pending` is the initial state. `Rejected`, `Completed`, `Refunded`,
/// and `Expired` are terminal. `Active` is the only state counted by the
/// aggregate counters, so every transition into it increments them and
/// every transition out of it decrements them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    /// Awaiting an admin decision on the payment proof.
    Pending,
    /// Approved; grants content access.
    Active,
    /// Declined by an admin.
    Rejected,
    /// Finished the course.
    Completed,
    /// Payment returned.
    Refunded,
    /// Access window lapsed.
    Expired,
}

impl EnrollmentStatus {
    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::Completed | Self::Refunded | Self::Expired
        )
    }

    /// Whether moving from this state to `next` is a legal transition.
    pub fn can_transition_to(&self, next: EnrollmentStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Active) | (Self::Pending, Self::Rejected) => true,
            (Self::Active, Self::Completed)
            | (Self::Active, Self::Refunded)
            | (Self::Active, Self::Expired) => true,
            _ => false,
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Refunded => "refunded",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EnrollmentStatus::*;

    const ALL: [EnrollmentStatus; 6] = [Pending, Active, Rejected, Completed, Refunded, Expired];

    #[test]
    fn test_pending_decisions() {
        assert!(Pending.can_transition_to(Active));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_active_moves_onward_only() {
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Refunded));
        assert!(Active.can_transition_to(Expired));
        assert!(!Active.can_transition_to(Active));
        assert!(!Active.can_transition_to(Pending));
        assert!(!Active.can_transition_to(Rejected));
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        for from in [Rejected, Completed, Refunded, Expired] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be illegal");
            }
        }
    }
}
