//! Promotions Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Promotion UUID
pub type PromotionUuid = TypedUuid<PromotionRecord>;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed string enum stored and transported by its snake case name.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $label,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum!(
    /// What kind of campaign a promotion is.
    PromotionKind, "promotion type", {
        Contest => "contest",
        Promotion => "promotion",
        Discount => "discount",
        Bonus => "bonus",
    }
);

string_enum!(
    /// The activity participants are measured on.
    TargetAction, "target action", {
        Sales => "sales",
        Signups => "signups",
        Referrals => "referrals",
        Engagement => "engagement",
        Other => "other",
    }
);

string_enum!(
    /// Where a participant stands in a promotion.
    ///
    /// `Completed` can be stored but is never produced by the participation
    /// rules; reaching the target moves a participant straight to `Won`.
    ParticipantStatus, "participant status", {
        Participating => "participating",
        Completed => "completed",
        Won => "won",
        NotQualified => "not_qualified",
    }
);

impl Default for TargetAction {
    fn default() -> Self {
        Self::Sales
    }
}

impl Default for ParticipantStatus {
    fn default() -> Self {
        Self::Participating
    }
}

impl ParticipantStatus {
    /// `Won` and `NotQualified` are final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::NotQualified)
    }
}

/// Progress toward a target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Progress {
    pub current: f64,
    pub target: f64,
}

/// Participant Record
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    pub user_uuid: UserUuid,
    pub joined_at: Timestamp,
    pub progress: Progress,
    pub status: ParticipantStatus,
}

/// Promotion Record
///
/// Participants are kept in join order.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionRecord {
    pub uuid: PromotionUuid,
    pub title: String,
    pub description: String,
    pub kind: PromotionKind,
    pub reward: String,
    pub criteria: String,
    pub target_amount: f64,
    pub target_action: TargetAction,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub is_active: bool,
    pub max_participants: u32,
    pub image_url: String,
    pub participants: Vec<ParticipantRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PromotionRecord {
    #[must_use]
    pub fn participant(&self, user: UserUuid) -> Option<&ParticipantRecord> {
        self.participants
            .iter()
            .find(|participant| participant.user_uuid == user)
    }

    /// Whether the promotion is accepting activity at `now`.
    #[must_use]
    pub fn is_running_at(&self, now: Timestamp) -> bool {
        self.is_active && self.start_date <= now && now <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_through_their_names() {
        for kind in PromotionKind::ALL {
            assert_eq!(kind.as_str().parse::<PromotionKind>(), Ok(*kind));
        }

        for action in TargetAction::ALL {
            assert_eq!(action.as_str().parse::<TargetAction>(), Ok(*action));
        }

        for status in ParticipantStatus::ALL {
            assert_eq!(status.as_str().parse::<ParticipantStatus>(), Ok(*status));
        }
    }

    #[test]
    fn unknown_names_report_which_enum_failed() {
        let error = "raffle".parse::<PromotionKind>().err();

        assert_eq!(
            error.map(|e| e.to_string()),
            Some("unknown promotion type: raffle".to_string())
        );
    }

    #[test]
    fn only_won_and_not_qualified_are_terminal() {
        assert!(ParticipantStatus::Won.is_terminal());
        assert!(ParticipantStatus::NotQualified.is_terminal());
        assert!(!ParticipantStatus::Participating.is_terminal());
        assert!(!ParticipantStatus::Completed.is_terminal());
    }
}
