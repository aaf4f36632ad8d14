//! Promotion response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rave_app::domain::{
    promotions::{
        data::{JoinReceipt, MyParticipation, ParticipantDetails, ProgressReceipt},
        records::{ParticipantRecord, Progress, PromotionRecord},
    },
    users::records::UserRecord,
};

/// Participant progress toward the promotion target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProgressResponse {
    /// Accumulated progress
    pub current: f64,

    /// Target snapshotted when the user joined
    pub target: f64,
}

impl From<Progress> for ProgressResponse {
    fn from(progress: Progress) -> Self {
        ProgressResponse {
            current: progress.current,
            target: progress.target,
        }
    }
}

/// A participant entry as stored on the promotion.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ParticipantResponse {
    /// Participating user
    pub user_id: Uuid,

    /// When the user joined
    pub joined_at: String,

    /// Progress toward the target
    pub progress: ProgressResponse,

    /// `participating`, `completed`, `won` or `not_qualified`
    pub status: String,
}

impl From<ParticipantRecord> for ParticipantResponse {
    fn from(participant: ParticipantRecord) -> Self {
        ParticipantResponse {
            user_id: participant.user_uuid.into(),
            joined_at: participant.joined_at.to_string(),
            progress: participant.progress.into(),
            status: participant.status.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromotionResponse {
    /// The unique identifier of the promotion
    pub id: Uuid,
    pub title: String,
    pub description: String,

    /// `contest`, `promotion`, `discount` or `bonus`
    #[serde(rename = "type")]
    pub kind: String,
    pub reward: String,
    pub criteria: String,
    pub target_amount: f64,
    pub target_action: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,

    /// 0 means unlimited
    pub max_participants: u32,
    pub image_url: String,

    /// Participants in join order
    pub participants: Vec<ParticipantResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PromotionRecord> for PromotionResponse {
    fn from(promotion: PromotionRecord) -> Self {
        PromotionResponse {
            id: promotion.uuid.into(),
            title: promotion.title,
            description: promotion.description,
            kind: promotion.kind.to_string(),
            reward: promotion.reward,
            criteria: promotion.criteria,
            target_amount: promotion.target_amount,
            target_action: promotion.target_action.to_string(),
            start_date: promotion.start_date.to_string(),
            end_date: promotion.end_date.to_string(),
            is_active: promotion.is_active,
            max_participants: promotion.max_participants,
            image_url: promotion.image_url,
            participants: promotion
                .participants
                .into_iter()
                .map(Into::into)
                .collect(),
            created_at: promotion.created_at.to_string(),
            updated_at: promotion.updated_at.to_string(),
        }
    }
}

/// Returned after deleting a promotion.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeletedPromotionResponse {
    /// The deleted promotion
    pub id: Uuid,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JoinResponse {
    pub promotion_id: Uuid,
    pub title: String,
    pub target_amount: f64,
    pub target_action: String,
}

impl From<JoinReceipt> for JoinResponse {
    fn from(receipt: JoinReceipt) -> Self {
        JoinResponse {
            promotion_id: receipt.promotion_uuid.into(),
            title: receipt.title,
            target_amount: receipt.target_amount,
            target_action: receipt.target_action.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressUpdateResponse {
    pub promotion_id: Uuid,
    pub current_progress: f64,

    /// The promotion's current target amount
    pub target: f64,
    pub status: String,
}

impl From<ProgressReceipt> for ProgressUpdateResponse {
    fn from(receipt: ProgressReceipt) -> Self {
        ProgressUpdateResponse {
            promotion_id: receipt.promotion_uuid.into(),
            current_progress: receipt.current_progress,
            target: receipt.target,
            status: receipt.status.to_string(),
        }
    }
}

/// Display projection of a participating user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ParticipantUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<UserRecord> for ParticipantUserResponse {
    fn from(user: UserRecord) -> Self {
        ParticipantUserResponse {
            id: user.uuid.into(),
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
        }
    }
}

/// A participant entry with its user resolved.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ParticipantDetailsResponse {
    pub user_id: Uuid,

    /// `null` when the user no longer exists
    pub user: Option<ParticipantUserResponse>,
    pub joined_at: String,
    pub progress: ProgressResponse,
    pub status: String,
}

impl From<ParticipantDetails> for ParticipantDetailsResponse {
    fn from(details: ParticipantDetails) -> Self {
        let participant = details.participant;

        ParticipantDetailsResponse {
            user_id: participant.user_uuid.into(),
            user: details.user.map(Into::into),
            joined_at: participant.joined_at.to_string(),
            progress: participant.progress.into(),
            status: participant.status.to_string(),
        }
    }
}

/// A promotion seen through the caller's own participant entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MyPromotionResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub reward: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    pub progress: ProgressResponse,
    pub status: String,
}

impl From<MyParticipation> for MyPromotionResponse {
    fn from(entry: MyParticipation) -> Self {
        MyPromotionResponse {
            id: entry.promotion_uuid.into(),
            title: entry.title,
            description: entry.description,
            kind: entry.kind.to_string(),
            reward: entry.reward,
            start_date: entry.start_date.to_string(),
            end_date: entry.end_date.to_string(),
            is_active: entry.is_active,
            progress: entry.progress.into(),
            status: entry.status.to_string(),
        }
    }
}
