//! Promotions Data

use jiff::Timestamp;

use crate::domain::{
    promotions::{
        errors::{MissingFields, PromotionValidationError},
        records::{
            ParticipantRecord, ParticipantStatus, Progress, PromotionKind, PromotionUuid,
            TargetAction,
        },
    },
    users::records::UserRecord,
};

/// Unvalidated promotion input, as received from an administrator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromotionDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<PromotionKind>,
    pub reward: Option<String>,
    pub criteria: Option<String>,
    pub target_amount: Option<f64>,
    pub target_action: Option<TargetAction>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub is_active: Option<bool>,
    pub max_participants: Option<u32>,
    pub image_url: Option<String>,
}

/// New Promotion Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromotion {
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
}

impl NewPromotion {
    /// Validate a draft, reporting every missing required field at once.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionValidationError`] when required fields are absent or
    /// blank, the target amount is negative or not finite, the end date is not
    /// after the start date, or the capacity does not fit the storage column.
    pub fn from_draft(
        uuid: PromotionUuid,
        draft: PromotionDraft,
    ) -> Result<Self, PromotionValidationError> {
        let mut missing = MissingFields::new();

        let title = required_text(draft.title, "title", &mut missing);
        let description = required_text(draft.description, "description", &mut missing);
        let kind = required(draft.kind, "type", &mut missing);
        let reward = required_text(draft.reward, "reward", &mut missing);
        let criteria = required_text(draft.criteria, "criteria", &mut missing);
        let start_date = required(draft.start_date, "start date", &mut missing);
        let end_date = required(draft.end_date, "end date", &mut missing);

        let (
            Some(title),
            Some(description),
            Some(kind),
            Some(reward),
            Some(criteria),
            Some(start_date),
            Some(end_date),
        ) = (title, description, kind, reward, criteria, start_date, end_date)
        else {
            return Err(PromotionValidationError::MissingFields(missing));
        };

        let target_amount = draft.target_amount.unwrap_or_default();

        let max_participants = draft.max_participants.unwrap_or_default();

        validate_target_amount(target_amount)?;
        validate_date_range(start_date, end_date)?;
        validate_max_participants(max_participants)?;

        Ok(Self {
            uuid,
            title,
            description,
            kind,
            reward,
            criteria,
            target_amount,
            target_action: draft.target_action.unwrap_or_default(),
            start_date,
            end_date,
            is_active: draft.is_active.unwrap_or(true),
            max_participants,
            image_url: draft.image_url.unwrap_or_default(),
        })
    }
}

/// Promotion Update Data
///
/// Each `Some` field replaces the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromotionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<PromotionKind>,
    pub reward: Option<String>,
    pub criteria: Option<String>,
    pub target_amount: Option<f64>,
    pub target_action: Option<TargetAction>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub is_active: Option<bool>,
    pub max_participants: Option<u32>,
    pub image_url: Option<String>,
}

/// Promotion listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotionFilter {
    pub kind: Option<PromotionKind>,
    pub is_active: Option<bool>,
}

/// A 1-based page request with a bounded page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            limit: request.limit(),
        }
    }

    #[must_use]
    pub fn pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit.max(1)))
    }
}

/// Summary returned after joining.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinReceipt {
    pub promotion_uuid: PromotionUuid,
    pub title: String,
    pub target_amount: f64,
    pub target_action: TargetAction,
}

/// Summary returned after a progress update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReceipt {
    pub promotion_uuid: PromotionUuid,
    pub current_progress: f64,
    pub target: f64,
    pub status: ParticipantStatus,
}

/// A participant entry with its user resolved, if the user still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantDetails {
    pub participant: ParticipantRecord,
    pub user: Option<UserRecord>,
}

/// A promotion seen through one participant's own entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MyParticipation {
    pub promotion_uuid: PromotionUuid,
    pub title: String,
    pub description: String,
    pub kind: PromotionKind,
    pub reward: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub is_active: bool,
    pub progress: Progress,
    pub status: ParticipantStatus,
}

fn required<T>(value: Option<T>, field: &'static str, missing: &mut MissingFields) -> Option<T> {
    if value.is_none() {
        missing.push(field);
    }

    value
}

fn required_text(
    value: Option<String>,
    field: &'static str,
    missing: &mut MissingFields,
) -> Option<String> {
    let value = value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    required(value, field, missing)
}

pub(crate) fn validate_target_amount(amount: f64) -> Result<(), PromotionValidationError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(PromotionValidationError::InvalidTargetAmount)
    }
}

/// Capacity is stored as a signed 32-bit integer.
pub(crate) fn validate_max_participants(
    max_participants: u32,
) -> Result<(), PromotionValidationError> {
    if i32::try_from(max_participants).is_ok() {
        Ok(())
    } else {
        Err(PromotionValidationError::MaxParticipantsTooLarge)
    }
}

pub(crate) fn validate_date_range(
    start: Timestamp,
    end: Timestamp,
) -> Result<(), PromotionValidationError> {
    if end > start {
        Ok(())
    } else {
        Err(PromotionValidationError::InvalidDateRange)
    }
}
