//! Promotion request bodies and query strings.

use std::str::FromStr;

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rave_app::domain::promotions::data::{PageRequest, PromotionDraft, PromotionFilter, PromotionUpdate};

/// Promotion fields accepted by create and update. Unknown keys are ignored.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromotionRequest {
    /// Promotion title
    pub title: Option<String>,

    /// Promotion description
    pub description: Option<String>,

    /// One of `contest`, `promotion`, `discount`, `bonus`
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// What participants win
    pub reward: Option<String>,

    /// How winners are decided
    pub criteria: Option<String>,

    /// Progress needed to win
    pub target_amount: Option<f64>,

    /// One of `sales`, `signups`, `referrals`, `engagement`, `other`
    pub target_action: Option<String>,

    /// RFC 3339 timestamp or `YYYY-MM-DD` (midnight UTC)
    pub start_date: Option<String>,

    /// RFC 3339 timestamp or `YYYY-MM-DD` (midnight UTC)
    pub end_date: Option<String>,

    /// Whether users may join
    pub is_active: Option<bool>,

    /// Participant cap, 0 for unlimited
    pub max_participants: Option<u32>,

    /// Banner image
    pub image_url: Option<String>,
}

impl PromotionRequest {
    /// Blank `type` and date strings count as absent so they are reported as missing.
    pub(crate) fn into_draft(self) -> Result<PromotionDraft, StatusError> {
        Ok(PromotionDraft {
            kind: parse_choice(self.kind, "type")?,
            target_action: parse_choice(self.target_action, "targetAction")?,
            start_date: parse_date(self.start_date, "startDate")?,
            end_date: parse_date(self.end_date, "endDate")?,
            title: self.title,
            description: self.description,
            reward: self.reward,
            criteria: self.criteria,
            target_amount: self.target_amount,
            is_active: self.is_active,
            max_participants: self.max_participants,
            image_url: self.image_url,
        })
    }

    pub(crate) fn into_update(self) -> Result<PromotionUpdate, StatusError> {
        Ok(PromotionUpdate {
            kind: parse_choice(self.kind, "type")?,
            target_action: parse_choice(self.target_action, "targetAction")?,
            start_date: parse_date(self.start_date, "startDate")?,
            end_date: parse_date(self.end_date, "endDate")?,
            title: self.title,
            description: self.description,
            reward: self.reward,
            criteria: self.criteria,
            target_amount: self.target_amount,
            is_active: self.is_active,
            max_participants: self.max_participants,
            image_url: self.image_url,
        })
    }
}

/// `POST /promotion/update-progress` body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProgressRequest {
    /// Promotion to update
    pub promotion_id: Uuid,

    /// Amount to add, must be positive
    pub increment: f64,
}

/// `GET /promotion` query string.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListPromotionsQuery {
    pub page: Option<u32>,

    pub limit: Option<u32>,

    #[serde(rename = "type")]
    pub kind: Option<String>,

    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

impl ListPromotionsQuery {
    pub(crate) fn into_parts(self) -> Result<(PromotionFilter, PageRequest), StatusError> {
        let filter = PromotionFilter {
            kind: parse_choice(self.kind, "type")?,
            is_active: self.is_active,
        };

        Ok((filter, PageRequest::new(self.page, self.limit)))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_choice<T>(value: Option<String>, field: &str) -> Result<Option<T>, StatusError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_blank(value)
        .map(|value| value.parse::<T>())
        .transpose()
        .map_err(|error| StatusError::bad_request().brief(format!("invalid {field}: {error}")))
}

fn parse_date(value: Option<String>, field: &str) -> Result<Option<Timestamp>, StatusError> {
    non_blank(value)
        .map(|value| {
            parse_timestamp(&value).ok_or_else(|| {
                StatusError::bad_request().brief(format!("invalid {field}: {value}"))
            })
        })
        .transpose()
}

fn parse_timestamp(value: &str) -> Option<Timestamp> {
    if let Ok(timestamp) = value.parse::<Timestamp>() {
        return Some(timestamp);
    }

    value
        .parse::<Date>()
        .ok()?
        .to_zoned(TimeZone::UTC)
        .ok()
        .map(|zoned| zoned.timestamp())
}

#[cfg(test)]
mod tests {
    use rave_app::domain::promotions::records::{PromotionKind, TargetAction};
    use salvo::http::StatusCode;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn camel_case_fields_are_read() -> TestResult {
        let request: PromotionRequest = serde_json::from_value(json!({
            "title": "Spring Sales Sprint",
            "type": "contest",
            "targetAmount": 100,
            "targetAction": "referrals",
            "startDate": "2026-04-01",
            "endDate": "2026-04-30T23:59:59Z",
            "maxParticipants": 25,
            "unknownField": true
        }))?;

        let draft = request.into_draft()?;

        assert_eq!(draft.kind, Some(PromotionKind::Contest));
        assert_eq!(draft.target_action, Some(TargetAction::Referrals));
        assert_eq!(draft.target_amount, Some(100.0));
        assert_eq!(draft.max_participants, Some(25));
        assert_eq!(
            draft.start_date,
            Some("2026-04-01T00:00:00Z".parse::<Timestamp>()?)
        );
        assert_eq!(
            draft.end_date,
            Some("2026-04-30T23:59:59Z".parse::<Timestamp>()?)
        );

        Ok(())
    }

    #[test]
    fn blank_choices_and_dates_are_absent() -> TestResult {
        let request = PromotionRequest {
            kind: Some("  ".to_owned()),
            start_date: Some(String::new()),
            ..PromotionRequest::default()
        };

        let draft = request.into_draft()?;

        assert_eq!(draft.kind, None);
        assert_eq!(draft.start_date, None);

        Ok(())
    }

    #[test]
    fn unknown_type_is_rejected() {
        let request = PromotionRequest {
            kind: Some("raffle".to_owned()),
            ..PromotionRequest::default()
        };

        let error = request.into_update().err();

        assert_eq!(error.map(|error| error.code), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let request = PromotionRequest {
            end_date: Some("next tuesday".to_owned()),
            ..PromotionRequest::default()
        };

        let error = request.into_update().err();

        assert_eq!(
            error.map(|error| error.brief),
            Some("invalid endDate: next tuesday".to_owned())
        );
    }

    #[test]
    fn list_query_builds_filter_and_page() -> TestResult {
        let query = ListPromotionsQuery {
            page: Some(3),
            limit: Some(500),
            kind: Some("bonus".to_owned()),
            is_active: Some(false),
        };

        let (filter, page) = query.into_parts()?;

        assert_eq!(filter.kind, Some(PromotionKind::Bonus));
        assert_eq!(filter.is_active, Some(false));
        assert_eq!(page.page(), 3);
        assert_eq!(page.limit(), PageRequest::MAX_LIMIT);

        Ok(())
    }
}
