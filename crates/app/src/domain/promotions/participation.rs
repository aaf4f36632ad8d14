//! Participation rules.
//!
//! These operate on a loaded [`PromotionRecord`] and never touch storage; the
//! service persists whatever they change while holding the promotion's row lock.

use jiff::Timestamp;

use crate::domain::{
    promotions::{
        data::{
            JoinReceipt, MyParticipation, ProgressReceipt, PromotionUpdate, validate_date_range,
            validate_max_participants, validate_target_amount,
        },
        errors::{MissingFields, ParticipationError, PromotionValidationError},
        records::{ParticipantRecord, ParticipantStatus, Progress, PromotionRecord},
    },
    users::records::UserUuid,
};

/// Progress increments must be finite and strictly positive.
///
/// # Errors
///
/// Returns [`ParticipationError::InvalidIncrement`] otherwise.
pub fn validate_increment(increment: f64) -> Result<(), ParticipationError> {
    if increment.is_finite() && increment > 0.0 {
        Ok(())
    } else {
        Err(ParticipationError::InvalidIncrement)
    }
}

impl PromotionRecord {
    /// Append `user` as a participant.
    ///
    /// Checks run in a fixed order and the first failure is returned: inactive,
    /// not yet started, already ended, duplicate, then capacity.
    ///
    /// # Errors
    ///
    /// Returns a [`ParticipationError`] describing the first failed check. The
    /// record is left untouched on error.
    pub fn join(&mut self, user: UserUuid, now: Timestamp) -> Result<JoinReceipt, ParticipationError> {
        if !self.is_active {
            return Err(ParticipationError::NotActive);
        }

        if now < self.start_date {
            return Err(ParticipationError::NotStarted);
        }

        if now > self.end_date {
            return Err(ParticipationError::Ended);
        }

        if self.participant(user).is_some() {
            return Err(ParticipationError::AlreadyJoined);
        }

        if self.max_participants > 0
            && self.participants.len() >= usize::try_from(self.max_participants).unwrap_or(usize::MAX)
        {
            return Err(ParticipationError::CapacityExceeded);
        }

        self.participants.push(ParticipantRecord {
            user_uuid: user,
            joined_at: now,
            progress: Progress {
                current: 0.0,
                target: self.target_amount,
            },
            status: ParticipantStatus::Participating,
        });

        Ok(JoinReceipt {
            promotion_uuid: self.uuid,
            title: self.title.clone(),
            target_amount: self.target_amount,
            target_action: self.target_action,
        })
    }

    /// Add `increment` to the user's progress.
    ///
    /// Reaching the promotion's current target amount moves the participant
    /// straight to [`ParticipantStatus::Won`]. Terminal statuses never change.
    ///
    /// # Errors
    ///
    /// Returns [`ParticipationError::InvalidIncrement`] for non-positive or
    /// non-finite increments and [`ParticipationError::NotParticipating`] when
    /// the user has no entry.
    pub fn record_progress(
        &mut self,
        user: UserUuid,
        increment: f64,
    ) -> Result<ProgressReceipt, ParticipationError> {
        validate_increment(increment)?;

        let target = self.target_amount;

        let participant = self
            .participants
            .iter_mut()
            .find(|participant| participant.user_uuid == user)
            .ok_or(ParticipationError::NotParticipating)?;

        participant.progress.current += increment;

        if participant.progress.current >= target && !participant.status.is_terminal() {
            participant.status = ParticipantStatus::Won;
        }

        Ok(ProgressReceipt {
            promotion_uuid: self.uuid,
            current_progress: participant.progress.current,
            target,
            status: participant.status,
        })
    }

    /// Overlay `update` and validate the merged record.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionValidationError`] if the merged record would be
    /// invalid, in which case nothing is applied.
    pub fn apply_update(&mut self, update: PromotionUpdate) -> Result<(), PromotionValidationError> {
        let mut blank = MissingFields::new();

        let title = non_blank(update.title, "title", &mut blank);
        let description = non_blank(update.description, "description", &mut blank);
        let reward = non_blank(update.reward, "reward", &mut blank);
        let criteria = non_blank(update.criteria, "criteria", &mut blank);

        if !blank.is_empty() {
            return Err(PromotionValidationError::MissingFields(blank));
        }

        let target_amount = update.target_amount.unwrap_or(self.target_amount);
        let start_date = update.start_date.unwrap_or(self.start_date);
        let end_date = update.end_date.unwrap_or(self.end_date);
        let max_participants = update.max_participants.unwrap_or(self.max_participants);

        validate_target_amount(target_amount)?;
        validate_date_range(start_date, end_date)?;
        validate_max_participants(max_participants)?;

        if max_participants > 0
            && self.participants.len() > usize::try_from(max_participants).unwrap_or(usize::MAX)
        {
            return Err(PromotionValidationError::CapacityBelowParticipants(
                self.participants.len(),
            ));
        }

        if let Some(title) = title {
            self.title = title;
        }

        if let Some(description) = description {
            self.description = description;
        }

        if let Some(reward) = reward {
            self.reward = reward;
        }

        if let Some(criteria) = criteria {
            self.criteria = criteria;
        }

        if let Some(kind) = update.kind {
            self.kind = kind;
        }

        if let Some(target_action) = update.target_action {
            self.target_action = target_action;
        }

        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }

        if let Some(image_url) = update.image_url {
            self.image_url = image_url;
        }

        self.target_amount = target_amount;
        self.start_date = start_date;
        self.end_date = end_date;
        self.max_participants = max_participants;

        Ok(())
    }

    /// Project this promotion through `user`'s own entry.
    #[must_use]
    pub fn participation_of(&self, user: UserUuid) -> Option<MyParticipation> {
        let participant = self.participant(user)?;

        Some(MyParticipation {
            promotion_uuid: self.uuid,
            title: self.title.clone(),
            description: self.description.clone(),
            kind: self.kind,
            reward: self.reward.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
            progress: participant.progress,
            status: participant.status,
        })
    }
}

/// A provided text field must not be blank; absent fields are left alone.
fn non_blank(
    value: Option<String>,
    field: &'static str,
    blank: &mut MissingFields,
) -> Option<String> {
    let value = value?.trim().to_string();

    if value.is_empty() {
        blank.push(field);
        return None;
    }

    Some(value)
}
