//! Shape a chosen slot and the visitor's answers into a booking payload.
//!
//! The payload is handed to the external booking store, which owns commit,
//! double-booking protection, usage caps and expiration. Nothing here performs
//! I/O.
//!
//! Answers are tied to their question by position in the link's
//! `customQuestions`, never by comparing question text: the advisor may reword a
//! question after the link has been shared.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BookingError, Result};
use crate::model::{SchedulingLinkConfig, SlotCandidate};

/// Serde adapter for wall-clock timestamps without an offset.
pub mod wall_clock {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }
}

/// Contact fields the visitor must provide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: String,
    pub linkedin: String,
}

/// A visitor's answer, keyed by the question's position in the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerInput {
    pub question_index: usize,
    pub answer: String,
}

/// An answer as sent to the booking store. `question` is the text shown to
/// the visitor, carried for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_index: usize,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Slot start as wall-clock time in the advisor's timezone.
    #[serde(with = "wall_clock")]
    pub slot_start: NaiveDateTime,
    pub duration_minutes: i64,
    #[serde(flatten)]
    pub contact: ContactDetails,
    /// One entry per custom question, in question order.
    pub answers: Vec<Answer>,
}

pub struct BookingRequestBuilder<'a> {
    link: &'a SchedulingLinkConfig,
    timezone: Tz,
}

impl<'a> BookingRequestBuilder<'a> {
    pub fn new(link: &'a SchedulingLinkConfig, timezone: Tz) -> Self {
        Self { link, timezone }
    }

    /// Build the payload for `slot`.
    ///
    /// # Errors
    /// Returns `BookingError` when a contact field is blank, a question is left
    /// unanswered or answered twice, an answer points past the question list, or
    /// the slot length differs from the link's meeting length.
    pub fn build(
        &self,
        slot: &SlotCandidate,
        contact: ContactDetails,
        answers: &[AnswerInput],
    ) -> Result<BookingRequest> {
        let actual = slot.duration_minutes();
        if actual != self.link.meeting_length {
            return Err(BookingError::DurationMismatch {
                expected: self.link.meeting_length,
                actual,
            }
            .into());
        }

        if contact.email.trim().is_empty() {
            return Err(BookingError::MissingContact("email").into());
        }
        if contact.linkedin.trim().is_empty() {
            return Err(BookingError::MissingContact("linkedin").into());
        }

        let questions = &self.link.custom_questions;
        let mut by_index: Vec<Option<&str>> = vec![None; questions.len()];
        for input in answers {
            let entry = by_index
                .get_mut(input.question_index)
                .ok_or(BookingError::UnknownQuestion {
                    index: input.question_index,
                })?;
            if entry.is_some() {
                return Err(BookingError::DuplicateAnswer {
                    index: input.question_index,
                }
                .into());
            }
            *entry = Some(input.answer.as_str());
        }

        let answers = questions
            .iter()
            .zip(by_index)
            .enumerate()
            .map(|(index, (question, answer))| match answer {
                Some(answer) if !answer.trim().is_empty() => Ok(Answer {
                    question_index: index,
                    question: question.clone(),
                    answer: answer.to_string(),
                }),
                _ => Err(BookingError::Unanswered { index }),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let slot_start = slot.start.with_timezone(&self.timezone).naive_local();
        debug!(%slot_start, answers = answers.len(), "built booking request");

        Ok(BookingRequest {
            slot_start,
            duration_minutes: self.link.meeting_length,
            contact,
            answers,
        })
    }
}
