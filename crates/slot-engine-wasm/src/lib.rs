//! WASM bindings for slot-engine.
//!
//! Exposes slot generation, window validation and booking payload construction
//! to the scheduling pages via `wasm-bindgen`. All complex values cross the
//! boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slot_engine::booking::{AnswerInput, BookingRequestBuilder, ContactDetails};
use slot_engine::generator::{group_by_date, DaySlots, SlotOutcome};
use slot_engine::settings::parse_timezone;
use slot_engine::snapshot::LinkDefaults;
use slot_engine::{
    window, AvailabilityWindow, EngineSettings, SchedulingLinkConfig, SlotCache, SlotCandidate,
    Snapshot,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ScheduleDto {
    outcome: SlotOutcome,
    slots: Vec<SlotCandidate>,
    days: Vec<DaySlots>,
    skipped: Vec<String>,
}

#[derive(Deserialize)]
struct WindowChangeInput {
    candidate: AvailabilityWindow,
    #[serde(default)]
    existing: Vec<AvailabilityWindow>,
    #[serde(default)]
    edit: bool,
}

#[derive(Serialize)]
struct WindowCheckDto {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Deserialize)]
struct BookingInput {
    link: SchedulingLinkConfig,
    slot: SlotCandidate,
    contact: ContactDetails,
    #[serde(default)]
    answers: Vec<AnswerInput>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_now(s: &str) -> Result<DateTime<Utc>, JsValue> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| JsValue::from_str(&format!("Invalid reference time '{}': {}", s, e)))
}

fn settings_for(timezone: &str) -> Result<EngineSettings, JsValue> {
    let tz = parse_timezone(timezone).map_err(js_err)?;
    Ok(EngineSettings::default().with_timezone(tz))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Slot generator that remembers results across re-renders.
///
/// The page builds one engine per visitor session and calls `generateSlots`
/// whenever it renders; unchanged inputs are served from the cache.
#[wasm_bindgen]
pub struct SlotEngine {
    settings: EngineSettings,
    cache: SlotCache,
}

#[wasm_bindgen]
impl SlotEngine {
    /// `timezone` is the IANA zone the advisor's windows are declared in.
    #[wasm_bindgen(constructor)]
    pub fn new(timezone: &str) -> Result<SlotEngine, JsValue> {
        Ok(SlotEngine {
            settings: settings_for(timezone)?,
            cache: SlotCache::default(),
        })
    }

    /// Generate slots for a snapshot JSON document
    /// (`{availability, events, link}`) as of `reference_now` (RFC 3339).
    ///
    /// Returns `{outcome, slots, days, skipped}`.
    #[wasm_bindgen(js_name = "generateSlots")]
    pub fn generate_slots(&mut self, snapshot_json: &str, reference_now: &str) -> Result<String, JsValue> {
        let now = parse_now(reference_now)?;
        let snapshot = Snapshot::from_json(snapshot_json, &self.settings, &LinkDefaults::default())
            .map_err(js_err)?;
        let schedule = self
            .cache
            .get_or_generate(&snapshot.request(now, &self.settings))
            .map_err(js_err)?;

        to_json(&ScheduleDto {
            outcome: schedule.outcome,
            days: group_by_date(&schedule.slots, self.settings.timezone),
            slots: schedule.slots,
            skipped: snapshot.skipped.iter().map(|e| e.to_string()).collect(),
        })
    }

    #[wasm_bindgen(js_name = "cacheHits")]
    pub fn cache_hits(&self) -> u64 {
        self.cache.hits()
    }
}

/// Validate a window change `{candidate, existing, edit?}`.
///
/// Returns `{valid: true}` or `{valid: false, error}`; only malformed JSON throws.
#[wasm_bindgen(js_name = "checkWindow")]
pub fn check_window(change_json: &str) -> Result<String, JsValue> {
    let change: WindowChangeInput = serde_json::from_str(change_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid window change JSON: {}", e)))?;

    let outcome = if change.edit {
        window::validate_edit(&change.candidate, &change.existing)
    } else {
        window::validate_new(&change.candidate, &change.existing)
    };

    to_json(&WindowCheckDto {
        valid: outcome.is_ok(),
        error: outcome.err().map(|e| e.to_string()),
    })
}

/// Suggest a window that does not overlap `windows_json`; returns `null` when
/// none can be found.
#[wasm_bindgen(js_name = "suggestWindow")]
pub fn suggest_window(windows_json: &str) -> Result<String, JsValue> {
    let existing: Vec<AvailabilityWindow> = serde_json::from_str(windows_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid windows JSON: {}", e)))?;
    to_json(&window::suggest_window(&existing))
}

/// Build a booking payload from `{link, slot, contact, answers}`.
#[wasm_bindgen(js_name = "buildBookingRequest")]
pub fn build_booking_request(booking_json: &str, timezone: &str) -> Result<String, JsValue> {
    let input: BookingInput = serde_json::from_str(booking_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid booking JSON: {}", e)))?;
    let tz = parse_timezone(timezone).map_err(js_err)?;
    input.link.validate().map_err(js_err)?;

    let request = BookingRequestBuilder::new(&input.link, tz)
        .build(&input.slot, input.contact, &input.answers)
        .map_err(js_err)?;
    to_json(&request)
}
