//! # slot-engine
//!
//! Bookable meeting slots from an advisor's recurring weekly availability.
//!
//! The engine is pure computation over a snapshot the caller has already
//! fetched: availability windows, busy intervals from calendars and earlier
//! bookings, and the scheduling link's constraints. It never reads the clock,
//! touches the network, or commits a booking.
//!
//! ## Modules
//!
//! - [`window`]: Reject overlapping or malformed availability windows, suggest free ones
//! - [`conflict`]: Decide whether a slot collides with a busy interval
//! - [`generator`]: Windows + busy time + horizon → ordered, conflict-free slots
//! - [`booking`]: Chosen slot + visitor answers → booking payload
//! - [`snapshot`]: Tolerant ingestion of store records
//! - [`cache`]: Memoized slot generation
//! - [`dst`]: DST policies for window boundaries
//! - [`settings`]: Timezone and rule settings
//! - [`model`]: Shared data types
//! - [`error`]: Error types

pub mod booking;
pub mod cache;
pub mod conflict;
pub mod dst;
pub mod error;
pub mod generator;
pub mod model;
pub mod settings;
pub mod snapshot;
pub mod window;

pub use booking::{BookingRequest, BookingRequestBuilder};
pub use cache::SlotCache;
pub use conflict::{ConflictDetector, ScheduledMeetingRule};
pub use error::EngineError;
pub use generator::{generate_slots, group_by_date, SlotOutcome, SlotRequest, SlotSchedule};
pub use model::{
    AvailabilityWindow, BusyInterval, BusySource, SchedulingLinkConfig, SlotCandidate, Weekday,
};
pub use settings::EngineSettings;
pub use snapshot::Snapshot;
