//! # tartanilla-store
//!
//! Transport and screen-facing glue for the tartanilla availability engine.
//!
//! Talks to the driver-schedule REST API, validates its loosely typed records
//! once at the boundary, loads a month of bookings and availability in
//! parallel, and drives the save flow with the engine's temporal guard.
//!
//! ## Modules
//!
//! - [`client`] — `ScheduleStore` trait and the HTTP implementation
//! - [`wire`] — request/response DTOs and their validation into engine records
//! - [`retry`] — timeout with one longer retry
//! - [`loader`] — parallel month fetch with graceful degradation
//! - [`controller`] — calendar screen state, save flow, active-screen guard
//! - [`config`] — TOML configuration
//! - [`error`] — Error types

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod loader;
pub mod retry;
pub mod wire;

pub use client::{HttpScheduleStore, ScheduleStore};
pub use config::StoreConfig;
pub use controller::{CalendarController, SaveOutcome, ScreenHandle};
pub use error::{Feed, FetchIssue, StoreError};
pub use loader::{load_month, MonthLoad};
pub use retry::RetryPolicy;
pub use wire::SetAvailabilityRequest;
