//! Deterministic simulation runner.
//!
//! This crate provides a fully deterministic environment for driving the
//! dashboard. Given the same seed, it produces identical results every run,
//! and tests never wait on the wall clock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BTreeMap<EventKey, Event>)        │ │
//! │  │     Ordered by: time, priority, sequence           │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     DashboardStateMachine                          │ │
//! │  │     clock · auction · feed · stats                 │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Actions → timers, notifications                │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod event_queue;
mod runner;

pub use event_queue::EventKey;
pub use runner::{SimulationRunner, SimulationStats, DEFAULT_NOTIFICATION_CAPACITY};
