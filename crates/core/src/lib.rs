//! Core types for the Timeboost dashboard: events, actions, timers and the
//! [`StateMachine`] trait.
//!
//! Round, auction and feed logic never schedules anything itself. It
//! returns [`Action`]s and the runner (deterministic simulation or real
//! time) turns them into timers and notifications.

mod action;
mod event;
mod notification;
mod traits;

pub use action::{Action, TimerId};
pub use event::Event;
pub use notification::Notification;
pub use traits::StateMachine;
