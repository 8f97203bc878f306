//! Weekly school timetable engine.
//!
//! Teachers register with a subject, the classes they may teach and the
//! week slots they are free in. The [`schedule`] module decides who may
//! sit in a slot, resolves contention by registration order and builds a
//! full week for classes 1–11. Storage, rendering and the HTTP surface
//! live around it in [`registry`], [`display`] and [`web`].

pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod registry;
pub mod schedule;
pub mod telemetry;
pub mod web;

pub use error::{Result, TimetableError};
