//! Data models for cardex.
//!
//! This module contains the core data structures used throughout the system.

mod card;

pub use card::{BusinessCard, RawCard, Submission, min_date_of_birth};
