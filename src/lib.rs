//! Time and attendance engine.
//!
//! This crate turns raw badge scans into classified punch records, enforces
//! the sequencing and overtime approval rules, closes out employees who never
//! punched out, and aggregates each day's punches into work, break and
//! overtime hours.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod storage;
