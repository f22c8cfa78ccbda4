//! API client library for the PBS TV Schedules Service (TVSS).
//!
//! Provides an authenticated, call-sign-scoped client for station listings,
//! upcoming airings, program search, and channel lookup.

/// TV Schedules Service API client.
pub mod tvss;
