//! Test module for marquee-core
//!
//! This module contains tests for:
//! - Controller transitions (debounce, staleness, selection, commit, dismissal)
//! - The async engine with paused time and a scripted catalog

mod engine_tests;
