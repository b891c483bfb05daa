//! UI module - contains UI rendering components
//!
//! Widgets here take plain state and report what the user did; the App
//! decides what to do with it.

pub mod components;
