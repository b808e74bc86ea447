//! Shared Dioxus components and D3.js bridge for the sales dashboard.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the D3.js renderers via `js_sys::eval()`
//! - `chart`: which renderer draws each widget, and its config
//! - `format`: number formatting for cards and tables
//! - `state`: Reactive AppState with Dioxus Signals
//! - `components`: Reusable RSX components (widgets, filters, login)

pub mod chart;
pub mod components;
pub mod format;
pub mod js_bridge;
pub mod state;
