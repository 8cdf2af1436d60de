//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`visitor`] - Client metadata captured on redirect
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves the slug and answers with a redirect
//! 2. A [`click_event::ClickEvent`] is pushed to a bounded channel without waiting
//! 3. [`click_worker::run_click_worker`] persists it via [`repositories::ClickRepository`]
//! 4. Write failures are logged and dropped

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
pub mod visitor;
