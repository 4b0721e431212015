//! vidnote - AI video generation for Markdown notes
//!
//! Submits a prompt to a remote video-generation API, polls the job until it
//! reaches a terminal state, downloads the finished video next to a note and
//! embeds or links it in place of the selected text.
//!
//! The pieces, bottom-up:
//!
//! - [`config`] - TOML settings, host and model catalogs, env overrides
//! - [`extract`] - task-id and video-URL lookup in loosely shaped payloads
//! - [`api`] - the HTTP gateway (submit, status, download)
//! - [`poll`] - the fixed-interval polling session
//! - [`classify`] - mapping raw failures to user-facing categories
//! - [`deliver`] - saving the video and editing the note
//! - [`workflow`] - one invocation from submit to delivery
//! - [`cli`] - the terminal front end

pub mod api;
pub mod classify;
pub mod cli;
pub mod config;
pub mod deliver;
pub mod extract;
pub mod logging;
pub mod poll;
pub mod workflow;
