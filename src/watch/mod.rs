// src/watch/mod.rs

//! Patterns, paths, and change tracking.
//!
//! This module is responsible for:
//! - Compiling `exclude` / `outside` globs into absolute patterns.
//! - Applying host-reported added/modified/removed lists to the candidate set.
//! - Wiring up a `notify` watcher for watch sessions outside a bundler.
//!
//! It does not know about module graphs; judging reachability is the
//! engine's job.

pub mod event_handler;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use event_handler::{WatchEvent, apply_watch_event};
pub use patterns::{AbsolutePattern, PatternSet, compile_patterns};
pub use watcher::{WatcherHandle, spawn_watcher};
