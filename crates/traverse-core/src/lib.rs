//! Configuration, intents and the tick cycle for the Traverse movement engine.
//!
//! This crate owns the per-tick movement cycle: ask each agent what it wants,
//! evaluate agents one after another against a shared mutable frame, then
//! commit the moves that were issued.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `traverse-config.yaml` into
//!   strongly-typed structs.
//! - [`frame`] -- [`TickFrame`], the per-tick grid, and the move commit.
//! - [`intent`] -- [`IntentSource`] trait and [`ScriptedIntents`].
//! - [`tick`] -- The tick cycle with an injectable evaluation order.
//!
//! [`TickFrame`]: frame::TickFrame
//! [`IntentSource`]: intent::IntentSource
//! [`ScriptedIntents`]: intent::ScriptedIntents

pub mod config;
pub mod frame;
pub mod intent;
pub mod tick;
