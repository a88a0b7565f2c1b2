//! Apparatchik - turn-based political simulation engine
//!
//! A player holds office inside an authoritarian bureaucracy. Each turn the
//! engine fires delayed consequences of past decisions, lets officials act on
//! their own, advances detentions, show trials and campaigns, drifts the
//! state's stats and checks for the end of the game.

pub mod actions;
pub mod catalog;
pub mod consequence;
pub mod core;
pub mod events;
pub mod outcome;
pub mod persistence;
pub mod process;
pub mod scoring;
pub mod turn;
pub mod world;
