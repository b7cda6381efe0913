//! TodayEat - Dish Recommendation Backend
//!
//! This crate implements the AI-mediated part of a dish recommendation service:
//! a WebSocket relay that streams chat completion deltas to the client, and a
//! structured recommendation endpoint that grounds a model's pick back to a
//! catalog dish.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
