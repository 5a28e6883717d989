//! Monthly and annual financial projection for a business that sells robots
//! through a dealer network and bills a companion app by subscription.
//!
//! Build a [`config::ParameterSet`], pair it with [`config::Drivers`] and call
//! [`engine::Engine::project`].

pub mod aggregate;
pub mod config;
pub mod dealer;
pub mod engine;
pub mod error;
pub mod expense;
pub mod funnel;
pub mod manager;
pub mod report;
pub mod revenue;
pub mod sales;
pub mod snapshot;
pub mod types;
