//! Core business logic - framework-agnostic workflow operations.
//!
//! Each module owns one workflow; all of them delegate balance, point and
//! level mutation to the [`ledger`] engine.

pub mod account;
pub mod attendance;
pub mod ledger;
pub mod messages;
pub mod mission;
pub mod policy;
pub mod shop;
pub mod training;
