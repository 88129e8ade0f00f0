//! Route modules.

pub mod cards;
pub mod health;
