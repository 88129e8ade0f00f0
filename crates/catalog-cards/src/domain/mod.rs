//! Commands and queries accepted by the card catalog.

pub mod commands;
