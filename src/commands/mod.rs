pub mod account;
pub mod calendar;
pub mod config;
pub mod events;
pub mod export;
pub mod stats;
pub mod tags;
