//! fnosignal — contract resolution and signal derivation for FnO trading.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`]. The domain is a
//! pure computation pipeline — catalog → resolver → normalizer →
//! indicators → classifier — with all I/O behind the ports.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
