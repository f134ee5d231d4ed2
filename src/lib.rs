//! Host-testable library interface for autokey.
//!
//! The pure logic modules (report encoding, keycode translation, link
//! tracking, blink cadence, and the report sequencer) compile for the
//! host with no embedded hardware required.
//!
//! Usage: `cargo test` (default features).
//!
//! The embedded binary (`src/main.rs`, `--features embedded`) reuses
//! these modules and adds the Embassy USB glue in [`usb`].

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod hid;
pub mod indicator;
pub mod link;
pub mod sequencer;

#[cfg(feature = "embedded")]
pub mod usb;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
