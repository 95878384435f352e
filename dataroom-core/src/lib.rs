#![forbid(unsafe_code)]
//! Core cryptographic protocol for an end-to-end encrypted dataroom:
//! per-file AEAD keys held in an encrypted manifest, the manifest keyed by
//! a key-encapsulation layer over a prime-order group, and non-interactive
//! master-secret rotation via a single published factor.
//!
//! See the workspace's `SPEC_FULL.md` for the full protocol description.
//! This crate never parses CLI arguments or prints to stdout; it is
//! intended to be driven by `dataroom-cli` or embedded directly.

pub mod aead;
pub mod error;
pub mod fileops;
pub mod group;
pub mod kdf;
pub mod layout;
pub mod manifest;
pub mod rotation;

pub use error::{Error, Result};
pub use fileops::{download, list, upload};
pub use group::{PrimeOrderGroup, Ristretto255};
pub use layout::create_dataroom;
pub use manifest::Manifest;
pub use rotation::{key_rotate, rekey};
