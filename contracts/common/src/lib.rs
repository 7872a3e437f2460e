//! Shared utilities for the reward ledger contract suite.
//!
//! This crate provides:
//! - [`CommonError`]: error codes raised by the shared helpers.
//! - [`ownership`]: single-owner storage with a two-step transfer.
//! - [`interfaces`]: cross-contract interfaces (schedule provider and
//!   rewarder hook) together with their generated clients.
//! - [`ttl`]: storage time-to-live helpers.
//!
//! Contracts map [`CommonError`] into their own error enums, so the codes
//! here only need to be stable, not globally unique.

#![no_std]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod interfaces;
pub mod ownership;
pub mod ttl;

pub use interfaces::*;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Error codes returned by the shared helpers.
///
/// # Code ranges
/// | Range   | Purpose                       |
/// |---------|-------------------------------|
/// | 1 – 9   | Lifecycle / initialisation    |
/// | 10 – 19 | Authentication & authorisation|
/// | 40 – 49 | Contract state                |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    // ── Lifecycle (1–9) ──────────────────────────────────────
    /// No owner has been stored yet.
    NotInitialized = 1,

    // ── Auth (10–19) ─────────────────────────────────────────
    /// The caller is not the owner, or not the proposed owner when
    /// accepting a transfer.
    AccessDenied = 10,

    // ── Contract state (40–49) ───────────────────────────────
    /// An ownership transfer was accepted or cancelled while none was
    /// pending.
    NoPendingAdmin = 41,
}
