//! # Cryptomus Types
//!
//! Request and response types for the Cryptomus payment gateway API.
//! This crate has ZERO IO dependencies - only the data structures that
//! cross the API boundary.
//!
//! Field declaration order matters here: requests are signed over the
//! exact JSON byte sequence they serialize to, so the structs keep the
//! field order the provider expects.

pub mod dto;

// Re-export commonly used types
pub use dto::{
    CreatePaymentRequest, CreatePayoutRequest, CreateWalletRequest, InfoRequest, PaymentInfo,
    PaymentResult,
};
