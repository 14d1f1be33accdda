//! # ucantool testkit
//!
//! Testing utilities for ucantool.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Signers**: Ed25519 principals that build and sign artifacts
//! - **Fixtures**: A reproducible fruit-market flow and standalone samples
//! - **Golden vectors**: Sample bytes with their expected identifiers
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Fixtures
//!
//! ```rust
//! use ucantool_core::Codec;
//! use ucantool_testkit::fixtures::FruitMarket;
//!
//! let market = FruitMarket::new();
//! let bytes = market.container_bytes(Codec::Base64Gzip);
//! assert_eq!(bytes[0], b'P');
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ucantool_testkit::generators::{invocation_from_params, InvocationParams};
//!
//! proptest! {
//!     #[test]
//!     fn encoding_is_deterministic(params: InvocationParams) {
//!         let inv = invocation_from_params(&params);
//!         prop_assert_eq!(inv.encode().unwrap(), inv.encode().unwrap());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod signer;
pub mod vectors;

pub use fixtures::{fruit_policy, sample_error_receipt, sample_invocation, FruitMarket};
pub use generators::{invocation_from_params, InvocationParams};
pub use signer::{DelegateOptions, InvokeOptions, Keypair, Principal};
pub use vectors::{all_vectors, GoldenVector};
