//! # ucantool core
//!
//! Pure primitives for inspecting UCAN artifacts: canonical DAG-CBOR,
//! content identifiers, and the envelope and container models.
//!
//! This crate contains no I/O. Every operation is a function over byte
//! buffers and immutable models.
//!
//! ## Key Types
//!
//! - [`Invocation`], [`Delegation`], [`Receipt`] - The three signed envelope kinds
//! - [`Container`] - A bundle of opaque artifacts with a transport [`Codec`]
//! - [`Cid`] - Content identifier (CIDv1, DAG-CBOR, SHA2-256)
//! - [`Did`], [`Command`] - Principals and command paths
//!
//! ## Canonicalization
//!
//! All models encode to deterministic DAG-CBOR. See the [`cbor`] module.

pub mod cbor;
pub mod cid;
pub mod container;
pub mod dag_json;
pub mod delegation;
pub mod envelope;
pub mod error;
pub mod invocation;
pub mod receipt;
pub mod types;

pub use cbor::{decode_value, encode_value, Map};
pub use cid::Cid;
pub use container::{Codec, Container};
pub use dag_json::{to_dag_json, value_to_dag_json};
pub use delegation::Delegation;
pub use error::{CoreError, Result};
pub use invocation::Invocation;
pub use receipt::{Outcome, Receipt};
pub use types::{Command, Did};

/// The generic CBOR value tree decoded artifacts are made of.
pub use ciborium::value::Value;
