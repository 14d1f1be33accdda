//! # ucantool
//!
//! Inspect UCAN artifacts from raw bytes: decide which kind of artifact was
//! received, compute its content identifier and render it as a property
//! table or as DAG-JSON.
//!
//! ## Pipeline
//!
//! - [`sniff()`] - try each decoder in priority order, first success wins
//! - [`unwrap`] - list a container's entries or select one for re-dispatch
//! - [`identify()`] - CIDv1 over canonical bytes, transport-independent for containers
//! - [`render`] - bordered `PROPERTY | VALUE` tables
//!
//! [`inspect()`] runs the whole pipeline under an [`InspectConfig`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ucantool::{inspect, InspectConfig};
//!
//! let bytes = std::fs::read("ucan.bin").unwrap();
//! println!("{}", inspect(&bytes, &InspectConfig::default()).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod hexdump;
pub mod identify;
pub mod input;
pub mod inspect;
pub mod render;
pub mod sniff;
pub mod table;
pub mod unwrap;

// Re-export the primitives crate
pub use ucantool_core as core;

pub use config::{ContainerSelection, InspectConfig, OutputFormat};
pub use error::{InputError, InspectError, Result};
pub use identify::{identify, identify_container};
pub use input::read_input;
pub use inspect::inspect;
pub use sniff::{sniff, Artifact, ArtifactKind};
