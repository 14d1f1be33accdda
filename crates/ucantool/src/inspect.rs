//! The inspection pipeline: sniff, unwrap, identify, then render.

use tracing::debug;
use ucantool_core::{to_dag_json, Container};

use crate::config::{InspectConfig, OutputFormat};
use crate::error::{InspectError, Result};
use crate::identify::{identify, identify_container};
use crate::render::{render, render_container};
use crate::sniff::{sniff, Artifact};
use crate::unwrap::{unwrap, ManifestEntry, Unwrapped};

/// Inspect `bytes` and return the full rendering.
///
/// Nothing is returned unless every step succeeds. In DAG-JSON mode the
/// input is still sniffed, so unrecognised bytes fail the same way in both
/// modes.
pub fn inspect(bytes: &[u8], config: &InspectConfig) -> Result<String> {
    match sniff(bytes)? {
        Artifact::Container(ctn) => match unwrap(&ctn, config.container)? {
            Unwrapped::Manifest(entries) => show_container(&ctn, &entries, config.format),
            Unwrapped::Entry(entry) => {
                debug!(len = entry.len(), "inspecting container entry");
                // An entry that is itself a container is shown whole.
                let nested = sniff(entry)?;
                show(entry, &nested, config.format)
            }
        },
        artifact => show(bytes, &artifact, config.format),
    }
}

fn show(bytes: &[u8], artifact: &Artifact, format: OutputFormat) -> Result<String> {
    match (format, artifact) {
        (OutputFormat::Table, Artifact::Container(ctn)) => {
            render(artifact, &identify_container(ctn)?)
        }
        (OutputFormat::Table, _) => render(artifact, &identify(bytes)),
        (OutputFormat::DagJson, Artifact::Container(ctn)) => container_json(ctn),
        (OutputFormat::DagJson, _) => to_dag_json(bytes).map_err(InspectError::Transcode),
    }
}

fn show_container(
    ctn: &Container,
    entries: &[ManifestEntry],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_container(&identify_container(ctn)?, ctn, entries)),
        OutputFormat::DagJson => container_json(ctn),
    }
}

fn container_json(ctn: &Container) -> Result<String> {
    let body = ctn.canonical_body().map_err(InspectError::Encoding)?;
    to_dag_json(&body).map_err(InspectError::Transcode)
}
