//! Structured `PROPERTY | VALUE` rendering of decoded artifacts.
//!
//! Byte fields are shown in DAG-JSON form with long values truncated.
//! Arguments, metadata, policies and outcomes are shown as indented DAG-JSON.
//! Timestamps are shown in UTC.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::DateTime;
use ucantool_core::cbor::map_value;
use ucantool_core::container::CONTAINER_TAG;
use ucantool_core::delegation::DELEGATION_TAG;
use ucantool_core::invocation::INVOCATION_TAG;
use ucantool_core::receipt::RECEIPT_TAG;
use ucantool_core::{
    value_to_dag_json, Cid, Container, CoreError, Delegation, Invocation, Map, Receipt, Value,
};

use crate::error::{InspectError, Result};
use crate::sniff::Artifact;
use crate::table::Table;
use crate::unwrap::{self, ManifestEntry};

/// Longest base64 text shown for a byte field before truncation.
pub const MAX_BYTES_DISPLAY: usize = 80;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render an artifact under its identifier.
pub fn render(artifact: &Artifact, id: &Cid) -> Result<String> {
    match artifact {
        Artifact::Container(ctn) => Ok(render_container(id, ctn, &unwrap::manifest(ctn))),
        Artifact::Invocation(inv) => render_invocation(id, inv),
        Artifact::Delegation(dlg) => render_delegation(id, dlg),
        Artifact::Receipt(rcpt) => render_receipt(id, rcpt),
    }
}

fn property_table() -> Table {
    Table::new(["Property", "Value"])
}

pub fn render_container(id: &Cid, container: &Container, manifest: &[ManifestEntry]) -> String {
    let mut contents = Table::new(["#", "Bytes"]);
    for entry in manifest {
        contents.row([format!("{} ", entry.index), entry.dump.clone()]);
    }

    let mut table = property_table();
    table
        .row(["/".to_string(), id.to_string()])
        .row(["Codec".to_string(), container.codec.to_string()])
        .row(["Tag", CONTAINER_TAG])
        .row(["Contents".to_string(), contents.render()]);
    table.render()
}

pub fn render_invocation(id: &Cid, inv: &Invocation) -> Result<String> {
    let mut table = property_table();
    table
        .row(["/".to_string(), id.to_string()])
        .row(["Tag", INVOCATION_TAG])
        .row(["Issuer", inv.issuer.as_str()])
        .row(["Subject", inv.subject.as_str()]);
    if let Some(aud) = &inv.audience {
        table.row(["Audience", aud.as_str()]);
    }
    table
        .row(["Command", inv.command.as_str()])
        .row(["Arguments".to_string(), map_json(&inv.arguments)?]);
    if !inv.proofs.is_empty() {
        table.row(["Proofs".to_string(), cid_lines(&inv.proofs)]);
    }
    if let Some(meta) = &inv.metadata {
        table.row(["Metadata".to_string(), map_json(meta)?]);
    }
    table.row(["Expiration".to_string(), expiration(inv.expiration)]);
    if let Some(iat) = inv.issued_at {
        table.row(["Issued At".to_string(), timestamp(iat)]);
    }
    if let Some(cause) = &inv.cause {
        table.row(["Cause".to_string(), cause.to_string()]);
    }
    table
        .row(["Task".to_string(), inv.task.to_string()])
        .row(["Signature".to_string(), bytes_json(&inv.signature)]);
    Ok(table.render())
}

pub fn render_delegation(id: &Cid, dlg: &Delegation) -> Result<String> {
    let mut table = property_table();
    table
        .row(["/".to_string(), id.to_string()])
        .row(["Tag", DELEGATION_TAG])
        .row(["Issuer", dlg.issuer.as_str()])
        .row(["Audience", dlg.audience.as_str()]);
    if let Some(sub) = &dlg.subject {
        table.row(["Subject", sub.as_str()]);
    }
    table
        .row(["Command", dlg.command.as_str()])
        .row([
            "Policy".to_string(),
            json(&Value::Array(dlg.policy.clone()))?,
        ])
        .row(["Nonce".to_string(), bytes_json(&dlg.nonce)]);
    if let Some(meta) = &dlg.metadata {
        table.row(["Metadata".to_string(), map_json(meta)?]);
    }
    if let Some(nbf) = dlg.not_before {
        table.row(["Not Before".to_string(), timestamp(nbf)]);
    }
    table
        .row(["Expiration".to_string(), expiration(dlg.expiration)])
        .row(["Signature".to_string(), bytes_json(&dlg.signature)]);
    Ok(table.render())
}

pub fn render_receipt(id: &Cid, rcpt: &Receipt) -> Result<String> {
    let mut table = property_table();
    table
        .row(["/".to_string(), id.to_string()])
        .row(["Tag", RECEIPT_TAG])
        .row(["Executor", rcpt.executor.as_str()])
        .row(["Command", rcpt.command.as_str()])
        .row(["Ran".to_string(), rcpt.ran.to_string()])
        .row(["Out".to_string(), json(&rcpt.out.to_value())?]);
    if !rcpt.proofs.is_empty() {
        table.row(["Proofs".to_string(), cid_lines(&rcpt.proofs)]);
    }
    if let Some(meta) = &rcpt.metadata {
        table.row(["Metadata".to_string(), map_json(meta)?]);
    }
    table.row(["Expiration".to_string(), expiration(rcpt.expiration)]);
    if let Some(iat) = rcpt.issued_at {
        table.row(["Issued At".to_string(), timestamp(iat)]);
    }
    table.row(["Signature".to_string(), bytes_json(&rcpt.signature)]);
    Ok(table.render())
}

/// Render bytes as a DAG-JSON bytes object, truncating long values.
pub fn format_bytes(bytes: &[u8], max: usize) -> String {
    let mut b64 = STANDARD.encode(bytes);
    if b64.len() > max {
        b64.truncate(max);
        b64.push_str("...");
    }
    format!(r#"{{"/":{{"bytes":"{b64}"}}}}"#)
}

fn bytes_json(bytes: &[u8]) -> String {
    format_bytes(bytes, MAX_BYTES_DISPLAY)
}

fn json(value: &Value) -> Result<String> {
    let json = value_to_dag_json(value).map_err(InspectError::Transcode)?;
    serde_json::to_string_pretty(&json)
        .map_err(|e| InspectError::Transcode(CoreError::TranscodeError(e.to_string())))
}

fn map_json(map: &Map) -> Result<String> {
    json(&map_value(map.clone()))
}

fn cid_lines(cids: &[Cid]) -> String {
    cids.iter()
        .map(Cid::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format Unix seconds as a UTC date and time.
pub fn timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map_or_else(|| secs.to_string(), |t| t.format(TIMESTAMP_FORMAT).to_string())
}

fn expiration(exp: Option<i64>) -> String {
    exp.map_or_else(|| "NULL".to_string(), timestamp)
}
