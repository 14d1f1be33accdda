//! Golden vectors: stable bytes and identifiers for every sample artifact.
//!
//! Run with `--ignored --nocapture` to print the vectors as JSON.

use ucantool::{inspect, sniff, InspectConfig};
use ucantool_testkit::vectors::{all_vectors, GoldenVector};

fn identifier_row(output: &str) -> &str {
    output
        .lines()
        .find(|l| l.starts_with("| / "))
        .expect("rendering has an identifier row")
}

#[test]
fn test_vectors_sniff_as_declared_kind() {
    for vector in all_vectors() {
        let artifact = sniff(&vector.decoded_bytes()).unwrap();
        assert_eq!(artifact.kind().to_string(), vector.kind, "{}", vector.name);
    }
}

#[test]
fn test_vectors_render_their_cid() {
    for vector in all_vectors() {
        let out = inspect(&vector.decoded_bytes(), &InspectConfig::default()).unwrap();
        assert!(
            identifier_row(&out).contains(&vector.cid),
            "{}: expected {}",
            vector.name,
            vector.cid
        );
    }
}

#[test]
fn test_cids_are_v1_dag_cbor() {
    for vector in all_vectors() {
        // CIDv1, dag-cbor, sha2-256 in base32 always starts with "bafyrei".
        assert!(vector.cid.starts_with("bafyrei"), "{}", vector.cid);
    }
}

#[test]
#[ignore]
fn print_golden_vectors() {
    let vectors: Vec<GoldenVector> = all_vectors();
    println!("{}", serde_json::to_string_pretty(&vectors).unwrap());
}
