//! Runs the real process boundary against a scripted target binary.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use cmdtree_conformance::{ConformanceError, ConformanceReport, run_against_binary};

/// Accepts exactly `set --file <candidate> interfaces ethernet eth0 address
/// 10.0.0.0/24` and appends the command to the candidate file.
const EXACT_SHAPE_BINARY: &str = r#"#!/bin/sh
if [ "$#" -eq 8 ] && [ "$1" = "set" ] && [ "$2" = "--file" ] \
    && [ "$4" = "interfaces" ] && [ "$5" = "ethernet" ] && [ "$6" = "eth0" ] \
    && [ "$7" = "address" ] && [ "$8" = "10.0.0.0/24" ]; then
    printf '%s %s %s %s %s\n' "$4" "$5" "$6" "$7" "$8" >> "$3"
    exit 0
fi
echo "unsupported: $*" >&2
exit 2
"#;

const SCHEMA: &str = r#"[
  {
    "kind": "set",
    "tokens": ["interfaces", "ethernet", "<ifname>", "address"],
    "description": "Interface address",
    "value_token": "<cidr>",
    "multi": true
  },
  {
    "kind": "show",
    "tokens": ["interfaces"],
    "description": "Show interfaces"
  }
]"#;

fn write_executable(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

// Kept as a single test: writing and then executing a script races with
// concurrent forks in sibling test threads.
#[test]
fn test_exact_shape_binary_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let binary = dir.path().join("routerctl");
    write_executable(&binary, EXACT_SHAPE_BINARY);
    let schema = dir.path().join("command_schema.json");
    fs::write(&schema, SCHEMA).unwrap();

    // Accepted shape.
    let report_file = dir.path().join("out").join("report.json");
    let report = run_against_binary(&schema, &binary, &report_file).unwrap();
    assert_eq!((report.set_total, report.set_passed, report.set_failed), (1, 1, 0));

    let written: ConformanceReport = serde_json::from_str(&fs::read_to_string(&report_file).unwrap()).unwrap();
    assert_eq!(written, report);
    assert_eq!(written.binary, binary.display().to_string());
    assert_eq!(written.schema_file, schema.display().to_string());

    // Rejected shape: the value sample no longer matches.
    let rejected = dir.path().join("rejected.json");
    fs::write(&rejected, SCHEMA.replace("<cidr>", "<ipv6>")).unwrap();
    let report = run_against_binary(&rejected, &binary, &report_file).unwrap();
    assert_eq!((report.set_total, report.set_passed, report.set_failed), (1, 0, 1));
    let failure = &report.failures[0];
    assert_eq!(failure.value_token, "<ipv6>");
    assert_eq!(failure.returncode, 2);
    assert!(failure.stderr.contains("2001:db8::1"), "{}", failure.stderr);

    // Missing binary is fatal and writes nothing.
    let missing_report = dir.path().join("missing.json");
    let err = run_against_binary(&schema, &dir.path().join("nope"), &missing_report).unwrap_err();
    assert!(matches!(err, ConformanceError::BinaryNotFound(_)));
    assert!(!missing_report.exists());
}
