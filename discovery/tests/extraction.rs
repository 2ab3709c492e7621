use std::fs;
use std::path::{Path, PathBuf};

use cmdtree_core::{SchemaEntry, load_schema, validate_schema};
use cmdtree_discovery::config::ImportConfig;
use cmdtree_discovery::discover::import_schema;
use cmdtree_discovery::extract_rendered;
use cmdtree_discovery::report::FailureCode;
use cmdtree_discovery::walker::TreeWalker;

#[test]
fn test_ethernet_fixture_inferences() {
    let entries = extract_fixture("interfaces-ethernet.xml.in");
    let prefix = ["interfaces", "ethernet", "<ifname>"];

    let address = find(&entries, &prefix, "address");
    assert_eq!(address.value_token.as_deref(), Some("<cidr>"));
    assert_eq!(address.description, "IP address");
    assert!(address.multi);

    let vendor = find(&entries, &prefix, "dhcp-options-vendor-class-id");
    assert_eq!(vendor.value_token.as_deref(), Some("<value>"));
    assert_eq!(vendor.description, "Set dhcp options vendor class id");
    assert!(!vendor.multi);

    assert_eq!(find(&entries, &prefix, "disable").value_token.as_deref(), Some("enable"));
    assert_eq!(find(&entries, &prefix, "duplex").value_token.as_deref(), Some("<auto|half|full>"));
    assert_eq!(find(&entries, &prefix, "mtu").value_token.as_deref(), Some("<value>"));

    let arp = entries
        .iter()
        .find(|e| e.tokens.last().map(String::as_str) == Some("arp-accept"))
        .expect("arp-accept leaf");
    assert_eq!(arp.tokens, ["interfaces", "ethernet", "<ifname>", "ip", "arp-accept"]);
    assert_eq!(arp.value_token.as_deref(), Some("enable"));
}

#[test]
fn test_firewall_fixture_inferences() {
    let entries = extract_fixture("firewall.xml.in");
    let rule = ["firewall", "name", "<name>", "rule", "<id>"];

    assert_eq!(find(&entries, &rule, "action").value_token.as_deref(), Some("<allow|deny|reject>"));
    assert_eq!(find(&entries, &rule, "destination-port").value_token.as_deref(), Some("<port>"));
    assert_eq!(find(&entries, &rule, "log").value_token.as_deref(), Some("enable"));

    let default_action = find(&entries, &["firewall", "name", "<name>"], "default-action");
    assert_eq!(default_action.value_token.as_deref(), Some("<accept|drop>"));
    assert_eq!(entries.len(), 4);
}

#[test]
fn test_container_root_is_skipped() {
    assert!(extract_fixture("container.xml.in").is_empty());

    let walker = TreeWalker::new(["container"]);
    let entries = extract_rendered(&fixture_text("container.xml.in"), &walker).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].tokens, ["container", "name", "<name>", "image"]);
}

#[test]
fn test_broken_fixture_fails_to_parse() {
    assert!(extract_rendered(&fixture_text("broken.xml.in"), &TreeWalker::default()).is_err());
}

#[test]
fn test_extraction_is_deterministic() {
    let first = extract_fixture("interfaces-ethernet.xml.in");
    let second = extract_fixture("interfaces-ethernet.xml.in");
    assert_eq!(first, second);
}

#[cfg(unix)]
#[test]
fn test_import_with_copying_renderer() {
    let Some(cat) = cat() else { return };
    let dir = tempfile::tempdir().unwrap();
    let schema_file = dir.path().join("command_schema.json");
    fs::copy(fixtures_dir().join("command_schema.json"), &schema_file).unwrap();

    let config = ImportConfig {
        renderer: cat,
        definitions_dir: fixtures_dir().join("interface-definitions"),
        ..ImportConfig::default()
    };

    let outcome = import_schema(dir.path(), &schema_file, &config).unwrap();
    let summary = outcome.summary();
    assert_eq!((summary.set, summary.show, summary.total, summary.skipped), (10, 1, 11, 1));

    let skipped = &outcome.extraction.skipped[0];
    assert_eq!(skipped.code, FailureCode::ParseFailed);
    assert!(skipped.file.ends_with("broken.xml.in"));
    assert_eq!(outcome.extraction.processed.len(), 3);

    let written = load_schema(&schema_file).unwrap();
    assert!(validate_schema(&written).is_empty());
    assert!(written.iter().all(|e| !e.tokens.is_empty()));

    // Curated description wins over the generated one.
    let address = find(&written, &["interfaces", "ethernet", "<ifname>"], "address");
    assert_eq!(address.description, "Interface IP address");
    assert_eq!(outcome.merge.duplicates_dropped, 1);

    // A second run over its own output is byte-identical.
    let first = fs::read(&schema_file).unwrap();
    let again = import_schema(dir.path(), &schema_file, &config).unwrap();
    assert_eq!(again.summary(), summary);
    assert_eq!(fs::read(&schema_file).unwrap(), first);
}

#[cfg(unix)]
#[test]
fn test_import_with_failing_renderer_keeps_curated_entries() {
    let dir = tempfile::tempdir().unwrap();
    let schema_file = dir.path().join("command_schema.json");
    fs::copy(fixtures_dir().join("command_schema.json"), &schema_file).unwrap();

    let config = ImportConfig {
        renderer: PathBuf::from("/nonexistent/transclude-template"),
        definitions_dir: fixtures_dir().join("interface-definitions"),
        ..ImportConfig::default()
    };

    let outcome = import_schema(dir.path(), &schema_file, &config).unwrap();
    assert_eq!(outcome.summary().total, 2);
    assert_eq!(outcome.extraction.skipped.len(), 4);
    assert!(outcome.extraction.skipped.iter().all(|s| s.code == FailureCode::RenderSpawn));
}

fn find<'a>(entries: &'a [SchemaEntry], prefix: &[&str], leaf: &str) -> &'a SchemaEntry {
    entries
        .iter()
        .find(|entry| {
            entry.tokens.len() == prefix.len() + 1
                && entry.tokens.iter().zip(prefix).all(|(token, expected)| token == *expected)
                && entry.tokens.last().map(String::as_str) == Some(leaf)
        })
        .unwrap_or_else(|| panic!("no entry for {prefix:?} {leaf}"))
}

fn extract_fixture(name: &str) -> Vec<SchemaEntry> {
    extract_rendered(&fixture_text(name), &TreeWalker::default()).expect("fixture should parse")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn fixture_text(name: &str) -> String {
    let path = fixtures_dir().join("interface-definitions").join(name);
    fs::read_to_string(path).expect("fixture file must be readable")
}

#[cfg(unix)]
fn cat() -> Option<PathBuf> {
    ["/bin/cat", "/usr/bin/cat"]
        .into_iter()
        .map(Path::new)
        .find(|path| path.exists())
        .map(Path::to_path_buf)
}
