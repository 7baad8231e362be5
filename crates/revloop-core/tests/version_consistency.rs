//! Ensures all workspace crates use `version.workspace = true` and that
//! the workspace version matches what Cargo resolved for this crate.

use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("crate lives under <root>/crates/")
        .to_path_buf()
}

fn read_toml(path: &Path) -> toml::Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
    text.parse()
        .unwrap_or_else(|e| panic!("parsing {}: {e}", path.display()))
}

fn workspace_version() -> String {
    let doc = read_toml(&workspace_root().join("Cargo.toml"));
    doc["workspace"]["package"]["version"]
        .as_str()
        .expect("workspace.package.version is a string")
        .to_string()
}

fn uses_workspace_version(manifest_dir: &Path) -> bool {
    let doc = read_toml(&manifest_dir.join("Cargo.toml"));
    doc.get("package")
        .and_then(|pkg| pkg.get("version"))
        .and_then(|v| v.as_table())
        .and_then(|t| t.get("workspace"))
        .and_then(|v| v.as_bool())
        == Some(true)
}

#[test]
fn all_members_use_workspace_version() {
    let root = workspace_root();
    let doc = read_toml(&root.join("Cargo.toml"));
    let members = doc["workspace"]["members"]
        .as_array()
        .expect("workspace.members is an array");

    assert!(!members.is_empty());
    for member in members {
        let member = member.as_str().expect("member path is a string");
        assert!(
            uses_workspace_version(&root.join(member)),
            "{member} should use version.workspace = true"
        );
    }
}

#[test]
fn workspace_version_matches_cargo_pkg() {
    assert_eq!(workspace_version(), env!("CARGO_PKG_VERSION"));
    assert_eq!(revloop_core::VERSION, env!("CARGO_PKG_VERSION"));
}
