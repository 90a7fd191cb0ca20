//! Asset directory handling.
//!
//! Stacks reference local directories (training data, function source, the
//! built static site) whose internal structure is opaque here. Synthesis
//! never touches the filesystem; the CLI uses this module to verify the
//! directories exist before writing manifests and to pin their content with
//! BLAKE3 fingerprints for the deployment record.

use crate::core::types::{Manifest, ManifestResource, ResourceKind};
use std::io::Read;
use std::path::{Path, PathBuf};

const STREAM_BUF_SIZE: usize = 65536;

/// Hash a string. Returns `"blake3:{hex}"`.
pub fn fingerprint_string(s: &str) -> String {
    format!("blake3:{}", blake3::hash(s.as_bytes()).to_hex())
}

/// Hash a file's contents. Returns `"blake3:{hex}"`.
pub fn fingerprint_file(path: &Path) -> Result<String, String> {
    let mut file =
        std::fs::File::open(path).map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; STREAM_BUF_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| format!("read error {}: {}", path.display(), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("blake3:{}", hasher.finalize().to_hex()))
}

/// Hash a directory: sorted walk, relative paths mixed into the digest,
/// symlinks skipped. Deterministic for identical content.
pub fn fingerprint_dir(path: &Path) -> Result<String, String> {
    let mut entries: Vec<(String, String)> = Vec::new();
    walk(path, path, &mut entries)?;

    let mut hasher = blake3::Hasher::new();
    for (rel, hash) in &entries {
        hasher.update(rel.as_bytes());
        hasher.update(b"\0");
        hasher.update(hash.as_bytes());
        hasher.update(b"\n");
    }
    Ok(format!("blake3:{}", hasher.finalize().to_hex()))
}

fn walk(base: &Path, current: &Path, entries: &mut Vec<(String, String)>) -> Result<(), String> {
    let read_dir = std::fs::read_dir(current)
        .map_err(|e| format!("cannot read dir {}: {}", current.display(), e))?;
    let mut children: Vec<std::fs::DirEntry> = read_dir.filter_map(|e| e.ok()).collect();
    children.sort_by_key(|e| e.file_name());

    for entry in children {
        let ft = entry
            .file_type()
            .map_err(|e| format!("stat error: {}", e))?;
        if ft.is_symlink() {
            continue;
        }
        let path = entry.path();
        let rel = path
            .strip_prefix(base)
            .map_err(|e| format!("path prefix error: {}", e))?
            .to_string_lossy()
            .to_string();
        if ft.is_file() {
            let hash = fingerprint_file(&path)?;
            entries.push((rel, hash));
        } else if ft.is_dir() {
            walk(base, &path, entries)?;
        }
    }
    Ok(())
}

fn resource_asset_path(resource: &ManifestResource) -> Option<&str> {
    let key = match resource.kind {
        ResourceKind::BucketDeployment => "source_path",
        ResourceKind::Function => "entry",
        _ => return None,
    };
    resource.properties.get(key).and_then(|v| v.as_str())
}

/// Local directories a manifest consumes at apply time, in declaration order.
pub fn manifest_asset_paths(manifest: &Manifest) -> Vec<String> {
    manifest
        .resources
        .values()
        .filter_map(|r| resource_asset_path(r).map(|p| p.to_string()))
        .collect()
}

/// Verify every asset directory referenced by a manifest exists under `base`.
pub fn verify_assets(manifest: &Manifest, base: &Path) -> Result<(), String> {
    for rel in manifest_asset_paths(manifest) {
        let path = base.join(&rel);
        if !path.is_dir() {
            return Err(format!(
                "stack '{}': asset directory '{}' not found at {}",
                manifest.stack,
                rel,
                path.display()
            ));
        }
    }
    Ok(())
}

/// Fingerprint every asset directory referenced by a manifest.
pub fn fingerprint_assets(
    manifest: &Manifest,
    base: &Path,
) -> Result<Vec<(String, String)>, String> {
    verify_assets(manifest, base)?;
    let mut fingerprints = Vec::new();
    for rel in manifest_asset_paths(manifest) {
        let path: PathBuf = base.join(&rel);
        fingerprints.push((rel, fingerprint_dir(&path)?));
    }
    Ok(fingerprints)
}
