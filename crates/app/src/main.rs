//! Entry point for the gatemesh inspector.
//! Loads OBJ resources from an asset directory and logs buffer statistics.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use asset::{DirResolver, LoadOptions, MeshBuffer, MissingAttribute};

fn parse_root_arg() -> PathBuf {
    // --root=DIR, default = current directory
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--root=") {
            return PathBuf::from(val);
        }
    }
    PathBuf::from(".")
}

fn parse_missing_arg() -> MissingAttribute {
    // Accept: --missing=alias|fallback
    let mut missing = MissingAttribute::default();
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--missing=") {
            missing = MissingAttribute::from_name(val).unwrap_or_else(|| {
                log::warn!("Unknown --missing value '{}', keeping {:?}.", val, missing);
                missing
            });
        }
    }
    missing
}

fn resource_args() -> Vec<String> {
    std::env::args()
        .skip(1)
        .filter(|arg| !arg.starts_with("--"))
        .collect()
}

fn describe(resource: &str, mesh: &MeshBuffer) {
    let bytes = mesh.position_bytes().len()
        + mesh.texcoord_bytes().len()
        + mesh.normal_bytes().len()
        + mesh.index_bytes().len();
    log::info!(
        "{}: {} unique vertices, {} indices, texture={}, {} bytes",
        resource,
        mesh.vertex_count(),
        mesh.index_count(),
        mesh.has_texture(),
        bytes
    );
    if !mesh.is_valid() {
        log::warn!("{}: mesh has no faces", resource);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let root = parse_root_arg();
    let missing = parse_missing_arg();
    let resources = resource_args();
    if resources.is_empty() {
        bail!("usage: gatemesh [--root=DIR] [--missing=alias|fallback] <resource>...");
    }
    log::info!(
        "Loading {} resource(s) from {}, missing attributes: {:?}",
        resources.len(),
        root.display(),
        missing
    );

    let resolver = DirResolver::new(root);
    let options = LoadOptions::default().with_missing(missing);

    let mut failed = 0usize;
    for resource in &resources {
        match asset::load_model_with(resource, &resolver, &options) {
            Ok(mesh) => describe(resource, &mesh),
            Err(err) => {
                log::error!("{}: {}", resource, err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        let err = anyhow::anyhow!("{failed} of {} resource(s) failed", resources.len());
        return Err(err).context("gatemesh finished with errors");
    }
    log::info!("All resources loaded.");
    Ok(())
}
