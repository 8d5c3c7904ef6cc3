//! Writing scene objects to SPM files.

use super::spm::{build_document, encode_document, SpmDocument};
use super::{ExportConfig, SPM_EXTENSION};
use crate::error::{Result, SpmError};
use crate::scene::{FrameEvaluator, Scene, SceneObject};
use crate::skeleton::Skeleton;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of a scene export.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Objects written, with their output paths.
    pub exported: Vec<(String, PathBuf)>,
    /// Objects that failed, with the reason. Other objects are unaffected.
    pub failed: Vec<(String, SpmError)>,
}

impl ExportReport {
    /// True when nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Export one object to `path`.
///
/// The document is fully encoded before the file is created, so a build
/// or encoding failure never touches `path`. If writing fails, the partial
/// file is removed. The file is closed before returning.
pub fn export_object<E: FrameEvaluator + ?Sized>(
    scene: &Scene,
    object: &SceneObject,
    evaluator: &mut E,
    path: &Path,
    config: &ExportConfig,
) -> Result<SpmDocument> {
    let document = build_document(scene, object, evaluator, config)?;
    let bytes = encode_document(&document)?;

    write_file(path, &bytes)?;

    tracing::info!(
        "Exported '{}' to {:?}: {} surfaces, {} vertices, {} triangles, {} joints, {} weights ({} bytes)",
        document.name,
        path,
        document.surfaces.len(),
        document.vertex_count(),
        document.triangle_count(),
        document.skeleton.as_ref().map_or(0, |s| s.joints.len()),
        document.skeleton.as_ref().map_or(0, Skeleton::weight_count),
        bytes.len()
    );
    Ok(document)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let written = writer.write_all(bytes).and_then(|_| writer.flush());
    if let Err(e) = written {
        drop(writer);
        if let Err(remove) = std::fs::remove_file(path) {
            tracing::warn!("Could not remove partial file {:?}: {}", path, remove);
        }
        return Err(e.into());
    }
    Ok(())
}

/// Export the scene's mesh objects.
///
/// With `selection_only`, the first selected mesh object is written to
/// `target` and nothing else is exported. Otherwise each mesh object goes to
/// [`unique_output_path`]`(target, name)`; failures are recorded and the
/// batch moves on.
pub fn export_scene<E: FrameEvaluator + ?Sized>(
    scene: &Scene,
    evaluator: &mut E,
    target: &Path,
    config: &ExportConfig,
) -> ExportReport {
    let mut report = ExportReport::default();

    if config.selection_only {
        match scene.mesh_objects().find(|o| o.selected) {
            Some(object) => {
                let result = export_object(scene, object, evaluator, target, config);
                record(&mut report, object, target.to_path_buf(), result);
            }
            None => tracing::warn!("No selected mesh object to export"),
        }
        return report;
    }

    for object in scene.mesh_objects() {
        let path = unique_output_path(target, &object.name);
        let result = export_object(scene, object, evaluator, &path, config);
        record(&mut report, object, path, result);
    }
    report
}

fn record(
    report: &mut ExportReport,
    object: &SceneObject,
    path: PathBuf,
    result: Result<SpmDocument>,
) {
    match result {
        Ok(_) => report.exported.push((object.name.clone(), path)),
        Err(e) => {
            tracing::warn!("Failed to export '{}': {}", object.name, e);
            report.failed.push((object.name.clone(), e));
        }
    }
}

/// Output path for `name` next to `base`: `<base>-<name>.spm`.
///
/// A trailing `.spm` on `base` is dropped first. If the file exists, the
/// smallest free `<base>-<name><N>.spm` with N >= 1 is used.
pub fn unique_output_path(base: &Path, name: &str) -> PathBuf {
    let stem = if base.extension().is_some_and(|ext| ext == SPM_EXTENSION) {
        base.with_extension("")
    } else {
        base.to_path_buf()
    };
    let mut prefix: OsString = stem.into_os_string();
    prefix.push("-");
    prefix.push(name);

    let candidate = |suffix: &str| {
        let mut path = prefix.clone();
        path.push(suffix);
        path.push(".");
        path.push(SPM_EXTENSION);
        PathBuf::from(path)
    };

    let first = candidate("");
    if !first.exists() {
        return first;
    }
    let mut copy = 1u32;
    loop {
        let path = candidate(&copy.to_string());
        if !path.exists() {
            return path;
        }
        copy += 1;
    }
}
