//! Generated image map
//!
//! The handbook app loads images through a module mapping each image's
//! base name to a `require` of its file. This regenerates that module from
//! whatever is in the image directory.

use crate::output::OutputError;
use crate::url::{image_stem, is_image_file};
use std::collections::BTreeMap;
use std::path::Path;

/// Maps image base names (filename up to the first `.`) to `./<filename>`
pub type ImageMap = BTreeMap<String, String>;

/// Scans the image directory
///
/// Files are visited in name order; when two files share a base name the
/// first one is kept.
pub fn collect_image_map(image_dir: &Path) -> Result<ImageMap, OutputError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(image_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() || !is_image_file(&entry.path()) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        } else {
            tracing::warn!("Skipping non UTF-8 filename {:?}", entry.file_name());
        }
    }
    names.sort();

    let mut map = ImageMap::new();
    for name in names {
        let key = image_stem(&name).to_string();
        if let Some(existing) = map.get(&key) {
            tracing::warn!("Image key {:?} already maps to {}; skipping {}", key, existing, name);
            continue;
        }
        map.insert(key, format!("./{}", name));
    }

    Ok(map)
}

/// Renders the map as an `export default` module
pub fn render_image_map(map: &ImageMap) -> Result<String, OutputError> {
    let mut entries = Vec::with_capacity(map.len());
    for (key, path) in map {
        entries.push(format!(
            "  {}: require({})",
            serde_json::to_string(key)?,
            serde_json::to_string(path)?
        ));
    }

    if entries.is_empty() {
        return Ok("export default {};\n".to_string());
    }
    Ok(format!("export default {{\n{},\n}};\n", entries.join(",\n")))
}

/// Regenerates the image map file from the image directory
///
/// # Returns
///
/// The number of images in the map
pub fn write_image_map(image_dir: &Path, out_path: &Path) -> Result<usize, OutputError> {
    let map = collect_image_map(image_dir)?;
    let code = render_image_map(&map)?;

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out_path, code).map_err(|e| OutputError::Write {
        path: out_path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(map.len())
}
