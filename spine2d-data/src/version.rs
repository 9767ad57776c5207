//! Spine export version this data model describes.

/// Spine major version of the exported data.
pub const SPINE_EXPORT_MAJOR: u32 = 3;

/// Spine minor version of the exported data.
pub const SPINE_EXPORT_MINOR: u32 = 8;

/// Returns true if `version` (eg. `"3.8.99"`) was exported by a supported Spine editor.
pub fn is_supported_version(version: &str) -> bool {
    let mut parts = version.trim().split('.');
    let major = parts.next().and_then(|s| s.parse::<u32>().ok());
    let minor = parts.next().and_then(|s| s.parse::<u32>().ok());
    major == Some(SPINE_EXPORT_MAJOR) && minor == Some(SPINE_EXPORT_MINOR)
}
