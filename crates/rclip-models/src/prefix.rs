//! Input prefix and output naming rules.
//!
//! A harvest writes its manifest and segments side by side, so the directory
//! portion of the manifest key groups every input of one recording. The same
//! prefix names the consolidated output: `frc_pncmp/q1/match.hls` stitches to
//! `frc_pncmp_q1.mp4`.

use std::fmt;

use serde::Serialize;

use crate::error::{DecodeError, DecodeResult};

/// Extension of the consolidated output artifact.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Character replacing path separators in the output file name.
const SEPARATOR_REPLACEMENT: &str = "_";

/// Directory portion of a manifest key, without a trailing separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InputPrefix(String);

impl InputPrefix {
    /// Split the directory portion off a manifest key.
    ///
    /// Rejects keys with no directory (`match.hls`), no file name
    /// (`a/b/`), or only a root separator (`/match.hls`).
    pub fn from_manifest_key(manifest_key: &str) -> DecodeResult<Self> {
        let (dir, file) = manifest_key.rsplit_once('/').ok_or_else(|| {
            DecodeError::invalid_manifest_key(manifest_key, "no directory component")
        })?;

        if file.is_empty() {
            return Err(DecodeError::invalid_manifest_key(manifest_key, "no file name"));
        }

        let dir = dir.trim_end_matches('/');
        if dir.is_empty() {
            return Err(DecodeError::invalid_manifest_key(
                manifest_key,
                "empty directory component",
            ));
        }

        Ok(Self(dir.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix handed to the object listing.
    ///
    /// Always ends in `/` so that `q1` never matches keys under `q10`.
    pub fn listing_prefix(&self) -> String {
        format!("{}/", self.0)
    }

    /// Whether `key` lives under this prefix.
    pub fn contains(&self, key: &str) -> bool {
        key.strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Deterministic file name of the stitched output.
    pub fn output_file_name(&self) -> String {
        format!(
            "{}.{}",
            self.0.replace('/', SEPARATOR_REPLACEMENT),
            OUTPUT_EXTENSION
        )
    }
}

impl fmt::Display for InputPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final path segment of an object key, usable as a local file name.
///
/// Returns `None` for directory markers and for segments that would escape
/// the staging directory.
pub fn base_name(key: &str) -> Option<&str> {
    let name = key.rsplit('/').next()?;
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_output_name() {
        let prefix = InputPrefix::from_manifest_key("frc_pncmp/q1/match.hls").unwrap();

        assert_eq!(prefix.as_str(), "frc_pncmp/q1");
        assert_eq!(prefix.listing_prefix(), "frc_pncmp/q1/");
        assert_eq!(prefix.output_file_name(), "frc_pncmp_q1.mp4");
    }

    #[test]
    fn test_single_level_prefix() {
        let prefix = InputPrefix::from_manifest_key("evt/main.m3u8").unwrap();
        assert_eq!(prefix.as_str(), "evt");
        assert_eq!(prefix.output_file_name(), "evt.mp4");
    }

    #[test]
    fn test_repeated_separators_collapse() {
        let prefix = InputPrefix::from_manifest_key("a//b.hls").unwrap();
        assert_eq!(prefix.as_str(), "a");
    }

    #[test]
    fn test_invalid_manifest_keys() {
        for key in ["match.hls", "a/b/", "/match.hls", "//x.hls"] {
            assert!(
                InputPrefix::from_manifest_key(key).is_err(),
                "expected '{}' to be rejected",
                key
            );
        }
    }

    #[test]
    fn test_contains_respects_boundaries() {
        let prefix = InputPrefix::from_manifest_key("frc/q1/match.hls").unwrap();

        assert!(prefix.contains("frc/q1/seg1.ts"));
        assert!(prefix.contains("frc/q1/nested/seg1.ts"));
        assert!(!prefix.contains("frc/q10/seg1.ts"));
        assert!(!prefix.contains("frc/q1"));
        assert!(!prefix.contains("other/frc/q1/seg1.ts"));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("evtA/part1/seg1.ts"), Some("seg1.ts"));
        assert_eq!(base_name("seg1.ts"), Some("seg1.ts"));
        assert_eq!(base_name("evtA/part1/"), None);
        assert_eq!(base_name("evtA/.."), None);
        assert_eq!(base_name("evtA/."), None);
    }
}
