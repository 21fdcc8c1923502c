//! Line-oriented patching of Fortran namelist run files.
//!
//! The model reads its runtime parameters from a `data` namelist in the run
//! directory. Rather than parse the namelist grammar, patching works the
//! way an operator edits the file: a line is replaced wholesale when its
//! trimmed content starts with a parameter key, and every other line passes
//! through byte-identical. Comments, blank lines, and group markers are
//! never touched.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while patching a namelist file.
#[derive(Error, Debug)]
pub enum NamelistError {
    /// Failed to read the namelist template
    #[error("Failed to read namelist {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a patched namelist
    #[error("Failed to write namelist {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for namelist operations.
pub type Result<T> = std::result::Result<T, NamelistError>;

/// A single parameter override applied to a namelist file.
///
/// The value is kept as text so callers control the exact Fortran literal
/// form, trailing dot included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamelistPatch {
    pub key: String,
    pub value: String,
}

impl NamelistPatch {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether `line` is a setting of this parameter. Matching is by
    /// prefix on the trimmed line, the same loose rule an operator's
    /// `grep ^key` would use.
    fn matches(&self, line: &str) -> bool {
        line.trim().starts_with(self.key.as_str())
    }

    /// The full replacement line: leading space, trailing comma, newline.
    fn replacement_line(&self) -> String {
        format!(" {}={},\n", self.key, self.value)
    }
}

/// Apply `patches` to namelist text.
///
/// Each line is checked against the patches in order and replaced by the
/// first one that matches; lines matching no patch are copied through
/// unchanged, byte for byte. A key that matches no line is silently
/// skipped, leaving the template's value in force.
pub fn apply_patches(source: &str, patches: &[NamelistPatch]) -> String {
    let mut patched = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        match patches.iter().find(|p| p.matches(line)) {
            Some(patch) => {
                debug!(
                    key = %patch.key,
                    old = line.trim_end(),
                    new = patch.replacement_line().trim_end(),
                    "Replacing namelist line"
                );
                patched.push_str(&patch.replacement_line());
            }
            None => patched.push_str(line),
        }
    }
    patched
}

/// Patch `template` and install the result as `target`.
///
/// The patched text is staged at `staged` first and then copied onto
/// `target`, so the live file is only ever replaced by a fully written
/// staging copy. The staging file is left in place for inspection.
pub fn patch_file(
    template: &Path,
    staged: &Path,
    target: &Path,
    patches: &[NamelistPatch],
) -> Result<()> {
    let source = fs::read_to_string(template).map_err(|source| NamelistError::Read {
        path: template.to_path_buf(),
        source,
    })?;

    let patched = apply_patches(&source, patches);

    fs::write(staged, &patched).map_err(|source| NamelistError::Write {
        path: staged.to_path_buf(),
        source,
    })?;
    fs::copy(staged, target).map_err(|source| NamelistError::Write {
        path: target.to_path_buf(),
        source,
    })?;

    info!(
        template = %template.display(),
        target = %target.display(),
        patches = patches.len(),
        "Installed patched namelist"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::SAMPLE_NAMELIST;

    #[test]
    fn empty_patch_list_is_identity() {
        assert_eq!(apply_patches(SAMPLE_NAMELIST, &[]), SAMPLE_NAMELIST);
    }

    #[test]
    fn replaces_matching_line_wholesale() {
        let patches = vec![NamelistPatch::new("endTime", "24000.")];
        let patched = apply_patches(SAMPLE_NAMELIST, &patches);

        assert!(patched.contains(" endTime=24000.,\n"));
        assert!(!patched.contains("endTime=12000."));

        // Only the one line differs
        let changed = SAMPLE_NAMELIST
            .lines()
            .zip(patched.lines())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(changed, 1);
    }

    #[test]
    fn patches_all_three_run_parameters() {
        let patches = vec![
            NamelistPatch::new("endTime", "86400."),
            NamelistPatch::new("deltaT", "600."),
            NamelistPatch::new("viscAh", "2000."),
        ];
        let patched = apply_patches(SAMPLE_NAMELIST, &patches);

        assert!(patched.contains(" endTime=86400.,\n"));
        assert!(patched.contains(" deltaT=600.,\n"));
        assert!(patched.contains(" viscAh=2000.,\n"));

        let changed = SAMPLE_NAMELIST
            .lines()
            .zip(patched.lines())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(changed, 3);
        assert_eq!(SAMPLE_NAMELIST.lines().count(), patched.lines().count());
    }

    #[test]
    fn value_text_is_used_verbatim() {
        // Trailing-dot Fortran literals must survive untouched
        let patches = vec![NamelistPatch::new("viscAh", "5000.")];
        let patched = apply_patches(" viscAh=1.,\n", &patches);
        assert_eq!(patched, " viscAh=5000.,\n");
    }

    #[test]
    fn matching_is_by_trimmed_prefix() {
        // Prefix matching rewrites every parameter sharing the key prefix
        let source = " deltaT=1200.,\n deltaTClock=900.,\n";
        let patches = vec![NamelistPatch::new("deltaT", "600.")];
        let patched = apply_patches(source, &patches);
        assert_eq!(patched, " deltaT=600.,\n deltaT=600.,\n");
    }

    #[test]
    fn first_matching_patch_wins() {
        let patches = vec![
            NamelistPatch::new("endTime", "111."),
            NamelistPatch::new("endTime", "222."),
        ];
        let patched = apply_patches(" endTime=12000.,\n", &patches);
        assert_eq!(patched, " endTime=111.,\n");
    }

    #[test]
    fn unknown_key_is_a_silent_no_op() {
        let patches = vec![NamelistPatch::new("noSuchParameter", "1.")];
        assert_eq!(apply_patches(SAMPLE_NAMELIST, &patches), SAMPLE_NAMELIST);
    }

    #[test]
    fn unterminated_last_line_is_still_replaced() {
        let source = " startTime=0.,\n endTime=12000.,";
        let patches = vec![NamelistPatch::new("endTime", "600.")];
        let patched = apply_patches(source, &patches);
        assert_eq!(patched, " startTime=0.,\n endTime=600.,\n");
    }

    #[test]
    fn comments_and_group_markers_pass_through() {
        let patched = apply_patches(
            SAMPLE_NAMELIST,
            &[NamelistPatch::new("endTime", "3600.")],
        );
        assert!(patched.contains("# Time stepping parameters\n"));
        assert!(patched.contains(" &PARM03\n"));
        assert!(patched.contains(" tauThetaClimRelax=5184000.,\n"));
    }

    #[test]
    fn patch_file_stages_then_installs() {
        let scratch = test_utils::scratch_run();
        let staged = scratch.run_dir.join("data_new");
        let live = scratch.run_dir.join("data");
        let patches = vec![NamelistPatch::new("endTime", "48000.")];

        patch_file(&scratch.namelist_template, &staged, &live, &patches).unwrap();

        let staged_text = std::fs::read_to_string(&staged).unwrap();
        let live_text = std::fs::read_to_string(&live).unwrap();
        assert_eq!(staged_text, live_text);
        assert!(live_text.contains(" endTime=48000.,\n"));

        // The template is never modified
        let template_text = std::fs::read_to_string(&scratch.namelist_template).unwrap();
        assert_eq!(template_text, SAMPLE_NAMELIST);
    }

    #[test]
    fn patch_file_missing_template_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("no-such-data");
        let err = patch_file(
            &template,
            &dir.path().join("data_new"),
            &dir.path().join("data"),
            &[],
        )
        .expect_err("missing template must fail");

        match err {
            NamelistError::Read { path, .. } => assert_eq!(path, template),
            other => panic!("unexpected error: {other}"),
        }
    }
}
