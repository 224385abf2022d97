//! Lockfile generation and reading.
//!
//! A lockfile pins every component activated during a run:
//!
//! ```text
//! # ccr lockfile - generated, do not edit
//! # Generated: 2026-01-01T00:00:00Z
//! fmt=10.1.0
//! spdlog=1.12.0
//! ```
//!
//! Entries are sorted by name so the same state always renders the same
//! entry lines.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;

use crate::core::ActivationState;
use crate::util::fs;

/// First header line of every generated lockfile.
pub const LOCKFILE_HEADER: &str = "# ccr lockfile - generated, do not edit";

/// A `name=version` entry read back from a lockfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedComponent {
    pub name: String,
    pub version: String,
}

/// Render the lockfile text for a state.
pub fn render(state: &ActivationState, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(LOCKFILE_HEADER);
    out.push('\n');
    out.push_str(&format!(
        "# Generated: {}\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));

    for record in state.sorted() {
        out.push_str(&format!("{}={}\n", record.name, record.resolved_version));
    }

    out
}

/// Write the lockfile for a state to `dest`, replacing any existing file.
pub fn generate(state: &ActivationState, dest: &Path) -> Result<()> {
    let text = render(state, Utc::now());
    fs::write_atomic(dest, &text)
        .with_context(|| format!("failed to write lockfile: {}", dest.display()))?;

    tracing::debug!("Wrote {} entries to {}", state.len(), dest.display());
    Ok(())
}

/// Parse lockfile text.
///
/// Blank lines and `#` comments are skipped. Every other line must be
/// `name=version` with both sides non-empty, and no name may repeat.
pub fn parse(text: &str) -> Result<Vec<LockedComponent>> {
    let mut entries: IndexMap<String, String> = IndexMap::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((name, version)) = line.split_once('=') else {
            bail!("line {}: expected `name=version`, found `{}`", idx + 1, line);
        };
        let (name, version) = (name.trim(), version.trim());
        if name.is_empty() || version.is_empty() {
            bail!("line {}: expected `name=version`, found `{}`", idx + 1, line);
        }

        if entries.insert(name.to_string(), version.to_string()).is_some() {
            bail!("line {}: `{}` is locked more than once", idx + 1, name);
        }
    }

    Ok(entries
        .into_iter()
        .map(|(name, version)| LockedComponent { name, version })
        .collect())
}

/// Load and parse a lockfile.
pub fn load(path: &Path) -> Result<Vec<LockedComponent>> {
    let text = fs::read_to_string(path)?;
    parse(&text).with_context(|| format!("invalid lockfile: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ActivationRecord;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fmt_spdlog_state() -> ActivationState {
        let mut state = ActivationState::new();
        // Activation order is dependency first, not alphabetical
        state.record(ActivationRecord::new("spdlog", "1.12.0"));
        state.record(ActivationRecord::new("fmt", "10.1.0"));
        state
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_render() {
        let text = render(&fmt_spdlog_state(), fixed_time());
        assert_eq!(
            text,
            "# ccr lockfile - generated, do not edit\n\
             # Generated: 2026-01-01T00:00:00Z\n\
             fmt=10.1.0\n\
             spdlog=1.12.0\n"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut other = ActivationState::new();
        other.record(ActivationRecord::new("fmt", "10.1.0"));
        other.record(ActivationRecord::new("spdlog", "1.12.0"));

        assert_eq!(
            render(&fmt_spdlog_state(), fixed_time()),
            render(&other, fixed_time())
        );
    }

    #[test]
    fn test_render_empty_state() {
        let text = render(&ActivationState::new(), fixed_time());
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.starts_with('#')));
    }

    #[test]
    fn test_generate_overwrites() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("ccr.lock");
        std::fs::write(&dest, "stale=0.0.0\n").unwrap();

        generate(&fmt_spdlog_state(), &dest).unwrap();

        let entries = load(&dest).unwrap();
        assert_eq!(
            entries,
            vec![
                LockedComponent {
                    name: "fmt".to_string(),
                    version: "10.1.0".to_string()
                },
                LockedComponent {
                    name: "spdlog".to_string(),
                    version: "1.12.0".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_generate_into_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("build").join("ccr.lock");

        generate(&fmt_spdlog_state(), &dest).unwrap();
        assert!(dest.exists());
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let entries = parse("# header\n\nfmt=10.1.0\n  # indented\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "fmt");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let err = parse("fmt 10.1.0\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));

        assert!(parse("=10.1.0\n").is_err());
        assert!(parse("fmt=\n").is_err());
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        let err = parse("fmt=10.1.0\nfmt=9.1.0\n").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}
