use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    Url,
    Data,
}

impl CopyTarget {
    pub fn success_message(self) -> &'static str {
        match self {
            Self::Url => "✅ URL copied to clipboard",
            Self::Data => "✅ JSON copied to clipboard",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Url => "❌ Failed to copy URL",
            Self::Data => "❌ Failed to copy JSON",
        }
    }
}

/// Side effect requested by a UI handler, executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Copy { text: String, target: CopyTarget },
    SaveJson { file_name: String, contents: String },
}

/// Two-space indented serialization used for display, copy and download.
pub fn pretty_json(data: &Value) -> Result<String> {
    serde_json::to_string_pretty(data).context("failed to format JSON")
}

/// File name offered in the save dialog: the last component of the
/// record name, so nested resource paths still save as a plain file.
pub fn download_file_name(name: &str) -> String {
    let trimmed = name.trim_end_matches(['/', '\\']);
    let last = trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("data.json");
    last.to_string()
}

pub fn write_json_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Opens the native save dialog and writes `contents` to the chosen path.
/// `Ok(None)` means the user cancelled.
pub fn save_json_with_dialog(file_name: &str, contents: &str) -> Result<Option<PathBuf>> {
    let downloads = default_download_dir();
    let mut dialog = native_dialog::FileDialog::new()
        .set_filename(file_name)
        .add_filter("JSON", &["json"]);
    if let Some(dir) = downloads.as_deref() {
        dialog = dialog.set_location(dir);
    }
    let Some(path) = dialog
        .show_save_single_file()
        .map_err(|err| anyhow!("save dialog failed: {err}"))?
    else {
        return Ok(None);
    };
    write_json_file(&path, contents)?;
    Ok(Some(path))
}

fn default_download_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    let home = std::env::var_os("USERPROFILE");
    #[cfg(not(windows))]
    let home = std::env::var_os("HOME");

    let dir = PathBuf::from(home?).join("Downloads");
    dir.is_dir().then_some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn pretty_json_round_trips() {
        let data = json!({
            "tasks": [{"id": 1, "title": "café ☕", "done": false}, {"id": 2, "tags": []}],
            "meta": {"count": 2, "ratio": 0.5, "owner": null}
        });
        let text = pretty_json(&data).expect("pretty");
        assert!(text.contains("\n  \"tasks\""));
        let parsed: Value = serde_json::from_str(&text).expect("reparse");
        assert_eq!(parsed, data);
    }

    #[test]
    fn download_file_name_uses_last_component() {
        assert_eq!(download_file_name("tasks.json"), "tasks.json");
        assert_eq!(download_file_name("data/users.json"), "users.json");
        assert_eq!(download_file_name(r"data\orders.json"), "orders.json");
        assert_eq!(download_file_name("/"), "data.json");
    }

    #[test]
    fn write_json_file_writes_contents() {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("json-shelf-download-{nonce}.json"));
        write_json_file(&path, "[\n  1\n]").expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read back"), "[\n  1\n]");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn write_json_file_reports_bad_destination() {
        let path = std::env::temp_dir()
            .join("json-shelf-no-such-dir")
            .join("nested")
            .join("x.json");
        let err = write_json_file(&path, "{}").expect_err("missing parent");
        assert!(err.to_string().contains("failed to write"));
    }

    #[test]
    fn copy_targets_have_distinct_messages() {
        assert_ne!(
            CopyTarget::Url.success_message(),
            CopyTarget::Data.success_message()
        );
        assert!(CopyTarget::Data.failure_message().contains("JSON"));
    }
}
