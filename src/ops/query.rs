//! Non-transfer operations: listing, inspection and small mutations

use crate::command::CommandArgs;
use crate::session::RcloneSession;
use crate::types::RcloneError;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// One entry of an `lsjson` listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LsEntry {
    /// Path relative to the listed directory
    pub path: String,
    /// Base name
    pub name: String,
    /// Size in bytes; -1 when unknown
    pub size: i64,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub mod_time: Option<String>,
    pub is_dir: bool,
}

/// Options for [`ls`]
#[derive(Debug, Clone, Default)]
pub struct LsOptions {
    /// Recursion depth; `Some(1)` lists only the directory itself
    pub max_depth: Option<u32>,
    /// Only return directories
    pub dirs_only: bool,
    /// Only return files
    pub files_only: bool,
    /// Raw arguments appended verbatim
    pub extra_args: Vec<String>,
}

/// List a directory (`rclone lsjson`)
pub fn ls(
    session: &RcloneSession,
    path: &str,
    options: &LsOptions,
) -> Result<Vec<LsEntry>, RcloneError> {
    let args = CommandArgs::new("lsjson")
        .path(path)
        .option_opt("--max-depth", options.max_depth)
        .flag_if(options.dirs_only, "--dirs-only")
        .flag_if(options.files_only, "--files-only")
        .session_flags(session)
        .raw(&options.extra_args)
        .build();

    let result = super::run_captured(session, "ls", args)?;
    Ok(serde_json::from_str(&result.stdout)?)
}

/// Storage usage of a remote (`rclone about --json`); all sizes in bytes
#[derive(Debug, Clone, Deserialize)]
pub struct AboutInfo {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub used: Option<u64>,
    #[serde(default)]
    pub free: Option<u64>,
    #[serde(default)]
    pub trashed: Option<u64>,
    #[serde(default)]
    pub other: Option<u64>,
}

/// Query quota and usage of a remote or path (`rclone about`)
pub fn about(session: &RcloneSession, path: &str) -> Result<AboutInfo, RcloneError> {
    let args = CommandArgs::new("about")
        .path(path)
        .flag("--json")
        .session_flags(session)
        .build();

    let result = super::run_captured(session, "about", args)?;
    Ok(serde_json::from_str(&result.stdout)?)
}

/// Object count and total size of a path (`rclone size --json`)
#[derive(Debug, Clone, Deserialize)]
pub struct SizeInfo {
    /// Number of objects
    pub count: u64,
    /// Total size in bytes
    pub bytes: u64,
    /// Number of objects with unknown size
    #[serde(default)]
    pub sizeless: Option<u64>,
}

/// Total size and object count of a path (`rclone size`)
pub fn size(
    session: &RcloneSession,
    path: &str,
    extra_args: &[String],
) -> Result<SizeInfo, RcloneError> {
    let args = CommandArgs::new("size")
        .path(path)
        .flag("--json")
        .session_flags(session)
        .raw(extra_args)
        .build();

    let result = super::run_captured(session, "size", args)?;
    Ok(serde_json::from_str(&result.stdout)?)
}

/// Options for [`cat`]
#[derive(Debug, Clone, Default)]
pub struct CatOptions {
    /// Only print this many characters
    pub count: Option<u64>,
    /// Only print the first N characters
    pub head: Option<u64>,
    /// Start printing at this offset (negative counts from the end)
    pub offset: Option<i64>,
    /// Only print the last N characters
    pub tail: Option<u64>,
    /// Raw arguments appended verbatim
    pub extra_args: Vec<String>,
}

/// Output the content of a single file (`rclone cat`)
pub fn cat(
    session: &RcloneSession,
    path: &str,
    options: &CatOptions,
) -> Result<String, RcloneError> {
    let args = CommandArgs::new("cat")
        .path(path)
        .option_opt("--count", options.count)
        .option_opt("--head", options.head)
        .option_opt("--offset", options.offset)
        .option_opt("--tail", options.tail)
        .session_flags(session)
        .raw(&options.extra_args)
        .build();

    let result = super::run_captured(session, "cat", args)?;
    Ok(result.stdout)
}

/// Render a path as a file tree (`rclone tree`)
pub fn tree(
    session: &RcloneSession,
    path: &str,
    extra_args: &[String],
) -> Result<String, RcloneError> {
    let args = CommandArgs::new("tree")
        .path(path)
        .session_flags(session)
        .raw(extra_args)
        .build();

    let result = super::run_captured(session, "tree", args)?;
    Ok(result.stdout)
}

/// Create a directory if it does not already exist (`rclone mkdir`)
pub fn mkdir(
    session: &RcloneSession,
    path: &str,
    extra_args: &[String],
) -> Result<(), RcloneError> {
    let args = CommandArgs::new("mkdir")
        .path(path)
        .session_flags(session)
        .raw(extra_args)
        .build();

    super::run_captured(session, "mkdir", args)?;
    Ok(())
}

/// Delete the files in a path, leaving the directory structure alone
/// (`rclone delete`)
pub fn delete(
    session: &RcloneSession,
    path: &str,
    extra_args: &[String],
) -> Result<(), RcloneError> {
    let args = CommandArgs::new("delete")
        .path(path)
        .session_flags(session)
        .raw(extra_args)
        .build();

    super::run_captured(session, "delete", args)?;
    Ok(())
}

/// Remove a path and all of its contents, including the directories
/// themselves (`rclone purge`)
pub fn purge(
    session: &RcloneSession,
    path: &str,
    extra_args: &[String],
) -> Result<(), RcloneError> {
    let args = CommandArgs::new("purge")
        .path(path)
        .session_flags(session)
        .raw(extra_args)
        .build();

    super::run_captured(session, "purge", args)?;
    Ok(())
}

/// Options for [`link`]
#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    /// How long the link stays valid, e.g. `1d` (backend dependent)
    pub expire: Option<String>,
    /// Remove existing public links instead of creating one
    pub unlink: bool,
    /// Raw arguments appended verbatim
    pub extra_args: Vec<String>,
}

/// Generate (or remove) a public link to a file or directory
/// (`rclone link`)
pub fn link(
    session: &RcloneSession,
    path: &str,
    options: &LinkOptions,
) -> Result<String, RcloneError> {
    let args = CommandArgs::new("link")
        .path(path)
        .option_opt("--expire", options.expire.clone())
        .flag_if(options.unlink, "--unlink")
        .session_flags(session)
        .raw(&options.extra_args)
        .build();

    let result = super::run_captured(session, "link", args)?;
    Ok(result.stdout.trim().to_string())
}

/// Installed, latest and latest-beta rclone versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Version of the installed binary
    pub installed: String,
    /// Latest released version, when the online check succeeded
    pub latest: Option<String>,
    /// Latest beta version, when the online check succeeded
    pub beta: Option<String>,
}

/// The installed rclone version, e.g. `v1.63.1`
pub fn version(session: &RcloneSession) -> Result<String, RcloneError> {
    let args = CommandArgs::new("version").session_flags(session).build();
    let result = super::run_captured(session, "version", args)?;

    let first_line = result.stdout.lines().next().unwrap_or_default();
    first_line
        .strip_prefix("rclone ")
        .map(str::to_string)
        .ok_or_else(|| RcloneError::Output(format!("unrecognized version line: {first_line:?}")))
}

/// Compare the installed version against the latest release and beta
/// (`rclone version --check`, requires network access)
pub fn version_check(session: &RcloneSession) -> Result<VersionInfo, RcloneError> {
    let args = CommandArgs::new("version")
        .flag("--check")
        .session_flags(session)
        .build();
    let result = super::run_captured(session, "version", args)?;
    parse_version_check(&result.stdout)
}

fn parse_version_check(stdout: &str) -> Result<VersionInfo, RcloneError> {
    fn field_re(name: &'static str, pattern: &str) -> Regex {
        Regex::new(&format!(r"{name}:\s+({pattern})")).expect("version pattern")
    }
    static YOURS: OnceLock<Regex> = OnceLock::new();
    static LATEST: OnceLock<Regex> = OnceLock::new();
    static BETA: OnceLock<Regex> = OnceLock::new();

    let yours = YOURS.get_or_init(|| field_re("yours", r"[\d.]+"));
    let latest = LATEST.get_or_init(|| field_re("latest", r"[\d.]+"));
    // beta versions include dashes and words, e.g. 1.64.0-beta.7161.9169b2b5a
    let beta = BETA.get_or_init(|| field_re("beta", r"[.\w-]+"));

    let capture = |re: &Regex| {
        re.captures(stdout)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };

    let installed = capture(yours)
        .ok_or_else(|| RcloneError::Output("version check output missing 'yours:'".to_string()))?;

    Ok(VersionInfo {
        installed,
        latest: capture(latest),
        beta: capture(beta),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ls_entry_deserializes_lsjson_fields() {
        let json = r#"[
            {"Path":"dir/file.txt","Name":"file.txt","Size":42,
             "MimeType":"text/plain","ModTime":"2024-01-05T10:31:08Z","IsDir":false},
            {"Path":"dir","Name":"dir","Size":-1,"IsDir":true}
        ]"#;
        let entries: Vec<LsEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries[0].path, "dir/file.txt");
        assert_eq!(entries[0].size, 42);
        assert_eq!(entries[0].mime_type.as_deref(), Some("text/plain"));
        assert!(!entries[0].is_dir);
        assert!(entries[1].is_dir);
        assert_eq!(entries[1].mime_type, None);
    }

    #[test]
    fn test_about_info_with_partial_fields() {
        let info: AboutInfo = serde_json::from_str(r#"{"used": 1024}"#).unwrap();
        assert_eq!(info.used, Some(1024));
        assert_eq!(info.total, None);
        assert_eq!(info.free, None);
    }

    #[test]
    fn test_size_info() {
        let info: SizeInfo =
            serde_json::from_str(r#"{"count": 5, "bytes": 4096, "sizeless": 0}"#).unwrap();
        assert_eq!(info.count, 5);
        assert_eq!(info.bytes, 4096);
        assert_eq!(info.sizeless, Some(0));
    }

    #[test]
    fn test_parse_version_check_full() {
        let stdout = "\
yours:  1.63.1
latest: 1.65.0
beta:   1.66.0-beta.7161.9169b2b5a
";
        let info = parse_version_check(stdout).unwrap();
        assert_eq!(info.installed, "1.63.1");
        assert_eq!(info.latest.as_deref(), Some("1.65.0"));
        assert_eq!(info.beta.as_deref(), Some("1.66.0-beta.7161.9169b2b5a"));
    }

    #[test]
    fn test_parse_version_check_offline() {
        // latest/beta missing when the online check failed
        let info = parse_version_check("yours:  1.63.1\n").unwrap();
        assert_eq!(info.installed, "1.63.1");
        assert_eq!(info.latest, None);
        assert_eq!(info.beta, None);
    }

    #[test]
    fn test_parse_version_check_garbage() {
        assert!(parse_version_check("no versions here").is_err());
    }
}
