//! Remote management: list, existence check, creation

use crate::command::CommandArgs;
use crate::session::RcloneSession;
use crate::types::RcloneError;
use tracing::info;

/// All configured remotes, with their trailing colon
/// (`rclone listremotes`)
pub fn list_remotes(session: &RcloneSession) -> Result<Vec<String>, RcloneError> {
    let args = CommandArgs::new("listremotes").session_flags(session).build();
    let result = super::run_captured(session, "listremotes", args)?;

    Ok(result
        .stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Whether a remote with this name is configured. The trailing colon is
/// optional.
pub fn remote_exists(session: &RcloneSession, remote_name: &str) -> Result<bool, RcloneError> {
    let normalized = normalize_remote_name(remote_name);
    Ok(list_remotes(session)?.contains(&normalized))
}

/// Create a new remote (`rclone config create`).
///
/// `parameters` are backend-specific key/value options, e.g.
/// `client_id`/`client_secret` for OAuth backends. Fails with
/// [`RcloneError::RemoteExists`] when the name is already taken.
pub fn create_remote(
    session: &RcloneSession,
    remote_name: &str,
    remote_type: &str,
    parameters: &[(String, String)],
) -> Result<(), RcloneError> {
    if remote_name.is_empty() {
        return Err(RcloneError::Config("remote name must not be empty".to_string()));
    }
    if remote_exists(session, remote_name)? {
        return Err(RcloneError::RemoteExists(remote_name.to_string()));
    }

    let mut args = CommandArgs::new("config")
        .path("create")
        .path(remote_name.trim_end_matches(':'))
        .path(remote_type);
    for (key, value) in parameters {
        args = args.path(key).path(value);
    }
    let args = args.session_flags(session).build();

    super::run_captured(session, "config create", args)?;
    info!(remote_name, remote_type, "created remote");
    Ok(())
}

fn normalize_remote_name(remote_name: &str) -> String {
    if remote_name.ends_with(':') {
        remote_name.to_string()
    } else {
        format!("{remote_name}:")
    }
}
