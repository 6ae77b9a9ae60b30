//! Git remote helpers.

use std::process::Command;

pub const DEFAULT_REMOTE: &str = "heroku";

/// The command that deploys the app through `remote`.
pub fn push_command(remote: Option<&str>) -> String {
    format!("git push {} main", remote.unwrap_or(DEFAULT_REMOTE))
}

/// App name configured for `remote` in the current checkout, if any.
pub fn app_from_remote(remote: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--get", &format!("remote.{remote}.url")])
        .output()
        .ok()?;

    if !output.status.success() {
        tracing::debug!(remote, "no git remote configured");
        return None;
    }

    let url = String::from_utf8_lossy(&output.stdout);
    app_from_git_url(url.trim())
}

/// App name from a platform git URL (`https://git.heroku.com/<app>.git` or
/// `git@heroku.com:<app>.git`).
pub fn app_from_git_url(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://git.heroku.com/")
        .or_else(|| url.strip_prefix("git@heroku.com:"))
        .or_else(|| url.strip_prefix("ssh://git@heroku.com/"))?;

    let app = rest.strip_suffix(".git").unwrap_or(rest);
    if app.is_empty() || app.contains('/') {
        return None;
    }
    Some(app.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_command_defaults_remote() {
        assert_eq!(push_command(None), "git push heroku main");
        assert_eq!(push_command(Some("staging")), "git push staging main");
    }

    #[test]
    fn parses_https_remote() {
        assert_eq!(
            app_from_git_url("https://git.heroku.com/my-app.git").as_deref(),
            Some("my-app")
        );
    }

    #[test]
    fn parses_ssh_remotes() {
        assert_eq!(
            app_from_git_url("git@heroku.com:my-app.git").as_deref(),
            Some("my-app")
        );
        assert_eq!(
            app_from_git_url("ssh://git@heroku.com/my-app.git").as_deref(),
            Some("my-app")
        );
    }

    #[test]
    fn ignores_other_hosts() {
        assert_eq!(app_from_git_url("https://github.com/org/repo.git"), None);
        assert_eq!(app_from_git_url("https://git.heroku.com/.git"), None);
    }
}
