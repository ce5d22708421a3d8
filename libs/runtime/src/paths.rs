use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Roaming app data on Windows, the user's home elsewhere.
fn platform_home() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = dirs::data_dir();
    #[cfg(not(target_os = "windows"))]
    let home = dirs::home_dir();
    home.ok_or_else(|| anyhow!("cannot resolve the platform home directory"))
}

/// Expand a leading `~` and make the path absolute against the current directory.
fn expand(raw: &str) -> Result<PathBuf> {
    let expanded = if raw == "~" {
        platform_home()?
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        platform_home()?.join(rest)
    } else {
        PathBuf::from(raw)
    };

    if expanded.is_absolute() {
        return Ok(expanded);
    }
    let cwd = std::env::current_dir().context("current directory is not accessible")?;
    Ok(cwd.join(expanded))
}

/// Resolve the service home directory.
///
/// `explicit` wins when present; otherwise `<platform home>/<default_subdir>` is used.
/// When `create` is set the directory is created if missing.
pub(crate) fn resolve_home_dir(
    explicit: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match explicit {
        Some(raw) => expand(raw.trim())?,
        None => platform_home()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("failed to create home dir '{}'", path.display()))?;
    }
    Ok(path)
}

/// Join `file` onto `base` unless it is already absolute.
pub(crate) fn resolve_against(file: &str, base: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("svc-home");
        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".unused", true).unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn tilde_and_default_use_the_user_home() {
        let home = dirs::home_dir().expect("home directory");

        let resolved = resolve_home_dir(Some("~/svc".into()), ".unused", false).unwrap();
        assert_eq!(resolved, home.join("svc"));

        let resolved = resolve_home_dir(None, ".users-server", false).unwrap();
        assert_eq!(resolved, home.join(".users-server"));
    }

    #[test]
    fn relative_path_becomes_absolute() {
        let resolved = resolve_home_dir(Some("some/relative".into()), ".unused", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/relative"));
    }

    #[test]
    fn resolve_against_keeps_absolute_paths() {
        let tmp = tempdir().unwrap();
        let abs = tmp.path().join("x.log");
        assert_eq!(
            resolve_against(&abs.to_string_lossy(), Path::new("/base")),
            abs
        );
        assert_eq!(
            resolve_against("logs/x.log", Path::new("/base")),
            PathBuf::from("/base/logs/x.log")
        );
    }
}
