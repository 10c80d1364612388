use crate::constants::env as env_keys;
use std::env;
use std::path::{Path, PathBuf};

pub(crate) fn normalize_env_path(value: Option<String>) -> Option<PathBuf> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    if lowered == "undefined" || lowered == "null" {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn resolve_home_dir() -> Option<PathBuf> {
    env::var("HOME").ok().map(PathBuf::from)
}

fn resolve_xdg_state_dir() -> Option<PathBuf> {
    if let Some(path) = normalize_env_path(env::var("XDG_STATE_HOME").ok()) {
        return Some(path);
    }
    resolve_home_dir().map(|home| home.join(".local").join("state"))
}

fn resolve_entry_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
}

pub fn resolve_state_dir() -> PathBuf {
    if let Some(path) = normalize_env_path(env::var(env_keys::STATE_DIR).ok()) {
        return path;
    }
    if let Some(path) = resolve_xdg_state_dir() {
        return path.join("toolserver");
    }
    resolve_entry_dir().unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

pub fn resolve_connections_path() -> PathBuf {
    if let Some(path) = normalize_env_path(env::var(env_keys::CONNECTIONS_PATH).ok()) {
        return path;
    }
    resolve_state_dir().join("connections.json")
}

/// Resolves `target` against `base_dir` unless it is already absolute.
pub fn resolve_relative_to(base_dir: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        target.to_path_buf()
    } else {
        base_dir.join(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_env_values_are_treated_as_unset() {
        assert_eq!(normalize_env_path(None), None);
        assert_eq!(normalize_env_path(Some("  ".to_string())), None);
        assert_eq!(normalize_env_path(Some("undefined".to_string())), None);
        assert_eq!(normalize_env_path(Some("NULL".to_string())), None);
        assert_eq!(
            normalize_env_path(Some(" /etc/toolserver.json ".to_string())),
            Some(PathBuf::from("/etc/toolserver.json"))
        );
    }

    #[test]
    fn relative_targets_join_the_base_dir() {
        let base = Path::new("/srv/tools");
        assert_eq!(
            resolve_relative_to(base, Path::new("specs/pets.json")),
            PathBuf::from("/srv/tools/specs/pets.json")
        );
        assert_eq!(
            resolve_relative_to(base, Path::new("/opt/pets.json")),
            PathBuf::from("/opt/pets.json")
        );
    }
}
