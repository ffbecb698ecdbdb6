use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Directory name used under the platform configuration directory.
pub const APP_DIR_NAME: &str = "opsdash";

/// Expands a leading `~` to the home directory. Surrounding whitespace is
/// trimmed; other paths pass through unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let Some(after_tilde) = trimmed.strip_prefix('~') else {
        return PathBuf::from(trimmed);
    };
    let relative = match after_tilde.chars().next() {
        None => "",
        Some('/' | '\\') => &after_tilde[1..],
        // `~user` forms are not expanded.
        Some(_) => return PathBuf::from(trimmed),
    };
    match home_dir() {
        Some(home) if relative.is_empty() => home,
        Some(home) => home.join(relative),
        None => PathBuf::from(trimmed),
    }
}

/// Resolves the location of an Opsdash configuration file.
///
/// A non-blank `override_env` variable wins (with `~` expanded); otherwise the
/// file lives at `<config_dir>/opsdash/<file_name>`, falling back to the
/// current directory when the platform has no configuration directory.
pub fn config_file_path(override_env: &str, file_name: &str) -> PathBuf {
    if let Ok(path) = env::var(override_env)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_env_takes_precedence() {
        temp_env::with_var("OPSDASH_TEST_CONFIG_PATH", Some("/tmp/opsdash/custom.json"), || {
            let path = config_file_path("OPSDASH_TEST_CONFIG_PATH", "config.json");
            assert_eq!(path, PathBuf::from("/tmp/opsdash/custom.json"));
        });
    }

    #[test]
    fn blank_override_falls_back_to_config_dir() {
        temp_env::with_var("OPSDASH_TEST_CONFIG_PATH", Some("   "), || {
            let path = config_file_path("OPSDASH_TEST_CONFIG_PATH", "config.json");
            assert!(path.ends_with("opsdash/config.json"), "unexpected path: {}", path.display());
        });
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths_alone() {
        assert_eq!(expand_tilde(" /etc/opsdash.json "), PathBuf::from("/etc/opsdash.json"));
        assert_eq!(expand_tilde("~ops/menu.yaml"), PathBuf::from("~ops/menu.yaml"));
    }

    #[test]
    fn expand_tilde_resolves_against_home() {
        let Some(home) = home_dir() else {
            return;
        };
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde("~/opsdash/menu.yaml"), home.join("opsdash/menu.yaml"));
    }
}
