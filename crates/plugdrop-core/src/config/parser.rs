//! TOML parser with helpful error messages

use std::path::{Component, Path};

use super::schema::{PlugdropConfig, StoreBackend};
use crate::error::{Error, Result};

/// Parse plugdrop.toml with detailed error messages
pub fn parse_config(path: &Path) -> Result<PlugdropConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::from_io(
            format!("Failed to read config file: {}", path.display()),
            path,
            e,
        )
    })?;

    parse_config_str(&content).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}

/// Parse plugdrop.toml content from string
pub fn parse_config_str(content: &str) -> Result<PlugdropConfig> {
    let config: PlugdropConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(&e, content))?;

    validate_config(&config)?;

    Ok(config)
}

pub fn to_toml(config: &PlugdropConfig) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))
}

fn enhance_toml_error(error: &toml::de::Error, content: &str) -> Error {
    let Some(span) = error.span() else {
        return Error::Config(format!("TOML parsing error: {}", error.message()));
    };

    // 1-based line of the span start.
    let line_num = content[..span.start.min(content.len())]
        .bytes()
        .filter(|b| *b == b'\n')
        .count()
        + 1;
    Error::Config(format!(
        "TOML parsing error at line {}:\n{}\n\nError: {}",
        line_num,
        line_context(content, line_num),
        error.message()
    ))
}

fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines
        .iter()
        .enumerate()
        .skip(start)
        .take(end.saturating_sub(start))
        .map(|(idx, line)| {
            let marker = if idx + 1 == line_num { ">" } else { " " };
            format!("{marker} {:>4} | {line}", idx + 1)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn validate_config(config: &PlugdropConfig) -> Result<()> {
    let target = &config.target;
    ensure_relative_path("target.shim_file", &target.shim_file)?;
    ensure_relative_path("target.plugin_dir", &target.plugin_dir)?;

    if target.executable.trim().is_empty() {
        return Err(Error::Config("target.executable must not be empty".into()));
    }
    if target.install_namespace.trim().is_empty() || target.toggle_namespace.trim().is_empty() {
        return Err(Error::Config("target namespaces must not be empty".into()));
    }

    let mut flags: Vec<&str> = target
        .mirrored_flags
        .iter()
        .chain(target.forced_off_flags.iter())
        .map(String::as_str)
        .collect();
    flags.sort_unstable();
    if flags.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(Error::Config("toggle flags must be four distinct names".into()));
    }

    if config.store.backend == StoreBackend::Registry && !cfg!(windows) {
        return Err(Error::Config(
            "store.backend = \"registry\" is only available on Windows".into(),
        ));
    }

    Ok(())
}

fn ensure_relative_path(field: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::Config(format!("{field} must not be empty")));
    }
    if path.is_absolute() {
        return Err(Error::Config(format!("{field} must be relative to the install path")));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(Error::Config(format!("{field}: path traversal not allowed")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config_str("").expect("empty config should parse");
        assert_eq!(config, PlugdropConfig::default());
    }

    #[test]
    fn partial_target_table_keeps_other_defaults() {
        let config = parse_config_str(
            r#"
[catalog]
dir = "/srv/manifests"

[target]
executable = "client"
process_names = ["client", "client-web"]
"#,
        )
        .expect("config should parse");

        assert_eq!(config.catalog.dir, PathBuf::from("/srv/manifests"));
        assert_eq!(config.target.executable, "client");
        assert_eq!(config.target.process_names.len(), 2);
        assert_eq!(config.target.install_value, "InstallPath");
    }

    #[test]
    fn absolute_plugin_dir_is_rejected() {
        let err = parse_config_str("[target]\nplugin_dir = \"/etc/plugins\"\n").unwrap_err();
        assert!(err.to_string().contains("target.plugin_dir"));
    }

    #[test]
    fn traversal_in_shim_file_is_rejected() {
        let err = parse_config_str("[target]\nshim_file = \"../outside.bin\"\n").unwrap_err();
        assert!(err.to_string().contains("traversal"));
    }

    #[test]
    fn duplicate_flag_names_are_rejected() {
        let err = parse_config_str(
            "[target]\nmirrored_flags = [\"A\", \"B\"]\nforced_off_flags = [\"B\", \"C\"]\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }

    #[cfg(not(windows))]
    #[test]
    fn registry_backend_is_rejected_off_windows() {
        let err = parse_config_str("[store]\nbackend = \"registry\"\n").unwrap_err();
        assert!(err.to_string().contains("only available on Windows"), "{err}");
    }

    #[test]
    fn file_backend_parses() {
        let config =
            parse_config_str("[store]\nbackend = \"file\"\n").expect("config should parse");
        assert_eq!(config.store.backend, StoreBackend::File);
    }

    #[test]
    fn syntax_error_reports_line() {
        let err = parse_config_str("[catalog]\ndir = \n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }
}
