use std::path::{Path, PathBuf};

use directories_next::ProjectDirs;

use crate::Config;

pub fn load(config_path: &str) -> eyre::Result<Config> {
    let content = read_file_content_if_exist(config_path)?
        .ok_or_else(|| eyre::eyre!("config path '{config_path}' was not found"))?;

    parse(&content)
}

/// Same as [`load`] but a missing file yields the default configuration.
/// A file that exists but does not parse is still an error.
pub fn load_or_default(config_path: &str) -> eyre::Result<Config> {
    match read_file_content_if_exist(config_path)? {
        Some(content) => parse(&content),
        None => Ok(Config::default()),
    }
}

pub fn default_config_path() -> eyre::Result<String> {
    let proj_dirs = ProjectDirs::from("", "", "huddle")
        .ok_or_else(|| eyre::eyre!("Project directories could not be found."))?;
    let config_path: PathBuf = proj_dirs.config_dir().join("config.toml");

    let config_path = config_path
        .to_str()
        .ok_or_else(|| eyre::eyre!("couldn't convert os path to string"))?;

    Ok(shellexpand::full(config_path)?.into_owned())
}

fn parse(content: &str) -> eyre::Result<Config> {
    let config: Config = toml::from_str(content)?;

    if config.store.page_size == 0 {
        return Err(eyre::eyre!("store.page_size must be greater than zero"));
    }

    Ok(config)
}

fn read_file_content_if_exist(file_path: &str) -> eyre::Result<Option<String>> {
    let path = Path::new(file_path);

    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};

    #[test]
    fn empty_file_uses_defaults() -> eyre::Result<()> {
        let config = parse("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.store.page_size, DEFAULT_PAGE_SIZE);
        Ok(())
    }

    #[test]
    fn partial_sections_keep_other_defaults() -> eyre::Result<()> {
        let config = parse(
            r#"
            [api]
            base_url = "https://huddle.example/api"
            "#,
        )?;
        assert_eq!(config.api.base_url, "https://huddle.example/api");
        assert_eq!(config.api.timeout_secs, Some(30));
        assert_eq!(config.store.page_size, DEFAULT_PAGE_SIZE);
        Ok(())
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let result = parse("[store]\npage_size = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_falls_back_to_default() -> eyre::Result<()> {
        let config = load_or_default("/nonexistent/huddle/config.toml")?;
        assert_eq!(config, Config::default());
        assert!(load("/nonexistent/huddle/config.toml").is_err());
        Ok(())
    }
}
