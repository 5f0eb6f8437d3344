use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::try_exists;
use versecore::{RenderConfig, TemplateCatalog, TemplatePattern};

/// Missing fields fall back to the defaults, so a file may hold only templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderDefaults,
    pub reader: ReaderConfig,
    pub default_template: String,
    pub templates: Vec<TemplatePattern>,
}

/// Render flags a document opens with. Playback position is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDefaults {
    pub compact_mode: bool,
    pub show_verse_numbers: bool,
    pub highlight_current_verse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub width: u16,
    pub indent_width: u16,
    pub rule_glyph: String,
    #[serde(default)]
    pub highlight_color: Option<String>,
    #[serde(default)]
    pub number_color: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderDefaults {
                compact_mode: false,
                show_verse_numbers: true,
                highlight_current_verse: true,
            },
            reader: ReaderConfig {
                width: 72,
                indent_width: 8,
                rule_glyph: String::from("─"),
                highlight_color: Some(String::from("#FFD166")),
                number_color: Some(String::from("#6C7A89")),
            },
            default_template: String::from("classic"),
            templates: Vec::new(),
        }
    }
}

impl RenderDefaults {
    pub fn to_render_config(&self) -> RenderConfig {
        RenderConfig {
            compact_mode: self.compact_mode,
            show_verse_numbers: self.show_verse_numbers,
            highlight_current_verse: self.highlight_current_verse,
            current_verse_index: None,
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if try_exists(&config_path).await? {
                match tokio::fs::read_to_string(&config_path).await {
                    Ok(content) => {
                        if content.trim().is_empty() {
                            log::warn!("Config file is empty, creating new one");
                            let default_config = Self::default();
                            let _ = default_config.save().await;
                            return Ok(default_config);
                        }

                        match serde_json::from_str::<Self>(&content) {
                            Ok(mut config) => {
                                config.validate()?;
                                log::info!(
                                    "Successfully loaded config from: {}",
                                    config_path.display()
                                );
                                return Ok(config);
                            }
                            Err(json_err) => {
                                log::error!("Failed to parse config file: {}", json_err);

                                let backup_path = config_path.with_extension("bak");
                                if let Err(e) = tokio::fs::copy(&config_path, &backup_path).await {
                                    log::warn!("Failed to backup broken config: {}", e);
                                } else {
                                    log::info!(
                                        "Backed up broken config to: {}",
                                        backup_path.display()
                                    );
                                }

                                let default_config = Self::default();
                                let _ = default_config.save().await;
                                return Ok(default_config);
                            }
                        }
                    }
                    Err(io_err) => {
                        log::error!("Failed to read config file: {}", io_err);
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        let default_config = Self::default();
        let _ = default_config.save().await;
        Ok(default_config)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            let mut config_to_save = self.clone();
            config_to_save.validate()?;

            if let Some(parent) = config_path.parent() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    return Err(anyhow::anyhow!(
                        "Failed to create config directory: {} - {}",
                        parent.display(),
                        e
                    ));
                }
                log::debug!("Config directory exists or was created: {}", parent.display());
            }

            let content = serde_json::to_string_pretty(&config_to_save)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            tokio::fs::write(&config_path, content).await.map_err(|e| {
                anyhow::anyhow!(
                    "Failed to write config file: {} - {}",
                    config_path.display(),
                    e
                )
            })?;
            log::info!("Successfully saved config to: {}", config_path.display());
        }
        Ok(())
    }

    /// Validate configuration values and fix invalid ones
    pub fn validate(&mut self) -> Result<()> {
        let mut has_issues = false;

        if !(20..=400).contains(&self.reader.width) {
            log::warn!("Invalid reader width: {}, using default", self.reader.width);
            self.reader.width = 72;
            has_issues = true;
        }

        if self.reader.indent_width > self.reader.width / 2 {
            log::warn!(
                "Indent width {} exceeds half the reader width, using default",
                self.reader.indent_width
            );
            self.reader.indent_width = 8u16.min(self.reader.width / 2);
            has_issues = true;
        }

        if self.reader.rule_glyph.trim().is_empty() {
            log::warn!("Empty rule glyph, using default");
            self.reader.rule_glyph = "─".to_string();
            has_issues = true;
        }

        let before = self.templates.len();
        self.templates.retain(|pattern| match pattern.validate() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Dropping user template: {}", e);
                false
            }
        });
        has_issues |= self.templates.len() != before;

        if self.catalog().get(&self.default_template).is_err() {
            log::warn!(
                "Unknown default template '{}', using classic",
                self.default_template
            );
            self.default_template = "classic".to_string();
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }

    /// Built-in templates extended with the user's own.
    pub fn catalog(&self) -> TemplateCatalog {
        let mut catalog = TemplateCatalog::new();
        catalog.extend(self.templates.iter().cloned());
        catalog
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("VERSEMARK_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("VERSEMARK_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "versemark", "versemark")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;
    use versecore::Alignment;

    fn config_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn set_config_path(path: &std::path::Path) -> (Option<String>, Option<String>) {
        let previous_dir = std::env::var("VERSEMARK_CONFIG_DIR").ok();
        let previous_path = std::env::var("VERSEMARK_CONFIG_PATH").ok();
        std::env::set_var("VERSEMARK_CONFIG_PATH", path);
        std::env::remove_var("VERSEMARK_CONFIG_DIR");
        (previous_dir, previous_path)
    }

    fn restore_config_env(previous: (Option<String>, Option<String>)) {
        match previous.0 {
            Some(value) => std::env::set_var("VERSEMARK_CONFIG_DIR", value),
            None => std::env::remove_var("VERSEMARK_CONFIG_DIR"),
        }

        match previous.1 {
            Some(value) => std::env::set_var("VERSEMARK_CONFIG_PATH", value),
            None => std::env::remove_var("VERSEMARK_CONFIG_PATH"),
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(!config.render.compact_mode);
        assert!(config.render.show_verse_numbers);
        assert!(config.render.highlight_current_verse);
        assert_eq!(config.reader.width, 72);
        assert_eq!(config.reader.indent_width, 8);
        assert_eq!(config.reader.rule_glyph, "─");
        assert_eq!(config.reader.highlight_color.as_deref(), Some("#FFD166"));
        assert_eq!(config.default_template, "classic");
        assert!(config.templates.is_empty());
    }

    #[test]
    fn test_render_defaults_never_carry_position() {
        let render = Config::default().render.to_render_config();
        assert_eq!(render.current_verse_index, None);
        assert!(render.show_verse_numbers);
    }

    #[test]
    fn test_validate_fixes_bad_values() {
        let mut config = Config::default();
        config.reader.width = 5;
        config.reader.indent_width = 300;
        config.reader.rule_glyph = "  ".to_string();
        config.default_template = "nonexistent".to_string();
        config.templates.push(TemplatePattern {
            name: "hollow".to_string(),
            styles: vec![],
            description: String::new(),
        });

        config.validate().unwrap();

        assert_eq!(config.reader.width, 72);
        assert_eq!(config.reader.indent_width, 8);
        assert_eq!(config.reader.rule_glyph, "─");
        assert_eq!(config.default_template, "classic");
        assert!(config.templates.is_empty());
    }

    #[test]
    fn test_user_template_can_be_default() {
        let mut config = Config::default();
        config.templates.push(
            TemplatePattern::new("mine", vec![Alignment::Indent], "indent everything").unwrap(),
        );
        config.default_template = "Mine".to_string();
        config.validate().unwrap();
        assert_eq!(config.default_template, "Mine");
        assert_eq!(
            config.catalog().get("mine").unwrap().styles,
            vec![Alignment::Indent]
        );
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config
            .templates
            .push(TemplatePattern::new("x", vec![Alignment::Left], "").unwrap());

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"render\""));
        assert!(json.contains("\"reader\""));
        assert!(json.contains("\"default_template\""));
        assert!(json.contains("\"left\""));

        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reader.width, config.reader.width);
        assert_eq!(back.templates, config.templates);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{ "templates": [ { "name": "mine", "styles": ["right", "indent"] } ] }"#;
        let mut config: Config = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.reader.width, 72);
        assert_eq!(config.default_template, "classic");
        assert_eq!(config.catalog().get("mine").unwrap().description, "");
    }

    #[tokio::test]
    async fn test_config_load_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.json");
        // Held across the await so parallel tests never see each other's path.
        let _guard = config_test_lock().lock().unwrap_or_else(|e| e.into_inner());
        let previous_env = set_config_path(&config_file);

        let config = Config::load().await;
        assert!(config.is_ok());
        assert_eq!(config.unwrap().default_template, "classic");
        assert!(config_file.exists());

        restore_config_env(previous_env);
    }

    #[tokio::test]
    async fn test_broken_config_is_backed_up() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.json");
        std::fs::write(&config_file, "{ not json").unwrap();
        // Held across the await so parallel tests never see each other's path.
        let _guard = config_test_lock().lock().unwrap_or_else(|e| e.into_inner());
        let previous_env = set_config_path(&config_file);

        let config = Config::load().await.unwrap();
        assert_eq!(config.reader.width, 72);
        assert!(temp_dir.path().join("config.bak").exists());

        restore_config_env(previous_env);
    }
}
