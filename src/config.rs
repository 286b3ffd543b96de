//! Wiki configuration module.
//!
//! Handles loading, validating, and merging `wikifold.toml`. Stock defaults
//! are the base layer; a user file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! The file is looked up in the input root, or passed explicitly with
//! `--config`:
//!
//! ```text
//! docs/
//! ├── wikifold.toml            # Overrides stock defaults
//! ├── index.md
//! └── guide/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Docs"            # Page title (defaults to the input folder name)
//!
//! [features]
//! show_file_titles = true   # Header above each document section
//! show_frontmatter = true   # Tag chips from frontmatter
//! show_toc = true           # "On this page" panel
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1f2328"
//! text_muted = "#656d76"    # Sidebar, TOC, captions
//! border = "#d0d7de"
//! link = "#0969da"
//! link_hover = "#0550ae"
//! accent = "#f6f8fa"        # Code blocks, table headers, active nav item
//!
//! [colors.dark]
//! background = "#0d1117"
//! text = "#e6edf3"
//! text_muted = "#8d96a0"
//! border = "#30363d"
//! link = "#4493f8"
//! link_hover = "#79c0ff"
//! accent = "#161b22"
//!
//! [theme]
//! default_family = "default"  # "default" (the [colors] schemes) or a [themes] key
//! default_mode = "system"     # light | dark | system
//!
//! [themes.nord.light]       # Extra family; unset keys come from the stock schemes
//! background = "#eceff4"
//!
//! [themes.nord.dark]
//! background = "#2e3440"
//!
//! [processing]
//! max_threads = 4           # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Themes
//!
//! Every family contributes a light and a dark scheme. The page CSS puts the
//! default family on `:root` (following the OS preference), then adds one
//! `theme-<name>` class per scheme: `theme-light` and `theme-dark` for the
//! default family, `theme-<family>_light` and `theme-<family>_dark` for the
//! others. The reader picks a family and a mode in the sidebar.
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Only rename the page
//! title = "Platform Handbook"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the input root.
pub const CONFIG_FILE: &str = "wikifold.toml";

/// Name of the family made of the `[colors]` schemes.
pub const DEFAULT_FAMILY: &str = "default";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Wiki configuration loaded from `wikifold.toml`.
///
/// All fields have defaults; unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WikiConfig {
    /// Page title. `None` means "derive from the input folder name".
    pub title: Option<String>,
    /// Optional parts of the page.
    pub features: FeaturesConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Theme family and mode used until the reader picks another.
    pub theme: ThemeConfig,
    /// Extra theme families, each with a light and a dark scheme.
    pub themes: BTreeMap<String, ColorConfig>,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl WikiConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ConfigError::Validation("title must not be empty".into()));
            }
        }
        check_schemes("colors", &self.colors)?;
        for (name, family) in &self.themes {
            let valid_name = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid_name {
                return Err(ConfigError::Validation(format!(
                    "theme name '{name}' may only use ASCII letters, digits, '-' and '_'"
                )));
            }
            if name == DEFAULT_FAMILY {
                return Err(ConfigError::Validation(format!(
                    "'{DEFAULT_FAMILY}' is reserved for the [colors] schemes"
                )));
            }
            check_schemes(&format!("themes.{name}"), family)?;
        }
        let family = &self.theme.default_family;
        if family != DEFAULT_FAMILY && !self.themes.contains_key(family) {
            return Err(ConfigError::Validation(format!(
                "theme.default_family '{family}' is not a configured theme"
            )));
        }
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Configured title, or the input folder's name as a display title.
    pub fn resolved_title(&self, root: &Path) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        let name = root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .or_else(|| root.file_name().map(|n| n.to_string_lossy().into_owned()));
        match name {
            Some(name) if !name.is_empty() => crate::naming::display_title(&name),
            _ => "Documentation".to_string(),
        }
    }
}

fn check_schemes(prefix: &str, colors: &ColorConfig) -> Result<(), ConfigError> {
    for (mode, scheme) in [("light", &colors.light), ("dark", &colors.dark)] {
        if let Some(key) = scheme.first_empty() {
            return Err(ConfigError::Validation(format!(
                "{prefix}.{mode}.{key} must not be empty"
            )));
        }
    }
    Ok(())
}

/// Initial theme selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// `"default"` or a key of `[themes]`.
    pub default_family: String,
    pub default_mode: ThemeMode,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default_family: DEFAULT_FAMILY.to_string(),
            default_mode: ThemeMode::System,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the OS preference.
    #[default]
    System,
}

/// Selectable families as `(key, label)`, the default family first.
pub fn theme_families(config: &WikiConfig) -> Vec<(String, String)> {
    let mut families = vec![(DEFAULT_FAMILY.to_string(), "Default".to_string())];
    families.extend(
        config
            .themes
            .keys()
            .map(|name| (name.clone(), crate::naming::display_title(name))),
    );
    families
}

/// Every scheme with the class suffix it is selected by.
pub fn theme_classes(config: &WikiConfig) -> Vec<(String, &ColorScheme)> {
    let mut classes = vec![
        ("light".to_string(), &config.colors.light),
        ("dark".to_string(), &config.colors.dark),
    ];
    for (name, family) in &config.themes {
        classes.push((format!("{name}_light"), &family.light));
        classes.push((format!("{name}_dark"), &family.dark));
    }
    classes
}

/// Toggles for optional page parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeaturesConfig {
    /// Show a header with the document title above each section.
    pub show_file_titles: bool,
    /// Show frontmatter tags as clickable chips.
    pub show_frontmatter: bool,
    /// Show the per-document table of contents panel.
    pub show_toc: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            show_file_titles: true,
            show_frontmatter: true,
            show_toc: true,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of documents processed in parallel.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Background color.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (sidebar, TOC, captions).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Link color.
    pub link: String,
    /// Link hover color.
    pub link_hover: String,
    /// Subtle fill for code blocks, table headers and the active nav item.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1f2328".to_string(),
            text_muted: "#656d76".to_string(),
            border: "#d0d7de".to_string(),
            link: "#0969da".to_string(),
            link_hover: "#0550ae".to_string(),
            accent: "#f6f8fa".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0d1117".to_string(),
            text: "#e6edf3".to_string(),
            text_muted: "#8d96a0".to_string(),
            border: "#30363d".to_string(),
            link: "#4493f8".to_string(),
            link_hover: "#79c0ff".to_string(),
            accent: "#161b22".to_string(),
        }
    }

    fn first_empty(&self) -> Option<&'static str> {
        [
            ("background", &self.background),
            ("text", &self.text),
            ("text_muted", &self.text_muted),
            ("border", &self.border),
            ("link", &self.link),
            ("link_hover", &self.link_hover),
            ("accent", &self.accent),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(WikiConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Lay every `[themes.<name>]` family over the stock schemes, so a family
/// only lists the colors it changes.
fn complete_theme_families(mut merged: toml::Value) -> toml::Value {
    let Some(stock) = stock_defaults_value().get("colors").cloned() else {
        return merged;
    };
    if let Some(toml::Value::Table(themes)) = merged.get_mut("themes") {
        for (_, family) in themes.iter_mut() {
            let overlay = std::mem::replace(family, toml::Value::Table(toml::Table::new()));
            *family = merge_toml(stock.clone(), overlay);
        }
    }
    merged
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<WikiConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: WikiConfig = complete_theme_families(merged).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config for a run.
///
/// An explicit path must exist; otherwise `wikifold.toml` in `root` is used
/// when present, and stock defaults when not.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<WikiConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = match explicit {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str(&content)?)
        }
        None => load_raw_config(&root.join(CONFIG_FILE))?,
    };
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `wikifold.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# wikifold configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the documentation root as wikifold.toml, or pass it
# with --config. Unknown keys will cause an error.

# Page title. Defaults to the input folder name, title-cased.
# title = "Documentation"

# ---------------------------------------------------------------------------
# Page features
# ---------------------------------------------------------------------------
[features]
# Header with the document title above each section.
show_file_titles = true

# Frontmatter tags shown as clickable chips.
show_frontmatter = true

# "On this page" table of contents panel.
show_toc = true

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1f2328"
text_muted = "#656d76"    # Sidebar, TOC, captions
border = "#d0d7de"
link = "#0969da"
link_hover = "#0550ae"
accent = "#f6f8fa"        # Code blocks, table headers, active nav item

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0d1117"
text = "#e6edf3"
text_muted = "#8d96a0"
border = "#30363d"
link = "#4493f8"
link_hover = "#79c0ff"
accent = "#161b22"

# ---------------------------------------------------------------------------
# Themes
# ---------------------------------------------------------------------------
# Readers pick a theme family and a Light/Dark/System mode in the sidebar;
# the choice is remembered by the browser. These set the first visit.
[theme]
# "default" (the [colors] schemes above) or the name of a [themes] family.
default_family = "default"

# light, dark or system (follow the OS setting).
default_mode = "system"

# Extra families. Each needs a light and a dark table; keys left out take
# the stock values.
#
# [themes.nord.light]
# background = "#eceff4"
# text = "#2e3440"
# link = "#5e81ac"
#
# [themes.nord.dark]
# background = "#2e3440"
# text = "#d8dee9"
# link = "#88c0d0"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum documents processed in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}

/// CSS custom property declarations for one scheme.
fn scheme_declarations(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("bg", &scheme.background),
        ("text", &scheme.text),
        ("text-muted", &scheme.text_muted),
        ("border", &scheme.border),
        ("link", &scheme.link),
        ("link-hover", &scheme.link_hover),
        ("accent", &scheme.accent),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}--color-{name}: {value};\n"))
    .collect()
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root {{\n{}}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}    }}\n}}",
        scheme_declarations(&colors.light, "    "),
        scheme_declarations(&colors.dark, "        "),
    )
}

/// Full page color CSS: the OS-driven default plus one class per theme.
pub fn generate_theme_css(config: &WikiConfig) -> String {
    let mut css = generate_color_css(&config.colors);
    for (name, scheme) in theme_classes(config) {
        css.push_str(&format!(
            "\n\n:root.theme-{name},\nbody.theme-{name} {{\n{}}}",
            scheme_declarations(scheme, "    ")
        ));
    }
    css
}
