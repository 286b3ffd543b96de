//! Single-page HTML assembly.
//!
//! Final stage of the pipeline. Takes a [`Conversion`] and produces one
//! self-contained HTML file: every document becomes a hidden section, the
//! sidebar is rendered from the navigation tree, and a few lines of embedded
//! JavaScript switch between sections.
//!
//! ## Page Structure
//!
//! ```text
//! div.wiki-layout                 .no-toc / .sidebar-collapsed / .toc-hidden
//! ├── nav.sidebar                 Navigation tree, collapsible folders
//! │   └── div.theme-selector      family dropdown, Light/Dark/System buttons
//! ├── main.content
//! │   ├── div.content-toolbar     menu button, TOC toggle
//! │   ├── div.content-section#section-0    visible on load
//! │   │   ├── div.section-header           (features.show_file_titles)
//! │   │   ├── div.frontmatter-tags         (features.show_frontmatter)
//! │   │   ├── div.section-content          rendered markdown
//! │   │   └── template.section-toc         swapped into the TOC panel
//! │   └── div.content-section#section-N    hidden
//! └── aside.toc-panel             (features.show_toc)
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (theme colors injected from config)
//! - `static/theme.js`: Runs in `<head>` and applies the saved theme before
//!   the first paint, reading `THEME_CONFIG`
//! - `static/wiki.js`: Section switching, folders, TOC, sidebar, theme
//!   selector and the tag popup
//!
//! Nothing is loaded from the network; the file works from `file://`.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Titles, labels and tags are escaped by maud; document bodies are inserted
//! as already-rendered HTML.

use crate::config::{self, ThemeMode, WikiConfig};
use crate::headings;
use crate::nav::NavNode;
use crate::process::{Conversion, ProcessedDocument};
use crate::tags::TagIndex;
use crate::toc::Toc;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const THEME_JS: &str = include_str!("../static/theme.js");
const JS: &str = include_str!("../static/wiki.js");

/// Theme settings handed to the page scripts as `THEME_CONFIG`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThemeSettings<'a> {
    default_family: &'a str,
    default_mode: ThemeMode,
    families: Vec<String>,
}

/// Render the page and write it to `output`, creating parent directories.
pub fn generate(
    conversion: &Conversion,
    config: &WikiConfig,
    output: &Path,
) -> Result<(), GenerateError> {
    let page = render_page(conversion, config)?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, page.into_string())?;
    log::info!("wrote {}", output.display());
    Ok(())
}

/// Render the complete page.
pub fn render_page(conversion: &Conversion, config: &WikiConfig) -> Result<Markup, GenerateError> {
    let title = config.resolved_title(&conversion.root);
    let css = format!("{}\n\n{}", config::generate_theme_css(config), CSS_STATIC);
    let tag_json = script_json(&conversion.tags)?;
    let theme_script = format!("const THEME_CONFIG = {};\n{THEME_JS}", theme_json(config)?);
    let features = &config.features;
    let first_toc = conversion.documents.first().map(|d| &d.toc);

    let content = html! {
        div.wiki-layout.no-toc[!features.show_toc] {
            nav.sidebar id="sidebar" {
                div.sidebar-header {
                    h2.wiki-title { (title) }
                    button.sidebar-toggle type="button" onclick="toggleSidebar()" title="Hide navigation" aria-label="Hide navigation" { "«" }
                }
                (render_nav(&conversion.navigation))
                (render_theme_selector(config))
            }
            main.content {
                div.content-toolbar {
                    button.menu-button type="button" onclick="toggleSidebar()" title="Show navigation" aria-label="Show navigation" { "☰" }
                    @if features.show_toc {
                        button.toc-toggle.active id="toc-toggle" type="button" onclick="toggleTOC()" title="Table of contents (Ctrl+T)" aria-label="Toggle table of contents" { "☷" }
                    }
                }
                @for doc in &conversion.documents {
                    (render_section(doc, &conversion.tags, config))
                }
            }
            @if features.show_toc {
                aside.toc-panel id="toc-panel" {
                    h3 { "On this page" }
                    div id="toc-content" {
                        @if let Some(toc) = first_toc {
                            (render_toc(toc))
                        }
                    }
                }
            }
        }
        div.tag-popup id="tag-popup" {}
        script { (PreEscaped(format!("const TAG_INDEX = {tag_json};"))) }
        script { (PreEscaped(JS)) }
    };

    Ok(base_document(&title, &css, &theme_script, content))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, head_script: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="generator" content={ "wikifold " (env!("CARGO_PKG_VERSION")) };
                title { (title) }
                style { (PreEscaped(css)) }
                script { (PreEscaped(head_script)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the sidebar navigation tree
pub fn render_nav(nodes: &[NavNode]) -> Markup {
    html! {
        ul.nav-list {
            @for node in nodes {
                (render_nav_node(node, None))
            }
        }
    }
}

fn render_nav_node(node: &NavNode, parent: Option<&str>) -> Markup {
    match node {
        NavNode::Document { ordinal, label } => html! {
            li {
                a.nav-link.active[*ordinal == 0]
                    href={ "#" (headings::section_id(*ordinal)) }
                    onclick={ "showSection(" (ordinal) "); return false;" }
                    data-section-index=(ordinal)
                    data-parent-folder=[parent] { (label) }
            }
        },
        NavNode::Folder {
            label,
            id,
            children,
        } => html! {
            li.folder-item {
                div.folder-header data-folder=(id) role="button" aria-expanded="false" {
                    span.folder-toggle { "▸" }
                    span.folder-name { (label) }
                }
                ul.folder-contents id=(id) style="display: none;" {
                    @for child in children {
                        (render_nav_node(child, Some(id.as_str())))
                    }
                }
            }
        },
    }
}

/// Renders one document as a content section
fn render_section(doc: &ProcessedDocument, tags: &TagIndex, config: &WikiConfig) -> Markup {
    let display = if doc.ordinal == 0 {
        "display: block;"
    } else {
        "display: none;"
    };
    let show_tags = config.features.show_frontmatter && !doc.tags.is_empty();

    html! {
        div.content-section id=(headings::section_id(doc.ordinal)) data-section-index=(doc.ordinal) style=(display) {
            @if config.features.show_file_titles {
                div.section-header {
                    h1.section-title title=(doc.rel_path) { (doc.title) }
                }
            }
            @if show_tags {
                div.frontmatter-tags {
                    @for tag in &doc.tags {
                        span.tag data-tag=(tag) {
                            (tag) " "
                            span.tag-count { (tags.count(tag)) }
                        }
                    }
                }
            }
            div.section-content {
                (PreEscaped(&doc.html))
            }
            template.section-toc {
                (render_toc(&doc.toc))
            }
        }
    }
}

/// Renders a document's table of contents
pub fn render_toc(toc: &Toc) -> Markup {
    match toc {
        Toc::Empty => html! {
            div.toc-empty { "No headings found" }
        },
        Toc::Entries(entries) => html! {
            ul.toc-list {
                @for entry in entries {
                    li class={ "toc-level-" (entry.level) } {
                        a href={ "#" (entry.id) } data-heading-id=(entry.id) { (entry.text) }
                    }
                }
            }
        },
    }
}

/// Theme family dropdown (only with extra families) and mode buttons.
fn render_theme_selector(config: &WikiConfig) -> Markup {
    let families = config::theme_families(config);
    html! {
        div.theme-selector {
            @if families.len() > 1 {
                select.theme-dropdown id="theme-family" aria-label="Theme" {
                    @for (key, label) in &families {
                        option value=(key) selected[*key == config.theme.default_family] { (label) }
                    }
                }
            }
            div.mode-buttons role="group" aria-label="Color mode" {
                @for (mode, label) in [("light", "Light"), ("dark", "Dark"), ("system", "System")] {
                    button.mode-button type="button" data-mode=(mode) { (label) }
                }
            }
        }
    }
}

fn theme_json(config: &WikiConfig) -> Result<String, GenerateError> {
    script_json(&ThemeSettings {
        default_family: &config.theme.default_family,
        default_mode: config.theme.default_mode,
        families: config::theme_families(config)
            .into_iter()
            .map(|(key, _)| key)
            .collect(),
    })
}

/// JSON that is safe to place inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String, GenerateError> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace("</", "<\\/"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::DocumentSequence;
    use crate::process::process;
    use tempfile::TempDir;

    fn conversion(docs: &[(&str, &str)]) -> Conversion {
        process(&DocumentSequence::from_sources(
            "docs",
            docs.iter()
                .map(|(p, raw)| (p.to_string(), raw.to_string()))
                .collect(),
        ))
    }

    fn page(conv: &Conversion, config: &WikiConfig) -> String {
        render_page(conv, config).unwrap().into_string()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn nav_renders_documents_and_folders() {
        let conv = conversion(&[("index.md", ""), ("guide/setup.md", "")]);
        let html = render_nav(&conv.navigation).into_string();

        assert!(html.contains(r#"onclick="showSection(0); return false;""#));
        assert!(html.contains(r#"data-section-index="1""#));
        assert!(html.contains(r#"data-parent-folder="folder-guide""#));
        assert!(html.contains(r#"<ul class="folder-contents" id="folder-guide""#));
        assert!(html.contains(r#"<span class="folder-name">Guide</span>"#));
    }

    #[test]
    fn nav_marks_entry_active() {
        let conv = conversion(&[("index.md", ""), ("a.md", "")]);
        let html = render_nav(&conv.navigation).into_string();
        assert!(html.contains(r#"class="nav-link active""#));
        assert_eq!(html.matches("active").count(), 1);
    }

    #[test]
    fn html_escape_in_maud() {
        let nav = vec![NavNode::Document {
            ordinal: 0,
            label: "<script>alert('xss')</script>".to_string(),
        }];
        let html = render_nav(&nav).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    // =========================================================================
    // Sections
    // =========================================================================

    #[test]
    fn only_first_section_is_visible() {
        let conv = conversion(&[("index.md", "# Home"), ("a.md", "# A"), ("b.md", "# B")]);
        let html = page(&conv, &WikiConfig::default());
        assert_eq!(html.matches(r#"style="display: block;""#).count(), 1);
        assert!(html.contains(r#"id="section-0" data-section-index="0" style="display: block;""#));
        assert!(html.contains(r#"id="section-2" data-section-index="2" style="display: none;""#));
    }

    #[test]
    fn tag_chips_carry_counts() {
        let conv = conversion(&[
            ("index.md", "---\ntags: [shared]\n---\n# Home"),
            ("a.md", "---\ntags: [shared, solo]\n---\n# A"),
        ]);
        let html = page(&conv, &WikiConfig::default());
        assert!(html.contains(r#"<span class="tag" data-tag="shared">shared <span class="tag-count">2</span></span>"#));
        assert!(html.contains(r#"<span class="tag" data-tag="solo">solo <span class="tag-count">1</span></span>"#));
    }

    #[test]
    fn features_can_be_disabled() {
        let conv = conversion(&[("index.md", "---\ntags: [x]\n---\n## Heading")]);
        let mut config = WikiConfig::default();
        config.features.show_file_titles = false;
        config.features.show_frontmatter = false;
        config.features.show_toc = false;

        let html = page(&conv, &config);
        assert!(!html.contains(r#"class="section-header""#));
        assert!(!html.contains(r#"class="frontmatter-tags""#));
        assert!(!html.contains(r#"id="toc-panel""#));
        assert!(html.contains("wiki-layout no-toc"));
    }

    #[test]
    fn section_toc_templates() {
        let conv = conversion(&[("index.md", "no headings"), ("a.md", "## Setup")]);
        let html = page(&conv, &WikiConfig::default());
        assert!(html.contains("No headings found"));
        assert!(html.contains(r##"<a href="#section-1_setup" data-heading-id="section-1_setup">Setup</a>"##));
        assert!(html.contains(r#"<li class="toc-level-2">"#));
    }

    #[test]
    fn toc_panel_starts_with_entry_toc() {
        let conv = conversion(&[("index.md", "## Welcome"), ("a.md", "## Other")]);
        let html = page(&conv, &WikiConfig::default());
        let panel_start = html.find(r#"id="toc-content""#).unwrap();
        let panel = &html[panel_start..];
        assert!(panel.find("section-0_welcome").unwrap() < panel.find("</aside>").unwrap());
    }

    // =========================================================================
    // Page
    // =========================================================================

    #[test]
    fn page_is_self_contained() {
        let conv = conversion(&[("index.md", "# Home")]);
        let html = page(&conv, &WikiConfig::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("--color-bg: #ffffff"));
        assert!(html.contains("function showSection"));
        assert!(!html.contains("<link "));
        assert!(!html.contains("<script src"));
        assert!(!html.contains("https://"));
    }

    #[test]
    fn configured_title_is_used() {
        let conv = conversion(&[("index.md", "")]);
        let config = WikiConfig {
            title: Some("Team & Co".to_string()),
            ..Default::default()
        };
        let html = page(&conv, &config);
        assert!(html.contains("<title>Team &amp; Co</title>"));
    }

    #[test]
    fn tag_json_cannot_close_script() {
        let conv = conversion(&[("index.md", "---\ntags: [\"</script>\"]\n---\n")]);
        let html = page(&conv, &WikiConfig::default());
        assert!(html.contains(r#"const TAG_INDEX = {"<\/script>""#));
        assert_eq!(html.matches("</script>").count(), 3);
    }

    #[test]
    fn heading_hashes_are_routed_to_their_section() {
        let conv = conversion(&[("index.md", "[Jump](#setup)\n\n## Setup")]);
        let html = page(&conv, &WikiConfig::default());
        assert!(html.contains(r##"<a href="#section-0_setup">Jump</a>"##));
        assert!(html.contains(r"/^#(section-(\d+)(?:_.*)?)$/"));
        assert!(html.contains(r##".section-content a[href^="#section-"]"##));
    }

    // =========================================================================
    // Themes and layout controls
    // =========================================================================

    #[test]
    fn theme_config_is_in_head() {
        let conv = conversion(&[("index.md", "")]);
        let mut config = WikiConfig::default();
        config.themes.insert("nord".to_string(), Default::default());
        config.theme.default_family = "nord".to_string();
        config.theme.default_mode = ThemeMode::Dark;

        let html = page(&conv, &config);
        let head = &html[..html.find("</head>").unwrap()];
        assert!(head.contains(
            r#"const THEME_CONFIG = {"defaultFamily":"nord","defaultMode":"dark","families":["default","nord"]};"#
        ));
        assert!(head.contains("function applyTheme"));
        assert!(head.contains("body.theme-nord_dark {"));
    }

    #[test]
    fn family_dropdown_only_with_extra_themes() {
        let conv = conversion(&[("index.md", "")]);
        let html = page(&conv, &WikiConfig::default());
        assert!(!html.contains(r#"id="theme-family""#));
        assert!(html.contains(r#"<button class="mode-button" type="button" data-mode="system">System</button>"#));

        let mut config = WikiConfig::default();
        config.themes.insert("solarized".to_string(), Default::default());
        config.theme.default_family = "solarized".to_string();
        let html = page(&conv, &config);
        assert!(html.contains(r#"<option value="default">Default</option>"#));
        assert!(html.contains(r#"<option value="solarized" selected>Solarized</option>"#));
    }

    #[test]
    fn toc_toggle_follows_show_toc() {
        let conv = conversion(&[("index.md", "## A")]);
        let html = page(&conv, &WikiConfig::default());
        assert!(html.contains(r#"id="toc-toggle""#));
        assert!(html.contains(r#"onclick="toggleTOC()""#));

        let mut config = WikiConfig::default();
        config.features.show_toc = false;
        let html = page(&conv, &config);
        assert!(!html.contains(r#"id="toc-toggle""#));
        assert!(html.contains(r#"class="menu-button""#));
    }

    #[test]
    fn generate_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("site/nested/wiki.html");
        let conv = conversion(&[("index.md", "# Home")]);

        generate(&conv, &WikiConfig::default(), &out).unwrap();
        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains(r#"<h1 id="section-0_home">Home</h1>"#));
    }
}
