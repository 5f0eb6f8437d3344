use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use versecore::html::sections_to_html;
use versecore::sanitize::sanitize_html;
use versecore::{Alignment, LayoutSection, MarkedText, RenderConfig, TemplateCatalog, TemplateMode};

use crate::config::Config;
use crate::file_manager::FileManager;
use crate::reader::{render_page, ReaderStyle};

#[derive(Debug, Parser)]
#[command(name = "versemark", version)]
#[command(about = "Author, restyle and read right-to-left verse with inline break markers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the layout sections a document parses into
    Parse {
        path: PathBuf,
        /// Print the sections as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a document for the terminal or as HTML
    Render {
        path: PathBuf,
        /// Emit sanitized HTML instead of terminal text
        #[arg(long)]
        html: bool,
        /// Tighter spacing around breaks
        #[arg(long)]
        compact: bool,
        /// Show verse numbers
        #[arg(long)]
        numbers: bool,
        /// Highlight a verse, counting from 1
        #[arg(long, value_name = "VERSE")]
        highlight: Option<usize>,
        /// Column width for terminal output
        #[arg(long)]
        width: Option<u16>,
    },
    /// Apply a layout template
    Template {
        path: PathBuf,
        /// Template name; defaults to the configured one
        #[arg(long, short)]
        pattern: Option<String>,
        /// Rewrite the file instead of printing the result
        #[arg(long)]
        in_place: bool,
    },
    /// Insert a break marker at a caret position
    Insert {
        path: PathBuf,
        /// Caret position in characters
        #[arg(long)]
        at: usize,
        /// End of a selection to replace, in characters
        #[arg(long)]
        end: Option<usize>,
        /// Alignment of the block after the break
        #[arg(long, default_value_t = Alignment::Right)]
        style: Alignment,
        /// Rewrite the file instead of printing the result
        #[arg(long)]
        in_place: bool,
    },
    /// Remove every marker, leaving paragraph gaps
    Strip { path: PathBuf },
    /// List the available templates
    Templates,
    /// Open the interactive reader
    View { path: Option<PathBuf> },
}

/// Runs the non-interactive subcommands. Each returns what goes to stdout.
pub struct CommandProcessor {
    config: Config,
    catalog: TemplateCatalog,
}

impl CommandProcessor {
    pub fn new(config: Config) -> Self {
        Self {
            catalog: config.catalog(),
            config,
        }
    }

    pub async fn execute(&self, command: Command) -> Result<String> {
        let mut files = FileManager::new();

        match command {
            Command::Parse { path, json } => {
                let text = files.open_file(path).await?;
                parse_listing(&text, json)
            }
            Command::Render {
                path,
                html,
                compact,
                numbers,
                highlight,
                width,
            } => {
                let text = files.open_file(path).await?;
                let config = render_flags(compact, numbers, highlight)?;
                if html {
                    Ok(render_html(&text, &config))
                } else {
                    Ok(self.render_plain(&text, &config, width))
                }
            }
            Command::Template {
                path,
                pattern,
                in_place,
            } => {
                let text = files.open_file(path).await?;
                let styled = self.apply_template(&text, pattern.as_deref())?;
                write_or_print(&files, styled, in_place).await
            }
            Command::Insert {
                path,
                at,
                end,
                style,
                in_place,
            } => {
                let text = files.open_file(path).await?;
                let (edited, caret) = text.insert_break(at..end.unwrap_or(at), style);
                log::info!("Inserted {} break; caret now at char {}", style, caret);
                write_or_print(&files, edited, in_place).await
            }
            Command::Strip { path } => {
                let text = files.open_file(path).await?;
                Ok(text.strip_markers())
            }
            Command::Templates => Ok(self.template_listing()),
            Command::View { .. } => Err(anyhow::anyhow!(
                "The view command runs the interactive reader"
            )),
        }
    }

    pub fn apply_template(&self, text: &MarkedText, name: Option<&str>) -> Result<MarkedText> {
        let name = name.unwrap_or(&self.config.default_template);
        let pattern = self.catalog.get(name)?;
        let (styled, mode) = text.apply_template(pattern)?;
        match mode {
            TemplateMode::Restyle { markers } => {
                log::info!("Template '{}' restyled {} breaks", pattern.name, markers)
            }
            TemplateMode::Insert { breaks } => {
                log::info!("Template '{}' inserted {} breaks", pattern.name, breaks)
            }
        }
        Ok(styled)
    }

    pub fn render_plain(&self, text: &MarkedText, config: &RenderConfig, width: Option<u16>) -> String {
        let mut style = ReaderStyle::from_config(&self.config.reader);
        if let Some(width) = width {
            style = style.fit_to(width as usize);
        }
        render_page(&text.sections(), config, &style).to_plain_text()
    }

    pub fn template_listing(&self) -> String {
        self.catalog
            .iter()
            .map(|pattern| {
                let styles: Vec<&str> = pattern.styles.iter().map(|s| s.as_str()).collect();
                format!("{:<10}{:<24}{}", pattern.name, styles.join(", "), pattern.description)
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render flags for one CLI invocation. Only what the flags ask for is on.
pub fn render_flags(compact: bool, numbers: bool, highlight: Option<usize>) -> Result<RenderConfig> {
    let current_verse_index = match highlight {
        Some(0) => return Err(anyhow::anyhow!("Verses are numbered from 1")),
        Some(verse) => Some(verse - 1),
        None => None,
    };

    Ok(RenderConfig {
        compact_mode: compact,
        show_verse_numbers: numbers,
        highlight_current_verse: highlight.is_some(),
        current_verse_index,
    })
}

pub fn render_html(text: &MarkedText, config: &RenderConfig) -> String {
    sanitize_html(&sections_to_html(&text.sections(), config))
}

pub fn parse_listing(text: &MarkedText, json: bool) -> Result<String> {
    let sections = text.sections();
    if json {
        return serde_json::to_string_pretty(&sections)
            .map_err(|e| anyhow::anyhow!("Failed to serialize sections: {}", e));
    }

    Ok(sections
        .iter()
        .enumerate()
        .map(|(i, section)| describe_section(i, section))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn describe_section(index: usize, section: &LayoutSection) -> String {
    if section.is_break {
        return format!("{:>3}  break", index);
    }
    let kind = if section.is_header { "header" } else { "text" };
    format!("{:>3}  {:<6}  {:<6}  {:?}", index, kind, section.style.as_str(), section.content)
}

async fn write_or_print(files: &FileManager, text: MarkedText, in_place: bool) -> Result<String> {
    if in_place {
        let message = files.save_file(&text).await?;
        log::info!("{}", message);
        Ok(String::new())
    } else {
        Ok(text.into_string())
    }
}
