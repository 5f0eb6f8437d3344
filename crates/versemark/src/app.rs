use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use versecore::layout::verse_indices;
use versecore::{MarkedText, RenderConfig, TemplateCatalog, TemplateMode};

use crate::config::Config;
use crate::file_manager::FileManager;
use crate::reader::{render_page, Page, ReaderStyle};
use crate::status_manager::StatusManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Reading,
    Help,
    SavePrompt,
}

pub struct App {
    pub config: Config,
    pub file_manager: FileManager,
    pub status: StatusManager,
    text: MarkedText,
    catalog: TemplateCatalog,
    render: RenderConfig,
    template: Option<String>,
    modified: bool,
    mode: Mode,
    should_quit: bool,
    scroll: usize,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            render: config.render.to_render_config(),
            catalog: config.catalog(),
            config,
            file_manager: FileManager::new(),
            status: StatusManager::new(),
            text: MarkedText::default(),
            template: None,
            modified: false,
            mode: Mode::Reading,
            should_quit: false,
            scroll: 0,
        }
    }

    /// App with the user's config loaded from disk.
    pub async fn load() -> Result<Self> {
        let config = Config::load().await?;
        Ok(Self::new(config))
    }

    pub async fn open(&mut self, path: PathBuf) -> Result<()> {
        let text = self.file_manager.open_file(path.clone()).await?;
        self.set_text(text);
        self.status.set_info(format!(
            "Opened {} ({} verses)",
            path.display(),
            self.verse_count()
        ));
        Ok(())
    }

    /// Replace the document, resetting position and scroll.
    pub fn set_text(&mut self, text: MarkedText) {
        self.text = text;
        self.modified = false;
        self.template = None;
        self.render.current_verse_index = None;
        self.scroll = 0;
    }

    pub fn text(&self) -> &MarkedText {
        &self.text
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn show_help(&self) -> bool {
        self.mode == Mode::Help
    }

    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_manager.get_current_path()
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn verse_count(&self) -> usize {
        verse_indices(&self.text.sections()).iter().flatten().count()
    }

    pub fn quit(&mut self) {
        log::info!("Reader shutdown requested");
        self.should_quit = true;
    }

    pub fn update_status(&mut self) {
        self.status.update();
    }

    pub fn status_summary(&self) -> String {
        StatusManager::reading_summary(
            &self.render,
            self.template.as_deref(),
            self.verse_count(),
            self.modified,
        )
    }

    /// Render the document for a viewport and keep the current verse in view.
    pub fn render_page(&mut self, width: usize, height: usize) -> Page {
        let style = ReaderStyle::from_config(&self.config.reader).fit_to(width);
        let page = render_page(&self.text.sections(), &self.render, &style);
        self.sync_scroll(&page, height);
        page
    }

    fn sync_scroll(&mut self, page: &Page, height: usize) {
        let last = page.lines.len().saturating_sub(1);
        if let Some(row) = self.render.current_verse_index.and_then(|v| page.row_of(v)) {
            if row < self.scroll || row >= self.scroll + height.max(1) {
                // A third of the viewport stays above the verse for context.
                self.scroll = row.saturating_sub(height / 3);
            }
        }
        self.scroll = self.scroll.min(last);
    }

    pub fn next_verse(&mut self) {
        let count = self.verse_count();
        if count == 0 {
            self.status.set_warning("No verses to move through");
            return;
        }
        let next = match self.render.current_verse_index {
            Some(v) => (v + 1).min(count - 1),
            None => 0,
        };
        self.render.current_verse_index = Some(next);
    }

    pub fn prev_verse(&mut self) {
        let count = self.verse_count();
        if count == 0 {
            self.status.set_warning("No verses to move through");
            return;
        }
        let prev = match self.render.current_verse_index {
            Some(v) => v.saturating_sub(1).min(count - 1),
            None => 0,
        };
        self.render.current_verse_index = Some(prev);
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta);
    }

    pub fn toggle_compact(&mut self) {
        self.render.compact_mode = !self.render.compact_mode;
        self.status.set_info(if self.render.compact_mode {
            "Compact spacing"
        } else {
            "Regular spacing"
        });
    }

    pub fn toggle_numbers(&mut self) {
        self.render.show_verse_numbers = !self.render.show_verse_numbers;
        self.status.set_info(if self.render.show_verse_numbers {
            "Verse numbers on"
        } else {
            "Verse numbers off"
        });
    }

    pub fn toggle_highlight(&mut self) {
        self.render.highlight_current_verse = !self.render.highlight_current_verse;
        self.status.set_info(if self.render.highlight_current_verse {
            "Highlighting current verse"
        } else {
            "Highlight off"
        });
    }

    /// Apply the next template in the catalog. A failure leaves the text as it was.
    pub fn cycle_template(&mut self) {
        let Some(pattern) = self.catalog.next_after(self.template.as_deref()) else {
            self.status.set_warning("No templates configured");
            return;
        };

        match self.text.apply_template(pattern) {
            Ok((text, mode)) => {
                let detail = match mode {
                    TemplateMode::Restyle { markers } => format!("restyled {} breaks", markers),
                    TemplateMode::Insert { breaks } => format!("inserted {} breaks", breaks),
                };
                self.status
                    .set_success(format!("Template '{}': {}", pattern.name, detail));
                self.template = Some(pattern.name.clone());
                self.text = text;
                self.modified = true;
            }
            Err(e) => {
                let name = pattern.name.clone();
                // Skip past the failing template on the next press.
                self.template = Some(name.clone());
                self.status
                    .set_error(format!("Template '{}' not applied: {}", name, e));
            }
        }
    }

    pub async fn save(&mut self) -> Result<()> {
        if !self.file_manager.has_file() {
            return Err(anyhow::anyhow!("No file name specified"));
        }
        let message = self.file_manager.save_file(&self.text).await?;
        self.modified = false;
        self.status.set_success(message);
        Ok(())
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match self.mode {
            Mode::Reading => self.handle_reading_key(key).await,
            Mode::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.mode = Mode::Reading;
                }
                Ok(())
            }
            Mode::SavePrompt => self.handle_save_prompt_key(key).await,
        }
    }

    async fn handle_reading_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.request_quit();
            return Ok(());
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.next_verse(),
            KeyCode::Char('k') | KeyCode::Up => self.prev_verse(),
            KeyCode::PageDown => self.scroll_by(10),
            KeyCode::PageUp => self.scroll_by(-10),
            KeyCode::Char('c') => self.toggle_compact(),
            KeyCode::Char('n') => self.toggle_numbers(),
            KeyCode::Char('h') => self.toggle_highlight(),
            KeyCode::Char('t') => self.cycle_template(),
            KeyCode::Char('w') => {
                if let Err(e) = self.save().await {
                    self.status.set_error(format!("Error saving: {}", e));
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => self.request_quit(),
            KeyCode::Char('?') => self.mode = Mode::Help,
            _ => {}
        }
        Ok(())
    }

    fn request_quit(&mut self) {
        if self.modified {
            self.status
                .set_warning("Save changes before quitting? (y/n/c)");
            self.mode = Mode::SavePrompt;
        } else {
            self.quit();
        }
    }

    async fn handle_save_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Err(e) = self.save().await {
                    self.status.set_error(format!("Error saving: {}", e));
                    self.mode = Mode::Reading;
                } else {
                    self.quit();
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.quit(),
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Esc => {
                self.mode = Mode::Reading;
                self.status.clear();
            }
            _ => {}
        }
        Ok(())
    }
}
