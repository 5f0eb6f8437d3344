use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use versecore::MarkedText;

const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB
const LARGE_CONTENT_THRESHOLD: usize = 50 * 1024 * 1024; // 50MB

/// Persistence for marked text. The text is stored as an opaque string.
pub struct FileManager {
    pub current_path: Option<PathBuf>,
    pub is_readonly: bool,
}

impl FileManager {
    pub fn new() -> Self {
        Self {
            current_path: None,
            is_readonly: false,
        }
    }

    pub fn get_current_path(&self) -> Option<&PathBuf> {
        self.current_path.as_ref()
    }

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    pub fn has_file(&self) -> bool {
        self.current_path.is_some()
    }

    pub async fn open_file(&mut self, path: PathBuf) -> Result<MarkedText> {
        if !path.exists() {
            return Err(anyhow::anyhow!("File not found: {}", path.display()));
        }

        if !path.is_file() {
            return Err(anyhow::anyhow!("Not a file: {}", path.display()));
        }

        match fs::metadata(&path).await {
            Ok(metadata) => {
                self.is_readonly = metadata.permissions().readonly();

                if metadata.len() > LARGE_FILE_THRESHOLD {
                    log::warn!(
                        "Large file detected ({} bytes): {}",
                        metadata.len(),
                        path.display()
                    );
                }
            }
            Err(e) => {
                log::warn!("Failed to get file metadata: {}", e);
                self.is_readonly = false;
            }
        }

        match fs::read_to_string(&path).await {
            Ok(content) => {
                if content.contains('\0') {
                    return Err(anyhow::anyhow!(
                        "File looks like binary data: {}",
                        path.display()
                    ));
                }

                self.current_path = Some(path.clone());
                log::info!("Successfully opened file: {}", path.display());
                Ok(MarkedText::from(content))
            }
            Err(e) => {
                let error_msg = match e.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        format!("Permission denied reading: {}", path.display())
                    }
                    std::io::ErrorKind::NotFound => {
                        format!("File not found: {}", path.display())
                    }
                    std::io::ErrorKind::InvalidData => {
                        format!("File is not valid UTF-8: {}", path.display())
                    }
                    _ => format!("Failed to read {}: {}", path.display(), e),
                };
                Err(anyhow::anyhow!(error_msg))
            }
        }
    }

    pub async fn save_file(&self, text: &MarkedText) -> Result<String> {
        let Some(ref path) = self.current_path else {
            return Err(anyhow::anyhow!("No file path set"));
        };

        if self.is_readonly {
            return Err(anyhow::anyhow!("File is read-only: {}", path.display()));
        }

        check_size(text)?;

        if let Ok(metadata) = fs::metadata(path).await {
            if metadata.len() > 0 {
                let backup_path = path.with_extension("bak");
                if let Err(e) = fs::copy(path, &backup_path).await {
                    log::warn!("Failed to create backup: {}", e);
                } else {
                    log::info!("Created backup: {}", backup_path.display());
                }
            }
        }

        let mut attempts = 0;
        const MAX_ATTEMPTS: u32 = 3;

        loop {
            match fs::write(path, text.as_str().as_bytes()).await {
                Ok(_) => {
                    log::info!("Successfully saved file: {}", path.display());
                    return Ok(format!("{} lines written", line_count(text)));
                }
                Err(e) => {
                    attempts += 1;
                    if attempts >= MAX_ATTEMPTS {
                        return Err(write_error(path, e));
                    }

                    tokio::time::sleep(tokio::time::Duration::from_millis(100 * attempts as u64))
                        .await;
                    log::warn!(
                        "Save attempt {} failed for {}, retrying...",
                        attempts,
                        path.display()
                    );
                }
            }
        }
    }

    pub async fn save_file_as(&mut self, path: PathBuf, text: &MarkedText) -> Result<String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow::anyhow!("Failed to create directory: {} - {}", parent.display(), e)
                })?;
                log::info!("Created directory: {}", parent.display());
            }
        }

        if path.exists() {
            match fs::metadata(&path).await {
                Ok(metadata) if metadata.permissions().readonly() => {
                    return Err(anyhow::anyhow!(
                        "Target file is read-only: {}",
                        path.display()
                    ));
                }
                Ok(_) => {}
                Err(e) => log::warn!("Failed to check target file metadata: {}", e),
            }
        }

        check_size(text)?;

        fs::write(&path, text.as_str().as_bytes())
            .await
            .map_err(|e| write_error(&path, e))?;

        self.current_path = Some(path.clone());
        self.is_readonly = false;
        log::info!("Successfully saved file as: {}", path.display());
        Ok(format!(
            "{} lines written to '{}'",
            line_count(text),
            path.display()
        ))
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new()
    }
}

fn line_count(text: &MarkedText) -> usize {
    text.as_str().lines().count()
}

fn check_size(text: &MarkedText) -> Result<()> {
    if text.as_str().len() > LARGE_CONTENT_THRESHOLD {
        return Err(anyhow::anyhow!(
            "Content too large ({} bytes); saving is refused",
            text.as_str().len()
        ));
    }
    Ok(())
}

fn write_error(path: &Path, e: std::io::Error) -> anyhow::Error {
    let error_msg = match e.kind() {
        std::io::ErrorKind::PermissionDenied => {
            format!("Permission denied writing: {}", path.display())
        }
        std::io::ErrorKind::WriteZero => {
            format!("Disk may be full: {}", path.display())
        }
        _ => format!("Failed to write {}: {}", path.display(), e),
    };
    anyhow::anyhow!(error_msg)
}
