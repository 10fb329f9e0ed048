//! File saving for exports.
//!
//! Files are written to a hidden `.name.partial` sibling first and renamed
//! into place only once complete, so a cancelled or failed export never
//! leaves a truncated image under the final name.

use super::types::{ExportError, ExportFormat};
use chrono::Local;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

const WRITE_CHUNK: usize = 64 * 1024;

/// Configuration for templated file names.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSaveConfig {
    /// Directory to save exports to.
    pub save_directory: PathBuf,
    /// Filename template (supports chrono format specifiers).
    pub filename_template: String,
}

impl Default for FileSaveConfig {
    fn default() -> Self {
        Self {
            save_directory: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("Shotframe"),
            filename_template: "shotframe_%Y-%m-%d_%H%M%S".to_string(),
        }
    }
}

/// Where an export file goes.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveLocation {
    /// This path, with the format's extension appended unless it already
    /// carries an accepted one. An existing file is replaced.
    Exact(PathBuf),
    /// A generated name inside a directory.
    Template(FileSaveConfig),
}

impl SaveLocation {
    /// Final path for a `format` export to this location, evaluated now.
    pub fn resolve(&self, format: ExportFormat) -> Result<PathBuf, ExportError> {
        match self {
            SaveLocation::Exact(path) => {
                let path = ensure_extension(path, format);
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    ensure_directory_exists(parent)?;
                }
                Ok(path)
            }
            SaveLocation::Template(config) => {
                let directory = ensure_directory_exists(&config.save_directory)?;
                let filename = generate_filename(&config.filename_template, format.extension());
                Ok(directory.join(filename))
            }
        }
    }
}

/// Appends the primary extension of `format` unless `path` already ends in
/// one of its accepted extensions (case-insensitive).
///
/// `shot.png` exported as JPEG becomes `shot.png.jpg`.
pub fn ensure_extension(path: &Path, format: ExportFormat) -> PathBuf {
    let accepted = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| format.extensions().contains(&ext.as_str()));
    if accepted {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// Generate a filename based on the template and current time.
pub fn generate_filename(template: &str, extension: &str) -> String {
    let now = Local::now();
    let filename = now.format(template).to_string();
    format!("{}.{}", filename, extension)
}

/// Ensure the save directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Hidden sibling used while `path` is being written.
pub fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    path.with_file_name(format!(".{}.partial", name))
}

/// Writes `data` to `path` via a temporary file and an atomic rename.
///
/// `cancel` is checked between chunks and before the rename; on
/// cancellation the temporary file is removed and nothing appears at `path`.
pub fn write_atomically(path: &Path, data: &[u8], cancel: &AtomicBool) -> Result<(), ExportError> {
    let temp = partial_path(path);
    let result = write_chunks(&temp, data, cancel).and_then(|()| {
        if cancel.load(Ordering::SeqCst) {
            return Err(ExportError::Cancelled("session closed".to_string()));
        }
        fs::rename(&temp, path)?;
        Ok(())
    });

    if result.is_err()
        && let Err(e) = fs::remove_file(&temp)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        log::warn!("Failed to remove {}: {}", temp.display(), e);
    }
    result
}

fn write_chunks(temp: &Path, data: &[u8], cancel: &AtomicBool) -> Result<(), ExportError> {
    let mut file = File::create(temp)?;

    // Set permissions to user read/write only
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(temp, Permissions::from_mode(0o600))?;
    }

    for chunk in data.chunks(WRITE_CHUNK) {
        if cancel.load(Ordering::SeqCst) {
            return Err(ExportError::Cancelled("session closed".to_string()));
        }
        file.write_all(chunk)?;
    }
    file.sync_all()?;
    Ok(())
}

/// Saves encoded image bytes to `location` and returns the final path.
pub fn save_export(
    data: &[u8],
    location: &SaveLocation,
    format: ExportFormat,
    cancel: &AtomicBool,
) -> Result<PathBuf, ExportError> {
    let file_path = location.resolve(format)?;
    log::info!(
        "Saving export to: {} ({} bytes)",
        file_path.display(),
        data.len()
    );
    write_atomically(&file_path, data, cancel)?;
    log::info!("Export saved successfully: {}", file_path.display());
    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_filename() {
        let filename = generate_filename("test_%Y%m%d", "png");
        assert!(filename.starts_with("test_"));
        assert!(filename.ends_with(".png"));
        assert_eq!(filename.len(), "test_".len() + 8 + ".png".len());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with("~"));

        let no_tilde = expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn partial_path_is_hidden_sibling() {
        assert_eq!(
            partial_path(Path::new("/tmp/out/shot.png")),
            PathBuf::from("/tmp/out/.shot.png.partial")
        );
    }

    #[test]
    fn write_atomically_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        fs::write(&path, b"old").unwrap();

        write_atomically(&path, b"new contents", &AtomicBool::new(false)).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new contents");
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn cancelled_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let result = write_atomically(&path, &[0u8; 200_000], &AtomicBool::new(true));
        assert!(matches!(result, Err(ExportError::Cancelled(_))));
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn template_location_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let location = SaveLocation::Template(FileSaveConfig {
            save_directory: dir.path().join("nested"),
            filename_template: "shot".to_string(),
        });
        let path = location.resolve(ExportFormat::Png).unwrap();
        assert!(path.ends_with("shot.png"));
        assert!(dir.path().join("nested").is_dir());

        let path = location.resolve(ExportFormat::Webp).unwrap();
        assert!(path.ends_with("shot.webp"));
    }

    #[test]
    fn exact_paths_gain_missing_extensions() {
        let cases = [
            ("out.png", ExportFormat::Png, "out.png"),
            ("out.PNG", ExportFormat::Png, "out.PNG"),
            ("out", ExportFormat::Png, "out.png"),
            ("out.jpeg", ExportFormat::Jpeg, "out.jpeg"),
            ("out.jpg", ExportFormat::Jpeg, "out.jpg"),
            ("out.png", ExportFormat::Jpeg, "out.png.jpg"),
            ("out.webp", ExportFormat::Webp, "out.webp"),
            ("my.shot", ExportFormat::Webp, "my.shot.webp"),
        ];
        for (input, format, expected) in cases {
            assert_eq!(
                ensure_extension(Path::new(input), format),
                PathBuf::from(expected),
                "{input} as {format:?}"
            );
        }
    }

    #[test]
    fn save_export_corrects_exact_extension() {
        let dir = tempfile::tempdir().unwrap();
        let location = SaveLocation::Exact(dir.path().join("framed"));
        let path =
            save_export(b"bytes", &location, ExportFormat::Jpeg, &AtomicBool::new(false)).unwrap();
        assert_eq!(path, dir.path().join("framed.jpg"));
        assert_eq!(fs::read(&path).unwrap(), b"bytes");
        assert!(!dir.path().join("framed").exists());
    }
}
