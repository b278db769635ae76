//! Upload staging and report artifact storage.
//!
//! Uploads are saved under a sanitized version of their original name.
//! Reports get a random 128-bit token as their name, which is what keeps
//! concurrent requests from overwriting each other. Both kinds of file are
//! written to a temporary file in the target directory first and only moved
//! into place once complete.

use crate::config::StorageConfig;
use crate::types::{ReportArtifact, ReportFormat};
use crate::{Error, Result};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::NamedTempFile;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Characters allowed in a stored upload name.
static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

/// Device names Windows refuses to use as file names.
const RESERVED_NAMES: &[&str] = &[
    "CON", "AUX", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "PRN", "NUL",
];

/// Stem used when nothing of the original name survives sanitizing.
const FALLBACK_STEM: &str = "upload";

/// A spreadsheet handed in by the caller.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as given by the client.
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn from_bytes(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// Read a local file as if it had been uploaded.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self { filename, data })
    }

    /// An upload without a name or without content cannot be processed.
    pub fn is_empty(&self) -> bool {
        self.filename.trim().is_empty() || self.data.is_empty()
    }
}

fn secure_component(text: &str) -> String {
    let ascii: String = text
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_FILENAME_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c: char| c == '.' || c == '_')
        .to_string()
}

/// Turn a client-supplied filename into a safe single path component.
///
/// Non-ASCII characters are decomposed and dropped, path separators and
/// whitespace become underscores, and anything outside `[A-Za-z0-9_.-]` is
/// removed. The extension is kept even when the stem sanitizes away, so
/// `"报表.xlsx"` becomes `"upload.xlsx"`.
pub fn sanitize_filename(name: &str) -> String {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.contains(['/', '\\']))
        .map(secure_component)
        .filter(|ext| !ext.is_empty());

    let mut cleaned = secure_component(name);
    let stem_lost = match &extension {
        Some(ext) => {
            cleaned.len() <= ext.len() + 1 || !cleaned.ends_with(&format!(".{}", ext))
        }
        None => cleaned.is_empty(),
    };
    if stem_lost {
        cleaned = match &extension {
            Some(ext) => format!("{}.{}", FALLBACK_STEM, ext),
            None => FALLBACK_STEM.to_string(),
        };
        log::warn!("Upload name '{}' stored as '{}'", name, cleaned);
    }

    let stem = cleaned.split('.').next().unwrap_or_default().to_uppercase();
    if RESERVED_NAMES.contains(&stem.as_str()) {
        cleaned.insert(0, '_');
    }

    cleaned
}

/// A fresh artifact identifier: 32 lowercase hex characters.
pub fn new_report_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The two directories a report request touches.
#[derive(Debug, Clone)]
pub struct ReportStore {
    upload_dir: PathBuf,
    report_dir: PathBuf,
}

impl ReportStore {
    /// Open the store, creating both directories if they are missing.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        fs::create_dir_all(&config.upload_dir)?;
        fs::create_dir_all(&config.report_dir)?;
        log::debug!(
            "Storage ready: uploads in {}, reports in {}",
            config.upload_dir.display(),
            config.report_dir.display()
        );
        Ok(Self {
            upload_dir: config.upload_dir.clone(),
            report_dir: config.report_dir.clone(),
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Save an upload under its sanitized name and return where it went.
    ///
    /// An existing upload with the same name is replaced.
    pub fn stage_upload(&self, upload: &UploadedFile) -> Result<PathBuf> {
        let path = self.upload_dir.join(sanitize_filename(&upload.filename));
        let tmp = write_temp(&self.upload_dir, &upload.data)?;
        tmp.persist(&path).map_err(|e| Error::IoError(e.error))?;
        log::debug!("Staged upload at {}", path.display());
        Ok(path)
    }

    /// Write a finished document under a new unique name.
    pub fn write_report(&self, format: ReportFormat, bytes: &[u8]) -> Result<ReportArtifact> {
        let id = new_report_id();
        let path = self
            .report_dir
            .join(format!("report_{}.{}", id, format.extension()));

        let tmp = write_temp(&self.report_dir, bytes)?;
        tmp.persist_noclobber(&path)
            .map_err(|e| Error::IoError(e.error))?;

        log::info!("Wrote report {}", path.display());
        Ok(ReportArtifact { id, format, path })
    }
}

fn write_temp(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".partial_")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> ReportStore {
        ReportStore::open(&StorageConfig::new(dir.join("uploads"), dir.join("reports"))).unwrap()
    }

    fn visible_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_sanitize_plain_names() {
        assert_eq!(sanitize_filename("orders.xlsx"), "orders.xlsx");
        assert_eq!(sanitize_filename("My Orders 2024.xlsx"), "My_Orders_2024.xlsx");
        assert_eq!(sanitize_filename("caf\u{e9}.xlsx"), "cafe.xlsx");
    }

    #[test]
    fn test_sanitize_path_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\..\\orders.xlsx"), "orders.xlsx");
    }

    #[test]
    fn test_sanitize_keeps_extension_when_stem_is_lost() {
        assert_eq!(sanitize_filename("\u{62a5}\u{8868}.xlsx"), "upload.xlsx");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_sanitize_reserved_names() {
        assert_eq!(sanitize_filename("con.xlsx"), "_con.xlsx");
        assert_eq!(sanitize_filename("NUL"), "_NUL");
    }

    #[test]
    fn test_report_id_shape() {
        let id = new_report_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_open_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert!(store.upload_dir().is_dir());
        assert!(store.report_dir().is_dir());
    }

    #[test]
    fn test_write_report_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let a = store.write_report(ReportFormat::Pdf, b"same").unwrap();
        let b = store.write_report(ReportFormat::Pdf, b"same").unwrap();

        assert_ne!(a.path, b.path);
        assert_ne!(a.id, b.id);
        assert_eq!(fs::read(&a.path).unwrap(), b"same");
        assert_eq!(a.path.file_name().unwrap().to_string_lossy(), a.file_name());
        assert!(a.file_name().starts_with("report_"));
        assert!(a.file_name().ends_with(".pdf"));
        // No temporary files are left behind.
        assert_eq!(visible_files(store.report_dir()).len(), 2);
    }

    #[test]
    fn test_stage_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let upload = UploadedFile::from_bytes("Q1 sales.xlsx", b"first".to_vec());
        let path = store.stage_upload(&upload).unwrap();
        assert_eq!(path, store.upload_dir().join("Q1_sales.xlsx"));

        let again = UploadedFile::from_bytes("Q1 sales.xlsx", b"second".to_vec());
        store.stage_upload(&again).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert_eq!(visible_files(store.upload_dir()), vec!["Q1_sales.xlsx"]);
    }

    #[test]
    fn test_uploaded_file_is_empty() {
        assert!(UploadedFile::from_bytes("a.xlsx", Vec::new()).is_empty());
        assert!(UploadedFile::from_bytes("", b"x".to_vec()).is_empty());
        assert!(!UploadedFile::from_bytes("a.xlsx", b"x".to_vec()).is_empty());
    }
}
