use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::access_code::AccessCode;
use super::report::{Report, TableError};

const MARKDOWN_SUFFIX: &str = "_rapport.md";
const SCORES_SUFFIX: &str = "_scores.csv";
const RADAR_SUFFIX: &str = "_radar.svg";

/// Rendered artifacts of one report, ready to be written under its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifacts {
    pub code: AccessCode,
    pub markdown: String,
    pub scores_csv: String,
    pub radar_svg: String,
}

impl ReportArtifacts {
    pub fn from_report(report: &Report) -> Result<Self, TableError> {
        Ok(Self {
            code: report.code.clone(),
            markdown: report.to_markdown(),
            scores_csv: report.score_table()?,
            radar_svg: report.radar().render_svg(&report.chart_title()),
        })
    }
}

/// What a store hands back for a code. Only the score table is required; the
/// document and chart are returned when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    pub code: AccessCode,
    pub markdown: Option<String>,
    pub scores_csv: String,
    pub radar_svg: Option<String>,
}

/// Write-once, read-many persistence keyed by access code.
pub trait ReportStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the code is already taken.
    fn save(&self, artifacts: &ReportArtifacts) -> Result<(), StoreError>;
    fn load(&self, code: &AccessCode) -> Result<Option<StoredReport>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("access code already in use")]
    Conflict,
    #[error("report store unavailable: {0}")]
    Unavailable(String),
    #[error("report store I/O failure: {0}")]
    Io(#[from] io::Error),
}

/// Stores each report as three sibling files in one directory:
/// `<code>_rapport.md`, `<code>_radar.svg` and `<code>_scores.csv`.
#[derive(Debug, Clone)]
pub struct FileReportStore {
    root: PathBuf,
}

impl FileReportStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_path(&self, code: &AccessCode, suffix: &str) -> PathBuf {
        self.root.join(format!("{}{suffix}", code.as_str()))
    }
}

impl ReportStore for FileReportStore {
    fn save(&self, artifacts: &ReportArtifacts) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;

        // The document claims the code; the score table is written last so a
        // concurrent retrieval never sees a half-written report. A failure
        // removes whatever this call already wrote.
        let entries = [
            (MARKDOWN_SUFFIX, &artifacts.markdown),
            (RADAR_SUFFIX, &artifacts.radar_svg),
            (SCORES_SUFFIX, &artifacts.scores_csv),
        ];
        let mut written: Vec<PathBuf> = Vec::with_capacity(entries.len());
        for (suffix, contents) in entries {
            let path = self.artifact_path(&artifacts.code, suffix);
            if let Err(err) = write_new(&path, contents) {
                for path in &written {
                    let _ = fs::remove_file(path);
                }
                return Err(err);
            }
            written.push(path);
        }

        debug!(code = %artifacts.code, root = %self.root.display(), "report artifacts written");
        Ok(())
    }

    fn load(&self, code: &AccessCode) -> Result<Option<StoredReport>, StoreError> {
        let Some(scores_csv) = read_optional(&self.artifact_path(code, SCORES_SUFFIX))? else {
            return Ok(None);
        };

        Ok(Some(StoredReport {
            code: code.clone(),
            markdown: read_optional(&self.artifact_path(code, MARKDOWN_SUFFIX))?,
            scores_csv,
            radar_svg: read_optional(&self.artifact_path(code, RADAR_SUFFIX))?,
        }))
    }
}

fn write_new(path: &Path, contents: &str) -> Result<(), StoreError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| match err.kind() {
            io::ErrorKind::AlreadyExists => StoreError::Conflict,
            _ => StoreError::Io(err),
        })?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
