/*! Batch conversion

Converts every file of an input directory, one at a time and in lexicographic order.
The first failing file stops the whole batch.
!*/
use std::{
    fmt,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use log::{debug, info};

use crate::error::Error;

use super::convert::{convert, ConversionJob};

/// Conversion parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding Bag files.
    pub src: PathBuf,
    /// Directory where ARFF files are written. Created if missing.
    pub dst: PathBuf,
    /// Token splitting class labels in two. No split files are produced without it.
    pub token: Option<String>,
    /// Use feature names from the Bag header (`f1..fn` otherwise).
    pub print_features: bool,
    /// Log progress.
    pub log: bool,
}

impl Config {
    /// Number of ARFF files produced for each input file.
    pub fn outputs_per_file(&self) -> usize {
        if self.token.is_some() {
            3
        } else {
            1
        }
    }

    /// Check parameters that can be checked without touching the filesystem.
    pub fn validate(&self) -> Result<(), Error> {
        if self.token.as_deref() == Some("") {
            return Err(Error::InvalidConfig(
                "split token can't be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn job(&self, src: &Path) -> ConversionJob {
        ConversionJob::new(src, &self.dst, self.token.as_deref(), self.print_features)
    }
}

/// What has been done by [run].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub outputs: usize,
    pub elapsed: Duration,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Time: {}", format_elapsed(self.elapsed))?;
        writeln!(f, "- Input files: {}", self.files)?;
        write!(f, "- Output files: {}", self.outputs)
    }
}

/// Format a duration as `H:MM:SS` (`N day(s), H:MM:SS` past a day).
/// Seconds are rounded up.
pub fn format_elapsed(elapsed: Duration) -> String {
    let mut secs = elapsed.as_secs();
    if elapsed.subsec_nanos() > 0 {
        secs += 1;
    }
    let (days, secs) = (secs / 86_400, secs % 86_400);
    let hms = format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60);
    match days {
        0 => hms,
        1 => format!("1 day, {}", hms),
        d => format!("{} days, {}", d, hms),
    }
}

/// Regular files of `src`, sorted by path.
pub fn discover(src: &Path) -> Result<Vec<PathBuf>, Error> {
    if !src.is_dir() {
        return Err(Error::InputNotFound(src.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        } else {
            debug!("skipping {:?}: not a file", entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Create `dst` (and parents) if it does not exist.
/// Returns whether a directory has been created.
pub fn prepare_dst(dst: &Path) -> Result<bool, Error> {
    if dst.is_dir() {
        return Ok(false);
    }

    info!("creating directory {:?}", dst);
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dst)?;
    Ok(true)
}

/// Convert every file of `config.src` into `config.dst`.
pub fn run(config: &Config) -> Result<Summary, Error> {
    let start = Instant::now();
    config.validate()?;

    info!("loading input filepaths from {:?}", config.src);
    let files = discover(&config.src)?;
    prepare_dst(&config.dst)?;

    let total = files.len();
    info!(
        "{} files to convert into {} ARFF files",
        total,
        total * config.outputs_per_file()
    );
    let mut outputs = 0;
    for (i, path) in files.iter().enumerate() {
        let file_start = Instant::now();
        info!("[{}/{}] converting {:?}", i + 1, total, path);

        let job = config.job(path);
        outputs += convert(&job)?;

        let took = file_start.elapsed();
        // u32 is plenty for a file count, saturate otherwise
        let remaining = u32::try_from(total - i - 1).unwrap_or(u32::MAX);
        info!(
            "[{}/{}] {:?} done in {:.2?}, eta {}",
            i + 1,
            total,
            job.src(),
            took,
            format_elapsed(took.saturating_mul(remaining))
        );
    }

    Ok(Summary {
        files: total,
        outputs,
        elapsed: start.elapsed(),
    })
}
