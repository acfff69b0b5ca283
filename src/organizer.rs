/// Directory organizer that moves files into rule destinations.
///
/// One call to [`Organizer::organize`] is a single pass: enumerate candidate
/// files, pick the first matching rule for each, and move matched files into
/// the rule's destination without ever overwriting an existing file.
use crate::output::OutputFormatter;
use crate::rules::Ruleset;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Errors that can occur while organizing a directory.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source directory does not exist or is not a directory.
    InvalidSource { path: PathBuf, source: io::Error },
    /// A single file could not be moved into its destination.
    MoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSource { path, source } => {
                write!(f, "'{}' is not a valid directory: {}", path.display(), source)
            }
            Self::MoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSource { source, .. } => Some(source),
            Self::MoveFailure { source_error, .. } => Some(source_error),
        }
    }
}

/// Result type for organizing operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What happened to a single candidate file.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The file now lives at `to`. Equal paths mean it was already in place.
    Moved { from: PathBuf, to: PathBuf },
    /// No rule matched; the file was not touched.
    Skipped,
    /// A rule matched but the move failed; the file stays where it was.
    Failed(OrganizeError),
}

/// Tallies for one or more passes.
#[derive(Debug, Default)]
pub struct Summary {
    /// Number of files moved into a destination.
    pub moved: usize,
    /// Number of matched files that already sat in their destination.
    pub already_sorted: usize,
    /// Number of files no rule matched.
    pub skipped: usize,
    /// Files whose move failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl Summary {
    fn record(&mut self, candidate: &Path, outcome: &MoveOutcome) {
        match outcome {
            MoveOutcome::Moved { from, to } if from == to => self.already_sorted += 1,
            MoveOutcome::Moved { .. } => self.moved += 1,
            MoveOutcome::Skipped => self.skipped += 1,
            MoveOutcome::Failed(e) => self.failed.push((candidate.to_path_buf(), e.to_string())),
        }
    }

    /// Folds another pass's tallies into this one.
    pub fn absorb(&mut self, other: Summary) {
        self.moved += other.moved;
        self.already_sorted += other.already_sorted;
        self.skipped += other.skipped;
        self.failed.extend(other.failed);
    }

    /// Returns the total number of candidates processed.
    pub fn total_processed(&self) -> usize {
        self.moved + self.already_sorted + self.skipped + self.failed.len()
    }

    /// Returns true if no move failed.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sorts files of a directory into rule destinations.
pub struct Organizer;

impl Organizer {
    /// Runs one organizing pass over `source_dir`.
    ///
    /// Only direct children are considered unless `recursive` is set, in which
    /// case regular files at any depth are candidates. Relative rule
    /// destinations always resolve against `source_dir`, even for files found
    /// in nested folders.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::InvalidSource`] without touching the
    /// filesystem if `source_dir` is missing or not a directory. Per-file move
    /// failures are reported and collected in the returned [`Summary`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::organizer::Organizer;
    /// use dirsort::rules::{Rule, Ruleset};
    /// use std::path::Path;
    ///
    /// let rules = Ruleset::new(vec![Rule::new(["*.txt", "*.md"], "documents")]);
    /// match Organizer::organize(Path::new("/home/me/Downloads"), &rules, false) {
    ///     Ok(summary) => println!("{} moved", summary.moved),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn organize(
        source_dir: &Path,
        rules: &Ruleset,
        recursive: bool,
    ) -> OrganizeResult<Summary> {
        Self::validate_source(source_dir)?;

        // Collect everything up front so destinations created during this
        // pass are never enumerated by it.
        let candidates = Self::collect_candidates(source_dir, recursive);
        OutputFormatter::header(&format!(
            "📁 Processing {} files in {}",
            candidates.len(),
            source_dir.display()
        ));

        let mut summary = Summary::default();
        for candidate in &candidates {
            let outcome = Self::process_candidate(source_dir, rules, candidate);
            Self::report(source_dir, &outcome);
            summary.record(candidate, &outcome);
        }

        OutputFormatter::pass_summary(source_dir, &summary);
        Ok(summary)
    }

    /// Runs [`Organizer::organize`] on `root/subfolder_name`.
    ///
    /// A missing subfolder is reported and yields `None` rather than an error,
    /// so layered passes can run unconditionally after a root pass.
    pub fn organize_subfolder(
        root: &Path,
        subfolder_name: &str,
        rules: &Ruleset,
        recursive: bool,
    ) -> Option<Summary> {
        let subroot = root.join(subfolder_name);
        if !subroot.is_dir() {
            OutputFormatter::warning(&format!("Subfolder not found: {}", subroot.display()));
            return None;
        }

        match Self::organize(&subroot, rules, recursive) {
            Ok(summary) => Some(summary),
            Err(e) => {
                OutputFormatter::error(&e.to_string());
                None
            }
        }
    }

    /// Classifies and, on a match, moves a single candidate.
    pub fn process_candidate(source_dir: &Path, rules: &Ruleset, candidate: &Path) -> MoveOutcome {
        let file_name = candidate
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        let Some(rule) = rules.select(&file_name) else {
            return MoveOutcome::Skipped;
        };

        let destination = Self::resolve_destination(source_dir, rule.destination());
        if let Err(e) = fs::create_dir_all(&destination) {
            return MoveOutcome::Failed(OrganizeError::MoveFailure {
                source: candidate.to_path_buf(),
                destination,
                source_error: e,
            });
        }

        match Self::move_collision_safe(candidate, &destination) {
            Ok(to) => MoveOutcome::Moved {
                from: candidate.to_path_buf(),
                to,
            },
            Err(e) => MoveOutcome::Failed(e),
        }
    }

    /// Resolves a rule destination: absolute paths are kept, relative ones
    /// are joined onto `source_dir`. `.` components are dropped.
    pub fn resolve_destination(source_dir: &Path, destination: &Path) -> PathBuf {
        let joined = if destination.is_absolute() {
            destination.to_path_buf()
        } else {
            source_dir.join(destination)
        };

        let cleaned = lexically_clean(&joined);
        if cleaned.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            cleaned
        }
    }

    /// Moves `file_path` into `destination_dir` without overwriting.
    ///
    /// If the name is taken, `_1`, `_2`, ... is appended before the extension
    /// until a free name is found. A file already inside `destination_dir`
    /// stays where it is. Returns the final path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::organizer::Organizer;
    /// use std::path::Path;
    ///
    /// // With documents/a.txt present this lands at documents/a_1.txt.
    /// let moved_to = Organizer::move_collision_safe(
    ///     Path::new("/tmp/inbox/a.txt"),
    ///     Path::new("/tmp/inbox/documents"),
    /// );
    /// ```
    pub fn move_collision_safe(file_path: &Path, destination_dir: &Path) -> OrganizeResult<PathBuf> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::MoveFailure {
                source: file_path.to_path_buf(),
                destination: destination_dir.to_path_buf(),
                source_error: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let already_in_place = file_path
            .parent()
            .is_some_and(|parent| lexically_clean(parent) == lexically_clean(destination_dir));
        if already_in_place {
            return Ok(file_path.to_path_buf());
        }

        let mut target = destination_dir.join(file_name);
        if is_occupied(&target) {
            target = disambiguated_path(destination_dir, file_name);
        }

        transfer(file_path, &target).map_err(|e| OrganizeError::MoveFailure {
            source: file_path.to_path_buf(),
            destination: target.clone(),
            source_error: e,
        })?;

        Ok(target)
    }

    fn validate_source(source_dir: &Path) -> OrganizeResult<()> {
        let metadata = fs::metadata(source_dir).map_err(|e| OrganizeError::InvalidSource {
            path: source_dir.to_path_buf(),
            source: e,
        })?;

        if !metadata.is_dir() {
            return Err(OrganizeError::InvalidSource {
                path: source_dir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            });
        }
        Ok(())
    }

    /// Lists regular files under `source_dir` in sorted depth-first order.
    /// Symlinks are neither followed nor returned.
    fn collect_candidates(source_dir: &Path, recursive: bool) -> Vec<PathBuf> {
        let max_depth = if recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(source_dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name();

        let mut candidates = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => candidates.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => OutputFormatter::warning(&format!("Skipping unreadable entry: {}", e)),
            }
        }
        candidates
    }

    fn report(source_dir: &Path, outcome: &MoveOutcome) {
        match outcome {
            MoveOutcome::Moved { from, to } if from == to => {
                OutputFormatter::info(&format!("Already sorted: {}", display_relative(source_dir, to)));
            }
            MoveOutcome::Moved { from, to } => {
                OutputFormatter::success(&format!(
                    "Moved: {} -> {}",
                    display_relative(source_dir, from),
                    display_relative(source_dir, to)
                ));
            }
            MoveOutcome::Skipped => {}
            MoveOutcome::Failed(e) => OutputFormatter::error(&e.to_string()),
        }
    }
}

/// Finds the first free `stem_N.ext` name in `destination_dir`, N from 1.
fn disambiguated_path(destination_dir: &Path, file_name: &OsStr) -> PathBuf {
    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or(file_name);
    let extension = name.extension();

    let mut counter: u64 = 1;
    loop {
        let mut candidate = stem.to_os_string();
        candidate.push(format!("_{}", counter));
        if let Some(ext) = extension {
            candidate.push(".");
            candidate.push(ext);
        }

        let path = destination_dir.join(candidate);
        if !is_occupied(&path) {
            return path;
        }
        counter += 1;
    }
}

/// True if anything, including a dangling symlink, exists at `path`.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Renames `from` to `to`, falling back to copy and remove across volumes.
fn transfer(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => copy_then_remove(from, to),
        Err(e) => Err(e),
    }
}

/// Copies `from` to the unoccupied path `to`, then removes `from`.
///
/// On any error the copy at `to` is removed again, so `from` remains the
/// only instance of the file.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let result = fs::copy(from, to).and_then(|_| fs::remove_file(from));
    if result.is_err() && is_occupied(to) {
        let _ = fs::remove_file(to);
    }
    result
}

fn lexically_clean(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn display_relative(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
