//! Materializes the starting file set of a new ticket

use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, TicketError};
use crate::events::EventSink;
use crate::recipe::{CopySelection, MANIFEST_FILE};

/// Files copied by a successful [`FileStager::copy_from_recipe`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub copied: Vec<String>,
}

/// Reject names that are not a single plain path component.
///
/// Run before anything is created so a bad name never touches the disk.
pub fn validate_file_names(names: &[String]) -> Result<()> {
    for name in names {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(TicketError::InvalidFileName(name.clone())),
        }
    }
    Ok(())
}

/// A recipe selector must be a relative path that stays below the recipe
fn is_inside(selector: &Path) -> bool {
    selector.file_name().is_some()
        && selector
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

pub struct FileStager<'a> {
    sink: &'a dyn EventSink,
}

impl<'a> FileStager<'a> {
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self { sink }
    }

    /// Create each named file empty in `ticket_dir`.
    ///
    /// Every name is checked first. Creation stops at the first failure;
    /// files created before it stay.
    pub fn create_empty(&self, names: &[String], ticket_dir: &Path) -> Result<()> {
        validate_file_names(names)?;
        for name in names {
            let path = ticket_dir.join(name);
            File::create(&path).map_err(|e| TicketError::io(&path, e))?;
        }
        Ok(())
    }

    /// Copy recipe files into `ticket_dir`.
    ///
    /// Each file is attempted even if an earlier one failed. Failures are
    /// reported to the sink as they happen and returned together as
    /// [`TicketError::StagingFailed`] once the batch is done.
    pub fn copy_from_recipe(
        &self,
        selection: &CopySelection,
        recipe_dir: &Path,
        ticket_dir: &Path,
    ) -> Result<StageReport> {
        if selection.is_none() {
            return Ok(StageReport::default());
        }
        if !recipe_dir.exists() {
            return Err(TicketError::NotFound(recipe_dir.to_path_buf()));
        }

        let sources: Vec<PathBuf> = match selection {
            CopySelection::None => Vec::new(),
            CopySelection::All => self
                .eligible_files(recipe_dir)?
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            CopySelection::Named(names) => names.iter().map(PathBuf::from).collect(),
        };

        let mut report = StageReport::default();
        let mut failed = Vec::new();

        for source in sources {
            let source_name = source.to_string_lossy().to_string();
            match copy_one(recipe_dir, &source, ticket_dir) {
                Ok(dest_name) => {
                    self.sink.success(&format!("Copy successful - {dest_name}"));
                    report.copied.push(dest_name);
                }
                Err(e) => {
                    self.sink.error(&format!("Could not copy {source_name}: {e}"));
                    failed.push(source_name);
                }
            }
        }

        if failed.is_empty() {
            Ok(report)
        } else {
            Err(TicketError::StagingFailed { failed })
        }
    }

    /// Regular files of a recipe, sorted by name, without the manifest
    fn eligible_files(&self, recipe_dir: &Path) -> Result<Vec<OsString>> {
        let entries = fs::read_dir(recipe_dir).map_err(|e| TicketError::io(recipe_dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TicketError::io(recipe_dir, e))?;
            let name = entry.file_name();

            if name == MANIFEST_FILE {
                continue;
            }
            if entry.path().is_dir() {
                self.sink.warn(&format!(
                    "Can't copy directories: {}/",
                    name.to_string_lossy()
                ));
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }
}

/// Copy `recipe_dir/source` to `ticket_dir/<base name>`, returning the base name
fn copy_one(recipe_dir: &Path, source: &Path, ticket_dir: &Path) -> Result<String> {
    if !is_inside(source) {
        return Err(TicketError::InvalidFileName(
            source.to_string_lossy().to_string(),
        ));
    }
    let source_path = recipe_dir.join(source);
    let Some(base_name) = source.file_name() else {
        return Err(TicketError::NotFound(source_path));
    };
    if !source_path.is_file() {
        return Err(TicketError::NotFound(source_path));
    }

    let dest = ticket_dir.join(base_name);
    fs::copy(&source_path, &dest).map_err(|e| TicketError::io(&source_path, e))?;

    Ok(base_name.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Level, RecordingSink};
    use tempfile::{tempdir, TempDir};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut entries: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        entries.sort();
        entries
    }

    /// Recipe with `recipe.json`, two payload files and an `assets/` subdirectory
    fn recipe_fixture() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let temp = tempdir().unwrap();
        let recipe = temp.path().join("recipe");
        let ticket = temp.path().join("ticket");
        fs::create_dir_all(recipe.join("assets")).unwrap();
        fs::create_dir(&ticket).unwrap();
        fs::write(recipe.join(MANIFEST_FILE), "{}").unwrap();
        fs::write(recipe.join("notes.md"), "# Notes\n").unwrap();
        fs::write(recipe.join("a.txt"), "alpha").unwrap();
        fs::write(recipe.join("b.txt"), "beta").unwrap();
        fs::write(recipe.join("assets").join("logo.png"), [0u8, 1, 2]).unwrap();
        (temp, recipe, ticket)
    }

    #[test]
    fn test_create_empty_files() {
        let temp = tempdir().unwrap();
        let sink = RecordingSink::new();
        let stager = FileStager::new(&sink);

        stager
            .create_empty(&names(&["todo.md", "log.txt"]), temp.path())
            .unwrap();

        assert_eq!(listing(temp.path()), names(&["log.txt", "todo.md"]));
        assert_eq!(fs::metadata(temp.path().join("todo.md")).unwrap().len(), 0);
    }

    #[test]
    fn test_create_empty_stops_on_first_failure() {
        let temp = tempdir().unwrap();
        let sink = RecordingSink::new();
        let stager = FileStager::new(&sink);

        fs::create_dir(temp.path().join("two")).unwrap();

        let err = stager
            .create_empty(&names(&["one", "two", "three"]), temp.path())
            .unwrap_err();

        assert!(matches!(err, TicketError::Io { .. }));
        assert_eq!(listing(temp.path()), names(&["one", "two"]));
    }

    #[test]
    fn test_create_empty_rejects_names_leaving_the_directory() {
        let temp = tempdir().unwrap();
        let ticket = temp.path().join("ticket");
        fs::create_dir(&ticket).unwrap();
        let sink = RecordingSink::new();
        let stager = FileStager::new(&sink);

        for bad in ["../stray.txt", "/tmp/abs.txt", "sub/file.txt", ".", ""] {
            let err = stager
                .create_empty(&names(&["ok.txt", bad]), &ticket)
                .unwrap_err();
            assert!(matches!(err, TicketError::InvalidFileName(_)), "{bad:?}");
        }

        assert!(listing(&ticket).is_empty());
        assert_eq!(listing(temp.path()), names(&["ticket"]));
    }

    #[test]
    fn test_validate_file_names_accepts_plain_names() {
        validate_file_names(&names(&["todo.md", ".hidden", "a..b"])).unwrap();
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let temp = tempdir().unwrap();
        let sink = RecordingSink::new();
        let stager = FileStager::new(&sink);

        let report = stager
            .copy_from_recipe(
                &CopySelection::None,
                &temp.path().join("does-not-exist"),
                temp.path(),
            )
            .unwrap();

        assert!(report.copied.is_empty());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_missing_recipe_dir() {
        let temp = tempdir().unwrap();
        let sink = RecordingSink::new();
        let stager = FileStager::new(&sink);
        let recipe = temp.path().join("nope");

        let err = stager
            .copy_from_recipe(&CopySelection::All, &recipe, temp.path())
            .unwrap_err();

        assert!(matches!(err, TicketError::NotFound(p) if p == recipe));
    }

    #[test]
    fn test_wildcard_skips_manifest_and_directories() {
        let (_temp, recipe, ticket) = recipe_fixture();
        let sink = RecordingSink::new();
        let stager = FileStager::new(&sink);

        let report = stager
            .copy_from_recipe(&CopySelection::All, &recipe, &ticket)
            .unwrap();

        assert_eq!(report.copied, names(&["a.txt", "b.txt", "notes.md"]));
        assert_eq!(listing(&ticket), names(&["a.txt", "b.txt", "notes.md"]));
        assert!(!ticket.join(MANIFEST_FILE).exists());
        assert!(!ticket.join("assets").exists());
        assert_eq!(
            fs::read_to_string(ticket.join("notes.md")).unwrap(),
            "# Notes\n"
        );
        assert_eq!(
            sink.messages(Level::Warn),
            names(&["Can't copy directories: assets/"])
        );
        assert_eq!(sink.messages(Level::Success).len(), 3);
    }

    #[test]
    fn test_wildcard_only_notes() {
        let temp = tempdir().unwrap();
        let recipe = temp.path().join("recipe");
        let ticket = temp.path().join("ticket");
        fs::create_dir_all(recipe.join("assets")).unwrap();
        fs::create_dir(&ticket).unwrap();
        fs::write(recipe.join(MANIFEST_FILE), "{}").unwrap();
        fs::write(recipe.join("notes.md"), "n").unwrap();
        let sink = RecordingSink::new();

        FileStager::new(&sink)
            .copy_from_recipe(&CopySelection::All, &recipe, &ticket)
            .unwrap();

        assert_eq!(listing(&ticket), names(&["notes.md"]));
    }

    #[test]
    fn test_named_copy_continues_past_missing_file() {
        let (_temp, recipe, ticket) = recipe_fixture();
        let sink = RecordingSink::new();
        let stager = FileStager::new(&sink);
        let selection = CopySelection::Named(names(&["a.txt", "missing.txt", "b.txt"]));

        let err = stager
            .copy_from_recipe(&selection, &recipe, &ticket)
            .unwrap_err();

        match err {
            TicketError::StagingFailed { failed } => {
                assert_eq!(failed, names(&["missing.txt"]));
            }
            other => panic!("expected StagingFailed, got {other:?}"),
        }
        assert_eq!(listing(&ticket), names(&["a.txt", "b.txt"]));
        let errors = sink.messages(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("missing.txt"));
        assert_eq!(
            sink.messages(Level::Success),
            names(&["Copy successful - a.txt", "Copy successful - b.txt"])
        );
    }

    #[test]
    fn test_named_copy_uses_base_name() {
        let (_temp, recipe, ticket) = recipe_fixture();
        let sink = RecordingSink::new();
        let selection = CopySelection::Named(names(&["assets/logo.png"]));

        let report = FileStager::new(&sink)
            .copy_from_recipe(&selection, &recipe, &ticket)
            .unwrap();

        assert_eq!(report.copied, names(&["logo.png"]));
        assert_eq!(fs::read(ticket.join("logo.png")).unwrap(), vec![0u8, 1, 2]);
    }

    #[test]
    fn test_named_copy_rejects_directory_selector() {
        let (_temp, recipe, ticket) = recipe_fixture();
        let sink = RecordingSink::new();
        let selection = CopySelection::Named(names(&["assets", "a.txt"]));

        let err = FileStager::new(&sink)
            .copy_from_recipe(&selection, &recipe, &ticket)
            .unwrap_err();

        assert!(matches!(err, TicketError::StagingFailed { failed } if failed == names(&["assets"])));
        assert_eq!(listing(&ticket), names(&["a.txt"]));
    }

    #[test]
    fn test_named_copy_rejects_selectors_outside_recipe() {
        let (temp, recipe, ticket) = recipe_fixture();
        fs::write(temp.path().join("secret.txt"), "outside").unwrap();
        let absolute = temp.path().join("secret.txt").to_string_lossy().to_string();
        let sink = RecordingSink::new();
        let selection = CopySelection::Named(vec![
            "../secret.txt".to_string(),
            absolute.clone(),
            "a.txt".to_string(),
        ]);

        let err = FileStager::new(&sink)
            .copy_from_recipe(&selection, &recipe, &ticket)
            .unwrap_err();

        match err {
            TicketError::StagingFailed { failed } => {
                assert_eq!(failed, vec!["../secret.txt".to_string(), absolute]);
            }
            other => panic!("expected StagingFailed, got {other:?}"),
        }
        assert_eq!(listing(&ticket), names(&["a.txt"]));
        assert_eq!(sink.messages(Level::Error).len(), 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_wildcard_copies_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_temp, recipe, ticket) = recipe_fixture();
        let odd = OsStr::from_bytes(b"caf\xe9.txt");
        fs::write(recipe.join(odd), "latin-1").unwrap();
        let sink = RecordingSink::new();

        let report = FileStager::new(&sink)
            .copy_from_recipe(&CopySelection::All, &recipe, &ticket)
            .unwrap();

        assert_eq!(report.copied.len(), 4);
        assert_eq!(fs::read_to_string(ticket.join(odd)).unwrap(), "latin-1");
    }

    #[test]
    fn test_copy_overrides_empty_placeholder() {
        let (_temp, recipe, ticket) = recipe_fixture();
        let sink = RecordingSink::new();
        let stager = FileStager::new(&sink);

        stager.create_empty(&names(&["a.txt"]), &ticket).unwrap();
        stager
            .copy_from_recipe(&CopySelection::Named(names(&["a.txt"])), &recipe, &ticket)
            .unwrap();

        assert_eq!(fs::read_to_string(ticket.join("a.txt")).unwrap(), "alpha");
    }
}
