use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// One file to publish, addressed relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub rel_path: PathBuf,
    pub contents: String,
}

impl Document {
    pub fn new(rel_path: impl Into<PathBuf>, contents: String) -> Self {
        Document {
            rel_path: rel_path.into(),
            contents,
        }
    }
}

/// A target that has been swapped in, with where its previous content went.
struct Committed {
    target: PathBuf,
    backup: Option<PathBuf>,
}

/// Writes generated files under the site root. Readers see either the full
/// new group or the untouched previous one.
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    pub fn new(root: &Path) -> Self {
        OutputStore {
            root: root.to_path_buf(),
        }
    }

    pub fn path(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }

    /// Publish every document or none of them.
    ///
    /// All contents are staged to temp files next to their targets before
    /// any target is touched. Each target is then replaced by a rename, so it
    /// always holds either its old or its new content. Targets are replaced
    /// one after another; a failure restores the ones already replaced.
    pub fn publish(&self, docs: &[Document]) -> Result<()> {
        let mut staged = Vec::with_capacity(docs.len());
        for doc in docs {
            let target = self.path(&doc.rel_path);
            let tmp = stage(&target, &doc.contents)
                .with_context(|| format!("Failed to stage {}", target.display()))?;
            staged.push((target, tmp));
        }

        let mut committed: Vec<Committed> = Vec::with_capacity(staged.len());
        for (target, tmp) in staged {
            match swap_in(&target, tmp) {
                Ok(done) => committed.push(done),
                Err(e) => {
                    rollback(committed);
                    return Err(e.context(format!("Failed to publish {}", target.display())));
                }
            }
        }

        for done in committed {
            if let Some(backup) = done.backup {
                if let Err(e) = fs::remove_file(&backup) {
                    debug!("Could not remove backup {}: {}", backup.display(), e);
                }
            }
            info!("Wrote {}", done.target.display());
        }
        Ok(())
    }

    /// Write each page atomically and independently. Failures come back as
    /// warnings instead of errors.
    pub fn write_pages(&self, pages: &[Document]) -> Vec<String> {
        let mut warnings = Vec::new();
        for page in pages {
            let target = self.path(&page.rel_path);
            let result = stage(&target, &page.contents).and_then(|tmp| {
                tmp.persist(&target)
                    .map(|_| ())
                    .map_err(|e| anyhow::Error::new(e.error))
            });
            match result {
                Ok(()) => debug!("Generated {}", page.rel_path.display()),
                Err(e) => {
                    let msg = format!("Failed to write {}: {:#}", page.rel_path.display(), e);
                    warn!("{}", msg);
                    warnings.push(msg);
                }
            }
        }
        warnings
    }
}

/// Fully write `contents` to a temp file in the target's directory.
fn stage(target: &Path, contents: &str) -> Result<NamedTempFile> {
    let dir = target
        .parent()
        .with_context(|| format!("{} has no parent directory", target.display()))?;
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

fn backup_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.bak"))
}

/// Keep the previous version reachable through a hard link, then rename the
/// new file over the live target. The target path never goes missing.
fn swap_in(target: &Path, tmp: NamedTempFile) -> Result<Committed> {
    let backup = if target.exists() {
        let backup = backup_path(target);
        match fs::remove_file(&backup) {
            Ok(()) => debug!("Removed stale backup {}", backup.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to clear stale backup {}", backup.display())))
            }
        }
        fs::hard_link(target, &backup)
            .with_context(|| format!("Failed to keep previous {}", target.display()))?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = tmp.persist(target) {
        if let Some(backup) = &backup {
            if let Err(cleanup) = fs::remove_file(backup) {
                debug!("Could not remove backup {}: {}", backup.display(), cleanup);
            }
        }
        return Err(anyhow::Error::new(e.error).context("rename into place failed"));
    }

    Ok(Committed {
        target: target.to_path_buf(),
        backup,
    })
}

fn rollback(committed: Vec<Committed>) {
    for done in committed.into_iter().rev() {
        let restored = match &done.backup {
            Some(backup) => fs::rename(backup, &done.target),
            None => fs::remove_file(&done.target),
        };
        match restored {
            Ok(()) => info!("Rolled back {}", done.target.display()),
            Err(e) => warn!("Could not roll back {}: {}", done.target.display(), e),
        }
    }
}
