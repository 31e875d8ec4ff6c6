//! Document writer: output path resolution and file writes.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument, warn};

use notionsync_markdown::{build_frontmatter, slugify};
use notionsync_shared::{NotionSyncError, PageMetadata, Result};

/// Where a page lands, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPath {
    /// Path relative to the output root.
    pub relative: PathBuf,
    /// True when `Sync_Path` was missing and the path was synthesized.
    pub fallback: bool,
}

/// A file written by [`write_document`].
#[derive(Debug, Clone)]
pub struct WrittenDocument {
    /// Full path of the written file.
    pub path: PathBuf,
    /// True when the path was synthesized from category and title.
    pub fallback: bool,
}

/// Resolve the output path for a page.
///
/// Uses `sync_path` with root, prefix, `.` and `..` components removed, so
/// the result always stays under the output root. Falls back to
/// `<slug(category)>/<slug(title)>.md` when no usable path remains.
pub fn resolve_output_path(meta: &PageMetadata) -> OutputPath {
    let supplied = meta
        .sync_path
        .as_deref()
        .map(contained_path)
        .filter(|p| p.file_name().is_some());

    match supplied {
        Some(relative) => OutputPath {
            relative,
            fallback: false,
        },
        None => OutputPath {
            relative: PathBuf::from(slugify(&meta.category))
                .join(format!("{}.md", slugify(&meta.title))),
            fallback: true,
        },
    }
}

/// Keep only the normal components of `path`.
fn contained_path(path: &str) -> PathBuf {
    let path = Path::new(path);
    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        warn!(sync_path = %path.display(), "Sync_Path points outside the output root, dropping `..` components");
    }
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// Write front-matter and body for one page under `output_root`.
///
/// Missing parent directories are created and any existing file is replaced.
#[instrument(skip_all, fields(title = %meta.title))]
pub fn write_document(output_root: &Path, meta: &PageMetadata, body: &str) -> Result<WrittenDocument> {
    let output = resolve_output_path(meta);
    if output.fallback {
        warn!(
            title = %meta.title,
            path = %output.relative.display(),
            "Sync_Path is missing, falling back to category/title path"
        );
    }

    let file_path = output_root.join(&output.relative);

    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| NotionSyncError::io(parent, e))?;
    }

    let mut content = build_frontmatter(meta);
    content.push_str(body);

    std::fs::write(&file_path, content).map_err(|e| NotionSyncError::io(&file_path, e))?;

    debug!(path = %file_path.display(), bytes = body.len(), "wrote document");
    Ok(WrittenDocument {
        path: file_path,
        fallback: output.fallback,
    })
}
