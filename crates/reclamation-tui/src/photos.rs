use std::path::{Path, PathBuf};

use reclamation_core::attachment::is_image_path;
use reclamation_core::FileAttachment;

/// Expand a picker entry into image attachments.
///
/// `input` holds paths separated by `;`. A directory contributes its image
/// files in name order; anything that is not an image is skipped. The result
/// is not truncated here.
pub fn collect_photos(input: &str) -> std::io::Result<Vec<FileAttachment>> {
    let mut photos = Vec::new();
    for entry in input.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let path = expand_home(entry);
        if path.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&path)?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && is_image_path(p))
                .collect();
            files.sort();
            photos.extend(files.into_iter().map(FileAttachment::from_path));
        } else if is_image_path(&path) {
            photos.push(FileAttachment::from_path(path));
        }
    }
    Ok(photos)
}

fn expand_home(entry: &str) -> PathBuf {
    match entry.strip_prefix("~/") {
        Some(rest) => match std::env::var_os("HOME") {
            Some(home) => Path::new(&home).join(rest),
            None => PathBuf::from(entry),
        },
        None => PathBuf::from(entry),
    }
}
