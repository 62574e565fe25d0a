use std::path::Path;

use ignore::Walk;

use crate::upload::types::FileHandle;

/// Collects upload candidates from a folder, honoring `.gitignore`.
/// Entries that cannot be read are skipped; only files of the accepted
/// media type are returned, in walk order.
pub fn collect_candidates(folder: &Path) -> Vec<FileHandle> {
    let mut candidates = Vec::new();

    for entry in Walk::new(folder) {
        if let Ok(entry) = entry {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Ok(handle) = FileHandle::from_path(path) {
                if handle.is_accepted() {
                    candidates.push(handle);
                }
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_only_pdf_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("january.pdf"), b"%PDF-1.4").unwrap();
        std::fs::write(dir.path().join("february.pdf"), b"%PDF-1.4").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not a statement").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/march.pdf"), b"%PDF-1.4").unwrap();

        let mut names: Vec<String> = collect_candidates(dir.path())
            .into_iter()
            .map(|handle| handle.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["february.pdf", "january.pdf", "march.pdf"]);
    }

    #[test]
    fn empty_folder_yields_no_candidates() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_candidates(dir.path()).is_empty());
    }
}
