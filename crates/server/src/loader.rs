use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Load documents from a `.txt` file or a directory of them
///
/// A directory is walked recursively and files are read in sorted path
/// order, so the document sequence is stable across runs. Contents are
/// UTF-8; an empty file yields an empty document, not an error.
pub async fn load_documents(path: &Path) -> Result<Vec<String>> {
    if path.is_dir() {
        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file() && is_txt(entry.path()))
            .map(walkdir::DirEntry::into_path)
            .collect();
        files.sort();

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            documents.push(text);
        }
        log::info!(
            "Loaded {} document(s) from {}",
            documents.len(),
            path.display()
        );
        Ok(documents)
    } else if path.is_file() && is_txt(path) {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(vec![text])
    } else {
        bail!(
            "path must be a directory or a .txt file: {}",
            path.display()
        );
    }
}

fn is_txt(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("doc.txt");
        std::fs::write(&file, "hello").unwrap();

        let documents = load_documents(&file).await.unwrap();
        assert_eq!(documents, vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_directory_sorted_recursive() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a.txt"), "first").unwrap();
        std::fs::write(dir.path().join("sub/c.txt"), "third").unwrap();
        std::fs::write(dir.path().join("ignored.md"), "not text").unwrap();

        let documents = load_documents(dir.path()).await.unwrap();
        assert_eq!(
            documents,
            vec![
                "first".to_string(),
                "second".to_string(),
                "third".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_directory_is_empty_batch() {
        let dir = TempDir::new().unwrap();
        assert!(load_documents(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("doc.pdf");
        std::fs::write(&file, "%PDF").unwrap();

        assert!(load_documents(&file).await.is_err());
    }
}
