use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::ExportError;

/// One exported payload and the file name it should be written under.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// `<index>_<name>.<extension>`, with anything but ASCII alphanumerics,
/// `-` and `_` in the name replaced by `_`.
pub fn body_file_name(index: usize, name: &str, extension: &str) -> String {
    let clean: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}.{}", index, clean, extension)
}

/// Write every file into `dir`, creating it if needed. Returns the written
/// paths in input order.
pub fn write_outputs(dir: &Path, files: &[ExportedFile]) -> Result<Vec<PathBuf>, ExportError> {
    let write_failed = |path: &Path, e: std::io::Error| ExportError::WriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    fs::create_dir_all(dir).map_err(|e| write_failed(dir, e))?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.file_name);
        fs::write(&path, &file.contents).map_err(|e| write_failed(&path, e))?;
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "wrote export files");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_indexed_and_sanitized() {
        assert_eq!(body_file_name(0, "layer_1", "stl"), "0_layer_1.stl");
        assert_eq!(
            body_file_name(3, "upper divertor/2", "step"),
            "3_upper_divertor_2.step"
        );
    }

    #[test]
    fn writes_files_into_a_fresh_directory() {
        let dir = std::env::temp_dir().join(format!("reactor-export-{}", uuid::Uuid::new_v4()));
        let files = vec![
            ExportedFile {
                file_name: "0_a.txt".into(),
                contents: b"first".to_vec(),
            },
            ExportedFile {
                file_name: "1_b.txt".into(),
                contents: b"second".to_vec(),
            },
        ];
        let written = write_outputs(&dir, &files).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(fs::read(&written[1]).unwrap(), b"second");
        fs::remove_dir_all(&dir).unwrap();
    }
}
