//! Rendered artifacts written to the output directory under fixed names.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Tabular view of the proposal collection.
    Table,
    /// Budget bar chart.
    Chart,
    /// Ranked ideas view.
    RankedIdeas,
}

impl ArtifactKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Table => "finance_data.html",
            ArtifactKind::Chart => "budget_bar_graph.html",
            ArtifactKind::RankedIdeas => "screened_ideas.html",
        }
    }
}

/// Write (or overwrite) an artifact, creating `out_dir` if needed.
pub fn write_artifact(out_dir: &Path, kind: ArtifactKind, contents: &str) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let path = out_dir.join(kind.file_name());
    fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_distinct() {
        let names = [
            ArtifactKind::Table.file_name(),
            ArtifactKind::Chart.file_name(),
            ArtifactKind::RankedIdeas.file_name(),
        ];
        assert_ne!(names[0], names[1]);
        assert_ne!(names[1], names[2]);
        assert_ne!(names[0], names[2]);
    }

    #[test]
    fn creates_directory_and_overwrites() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("templates");
        let path = write_artifact(&out, ArtifactKind::RankedIdeas, "first run").unwrap();
        assert_eq!(path, out.join("screened_ideas.html"));
        write_artifact(&out, ArtifactKind::RankedIdeas, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn out_dir_that_is_a_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blocker = tmp.path().join("templates");
        fs::write(&blocker, "not a directory").unwrap();
        assert!(write_artifact(&blocker, ArtifactKind::Table, "<table></table>").is_err());
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    }
}
