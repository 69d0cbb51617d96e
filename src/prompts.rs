use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static PROMPT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/prompts");

pub const DEFAULT_PROMPT_SET: &str = "peer-supervision";

/// Prompts starting with this marker are the harder ones a group may choose to skip.
pub const CHALLENGING_MARKER: &str = "🚨";

#[derive(Debug, Error)]
pub enum PromptFileError {
    #[error("unable to read prompt file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse prompt file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("prompt file {0} contains no prompts")]
    Empty(PathBuf),
    #[error("no built-in prompt set named {0:?}")]
    UnknownSet(String),
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct PromptSet {
    pub name: String,
    pub prompts: Vec<String>,
}

/// Prompt files are either a bare JSON array or a named set.
#[derive(Deserialize)]
#[serde(untagged)]
enum PromptFile {
    List(Vec<String>),
    Set(PromptSet),
}

impl PromptSet {
    pub fn builtin(name: &str) -> Result<Self, PromptFileError> {
        let file_name = format!("{name}.json");
        let contents = PROMPT_DIR
            .get_file(&file_name)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| PromptFileError::UnknownSet(name.to_string()))?;

        serde_json::from_str(contents).map_err(|source| PromptFileError::Parse {
            path: PathBuf::from(file_name),
            source,
        })
    }

    /// Load prompts from disk. JSON content (array or `{name, prompts}`) is parsed as
    /// such; anything else is read as one prompt per line, skipping blanks and `#` comments.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PromptFileError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| PromptFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());

        let trimmed = contents.trim_start();
        let (name, prompts) = if trimmed.starts_with('[') || trimmed.starts_with('{') {
            match serde_json::from_str::<PromptFile>(trimmed) {
                Ok(PromptFile::List(prompts)) => (stem, prompts),
                Ok(PromptFile::Set(set)) => (set.name, set.prompts),
                Err(source) => {
                    return Err(PromptFileError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        } else {
            let lines = contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(str::to_string)
                .collect();
            (stem, lines)
        };

        let prompts: Vec<String> = prompts
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if prompts.is_empty() {
            return Err(PromptFileError::Empty(path.to_path_buf()));
        }

        Ok(Self { name, prompts })
    }
}

pub fn is_challenging(prompt: &str) -> bool {
    prompt.trim_start().starts_with(CHALLENGING_MARKER)
}

/// The ordered list of prompts the wheel draws from. Duplicates are allowed and
/// entries are never reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptPool {
    prompts: Vec<String>,
}

impl PromptPool {
    pub fn new(prompts: Vec<String>) -> Self {
        Self { prompts }
    }

    /// Appends the trimmed text. Returns false (and leaves the pool alone) when
    /// nothing is left after trimming.
    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.prompts.push(text.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.prompts.len() {
            Some(self.prompts.remove(index))
        } else {
            None
        }
    }

    pub fn without_challenging(self) -> Self {
        Self {
            prompts: self
                .prompts
                .into_iter()
                .filter(|p| !is_challenging(p))
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.prompts.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.prompts
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prompts.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

impl From<PromptSet> for PromptPool {
    fn from(set: PromptSet) -> Self {
        Self::new(set.prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_set_loads() {
        let set = PromptSet::builtin(DEFAULT_PROMPT_SET).unwrap();

        assert_eq!(set.name, "peer-supervision");
        assert_eq!(set.prompts.len(), 30);
        assert_eq!(set.prompts.iter().filter(|p| is_challenging(p)).count(), 10);
    }

    #[test]
    fn test_unknown_builtin_set() {
        let err = PromptSet::builtin("nope").unwrap_err();
        assert!(matches!(err, PromptFileError::UnknownSet(ref n) if n == "nope"));
    }

    #[test]
    fn test_from_file_plain_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# icebreakers").unwrap();
        writeln!(file, "  first question  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "second question").unwrap();

        let set = PromptSet::from_file(file.path()).unwrap();
        assert_eq!(set.prompts, vec!["first question", "second question"]);
    }

    #[test]
    fn test_from_file_json_array_and_set() {
        let mut array = NamedTempFile::new().unwrap();
        write!(array, r#"["one", " two ", ""]"#).unwrap();
        let set = PromptSet::from_file(array.path()).unwrap();
        assert_eq!(set.prompts, vec!["one", "two"]);

        let mut named = NamedTempFile::new().unwrap();
        write!(named, r#"{{"name": "retro", "prompts": ["what went well?"]}}"#).unwrap();
        let set = PromptSet::from_file(named.path()).unwrap();
        assert_eq!(set.name, "retro");
        assert_eq!(set.prompts, vec!["what went well?"]);
    }

    #[test]
    fn test_from_file_errors() {
        let missing = PromptSet::from_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(missing, PromptFileError::Io { .. }));

        let mut bad = NamedTempFile::new().unwrap();
        write!(bad, "[1, 2").unwrap();
        assert!(matches!(
            PromptSet::from_file(bad.path()).unwrap_err(),
            PromptFileError::Parse { .. }
        ));

        let mut empty = NamedTempFile::new().unwrap();
        writeln!(empty, "# nothing but comments").unwrap();
        assert!(matches!(
            PromptSet::from_file(empty.path()).unwrap_err(),
            PromptFileError::Empty(_)
        ));
    }

    #[test]
    fn test_add_trims_and_rejects_blank() {
        let mut pool = PromptPool::new(vec!["A".into()]);

        assert!(!pool.add("   "));
        assert_eq!(pool.len(), 1);

        assert!(pool.add(" C "));
        assert_eq!(pool.as_slice(), &["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_add_allows_duplicates() {
        let mut pool = PromptPool::new(vec!["A".into()]);
        assert!(pool.add("A"));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_remove_by_position() {
        let mut pool = PromptPool::new(vec!["A".into(), "B".into(), "C".into()]);

        assert_eq!(pool.remove(1), Some("B".to_string()));
        assert_eq!(pool.iter().collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(pool.remove(5), None);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_without_challenging() {
        let pool = PromptPool::new(vec![
            "easy".into(),
            "🚨 hard".into(),
            "  🚨 also hard".into(),
        ]);
        let pool = pool.without_challenging();
        assert_eq!(pool.iter().collect::<Vec<_>>(), vec!["easy"]);
    }
}
