//! Persistent token vocabulary.
//!
//! On disk a vocabulary is a single JSON array of strings; the position of a
//! string in the array is its token id.

use indexmap::IndexSet;
use std::fs::{File, Permissions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::base::Token;
use crate::error::{Error, Result};

/// Ordered, duplicate-free token table. Insertion order is id order.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    tokens: IndexSet<String>,
}

// `IndexSet` equality ignores order; ids depend on it.
impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.tokens.iter().eq(other.tokens.iter())
    }
}

impl Eq for Vocabulary {}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vocabulary from tokens in id order.
    ///
    /// Returns the first repeated token on failure.
    pub fn from_tokens<I, S>(tokens: I) -> std::result::Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self::new();
        for token in tokens {
            let token = token.into();
            if vocab.tokens.contains(&token) {
                return Err(token);
            }
            vocab.tokens.insert(token);
        }
        Ok(vocab)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn id_of(&self, token: &str) -> Option<Token> {
        self.tokens.get_index_of(token).map(|idx| idx as Token)
    }

    pub fn token_of(&self, id: Token) -> Option<&str> {
        self.tokens.get_index(id as usize).map(String::as_str)
    }

    /// Return the id of `token`, appending it first if it is new.
    ///
    /// The flag is `true` when the token was appended.
    pub fn insert(&mut self, token: &str) -> (Token, bool) {
        if let Some(id) = self.id_of(token) {
            return (id, false);
        }
        let (idx, _) = self.tokens.insert_full(token.to_string());
        (idx as Token, true)
    }

    /// Tokens in id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Load a vocabulary file.
    ///
    /// Returns `Ok(None)` if nothing exists at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(path, e)),
        };

        let tokens: Vec<String> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::MalformedFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let vocab = Self::from_tokens(tokens).map_err(|dup| Error::MalformedFile {
            path: path.to_path_buf(),
            reason: format!("duplicate token {dup:?}"),
        })?;
        log::info!(
            "Loaded vocabulary of {} tokens from {}",
            vocab.len(),
            path.display()
        );
        Ok(Some(vocab))
    }

    /// Write the vocabulary to `path`.
    ///
    /// The array is written to a temporary file in the same directory and
    /// renamed over `path`, so readers see either the old or the new file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

        // Temp files are created owner-only; the rename must not narrow
        // the mode of a vocabulary other readers share.
        let permissions = match std::fs::metadata(path) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == ErrorKind::NotFound => new_file_permissions(),
            Err(e) => return Err(Error::io(path, e)),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
        if let Some(permissions) = permissions {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(|e| Error::io(path, e))?;
        }
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, &self.tokens)
                .map_err(|e| Error::io(path, e.into()))?;
            writer.flush().map_err(|e| Error::io(path, e))?;
        }
        tmp.as_file().sync_all().map_err(|e| Error::io(path, e))?;
        tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

        log::debug!("Saved {} tokens to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
