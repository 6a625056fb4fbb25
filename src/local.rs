use std::path::{Path, PathBuf};

use crate::base::{Token, Tokenizer};
use crate::error::Result;
use crate::segment::segment;
use crate::vocab::Vocabulary;

pub const BOS_TOKEN: &str = "<|BOS|>";
pub const EOS_TOKEN: &str = "<|EOS|>";
pub const UNK_TOKEN: &str = "[UNK]";

/// Regex-segmenting tokenizer that grows a file-backed vocabulary.
///
/// One value owns the vocabulary for one path. Two processes growing the
/// same path overwrite each other's additions; keep a single writer per file.
pub struct LocalTokenizer {
    path: PathBuf,
    vocab: Vocabulary,
    dirty: bool,
}

impl LocalTokenizer {
    /// Open the vocabulary at `path`, or create and save a fresh one holding
    /// only the begin and end markers.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        match Vocabulary::load(&path)? {
            Some(vocab) => Ok(LocalTokenizer {
                path,
                vocab,
                dirty: false,
            }),
            None => {
                let mut vocab = Vocabulary::new();
                vocab.insert(BOS_TOKEN);
                vocab.insert(EOS_TOKEN);
                vocab.save(&path)?;
                log::info!("Created vocabulary at {}", path.display());
                Ok(LocalTokenizer {
                    path,
                    vocab,
                    dirty: false,
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// True when tokens were added since the last successful save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the in-memory vocabulary to its path.
    pub fn save(&mut self) -> Result<()> {
        self.vocab.save(&self.path)?;
        self.dirty = false;
        Ok(())
    }

    /// Encode `text` framed by the begin and end markers, appending unseen
    /// pieces to the vocabulary.
    ///
    /// With `grow` set, a call that added tokens saves before returning. A
    /// failed save leaves the new tokens in memory and the tokenizer dirty.
    pub fn encode_with(&mut self, text: &str, grow: bool) -> Result<Vec<Token>> {
        let mut pieces = vec![BOS_TOKEN.to_string()];
        pieces.extend(segment(text)?);
        pieces.push(EOS_TOKEN.to_string());

        let mut ids = Vec::with_capacity(pieces.len());
        let mut added = 0;
        for piece in &pieces {
            let (id, is_new) = self.vocab.insert(piece);
            if is_new {
                log::debug!("New token {piece:?} -> {id}");
                added += 1;
            }
            ids.push(id);
        }

        if added > 0 {
            self.dirty = true;
            if grow {
                self.save()?;
            }
        }
        Ok(ids)
    }

    /// Concatenate the tokens for `ids`; unknown ids become [`UNK_TOKEN`].
    pub fn decode_ids(&self, ids: &[Token]) -> String {
        let mut text = String::new();
        for &id in ids {
            match self.vocab.token_of(id) {
                Some(token) => text.push_str(token),
                None => {
                    log::debug!("Unknown token id {id}");
                    text.push_str(UNK_TOKEN);
                }
            }
        }
        text
    }
}

impl Tokenizer for LocalTokenizer {
    fn name(&self) -> &str {
        "B"
    }

    fn encode(&mut self, text: &str) -> Result<Vec<Token>> {
        self.encode_with(text, true)
    }

    fn decode(&self, ids: &[Token]) -> Result<String> {
        Ok(self.decode_ids(ids))
    }
}
