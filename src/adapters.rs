//! Adapters for pretrained tokenizers.
//!
//! Every adapter loads its model when constructed; resolving a strategy again
//! loads it again.

use crate::base::{Token, Tokenizer};
#[cfg(any(feature = "tiktoken", feature = "hf", feature = "sentencepiece"))]
use crate::error::Error;
use crate::error::Result;

/// Unicode code points as token ids.
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn name(&self) -> &str {
        "CHAR"
    }

    fn encode(&mut self, text: &str) -> Result<Vec<Token>> {
        Ok(text.chars().map(|c| c as Token).collect())
    }

    /// Ids that are not valid scalar values decode to U+FFFD.
    fn decode(&self, ids: &[Token]) -> Result<String> {
        Ok(ids
            .iter()
            .map(|&id| char::from_u32(id).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect())
    }
}

/// `cl100k_base` byte-pair encoding.
#[cfg(feature = "tiktoken")]
pub struct TiktokenTokenizer {
    bpe: tiktoken_rs::CoreBPE,
}

#[cfg(feature = "tiktoken")]
impl TiktokenTokenizer {
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| Error::backend("TIKTOKEN", e))?;
        Ok(Self { bpe })
    }
}

#[cfg(feature = "tiktoken")]
impl Tokenizer for TiktokenTokenizer {
    fn name(&self) -> &str {
        "TIKTOKEN"
    }

    fn encode(&mut self, text: &str) -> Result<Vec<Token>> {
        Ok(self
            .bpe
            .encode_ordinary(text)
            .into_iter()
            .map(|rank| rank as Token)
            .collect())
    }

    fn decode(&self, ids: &[Token]) -> Result<String> {
        self.bpe
            .decode(ids.iter().map(|&id| id as _).collect())
            .map_err(|e| Error::backend("TIKTOKEN", e))
    }
}

/// A HuggingFace `tokenizer.json` model.
#[cfg(feature = "hf")]
pub struct HfTokenizer {
    strategy: &'static str,
    inner: tokenizers::Tokenizer,
    add_special_tokens: bool,
    skip_special_tokens: bool,
}

#[cfg(feature = "hf")]
impl HfTokenizer {
    pub fn from_file<P: AsRef<std::path::Path>>(
        strategy: &'static str,
        path: P,
        add_special_tokens: bool,
        skip_special_tokens: bool,
    ) -> Result<Self> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| Error::Backend {
            strategy,
            message: format!("cannot load {}: {e}", path.display()),
        })?;
        log::debug!("Loaded {strategy} model from {}", path.display());
        Ok(Self {
            strategy,
            inner,
            add_special_tokens,
            skip_special_tokens,
        })
    }
}

#[cfg(feature = "hf")]
impl Tokenizer for HfTokenizer {
    fn name(&self) -> &str {
        self.strategy
    }

    fn encode(&mut self, text: &str) -> Result<Vec<Token>> {
        let encoding = self
            .inner
            .encode(text, self.add_special_tokens)
            .map_err(|e| Error::backend(self.strategy, e))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[Token]) -> Result<String> {
        self.inner
            .decode(ids, self.skip_special_tokens)
            .map_err(|e| Error::backend(self.strategy, e))
    }
}

/// A SentencePiece `.model` file.
#[cfg(feature = "sentencepiece")]
pub struct SentencePieceTokenizer {
    strategy: &'static str,
    inner: sentencepiece::SentencePieceProcessor,
}

#[cfg(feature = "sentencepiece")]
impl SentencePieceTokenizer {
    pub fn open<P: AsRef<std::path::Path>>(strategy: &'static str, path: P) -> Result<Self> {
        let path = path.as_ref();
        let inner =
            sentencepiece::SentencePieceProcessor::open(path).map_err(|e| Error::Backend {
                strategy,
                message: format!("cannot load {}: {e}", path.display()),
            })?;
        Ok(Self { strategy, inner })
    }
}

#[cfg(feature = "sentencepiece")]
impl Tokenizer for SentencePieceTokenizer {
    fn name(&self) -> &str {
        self.strategy
    }

    fn encode(&mut self, text: &str) -> Result<Vec<Token>> {
        let pieces = self
            .inner
            .encode(text)
            .map_err(|e| Error::backend(self.strategy, e))?;
        Ok(pieces.into_iter().map(|p| p.id).collect())
    }

    fn decode(&self, ids: &[Token]) -> Result<String> {
        self.inner
            .decode_piece_ids(ids)
            .map_err(|e| Error::backend(self.strategy, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_encode() {
        let mut tok = CharTokenizer;
        assert_eq!(tok.encode("Hi é").unwrap(), vec![72, 105, 32, 233]);
    }

    #[test]
    fn test_char_decode() {
        let tok = CharTokenizer;
        assert_eq!(tok.decode(&[72, 105, 0x65E5]).unwrap(), "Hi日");
        assert_eq!(tok.decode(&[0xD800, 65]).unwrap(), "\u{FFFD}A");
    }

    #[cfg(feature = "tiktoken")]
    #[test]
    fn test_tiktoken_cl100k() {
        let mut tok = TiktokenTokenizer::new().unwrap();
        let ids = tok.encode("hello world").unwrap();
        assert_eq!(ids, vec![15339, 1917]);
        assert_eq!(tok.decode(&ids).unwrap(), "hello world");
    }
}
