//! Name-based dispatch over tokenization strategies.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::adapters::CharTokenizer;
use crate::base::Tokenizer;
use crate::error::{Error, Result};
use crate::local::LocalTokenizer;

pub const DEFAULT_VOCAB_PATH: &str = "./data/vocabulary/basictokenizer_vocab.json";
pub const DEFAULT_MODELS_DIR: &str = "./data/models";

/// A recognised tokenizer name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Local regex tokenizer with a file-backed vocabulary.
    Basic,
    Tiktoken,
    Bpe,
    WordPiece,
    SentencePiece,
    Unigram,
    ByteLevelBpe,
    Char,
    T5,
}

impl Strategy {
    pub const ALL: [Strategy; 9] = [
        Strategy::Basic,
        Strategy::Tiktoken,
        Strategy::Bpe,
        Strategy::WordPiece,
        Strategy::SentencePiece,
        Strategy::Unigram,
        Strategy::ByteLevelBpe,
        Strategy::Char,
        Strategy::T5,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Basic => "B",
            Strategy::Tiktoken => "TIKTOKEN",
            Strategy::Bpe => "BPE",
            Strategy::WordPiece => "WP",
            Strategy::SentencePiece => "SP",
            Strategy::Unigram => "ULM",
            Strategy::ByteLevelBpe => "BL-BPE",
            Strategy::Char => "CHAR",
            Strategy::T5 => "T5",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.name()).collect()
    }

    /// Pretrained model (HuggingFace id or SentencePiece file) backing this
    /// strategy, if any.
    pub fn model(self) -> Option<&'static str> {
        match self {
            Strategy::Bpe | Strategy::ByteLevelBpe => Some("gpt2"),
            Strategy::WordPiece => Some("bert-base-uncased"),
            Strategy::T5 => Some("t5-small"),
            Strategy::SentencePiece => Some("spm.model"),
            Strategy::Unigram => Some("ulm.model"),
            Strategy::Basic | Strategy::Tiktoken | Strategy::Char => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| Error::UnknownStrategy {
                name: s.to_string(),
                available: Self::names(),
            })
    }
}

/// Where strategies find their on-disk state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Vocabulary file of the local tokenizer.
    pub vocab_path: PathBuf,

    /// Root of pretrained models: `<dir>/<model>/tokenizer.json` for
    /// HuggingFace models, `<dir>/<file>.model` for SentencePiece.
    pub models_dir: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            vocab_path: PathBuf::from(DEFAULT_VOCAB_PATH),
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocab_path<P: AsRef<Path>>(self, vocab_path: P) -> Self {
        Self {
            vocab_path: vocab_path.as_ref().to_path_buf(),
            ..self
        }
    }

    pub fn with_models_dir<P: AsRef<Path>>(self, models_dir: P) -> Self {
        Self {
            models_dir: models_dir.as_ref().to_path_buf(),
            ..self
        }
    }
}

/// Resolves strategy names to tokenizer handles.
///
/// Nothing is cached: each call to [`TokenizerRegistry::resolve`] opens the
/// local vocabulary or loads the pretrained model again. Resolve once and
/// reuse the handle.
#[derive(Debug, Clone, Default)]
pub struct TokenizerRegistry {
    config: RegistryConfig,
}

impl TokenizerRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn resolve(&self, name: &str) -> Result<Box<dyn Tokenizer>> {
        let strategy: Strategy = name.parse()?;
        self.build(strategy)
    }

    pub fn build(&self, strategy: Strategy) -> Result<Box<dyn Tokenizer>> {
        log::debug!("Building tokenizer {strategy}");
        match strategy {
            Strategy::Basic => Ok(Box::new(LocalTokenizer::open(&self.config.vocab_path)?)),
            Strategy::Char => Ok(Box::new(CharTokenizer)),
            Strategy::Tiktoken => self.tiktoken(),
            Strategy::Bpe | Strategy::ByteLevelBpe => self.huggingface(strategy, true, true),
            Strategy::WordPiece | Strategy::T5 => self.huggingface(strategy, true, false),
            Strategy::SentencePiece | Strategy::Unigram => self.sentencepiece(strategy),
        }
    }

    #[cfg(feature = "tiktoken")]
    fn tiktoken(&self) -> Result<Box<dyn Tokenizer>> {
        Ok(Box::new(crate::adapters::TiktokenTokenizer::new()?))
    }

    #[cfg(not(feature = "tiktoken"))]
    fn tiktoken(&self) -> Result<Box<dyn Tokenizer>> {
        Err(Error::BackendUnavailable {
            strategy: Strategy::Tiktoken.name(),
            feature: "tiktoken",
        })
    }

    #[cfg(feature = "hf")]
    fn huggingface(
        &self,
        strategy: Strategy,
        add_special_tokens: bool,
        skip_special_tokens: bool,
    ) -> Result<Box<dyn Tokenizer>> {
        let model = strategy.model().unwrap_or_default();
        let path = self.config.models_dir.join(model).join("tokenizer.json");
        Ok(Box::new(crate::adapters::HfTokenizer::from_file(
            strategy.name(),
            path,
            add_special_tokens,
            skip_special_tokens,
        )?))
    }

    #[cfg(not(feature = "hf"))]
    fn huggingface(&self, strategy: Strategy, _: bool, _: bool) -> Result<Box<dyn Tokenizer>> {
        Err(Error::BackendUnavailable {
            strategy: strategy.name(),
            feature: "hf",
        })
    }

    #[cfg(feature = "sentencepiece")]
    fn sentencepiece(&self, strategy: Strategy) -> Result<Box<dyn Tokenizer>> {
        let model = strategy.model().unwrap_or_default();
        let path = self.config.models_dir.join(model);
        Ok(Box::new(crate::adapters::SentencePieceTokenizer::open(
            strategy.name(),
            path,
        )?))
    }

    #[cfg(not(feature = "sentencepiece"))]
    fn sentencepiece(&self, strategy: Strategy) -> Result<Box<dyn Tokenizer>> {
        Err(Error::BackendUnavailable {
            strategy: strategy.name(),
            feature: "sentencepiece",
        })
    }
}
