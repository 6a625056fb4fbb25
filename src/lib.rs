pub mod adapters;
pub mod base;
pub mod error;
pub mod lines;
pub mod local;
pub mod registry;
pub mod segment;
pub mod vocab;

pub use base::{Token, Tokenizer};
pub use error::{Error, Result};
pub use local::LocalTokenizer;
pub use registry::{RegistryConfig, Strategy, TokenizerRegistry};
pub use vocab::Vocabulary;
