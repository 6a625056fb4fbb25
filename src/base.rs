use crate::error::Result;

pub type Token = u32;

/// A named tokenization backend.
///
/// `encode` takes `&mut self` because some backends grow their vocabulary
/// while encoding.
pub trait Tokenizer {
    fn name(&self) -> &str;
    fn encode(&mut self, text: &str) -> Result<Vec<Token>>;
    fn decode(&self, ids: &[Token]) -> Result<String>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encode(&mut self, text: &str) -> Result<Vec<Token>> {
        (**self).encode(text)
    }

    fn decode(&self, ids: &[Token]) -> Result<String> {
        (**self).decode(ids)
    }
}
