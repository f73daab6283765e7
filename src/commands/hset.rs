use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Writes one or more field/value pairs and replies with the number of
/// fields that were newly added. Creates the hash when the key is absent.
#[derive(Debug, PartialEq)]
pub struct HSet {
    pub key: String,
    pub pairs: Vec<(String, Bytes)>,
}

impl Executable for HSet {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let hash = store.hash_or_create(&self.key)?;
        let added = hash.set_pairs(self.pairs);
        Ok(Frame::Integer(added))
    }
}

impl TryFrom<&mut CommandParser> for HSet {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let mut pairs = vec![];

        loop {
            match parser.next_string() {
                // A field without a value is an arity error, caught by the
                // inner next_bytes.
                Ok(field) => {
                    let value = parser.next_bytes()?;
                    pairs.push((field, value));
                }
                Err(CommandError::WrongArity(_)) if !pairs.is_empty() => break,
                Err(err) => return Err(err),
            }
        }

        Ok(Self { key, pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    fn hset(parts: &[&str]) -> Result<Command, CommandError> {
        let mut frames = vec![Frame::Bulk(Bytes::from("HSET"))];
        frames.extend(parts.iter().map(|p| Frame::Bulk(Bytes::from(p.to_string()))));
        Command::try_from(Frame::Array(frames))
    }

    #[test]
    fn counts_new_fields_only() {
        let store = Store::new();
        let result = hset(&["h", "f1", "v1", "f2", "v2"])
            .unwrap()
            .exec(store.clone())
            .unwrap();
        assert_eq!(result, Frame::Integer(2));

        let result = hset(&["h", "f1", "changed", "f3", "v3"])
            .unwrap()
            .exec(store.clone())
            .unwrap();
        assert_eq!(result, Frame::Integer(1));

        let hash = store.hash("h").unwrap().unwrap();
        assert_eq!(hash.get("f1"), Some(Bytes::from("changed")));
        assert_eq!(hash.len(), 3);
    }

    #[test]
    fn dangling_field_is_an_arity_error() {
        let err = hset(&["h", "f1", "v1", "f2"]).unwrap_err();
        assert_eq!(err, CommandError::WrongArity("hset".to_string()));
    }

    #[test]
    fn no_pairs_is_an_arity_error() {
        let err = hset(&["h"]).unwrap_err();
        assert_eq!(err, CommandError::WrongArity("hset".to_string()));
    }
}
