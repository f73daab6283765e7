use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Left-fold union over the argument sets; missing keys behave as empty
/// sets.
#[derive(Debug, PartialEq)]
pub struct SUnion {
    pub keys: Vec<String>,
}

impl Executable for SUnion {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let (first, rest) = match self.keys.split_first() {
            Some(split) => split,
            None => return Ok(Frame::Array(vec![])),
        };

        let mut result = store.set(first)?.unwrap_or_default();
        for key in rest {
            let other = store.set(key)?.unwrap_or_default();
            result = result.union(&other);
        }

        Ok(Frame::bulk_array(
            result.members().into_iter().map(Bytes::from),
        ))
    }
}

impl TryFrom<&mut CommandParser> for SUnion {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let mut keys = vec![];

        loop {
            match parser.next_string() {
                Ok(key) => keys.push(key),
                Err(CommandError::WrongArity(_)) if !keys.is_empty() => break,
                Err(err) => return Err(err),
            }
        }

        Ok(Self { keys })
    }
}
