use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Left-fold intersection over the argument sets. Missing keys behave as
/// empty sets; each container is snapshotted under its own lock, one at a
/// time.
#[derive(Debug, PartialEq)]
pub struct SInter {
    pub keys: Vec<String>,
}

impl Executable for SInter {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let (first, rest) = match self.keys.split_first() {
            Some(split) => split,
            None => return Ok(Frame::Array(vec![])),
        };

        let mut result = store.set(first)?.unwrap_or_default();
        for key in rest {
            let other = store.set(key)?.unwrap_or_default();
            result = result.intersect(&other);
        }

        Ok(Frame::bulk_array(
            result.members().into_iter().map(Bytes::from),
        ))
    }
}

impl TryFrom<&mut CommandParser> for SInter {
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
