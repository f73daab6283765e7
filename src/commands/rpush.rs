use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Appends each value in argument order. Creates the list when the key is
/// absent.
#[derive(Debug, PartialEq)]
pub struct RPush {
    pub key: String,
    pub values: Vec<Bytes>,
}

impl Executable for RPush {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let list = store.list_or_create(&self.key)?;
        for value in self.values {
            list.push_back(value);
        }
        Ok(Frame::Integer(list.len() as i64))
    }
}

impl TryFrom<&mut CommandParser> for RPush {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let mut values = vec![];

        loop {
            match parser.next_bytes() {
                Ok(value) => values.push(value),
                Err(CommandError::WrongArity(_)) if !values.is_empty() => break,
                Err(err) => return Err(err),
            }
        }

        Ok(Self { key, values })
    }
}
