use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Replies with all fields and values, alternating field then value, in
/// unspecified order.
#[derive(Debug, PartialEq)]
pub struct HGetAll {
    pub key: String,
}

impl Executable for HGetAll {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let hash = match store.hash(&self.key)? {
            Some(hash) => hash,
            None => return Ok(Frame::Array(vec![])),
        };

        let entries = hash.entries();
        let mut values = Vec::with_capacity(entries.len() * 2);
        for (field, value) in entries {
            values.push(Bytes::from(field));
            values.push(value);
        }
        Ok(Frame::bulk_array(values))
    }
}

impl TryFrom<&mut CommandParser> for HGetAll {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key })
    }
}
