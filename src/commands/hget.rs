use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

#[derive(Debug, PartialEq)]
pub struct HGet {
    pub key: String,
    pub field: String,
}

impl Executable for HGet {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        match store.hash(&self.key)? {
            Some(hash) => Ok(hash.get(&self.field).map_or(Frame::Null, Frame::Bulk)),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for HGet {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let field = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key, field })
    }
}
