use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Returns the element at `index`; negative indexes count from the tail.
#[derive(Debug, PartialEq)]
pub struct LIndex {
    pub key: String,
    pub index: i64,
}

impl Executable for LIndex {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        match store.list(&self.key)? {
            Some(list) => Ok(list.get_at(self.index).map_or(Frame::Null, Frame::Bulk)),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for LIndex {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let index = parser.next_i64()?;
        parser.finish()?;
        Ok(Self { key, index })
    }
}
