use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Removes and returns the head of the list; null bulk when the key is
/// absent or the list is empty.
#[derive(Debug, PartialEq)]
pub struct LPop {
    pub key: String,
}

impl Executable for LPop {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        match store.list(&self.key)? {
            Some(list) => Ok(list.pop_front().map_or(Frame::Null, Frame::Bulk)),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for LPop {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key })
    }
}
