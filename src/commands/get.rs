use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Returns the string value under `key`, or a null bulk when the key is
/// absent.
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: String,
}

impl Executable for Get {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let value = store.string(&self.key)?;
        Ok(value.map_or(Frame::Null, Frame::Bulk))
    }
}

impl TryFrom<&mut CommandParser> for Get {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key })
    }
}
