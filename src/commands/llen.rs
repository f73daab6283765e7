use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

#[derive(Debug, PartialEq)]
pub struct LLen {
    pub key: String,
}

impl Executable for LLen {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let length = match store.list(&self.key)? {
            Some(list) => list.len() as i64,
            None => 0,
        };
        Ok(Frame::Integer(length))
    }
}

impl TryFrom<&mut CommandParser> for LLen {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key })
    }
}
