use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

#[derive(Debug, PartialEq)]
pub struct HLen {
    pub key: String,
}

impl Executable for HLen {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let length = match store.hash(&self.key)? {
            Some(hash) => hash.len() as i64,
            None => 0,
        };
        Ok(Frame::Integer(length))
    }
}

impl TryFrom<&mut CommandParser> for HLen {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key })
    }
}
