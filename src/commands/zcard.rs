use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

#[derive(Debug, PartialEq)]
pub struct ZCard {
    pub key: String,
}

impl Executable for ZCard {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let cardinality = match store.zset(&self.key)? {
            Some(zset) => zset.len() as i64,
            None => 0,
        };
        Ok(Frame::Integer(cardinality))
    }
}

impl TryFrom<&mut CommandParser> for ZCard {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key })
    }
}
