use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

#[derive(Debug, PartialEq)]
pub struct SIsMember {
    pub key: String,
    pub member: String,
}

impl Executable for SIsMember {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let present = match store.set(&self.key)? {
            Some(set) => set.contains(&self.member),
            None => false,
        };
        Ok(Frame::Integer(i64::from(present)))
    }
}

impl TryFrom<&mut CommandParser> for SIsMember {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key, member })
    }
}
