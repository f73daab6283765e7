use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Removes members and replies with how many actually existed. A missing
/// key removes nothing and creates nothing.
#[derive(Debug, PartialEq)]
pub struct ZRem {
    pub key: String,
    pub members: Vec<String>,
}

impl Executable for ZRem {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let removed = match store.zset(&self.key)? {
            Some(zset) => self
                .members
                .iter()
                .filter(|member| zset.remove(member))
                .count() as i64,
            None => 0,
        };
        Ok(Frame::Integer(removed))
    }
}

impl TryFrom<&mut CommandParser> for ZRem {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let mut members = vec![];

        loop {
            match parser.next_string() {
                Ok(member) => members.push(member),
                Err(CommandError::WrongArity(_)) if !members.is_empty() => break,
                Err(err) => return Err(err),
            }
        }

        Ok(Self { key, members })
    }
}
