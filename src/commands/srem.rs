use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Removes members and replies with how many actually existed. A missing
/// key removes nothing and creates nothing.
#[derive(Debug, PartialEq)]
pub struct SRem {
    pub key: String,
    pub members: Vec<String>,
}

impl Executable for SRem {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let removed = match store.set(&self.key)? {
            Some(set) => set.remove(&self.members),
            None => 0,
        };
        Ok(Frame::Integer(removed))
    }
}

impl TryFrom<&mut CommandParser> for SRem {
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
