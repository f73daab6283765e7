use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Replies with every member, in unspecified order.
#[derive(Debug, PartialEq)]
pub struct SMembers {
    pub key: String,
}

impl Executable for SMembers {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let members = match store.set(&self.key)? {
            Some(set) => set.members(),
            None => vec![],
        };
        Ok(Frame::bulk_array(members.into_iter().map(Bytes::from)))
    }
}

impl TryFrom<&mut CommandParser> for SMembers {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key })
    }
}
