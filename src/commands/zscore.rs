use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::ds::zset::format_score;
use crate::frame::Frame;
use crate::store::Store;

/// Replies with the member's score as a bulk string, or a null bulk when
/// the key or member is absent.
#[derive(Debug, PartialEq)]
pub struct ZScore {
    pub key: String,
    pub member: String,
}

impl Executable for ZScore {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let score = match store.zset(&self.key)? {
            Some(zset) => zset.score(&self.member),
            None => None,
        };
        let res = match score {
            Some(score) => Frame::Bulk(Bytes::from(format_score(score))),
            None => Frame::Null,
        };
        Ok(res)
    }
}

impl TryFrom<&mut CommandParser> for ZScore {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key, member })
    }
}
