use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Replies with the member's 0-based ascending rank, or a null bulk when
/// the key or member is absent.
#[derive(Debug, PartialEq)]
pub struct ZRank {
    pub key: String,
    pub member: String,
}

impl Executable for ZRank {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let rank = match store.zset(&self.key)? {
            Some(zset) => zset.rank(&self.member, false),
            None => None,
        };
        let res = match rank {
            Some(rank) => Frame::Integer(rank),
            None => Frame::Null,
        };
        Ok(res)
    }
}

impl TryFrom<&mut CommandParser> for ZRank {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let member = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key, member })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::commands::Command;

    fn zrank(key: &str, member: &str) -> Command {
        Command::try_from(Frame::Array(vec![
            Frame::Bulk(Bytes::from("ZRANK")),
            Frame::Bulk(Bytes::from(key.to_string())),
            Frame::Bulk(Bytes::from(member.to_string())),
        ]))
        .unwrap()
    }

    #[test]
    fn rank_zero_is_an_integer_not_null() {
        let store = Store::new();
        let zset = store.zset_or_create("z").unwrap();
        zset.add("lowest", 1.0);
        zset.add("highest", 2.0);

        let result = zrank("z", "lowest").exec(store.clone()).unwrap();
        assert_eq!(result, Frame::Integer(0));

        let result = zrank("z", "highest").exec(store).unwrap();
        assert_eq!(result, Frame::Integer(1));
    }

    #[test]
    fn absent_member_is_null() {
        let store = Store::new();
        store.zset_or_create("z").unwrap().add("one", 1.0);
        assert_eq!(zrank("z", "missing").exec(store).unwrap(), Frame::Null);
    }

    #[test]
    fn missing_key_is_null_without_creation() {
        let store = Store::new();
        assert_eq!(zrank("z", "m").exec(store.clone()).unwrap(), Frame::Null);
        assert_eq!(store.len(), 0);
    }
}
