use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::{Entity, Store};

/// Stores a string value under `key`, replacing whatever entity was there.
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Bytes,
}

impl Executable for Set {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        store.put(self.key, Entity::String(self.value));
        Ok(Frame::Simple("OK".to_string()))
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_bytes()?;
        parser.finish()?;

        Ok(Self { key, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    #[test]
    fn stores_the_value() {
        let store = Store::new();
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("SET")),
            Frame::Bulk(Bytes::from("name")),
            Frame::Bulk(Bytes::from("hehuaisen")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        let result = cmd.exec(store.clone()).unwrap();
        assert_eq!(result, Frame::Simple("OK".to_string()));
        assert_eq!(store.string("name").unwrap(), Some(Bytes::from("hehuaisen")));
    }

    #[test]
    fn replaces_an_entity_of_another_kind() {
        let store = Store::new();
        let list = store.list_or_create("key").unwrap();
        list.push_back(Bytes::from("x"));

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("SET")),
            Frame::Bulk(Bytes::from("key")),
            Frame::Bulk(Bytes::from("v")),
        ]);
        let cmd = Command::try_from(frame).unwrap();
        cmd.exec(store.clone()).unwrap();

        assert_eq!(store.string("key").unwrap(), Some(Bytes::from("v")));
    }

    #[test]
    fn value_may_contain_crlf() {
        let store = Store::new();
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("SET")),
            Frame::Bulk(Bytes::from("key")),
            Frame::Bulk(Bytes::from_static(b"line1\r\nline2")),
        ]);
        Command::try_from(frame).unwrap().exec(store.clone()).unwrap();
        assert_eq!(
            store.string("key").unwrap(),
            Some(Bytes::from_static(b"line1\r\nline2"))
        );
    }
}
