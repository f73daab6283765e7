use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Left-fold difference: the first set minus every following one. Missing
/// keys behave as empty sets.
#[derive(Debug, PartialEq)]
pub struct SDiff {
    pub keys: Vec<String>,
}

impl Executable for SDiff {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let (first, rest) = match self.keys.split_first() {
            Some(split) => split,
            None => return Ok(Frame::Array(vec![])),
        };

        let mut result = store.set(first)?.unwrap_or_default();
        for key in rest {
            let other = store.set(key)?.unwrap_or_default();
            result = result.diff(&other);
        }

        Ok(Frame::bulk_array(
            result.members().into_iter().map(Bytes::from),
        ))
    }
}

impl TryFrom<&mut CommandParser> for SDiff {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let mut keys = vec![];

        loop {
            match parser.next_string() {
                Ok(key) => keys.push(key),
                Err(CommandError::WrongArity(_)) if !keys.is_empty() => break,
                Err(err) => return Err(err),
            }
        }

        Ok(Self { keys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    #[test]
    fn subtracts_each_following_set() {
        let store = Store::new();
        store
            .set_or_create("s1")
            .unwrap()
            .add(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        store.set_or_create("s2").unwrap().add(vec!["b".into()]);
        store.set_or_create("s3").unwrap().add(vec!["d".into(), "e".into()]);

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("SDIFF")),
            Frame::Bulk(Bytes::from("s1")),
            Frame::Bulk(Bytes::from("s2")),
            Frame::Bulk(Bytes::from("s3")),
        ]);
        let result = Command::try_from(frame).unwrap().exec(store).unwrap();

        let mut members = match result {
            Frame::Array(parts) => parts
                .into_iter()
                .map(|part| match part {
                    Frame::Bulk(bytes) => String::from_utf8(bytes.to_vec()).unwrap(),
                    other => panic!("expected bulk, got {:?}", other),
                })
                .collect::<Vec<_>>(),
            other => panic!("expected array, got {:?}", other),
        };
        members.sort();
        assert_eq!(members, vec!["a", "c"]);
    }
}
