use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Prepends each value in argument order, so the last argument ends up at
/// the head. Creates the list when the key is absent.
#[derive(Debug, PartialEq)]
pub struct LPush {
    pub key: String,
    pub values: Vec<Bytes>,
}

impl Executable for LPush {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let list = store.list_or_create(&self.key)?;
        for value in self.values {
            list.insert_at(0, value);
        }
        Ok(Frame::Integer(list.len() as i64))
    }
}

impl TryFrom<&mut CommandParser> for LPush {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let mut values = vec![];

        loop {
            match parser.next_bytes() {
                Ok(value) => values.push(value),
                Err(CommandError::WrongArity(_)) if !values.is_empty() => break,
                Err(err) => return Err(err),
            }
        }

        Ok(Self { key, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    fn lpush(parts: &[&str]) -> Command {
        let mut frames = vec![Frame::Bulk(Bytes::from("LPUSH"))];
        frames.extend(parts.iter().map(|p| Frame::Bulk(Bytes::from(p.to_string()))));
        Command::try_from(Frame::Array(frames)).unwrap()
    }

    #[test]
    fn reports_the_new_length() {
        let store = Store::new();
        assert_eq!(
            lpush(&["testlist", "one"]).exec(store.clone()).unwrap(),
            Frame::Integer(1)
        );
        assert_eq!(
            lpush(&["testlist", "two", "three", "four"])
                .exec(store.clone())
                .unwrap(),
            Frame::Integer(4)
        );
    }

    #[test]
    fn last_argument_ends_up_at_the_head() {
        let store = Store::new();
        lpush(&["k", "a", "b", "c"]).exec(store.clone()).unwrap();

        let list = store.list("k").unwrap().unwrap();
        assert_eq!(list.range(0, -1), vec!["c", "b", "a"]);
    }

    #[test]
    fn missing_values_is_an_arity_error() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("LPUSH")),
            Frame::Bulk(Bytes::from("k")),
        ]);
        let err = Command::try_from(frame).unwrap_err();
        assert_eq!(err, CommandError::WrongArity("lpush".to_string()));
    }
}
