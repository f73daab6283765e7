use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Adds members and replies with how many were not already present.
/// Creates the set when the key is absent.
#[derive(Debug, PartialEq)]
pub struct SAdd {
    pub key: String,
    pub members: Vec<String>,
}

impl Executable for SAdd {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let set = store.set_or_create(&self.key)?;
        let added = set.add(self.members);
        Ok(Frame::Integer(added))
    }
}

impl TryFrom<&mut CommandParser> for SAdd {
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

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::commands::Command;

    fn sadd(parts: &[&str]) -> Command {
        let mut frames = vec![Frame::Bulk(Bytes::from("SADD"))];
        frames.extend(parts.iter().map(|p| Frame::Bulk(Bytes::from(p.to_string()))));
        Command::try_from(Frame::Array(frames)).unwrap()
    }

    #[test]
    fn counts_distinct_new_members() {
        let store = Store::new();
        assert_eq!(
            sadd(&["s", "a", "b", "a"]).exec(store.clone()).unwrap(),
            Frame::Integer(2)
        );
        assert_eq!(
            sadd(&["s", "b", "c"]).exec(store.clone()).unwrap(),
            Frame::Integer(1)
        );

        let set = store.set("s").unwrap().unwrap();
        assert_eq!(set.len(), 3);
    }
}
