use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Adds score/member pairs and replies with the number of members newly
/// inserted; updating an existing member's score does not count. All
/// scores are validated before any mutation, so a malformed pair leaves
/// the sorted set untouched.
#[derive(Debug, PartialEq)]
pub struct ZAdd {
    pub key: String,
    pub entries: Vec<(f64, String)>,
}

impl Executable for ZAdd {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let zset = store.zset_or_create(&self.key)?;
        let mut added = 0;
        for (score, member) in self.entries {
            if zset.add(&member, score) {
                added += 1;
            }
        }
        Ok(Frame::Integer(added))
    }
}

impl TryFrom<&mut CommandParser> for ZAdd {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let mut entries = vec![];

        loop {
            match parser.next_f64() {
                Ok(score) => {
                    let member = parser.next_string()?;
                    entries.push((score, member));
                }
                Err(CommandError::WrongArity(_)) if !entries.is_empty() => break,
                Err(err) => return Err(err),
            }
        }

        Ok(Self { key, entries })
    }
}
