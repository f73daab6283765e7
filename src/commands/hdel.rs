use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Removes fields and replies with how many actually existed. A missing
/// key removes nothing and creates nothing.
#[derive(Debug, PartialEq)]
pub struct HDel {
    pub key: String,
    pub fields: Vec<String>,
}

impl Executable for HDel {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let removed = match store.hash(&self.key)? {
            Some(hash) => hash.del_fields(&self.fields),
            None => 0,
        };
        Ok(Frame::Integer(removed))
    }
}

impl TryFrom<&mut CommandParser> for HDel {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let mut fields = vec![];

        loop {
            match parser.next_string() {
                Ok(field) => fields.push(field),
                Err(CommandError::WrongArity(_)) if !fields.is_empty() => break,
                Err(err) => return Err(err),
            }
        }

        Ok(Self { key, fields })
    }
}
