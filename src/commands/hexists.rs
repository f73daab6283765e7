use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

#[derive(Debug, PartialEq)]
pub struct HExists {
    pub key: String,
    pub field: String,
}

impl Executable for HExists {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let exists = match store.hash(&self.key)? {
            Some(hash) => hash.contains(&self.field),
            None => false,
        };
        Ok(Frame::Integer(i64::from(exists)))
    }
}

impl TryFrom<&mut CommandParser> for HExists {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let field = parser.next_string()?;
        parser.finish()?;
        Ok(Self { key, field })
    }
}
