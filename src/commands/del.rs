use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

// https://redis.io/commands/del
#[derive(Debug, PartialEq)]
pub struct Del {
    pub keys: Vec<String>,
}

impl Executable for Del {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let mut count = 0;
        for key in &self.keys {
            if store.del(key) {
                count += 1;
            }
        }
        Ok(Frame::Integer(count))
    }
}

impl TryFrom<&mut CommandParser> for Del {
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
