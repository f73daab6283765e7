use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Replies `+PONG`, or echoes the single optional argument as a status.
///
/// Ref: <https://redis.io/docs/latest/commands/ping>
#[derive(Debug, PartialEq)]
pub struct Ping {
    pub message: Option<String>,
}

impl Executable for Ping {
    fn exec(self, _store: Store) -> Result<Frame, CommandError> {
        let res = match self.message {
            Some(message) => Frame::Simple(message),
            None => Frame::Simple("PONG".to_string()),
        };
        Ok(res)
    }
}

impl TryFrom<&mut CommandParser> for Ping {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let message = match parser.next_string() {
            Ok(message) => Some(message),
            Err(CommandError::WrongArity(_)) => None,
            Err(err) => return Err(err),
        };
        parser.finish()?;

        Ok(Self { message })
    }
}
