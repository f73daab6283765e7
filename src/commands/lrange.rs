use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::frame::Frame;
use crate::store::Store;

/// Returns the inclusive slice `[start, stop]` of the list. Negative
/// indexes count from the tail; out-of-range windows clamp or come back
/// empty.
#[derive(Debug, PartialEq)]
pub struct LRange {
    pub key: String,
    pub start: i64,
    pub stop: i64,
}

impl Executable for LRange {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        match store.list(&self.key)? {
            Some(list) => Ok(Frame::bulk_array(list.range(self.start, self.stop))),
            None => Ok(Frame::Array(vec![])),
        }
    }
}

impl TryFrom<&mut CommandParser> for LRange {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let start = parser.next_i64()?;
        let stop = parser.next_i64()?;
        parser.finish()?;
        Ok(Self { key, start, stop })
    }
}
