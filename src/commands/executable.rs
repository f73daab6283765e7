use crate::commands::CommandError;
use crate::frame::Frame;
use crate::store::Store;

/// Every command executes against the shared store and produces exactly one
/// reply frame; failures surface as typed errors the dispatcher turns into
/// error replies, never as panics or closed connections.
pub trait Executable {
    fn exec(self, store: Store) -> Result<Frame, CommandError>;
}
