use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;

/// A write command exactly as the client sent it. The wire form handed to
/// an append-only-file writer is the same multi-bulk array the client
/// produced, so replaying a log is just feeding it back through the parser.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandRecord {
    args: Vec<Bytes>,
}

impl CommandRecord {
    pub fn new(args: Vec<Bytes>) -> CommandRecord {
        CommandRecord { args }
    }

    pub fn args(&self) -> &[Bytes] {
        &self.args
    }

    /// RESP multi-bulk encoding of the record.
    pub fn to_resp(&self) -> Vec<u8> {
        let mut size = 16;
        for arg in &self.args {
            size += 16 + arg.len();
        }
        let mut out = Vec::with_capacity(size);
        out.extend_from_slice(format!("*{}\r\n", self.args.len()).as_bytes());
        for arg in &self.args {
            out.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
            out.extend_from_slice(arg);
            out.extend_from_slice(b"\r\n");
        }
        out
    }
}

/// Sink for successful write commands. Hand-off is fire-and-forget; the
/// dispatcher calls it in command order, so per-connection ordering is
/// whatever ordering the dispatcher saw.
pub trait Persist: Send + Sync + 'static {
    fn record(&self, record: CommandRecord);
}

/// Drops every record. Used until an append-only-file writer exists, and
/// by tests that do not care about persistence.
pub struct NullPersistor;

impl Persist for NullPersistor {
    fn record(&self, _record: CommandRecord) {}
}

/// Queues records into an unbounded channel drained by a background task.
/// The drain currently just traces each record; an AOF writer would take
/// its place on the receiving end.
pub struct ChannelPersistor {
    tx: mpsc::UnboundedSender<CommandRecord>,
}

impl ChannelPersistor {
    /// Spawns the drain task on the current runtime and returns the sink.
    pub fn spawn() -> ChannelPersistor {
        let (tx, mut rx) = mpsc::unbounded_channel::<CommandRecord>();
        tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                debug!(bytes = record.to_resp().len(), "command record queued");
            }
        });
        ChannelPersistor { tx }
    }
}

impl Persist for ChannelPersistor {
    fn record(&self, record: CommandRecord) {
        // The drain outlives every connection; a send failure can only
        // happen during teardown, where dropping the record is fine.
        let _ = self.tx.send(record);
    }
}
