use std::collections::HashMap;
use std::str;

use bytes::Bytes;

use crate::commands::{Command, CommandError, CommandParser, Executable};
use crate::frame::Frame;
use crate::persist::{CommandRecord, Persist};
use crate::store::Store;

use super::del::Del;
use super::get::Get;
use super::hdel::HDel;
use super::hexists::HExists;
use super::hget::HGet;
use super::hgetall::HGetAll;
use super::hlen::HLen;
use super::hset::HSet;
use super::lindex::LIndex;
use super::llen::LLen;
use super::lpop::LPop;
use super::lpush::LPush;
use super::lrange::LRange;
use super::ping::Ping;
use super::rpop::RPop;
use super::rpush::RPush;
use super::sadd::SAdd;
use super::scard::SCard;
use super::sdiff::SDiff;
use super::set::Set;
use super::sinter::SInter;
use super::sismember::SIsMember;
use super::smembers::SMembers;
use super::srem::SRem;
use super::sunion::SUnion;
use super::zadd::ZAdd;
use super::zcard::ZCard;
use super::zrange::ZRange;
use super::zrank::ZRank;
use super::zrem::ZRem;
use super::zscore::ZScore;

type ParseFn = fn(&mut CommandParser) -> Result<Command, CommandError>;

struct CommandEntry {
    parse: ParseFn,
    /// Write commands are forwarded to the persistor after a successful
    /// execution.
    write: bool,
}

/// Case-insensitive name-to-handler table, built once at startup and shared
/// by every connection. Nothing here is process-global: tests and embedders
/// construct their own.
pub struct Registry {
    commands: HashMap<&'static str, CommandEntry>,
}

impl Registry {
    pub fn new() -> Registry {
        let mut commands: HashMap<&'static str, CommandEntry> = HashMap::new();
        {
            let mut register = |name: &'static str, write: bool, parse: ParseFn| {
                commands.insert(name, CommandEntry { parse, write });
            };

            register("ping", false, |p| Ping::try_from(p).map(Command::Ping));
            register("set", true, |p| Set::try_from(p).map(Command::Set));
            register("get", false, |p| Get::try_from(p).map(Command::Get));
            register("del", true, |p| Del::try_from(p).map(Command::Del));

            register("lpush", true, |p| LPush::try_from(p).map(Command::LPush));
            register("rpush", true, |p| RPush::try_from(p).map(Command::RPush));
            register("lpop", true, |p| LPop::try_from(p).map(Command::LPop));
            register("rpop", true, |p| RPop::try_from(p).map(Command::RPop));
            register("llen", false, |p| LLen::try_from(p).map(Command::LLen));
            register("lindex", false, |p| LIndex::try_from(p).map(Command::LIndex));
            register("lrange", false, |p| LRange::try_from(p).map(Command::LRange));

            register("hset", true, |p| HSet::try_from(p).map(Command::HSet));
            register("hget", false, |p| HGet::try_from(p).map(Command::HGet));
            register("hdel", true, |p| HDel::try_from(p).map(Command::HDel));
            register("hgetall", false, |p| HGetAll::try_from(p).map(Command::HGetAll));
            register("hexists", false, |p| HExists::try_from(p).map(Command::HExists));
            register("hlen", false, |p| HLen::try_from(p).map(Command::HLen));

            register("sadd", true, |p| SAdd::try_from(p).map(Command::SAdd));
            register("srem", true, |p| SRem::try_from(p).map(Command::SRem));
            register("sismember", false, |p| {
                SIsMember::try_from(p).map(Command::SIsMember)
            });
            register("smembers", false, |p| {
                SMembers::try_from(p).map(Command::SMembers)
            });
            register("scard", false, |p| SCard::try_from(p).map(Command::SCard));
            register("sinter", false, |p| SInter::try_from(p).map(Command::SInter));
            register("sunion", false, |p| SUnion::try_from(p).map(Command::SUnion));
            register("sdiff", false, |p| SDiff::try_from(p).map(Command::SDiff));

            register("zadd", true, |p| ZAdd::try_from(p).map(Command::ZAdd));
            register("zrem", true, |p| ZRem::try_from(p).map(Command::ZRem));
            register("zrange", false, |p| ZRange::try_from(p).map(Command::ZRange));
            register("zcard", false, |p| ZCard::try_from(p).map(Command::ZCard));
            register("zscore", false, |p| ZScore::try_from(p).map(Command::ZScore));
            register("zrank", false, |p| ZRank::try_from(p).map(Command::ZRank));
        }
        Registry { commands }
    }

    /// Parses a command array into its typed form.
    pub fn parse(&self, parts: Vec<Frame>) -> Result<Command, CommandError> {
        let raw = to_raw(parts)?;
        self.parse_raw(&raw).map(|(command, _)| command)
    }

    fn parse_raw(&self, raw: &[Bytes]) -> Result<(Command, bool), CommandError> {
        let first = raw
            .first()
            .ok_or_else(|| CommandError::Protocol("empty command".to_string()))?;
        let name = str::from_utf8(first)
            .map_err(|_| CommandError::InvalidUtf8)?
            .to_lowercase();
        let entry = self
            .commands
            .get(name.as_str())
            .ok_or_else(|| CommandError::UnknownCommand(name.clone()))?;
        let mut parser = CommandParser::new(name, raw[1..].to_vec());
        let command = (entry.parse)(&mut parser)?;
        Ok((command, entry.write))
    }

    /// Full dispatch path: parse, execute, turn failures into error replies,
    /// and hand the raw array of a successful write command to the
    /// persistor.
    pub fn dispatch(&self, parts: Vec<Frame>, store: &Store, persistor: &dyn Persist) -> Frame {
        let raw = match to_raw(parts) {
            Ok(raw) => raw,
            Err(err) => return Frame::Error(err.to_string()),
        };
        let (command, write) = match self.parse_raw(&raw) {
            Ok(parsed) => parsed,
            Err(err) => return Frame::Error(err.to_string()),
        };
        match command.exec(store.clone()) {
            Ok(reply) => {
                if write {
                    persistor.record(CommandRecord::new(raw));
                }
                reply
            }
            Err(err) => Frame::Error(err.to_string()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

/// Command arrays carry bulk strings; simple strings are tolerated because
/// hand-written clients send them.
fn to_raw(parts: Vec<Frame>) -> Result<Vec<Bytes>, CommandError> {
    let mut raw = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            Frame::Bulk(bytes) => raw.push(bytes),
            Frame::Simple(s) => raw.push(Bytes::from(s)),
            frame => {
                return Err(CommandError::Protocol(format!(
                    "expected bulk string, got {}",
                    frame
                )))
            }
        }
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::persist::NullPersistor;

    #[derive(Default)]
    struct RecordingPersistor {
        records: Mutex<Vec<CommandRecord>>,
    }

    impl Persist for RecordingPersistor {
        fn record(&self, record: CommandRecord) {
            self.records.lock().unwrap().push(record);
        }
    }

    fn array(parts: &[&str]) -> Vec<Frame> {
        parts
            .iter()
            .map(|part| Frame::Bulk(Bytes::from(part.to_string())))
            .collect()
    }

    #[test]
    fn dispatch_unknown_command() {
        let registry = Registry::new();
        let store = Store::new();
        let reply = registry.dispatch(array(&["NOSUCH", "k"]), &store, &NullPersistor);
        assert_eq!(
            reply,
            Frame::Error("ERR unknown command 'nosuch'".to_string())
        );
    }

    #[test]
    fn dispatch_empty_command() {
        let registry = Registry::new();
        let store = Store::new();
        let reply = registry.dispatch(Vec::new(), &store, &NullPersistor);
        assert!(matches!(reply, Frame::Error(_)));
    }

    #[test]
    fn write_commands_reach_the_persistor() {
        let registry = Registry::new();
        let store = Store::new();
        let persistor = RecordingPersistor::default();

        registry.dispatch(array(&["SET", "k", "v"]), &store, &persistor);
        registry.dispatch(array(&["GET", "k"]), &store, &persistor);
        registry.dispatch(array(&["DEL", "k"]), &store, &persistor);

        let records = persistor.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].args()[0], Bytes::from("SET"));
        assert_eq!(records[1].args()[0], Bytes::from("DEL"));
    }

    #[test]
    fn failed_write_commands_are_not_persisted() {
        let registry = Registry::new();
        let store = Store::new();
        let persistor = RecordingPersistor::default();

        registry.dispatch(array(&["SET", "k", "v"]), &store, &persistor);
        // LPUSH against a string key fails with WRONGTYPE.
        let reply = registry.dispatch(array(&["LPUSH", "k", "x"]), &store, &persistor);
        assert!(matches!(reply, Frame::Error(ref s) if s.starts_with("WRONGTYPE")));

        let records = persistor.records.lock().unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn arity_errors_use_the_wire_string() {
        let registry = Registry::new();
        let store = Store::new();
        let reply = registry.dispatch(array(&["GET"]), &store, &NullPersistor);
        assert_eq!(
            reply,
            Frame::Error("ERR wrong number of arguments for 'get' command".to_string())
        );
    }
}
