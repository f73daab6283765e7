pub mod executable;
pub mod registry;

pub mod del;
pub mod get;
pub mod ping;
pub mod set;

pub mod lindex;
pub mod llen;
pub mod lpop;
pub mod lpush;
pub mod lrange;
pub mod rpop;
pub mod rpush;

pub mod hdel;
pub mod hexists;
pub mod hget;
pub mod hgetall;
pub mod hlen;
pub mod hset;

pub mod sadd;
pub mod scard;
pub mod sdiff;
pub mod sinter;
pub mod sismember;
pub mod smembers;
pub mod srem;
pub mod sunion;

pub mod zadd;
pub mod zcard;
pub mod zrange;
pub mod zrank;
pub mod zrem;
pub mod zscore;

use std::{str, vec};

use bytes::Bytes;
use thiserror::Error as ThisError;

use crate::frame::Frame;
use crate::store::{Store, WrongType};

pub use executable::Executable;
pub use registry::Registry;

use del::Del;
use get::Get;
use hdel::HDel;
use hexists::HExists;
use hget::HGet;
use hgetall::HGetAll;
use hlen::HLen;
use hset::HSet;
use lindex::LIndex;
use llen::LLen;
use lpop::LPop;
use lpush::LPush;
use lrange::LRange;
use ping::Ping;
use rpop::RPop;
use rpush::RPush;
use sadd::SAdd;
use scard::SCard;
use sdiff::SDiff;
use set::Set;
use sinter::SInter;
use sismember::SIsMember;
use smembers::SMembers;
use srem::SRem;
use sunion::SUnion;
use zadd::ZAdd;
use zcard::ZCard;
use zrange::ZRange;
use zrank::ZRank;
use zrem::ZRem;
use zscore::ZScore;

#[derive(Debug, PartialEq)]
pub enum Command {
    Ping(Ping),
    Set(Set),
    Get(Get),
    Del(Del),
    LPush(LPush),
    RPush(RPush),
    LPop(LPop),
    RPop(RPop),
    LLen(LLen),
    LIndex(LIndex),
    LRange(LRange),
    HSet(HSet),
    HGet(HGet),
    HDel(HDel),
    HGetAll(HGetAll),
    HExists(HExists),
    HLen(HLen),
    SAdd(SAdd),
    SRem(SRem),
    SIsMember(SIsMember),
    SMembers(SMembers),
    SCard(SCard),
    SInter(SInter),
    SUnion(SUnion),
    SDiff(SDiff),
    ZAdd(ZAdd),
    ZRem(ZRem),
    ZRange(ZRange),
    ZCard(ZCard),
    ZScore(ZScore),
    ZRank(ZRank),
}

impl Executable for Command {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        match self {
            Command::Ping(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::Del(cmd) => cmd.exec(store),
            Command::LPush(cmd) => cmd.exec(store),
            Command::RPush(cmd) => cmd.exec(store),
            Command::LPop(cmd) => cmd.exec(store),
            Command::RPop(cmd) => cmd.exec(store),
            Command::LLen(cmd) => cmd.exec(store),
            Command::LIndex(cmd) => cmd.exec(store),
            Command::LRange(cmd) => cmd.exec(store),
            Command::HSet(cmd) => cmd.exec(store),
            Command::HGet(cmd) => cmd.exec(store),
            Command::HDel(cmd) => cmd.exec(store),
            Command::HGetAll(cmd) => cmd.exec(store),
            Command::HExists(cmd) => cmd.exec(store),
            Command::HLen(cmd) => cmd.exec(store),
            Command::SAdd(cmd) => cmd.exec(store),
            Command::SRem(cmd) => cmd.exec(store),
            Command::SIsMember(cmd) => cmd.exec(store),
            Command::SMembers(cmd) => cmd.exec(store),
            Command::SCard(cmd) => cmd.exec(store),
            Command::SInter(cmd) => cmd.exec(store),
            Command::SUnion(cmd) => cmd.exec(store),
            Command::SDiff(cmd) => cmd.exec(store),
            Command::ZAdd(cmd) => cmd.exec(store),
            Command::ZRem(cmd) => cmd.exec(store),
            Command::ZRange(cmd) => cmd.exec(store),
            Command::ZCard(cmd) => cmd.exec(store),
            Command::ZScore(cmd) => cmd.exec(store),
            Command::ZRank(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Frame> for Command {
    type Error = CommandError;

    /// Clients send commands as RESP arrays of bulk strings.
    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        let parts = match frame {
            Frame::Array(parts) => parts,
            frame => {
                return Err(CommandError::Protocol(format!(
                    "expected array, got {}",
                    frame
                )))
            }
        };
        Registry::new().parse(parts)
    }
}

/// Pulls typed arguments out of a command array. The parser knows which
/// command it is feeding so an exhausted argument list maps straight to
/// that command's arity error.
pub struct CommandParser {
    name: String,
    parts: vec::IntoIter<Bytes>,
}

impl CommandParser {
    pub fn new(name: String, args: Vec<Bytes>) -> CommandParser {
        CommandParser {
            name,
            parts: args.into_iter(),
        }
    }

    fn wrong_arity(&self) -> CommandError {
        CommandError::WrongArity(self.name.clone())
    }

    pub fn next_bytes(&mut self) -> Result<Bytes, CommandError> {
        match self.parts.next() {
            Some(bytes) => Ok(bytes),
            None => Err(self.wrong_arity()),
        }
    }

    pub fn next_string(&mut self) -> Result<String, CommandError> {
        let bytes = self.next_bytes()?;
        str::from_utf8(&bytes)
            .map(|s| s.to_string())
            .map_err(|_| CommandError::InvalidUtf8)
    }

    pub fn next_i64(&mut self) -> Result<i64, CommandError> {
        let repr = self.next_string()?;
        repr.parse().map_err(|_| CommandError::NotInteger)
    }

    pub fn next_f64(&mut self) -> Result<f64, CommandError> {
        let repr = self.next_string()?;
        let value: f64 = repr.parse().map_err(|_| CommandError::NotFloat)?;
        if value.is_nan() {
            return Err(CommandError::NotFloat);
        }
        Ok(value)
    }

    /// Rejects trailing arguments the command does not take.
    pub fn finish(&mut self) -> Result<(), CommandError> {
        match self.parts.next() {
            Some(_) => Err(self.wrong_arity()),
            None => Ok(()),
        }
    }
}

/// Command failures, `Display`ed verbatim onto the wire as error replies.
#[derive(Debug, ThisError, PartialEq)]
pub enum CommandError {
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),
    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),
    #[error("ERR value is not an integer or out of range")]
    NotInteger,
    #[error("ERR value is not a valid float")]
    NotFloat,
    #[error("ERR Error score format")]
    ScoreFormat,
    #[error("ERR Error rank format")]
    RankFormat,
    #[error("ERR Unknown flag")]
    UnknownFlag,
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,
    #[error("ERR invalid UTF-8 string")]
    InvalidUtf8,
    #[error("ERR protocol error; {0}")]
    Protocol(String),
}

impl From<WrongType> for CommandError {
    fn from(_: WrongType) -> Self {
        CommandError::WrongType
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command_name_case_insensitively() {
        for name in ["GET", "get", "GeT"] {
            let frame = Frame::Array(vec![
                Frame::Bulk(Bytes::from(name)),
                Frame::Bulk(Bytes::from("foo")),
            ]);
            let command = Command::try_from(frame).unwrap();
            assert_eq!(
                command,
                Command::Get(Get {
                    key: String::from("foo")
                })
            );
        }
    }

    #[test]
    fn parse_accepts_simple_string_parts() {
        let frame = Frame::Array(vec![
            Frame::Simple(String::from("SET")),
            Frame::Simple(String::from("foo")),
            Frame::Bulk(Bytes::from("baz")),
        ]);
        let command = Command::try_from(frame).unwrap();
        assert_eq!(
            command,
            Command::Set(Set {
                key: String::from("foo"),
                value: Bytes::from("baz"),
            })
        );
    }

    #[test]
    fn parse_rejects_non_array_frames() {
        let err = Command::try_from(Frame::Simple("GET".into())).unwrap_err();
        assert!(matches!(err, CommandError::Protocol(_)));
    }

    #[test]
    fn parse_rejects_non_string_parts() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("GET")),
            Frame::Integer(42),
        ]);
        let err = Command::try_from(frame).unwrap_err();
        assert!(matches!(err, CommandError::Protocol(_)));
    }

    #[test]
    fn unknown_command_carries_the_lowercased_name() {
        let frame = Frame::Array(vec![Frame::Bulk(Bytes::from("FLUSHEVERYTHING"))]);
        let err = Command::try_from(frame).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ERR unknown command 'flusheverything'"
        );
    }

    #[test]
    fn error_strings_match_the_wire_contract() {
        assert_eq!(
            CommandError::WrongArity("get".into()).to_string(),
            "ERR wrong number of arguments for 'get' command"
        );
        assert_eq!(
            CommandError::NotInteger.to_string(),
            "ERR value is not an integer or out of range"
        );
        assert_eq!(
            CommandError::NotFloat.to_string(),
            "ERR value is not a valid float"
        );
        assert_eq!(
            CommandError::WrongType.to_string(),
            "WRONGTYPE Operation against a key holding the wrong kind of value"
        );
        assert_eq!(CommandError::ScoreFormat.to_string(), "ERR Error score format");
        assert_eq!(CommandError::RankFormat.to_string(), "ERR Error rank format");
        assert_eq!(CommandError::UnknownFlag.to_string(), "ERR Unknown flag");
    }
}
