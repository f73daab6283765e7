use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::ds::zset::{format_score, Border};
use crate::frame::Frame;
use crate::store::Store;

/// Range query over a sorted set. By rank (the default) the borders are
/// integer indexes and the reply holds members only; with the BYSCORE flag
/// the borders are scores, `(` marks an exclusive border, and the reply
/// alternates member then formatted score.
#[derive(Debug, PartialEq)]
pub struct ZRange {
    pub key: String,
    pub start: Border,
    pub stop: Border,
    pub by_score: bool,
}

impl Executable for ZRange {
    fn exec(self, store: Store) -> Result<Frame, CommandError> {
        let zset = match store.zset(&self.key)? {
            Some(zset) => zset,
            None => return Ok(Frame::Array(vec![])),
        };

        let elements = zset.range(self.start, self.stop, self.by_score);
        let mut values = Vec::with_capacity(elements.len() * 2);
        for element in elements {
            values.push(Bytes::from(element.member));
            if self.by_score {
                values.push(Bytes::from(format_score(element.score)));
            }
        }
        Ok(Frame::bulk_array(values))
    }
}

impl TryFrom<&mut CommandParser> for ZRange {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let start_raw = parser.next_bytes()?;
        let stop_raw = parser.next_bytes()?;

        let by_score = match parser.next_string() {
            Ok(flag) => {
                parser.finish()?;
                if flag != "BYSCORE" {
                    return Err(CommandError::UnknownFlag);
                }
                true
            }
            Err(CommandError::WrongArity(_)) => false,
            Err(err) => return Err(err),
        };

        let (start, stop) = if by_score {
            (
                Border::parse_score(&start_raw).ok_or(CommandError::ScoreFormat)?,
                Border::parse_score(&stop_raw).ok_or(CommandError::ScoreFormat)?,
            )
        } else {
            (
                Border::parse_rank(&start_raw).ok_or(CommandError::RankFormat)?,
                Border::parse_rank(&stop_raw).ok_or(CommandError::RankFormat)?,
            )
        };

        Ok(Self {
            key,
            start,
            stop,
            by_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    fn zrange(parts: &[&str]) -> Result<Command, CommandError> {
        let mut frames = vec![Frame::Bulk(Bytes::from("ZRANGE"))];
        frames.extend(parts.iter().map(|p| Frame::Bulk(Bytes::from(p.to_string()))));
        Command::try_from(Frame::Array(frames))
    }

    fn seeded() -> Store {
        let store = Store::new();
        let zset = store.zset_or_create("myzset").unwrap();
        zset.add("one", 1.0);
        zset.add("two", 2.0);
        zset.add("three", 3.0);
        store
    }

    #[test]
    fn by_rank_returns_members_only() {
        let store = seeded();
        let result = zrange(&["myzset", "0", "-1"]).unwrap().exec(store).unwrap();
        assert_eq!(
            result,
            Frame::bulk_array(vec![
                Bytes::from("one"),
                Bytes::from("two"),
                Bytes::from("three"),
            ])
        );
    }

    #[test]
    fn by_score_returns_member_score_pairs() {
        let store = seeded();
        let result = zrange(&["myzset", "(1", "3", "BYSCORE"])
            .unwrap()
            .exec(store)
            .unwrap();
        assert_eq!(
            result,
            Frame::bulk_array(vec![
                Bytes::from("two"),
                Bytes::from("2"),
                Bytes::from("three"),
                Bytes::from("3"),
            ])
        );
    }

    #[test]
    fn missing_key_is_an_empty_array() {
        let store = Store::new();
        let result = zrange(&["nope", "0", "-1"]).unwrap().exec(store.clone()).unwrap();
        assert_eq!(result, Frame::Array(vec![]));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = zrange(&["myzset", "0", "-1", "BYLEX"]).unwrap_err();
        assert_eq!(err, CommandError::UnknownFlag);
    }

    #[test]
    fn flag_comparison_is_case_sensitive() {
        let err = zrange(&["myzset", "0", "-1", "byscore"]).unwrap_err();
        assert_eq!(err, CommandError::UnknownFlag);
    }

    #[test]
    fn malformed_score_border() {
        let err = zrange(&["myzset", "(abc", "3", "BYSCORE"]).unwrap_err();
        assert_eq!(err, CommandError::ScoreFormat);
    }

    #[test]
    fn malformed_rank_border() {
        let err = zrange(&["myzset", "1.5", "3"]).unwrap_err();
        assert_eq!(err, CommandError::RankFormat);
    }
}
