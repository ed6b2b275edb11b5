use aoi_system::EntityId;
use anyhow::{anyhow, bail, Context, Error};
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// 玩家指令
///
/// 文字格式 (以空白分隔):
/// - `enter <id> <name> <x> <y>`
/// - `move <id> <x> <y>`
/// - `leave <id>`
/// - `query <id>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    Enter { id: EntityId, name: String, x: u32, y: u32 },
    Move { id: EntityId, x: u32, y: u32 },
    Leave { id: EntityId },
    Query { id: EntityId },
}

impl PlayerCommand {
    pub fn id(&self) -> EntityId {
        match self {
            PlayerCommand::Enter { id, .. } => *id,
            PlayerCommand::Move { id, .. } => *id,
            PlayerCommand::Leave { id } => *id,
            PlayerCommand::Query { id } => *id,
        }
    }
}

fn field<T: FromStr>(parts: &[&str], i: usize, what: &str) -> Result<T, Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = parts.get(i).ok_or_else(|| anyhow!("missing {}", what))?;
    raw.parse::<T>().with_context(|| format!("bad {} `{}`", what, raw))
}

impl FromStr for PlayerCommand {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let verb = match parts.first() {
            Some(v) => v.to_ascii_lowercase(),
            None => bail!("empty command"),
        };
        let expected = match verb.as_str() {
            "enter" => 5,
            "move" => 4,
            "leave" | "query" => 2,
            other => bail!("unknown command `{}`", other),
        };
        if parts.len() != expected {
            bail!("`{}` takes {} arguments, got {}", verb, expected - 1, parts.len() - 1);
        }
        let id = field(&parts, 1, "id")?;
        Ok(match verb.as_str() {
            "enter" => PlayerCommand::Enter {
                id,
                name: parts[2].to_owned(),
                x: field(&parts, 3, "x")?,
                y: field(&parts, 4, "y")?,
            },
            "move" => PlayerCommand::Move {
                id,
                x: field(&parts, 2, "x")?,
                y: field(&parts, 3, "y")?,
            },
            "leave" => PlayerCommand::Leave { id },
            _ => PlayerCommand::Query { id },
        })
    }
}

/// 通知種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// 進入地圖時遇見
    Meet,
    /// 可見範圍內移動
    Move,
    /// 移出視野
    Leave,
    /// 移入視野
    Enter,
    /// 離開地圖
    Depart,
}

/// 交給傳輸層的 AOI 通知
#[derive(Clone, Debug)]
pub struct AoiNotice {
    pub kind: NoticeKind,
    pub subject: EntityId,
    pub subject_pos: (u32, u32),
    pub other: EntityId,
    pub time: NaiveDateTime,
}

impl AoiNotice {
    pub fn new(kind: NoticeKind, subject: &aoi_system::Entity, other: &aoi_system::Entity) -> Self {
        Self {
            kind,
            subject: subject.id,
            subject_pos: subject.position(),
            other: other.id,
            time: Local::now().naive_local(),
        }
    }
}

impl fmt::Display for AoiNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.kind {
            NoticeKind::Meet => "遇見",
            NoticeKind::Move => "移動視野，通知",
            NoticeKind::Leave => "離開視野，通知",
            NoticeKind::Enter => "進入視野，通知",
            NoticeKind::Depart => "離開，通知",
        };
        write!(
            f,
            "[{}] 玩家[{}]({},{}){}玩家[{}]",
            self.time.format("%H:%M:%S%.3f"),
            self.subject,
            self.subject_pos.0,
            self.subject_pos.1,
            action,
            self.other
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "enter 1 pp 49 49".parse::<PlayerCommand>().unwrap(),
            PlayerCommand::Enter { id: 1, name: "pp".into(), x: 49, y: 49 }
        );
        assert_eq!(
            "  MOVE 2 9 9 ".parse::<PlayerCommand>().unwrap(),
            PlayerCommand::Move { id: 2, x: 9, y: 9 }
        );
        assert_eq!("leave 3".parse::<PlayerCommand>().unwrap(), PlayerCommand::Leave { id: 3 });
        assert_eq!("query 4".parse::<PlayerCommand>().unwrap().id(), 4);
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<PlayerCommand>().is_err());
        assert!("jump 1".parse::<PlayerCommand>().is_err());
        assert!("move 1 2".parse::<PlayerCommand>().is_err());
        assert!("move 1 -2 3".parse::<PlayerCommand>().is_err());
        assert!("leave abc".parse::<PlayerCommand>().is_err());
    }

    #[test]
    fn test_notice_display() {
        let a = aoi_system::Entity::new(1, "pp", 3, 4);
        let b = aoi_system::Entity::new(2, "wl", 5, 6);
        let notice = AoiNotice::new(NoticeKind::Enter, &a, &b);
        assert_eq!(notice.subject_pos, (3, 4));
        assert!(notice.to_string().ends_with("玩家[1](3,4)進入視野，通知玩家[2]"));
    }
}
