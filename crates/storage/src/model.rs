use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Uploaded,
    Downloaded,
    Deleted,
}

impl FileAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileAction::Uploaded => "uploaded",
            FileAction::Downloaded => "downloaded",
            FileAction::Deleted => "deleted",
        }
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploaded" => Ok(FileAction::Uploaded),
            "downloaded" => Ok(FileAction::Downloaded),
            "deleted" => Ok(FileAction::Deleted),
            other => Err(format!("unknown file action: {other}")),
        }
    }
}

/// One entry of the file audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLog {
    pub id: i64,
    pub filename: String,
    pub action: FileAction,
    pub date: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct FileLogRow {
    pub id: i64,
    pub filename: String,
    pub action: String,
    pub date: DateTime<Utc>,
}

impl TryFrom<FileLogRow> for FileLog {
    type Error = sqlx::Error;

    fn try_from(row: FileLogRow) -> Result<Self, Self::Error> {
        let action = row
            .action
            .parse()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?;

        Ok(FileLog {
            id: row.id,
            filename: row.filename,
            action,
            date: row.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_text_form() {
        for action in [FileAction::Uploaded, FileAction::Downloaded, FileAction::Deleted] {
            assert_eq!(action.as_str().parse::<FileAction>().unwrap(), action);
        }
        assert!("renamed".parse::<FileAction>().is_err());
    }
}
