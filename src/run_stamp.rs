use chrono::{DateTime, SecondsFormat, Utc};

pub const REPORT_PREFIX: &str = "aws-inventory";

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RunStamp {
    pub generated_at: DateTime<Utc>,
}

impl From<DateTime<Utc>> for RunStamp {
    fn from(date_time: DateTime<Utc>) -> Self {
        RunStamp {
            generated_at: date_time,
        }
    }
}

impl RunStamp {
    pub fn now() -> Self {
        RunStamp::from(Utc::now())
    }

    /// Shared stem of every artifact written by this run.
    pub fn file_stem(&self) -> String {
        format!(
            "{}-{}",
            REPORT_PREFIX,
            self.generated_at.format("%Y%m%d-%H%M%S")
        )
    }

    pub fn raw_file_name(&self) -> String {
        format!("{}.txt", self.file_stem())
    }

    pub fn pretty_file_name(&self) -> String {
        format!("{}.pretty.txt", self.file_stem())
    }

    pub fn spreadsheet_file_name(&self) -> String {
        format!("{}.tsv", self.file_stem())
    }

    pub fn timestamp(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
