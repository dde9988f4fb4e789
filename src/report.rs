use crate::error::InventoryError;
use crate::record::{ResourceRecord, MISSING};
use crate::run_stamp::RunStamp;

pub const ERROR_MARKER: &str = "ERROR";

/// What a single region contributed to a regional collector. A failed call
/// and an empty answer both add no rows, but are logged differently.
#[derive(Debug)]
pub enum RegionOutcome<R> {
    Rows(Vec<R>),
    NoData,
    Failed(InventoryError),
}

#[derive(Debug, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
    /// The call that failed, when the section holds an error row instead of
    /// records.
    pub failed_call: Option<&'static str>,
}

impl Section {
    pub fn from_records<R: ResourceRecord>(title: &'static str, records: &[R]) -> Self {
        Section {
            title,
            columns: R::columns(),
            rows: records.iter().map(|record| record.fields()).collect(),
            failed_call: None,
        }
    }

    /// A section whose only row reports the failed call, shaped to the
    /// section's columns.
    pub fn failed<R: ResourceRecord>(title: &'static str, error: &InventoryError) -> Self {
        let columns = R::columns();
        Section {
            title,
            columns,
            rows: vec![error_row(columns.len(), error)],
            failed_call: Some(error.call_name()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failed_call.is_some()
    }
}

// Marker, call and message; folded from the right when the section is
// narrower, padded with placeholders when it is wider.
fn error_row(width: usize, error: &InventoryError) -> Vec<String> {
    let mut cells = vec![
        ERROR_MARKER.to_string(),
        error.call_name().to_string(),
        single_line(&error.to_string()),
    ];
    let width = width.max(1);
    if cells.len() > width {
        let folded = cells.split_off(width - 1).join(": ");
        cells.push(folded);
    }
    cells.resize(width, MISSING.to_string());
    cells
}

#[derive(Debug, PartialEq)]
pub struct ReportHeader {
    pub stamp: RunStamp,
    pub owner_filter: Vec<String>,
    pub caller_identity: String,
}

#[derive(Debug, PartialEq)]
pub struct Report {
    header: ReportHeader,
    sections: Vec<Section>,
}

impl Report {
    /// Sections are kept in EC2, S3, Lambda, IAM order.
    pub fn new(
        header: ReportHeader,
        instances: Section,
        buckets: Section,
        functions: Section,
        users: Section,
    ) -> Self {
        Report {
            header,
            sections: vec![instances, buckets, functions, users],
        }
    }

    pub fn header(&self) -> &ReportHeader {
        &self.header
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

// Tabs and newlines would break the row layout.
fn single_line(message: &str) -> String {
    message
        .split(|c: char| c == '\n' || c == '\r' || c == '\t')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use crate::error::InventoryError;
    use crate::record::{ResourceRecord, MISSING};
    use crate::report::Section;

    struct Pair(&'static str, &'static str);

    impl ResourceRecord for Pair {
        fn columns() -> &'static [&'static str] {
            &["Left", "Right"]
        }

        fn fields(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    struct Quad;

    impl ResourceRecord for Quad {
        fn columns() -> &'static [&'static str] {
            &["A", "B", "C", "D"]
        }

        fn fields(&self) -> Vec<String> {
            vec![String::new(); 4]
        }
    }

    #[test]
    fn test_from_records() {
        let section = Section::from_records("PAIRS", &[Pair("a", "b"), Pair("c", "d")]);
        assert_eq!(section.columns, &["Left", "Right"]);
        assert_eq!(
            section.rows,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string()]
            ]
        );
        assert!(!section.is_failed());
    }

    #[test]
    fn test_failed_section_has_single_error_row() {
        let error = InventoryError::Config("bad\tvalue\nsecond line".to_string());
        let section = Section::failed::<Pair>("PAIRS", &error);
        assert!(section.is_failed());
        assert_eq!(section.failed_call, Some("config"));
        assert_eq!(
            section.rows,
            vec![vec![
                "ERROR".to_string(),
                "config: Invalid configuration: bad value second line".to_string()
            ]]
        );
    }

    #[test]
    fn test_error_row_is_padded_to_wide_sections() {
        let error = InventoryError::NoRegions;
        let section = Section::failed::<Quad>("QUADS", &error);
        assert_eq!(
            section.rows,
            vec![vec![
                "ERROR".to_string(),
                "ec2:DescribeRegions".to_string(),
                "Region listing returned no regions".to_string(),
                "-".to_string()
            ]]
        );
    }

    #[test]
    fn test_record_named_like_marker_is_not_a_failure() {
        let section = Section::from_records("PAIRS", &[Pair("ERROR", "b")]);
        assert!(!section.is_failed());
        assert_eq!(section.failed_call, None);
    }
}
