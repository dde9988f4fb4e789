use crate::report::Report;

const SEPARATOR_WIDTH: usize = 80;
const COLUMN_GAP: usize = 2;

/// Header lines, then per section a decorated title, a column header, the
/// rows and a blank line. Cells are tab separated.
pub fn render_raw(report: &Report) -> String {
    let header = report.header();
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();

    out.push_str("AWS RESOURCE INVENTORY\n");
    push_row(&mut out, &["Generated", header.stamp.timestamp().as_str()]);
    push_row(&mut out, &["OwnerFilter", header.owner_filter.join(",").as_str()]);
    push_row(&mut out, &["CallerIdentity", header.caller_identity.as_str()]);
    out.push('\n');

    for section in report.sections() {
        out.push_str(&separator);
        out.push('\n');
        out.push_str(section.title);
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');
        push_row(&mut out, section.columns);
        for row in &section.rows {
            push_row(&mut out, row.as_slice());
        }
        out.push('\n');
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S]) {
    let line = cells
        .iter()
        .map(|cell| cell.as_ref())
        .collect::<Vec<_>>()
        .join("\t");
    out.push_str(&line);
    out.push('\n');
}

/// Aligns every run of consecutive tab-separated lines on the widest cell of
/// each column. Lines without tabs are copied as they are.
pub fn render_pretty(raw: &str) -> String {
    let mut out = String::new();
    let mut block: Vec<Vec<&str>> = Vec::new();
    for line in raw.lines() {
        if line.contains('\t') {
            block.push(line.split('\t').collect());
            continue;
        }
        flush_block(&mut out, &mut block);
        out.push_str(line);
        out.push('\n');
    }
    flush_block(&mut out, &mut block);
    out
}

fn flush_block(out: &mut String, block: &mut Vec<Vec<&str>>) {
    let mut widths: Vec<usize> = Vec::new();
    for cells in block.iter() {
        for (index, cell) in cells.iter().enumerate() {
            let width = cell.chars().count();
            match widths.get_mut(index) {
                Some(current) => *current = (*current).max(width),
                None => widths.push(width),
            }
        }
    }

    for cells in block.drain(..) {
        let mut line = String::new();
        for (index, cell) in cells.iter().enumerate() {
            line.push_str(cell);
            if index + 1 < cells.len() {
                let padding = widths[index] - cell.chars().count() + COLUMN_GAP;
                line.push_str(&" ".repeat(padding));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

/// The raw report without decoration: separator-only lines and blank lines
/// are dropped, everything else is kept verbatim.
pub fn render_spreadsheet(raw: &str) -> String {
    let mut out = String::new();
    for line in raw.lines() {
        if line.trim().is_empty() || is_separator(line) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn is_separator(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c == '=' || c == '-')
}

#[cfg(test)]
mod tests {
    use crate::record::ResourceRecord;
    use crate::render::{is_separator, render_pretty, render_raw, render_spreadsheet};
    use crate::report::{Report, ReportHeader, Section};
    use crate::run_stamp::RunStamp;
    use chrono::{DateTime, Utc};
    use std::str::FromStr;

    struct Two(&'static str, &'static str);

    impl ResourceRecord for Two {
        fn columns() -> &'static [&'static str] {
            &["Name", "Created"]
        }

        fn fields(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    fn section(title: &'static str, rows: Vec<Vec<&str>>) -> Section {
        Section {
            title,
            columns: &["A", "B"],
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(String::from).collect())
                .collect(),
            failed_call: None,
        }
    }

    fn report() -> Report {
        let generated_at = DateTime::<Utc>::from_str("2020-12-01T15:04:05.0+00:00").unwrap();
        Report::new(
            ReportHeader {
                stamp: RunStamp::from(generated_at),
                owner_filter: vec!["111111111111".to_string()],
                caller_identity: "NA".to_string(),
            },
            section("EC2 INSTANCES", vec![vec!["us-east-1", "i-1"]]),
            Section::from_records("S3 BUCKETS", &[Two("logs", "-")]),
            section("LAMBDA FUNCTIONS", vec![]),
            section("IAM USERS", vec![vec!["alice", "-"]]),
        )
    }

    #[test]
    fn test_render_raw() {
        let separator = "=".repeat(80);
        let expected = format!(
            "AWS RESOURCE INVENTORY\n\
             Generated\t2020-12-01T15:04:05Z\n\
             OwnerFilter\t111111111111\n\
             CallerIdentity\tNA\n\
             \n\
             {sep}\nEC2 INSTANCES\n{sep}\nA\tB\nus-east-1\ti-1\n\n\
             {sep}\nS3 BUCKETS\n{sep}\nName\tCreated\nlogs\t-\n\n\
             {sep}\nLAMBDA FUNCTIONS\n{sep}\nA\tB\n\n\
             {sep}\nIAM USERS\n{sep}\nA\tB\nalice\t-\n\n",
            sep = separator
        );
        assert_eq!(render_raw(&report()), expected);
    }

    #[test]
    fn test_sections_keep_fixed_order() {
        let raw = render_raw(&report());
        let positions: Vec<usize> = ["EC2 INSTANCES", "S3 BUCKETS", "LAMBDA FUNCTIONS", "IAM USERS"]
            .iter()
            .map(|title| raw.find(title).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_render_pretty_aligns_blocks() {
        let raw = "TITLE\nName\tType\tState\nweb-server\tt3.large\trunning\ndb\tr5.xlarge\tstopped\n\nx\ty\n";
        let expected = "TITLE\n\
                        Name        Type       State\n\
                        web-server  t3.large   running\n\
                        db          r5.xlarge  stopped\n\
                        \n\
                        x  y\n";
        assert_eq!(render_pretty(raw), expected);
    }

    #[test]
    fn test_render_pretty_handles_ragged_rows() {
        let raw = "Name\tCreated\nERROR\ts3:ListBuckets\tAccess Denied\n";
        let expected = "Name   Created\n\
                        ERROR  s3:ListBuckets  Access Denied\n";
        assert_eq!(render_pretty(raw), expected);
    }

    #[test]
    fn test_render_spreadsheet() {
        let raw = render_raw(&report());
        let sheet = render_spreadsheet(&raw);

        assert!(sheet.lines().all(|line| !line.trim().is_empty()));
        assert!(sheet.lines().all(|line| !is_separator(line)));
        for line in raw.lines().filter(|line| line.contains('\t')) {
            assert!(sheet.lines().any(|kept| kept == line), "missing {:?}", line);
        }
        assert!(sheet.contains("EC2 INSTANCES\nA\tB\nus-east-1\ti-1\n"));
    }

    #[test]
    fn test_placeholder_rows_are_not_separators() {
        assert!(is_separator("-----"));
        assert!(is_separator("====="));
        assert!(!is_separator("-\t-"));
        assert!(!is_separator("S3 BUCKETS"));
        assert!(!is_separator(""));
    }
}
