use std::io::{self, Write};

use clap::ValueEnum;

use crate::aggregate::StatusTally;

/// Output format of the tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Output {
    #[default]
    Table,
    Json,
}

pub fn render(tally: &StatusTally, output: Output, out: &mut impl Write) -> io::Result<()> {
    match output {
        Output::Table => render_table(tally, out),
        Output::Json => {
            serde_json::to_writer_pretty(&mut *out, tally)?;
            writeln!(out)
        }
    }
}

/// Write `STATUS COUNT` rows sorted by label, closed by a `TOTAL` row.
pub fn render_table(tally: &StatusTally, out: &mut impl Write) -> io::Result<()> {
    const HEADER: [&str; 2] = ["STATUS", "COUNT"];
    const FOOTER: &str = "TOTAL";

    let width = tally
        .statuses
        .keys()
        .map(String::len)
        .chain([HEADER[0].len(), FOOTER.len()])
        .max()
        .unwrap_or_default();

    writeln!(out, "{:<width$}   {}", HEADER[0], HEADER[1])?;
    for (status, count) in &tally.statuses {
        writeln!(out, "{status:<width$}   {count}")?;
    }
    writeln!(out, "{FOOTER:<width$}   {}", tally.total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally() -> StatusTally {
        let mut tally = StatusTally::default();
        tally.statuses.insert("Running".into(), 2);
        tally.statuses.insert("Completed".into(), 1);
        tally.statuses.insert("Failed".into(), 1);
        tally.total = 4;
        tally
    }

    fn rendered(tally: &StatusTally, output: Output) -> String {
        let mut buf = Vec::new();
        render(tally, output, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn table_rows_are_sorted_with_total_footer() {
        let expected = "\
STATUS      COUNT
Completed   1
Failed      1
Running     2
TOTAL       4
";
        assert_eq!(rendered(&tally(), Output::Table), expected);
    }

    #[test]
    fn empty_table_still_has_header_and_total() {
        let expected = "\
STATUS   COUNT
TOTAL    0
";
        assert_eq!(rendered(&StatusTally::default(), Output::Table), expected);
    }

    #[test]
    fn json_output() {
        let value: serde_json::Value =
            serde_json::from_str(&rendered(&tally(), Output::Json)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "statuses": { "Completed": 1, "Failed": 1, "Running": 2 },
                "total": 4
            })
        );
    }
}
