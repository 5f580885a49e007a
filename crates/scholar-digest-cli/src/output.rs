use std::io::Write;

use scholar_digest_mail::{Message, normalize_and_split};

/// Prints one `alert type | source` line per parseable subject, sorted so the
/// output pipes cleanly through `uniq -c | sort -dr`. Unparseable subjects are
/// logged and skipped.
pub fn print_subjects(w: &mut dyn Write, msgs: &[Message]) -> std::io::Result<()> {
    let mut lines: Vec<String> = Vec::new();
    for m in msgs {
        let subj = m.subject();
        match normalize_and_split(subj) {
            Some((source, alert_type)) => lines.push(format!("{alert_type:<22} | {source}")),
            None => tracing::warn!(subject = %subj, "subject matches no known alert pattern"),
        }
    }
    lines.sort();
    for line in &lines {
        writeln!(w, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subjects_are_normalized_and_sorted() {
        let msgs = vec![
            Message::with_html("m1", "\"b query\" - new results", ""),
            Message::with_html("m2", "\"a query\" - new citations", ""),
            Message::with_html("m3", "not an alert", ""),
        ];

        let mut buf = Vec::new();
        print_subjects(&mut buf, &msgs).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("new citations"));
        assert!(lines[0].ends_with("| \"a query\""));
        assert!(lines[1].starts_with("new results"));
    }
}
