//! Cumulative flow report.
//!
//! Renders cards as semicolon separated lines: number, name and type,
//! then the trimmed status, then every trimmed "Moved to" date in the order
//! the card lists them. Fields are not quoted or escaped, and a card without
//! a status or with a different set of stage dates produces a line that does
//! not line up with the header.

use crate::models::Card;

/// Header line of the report (without the trailing newline).
pub const CFD_HEADER: &str = "Number;Name;Type;Status;Moved to Backlog on;Moved to In Analysis on;Moved to Ready for Dev on;Moved to In Dev on;Moved to Ready for Prod on;Moved to Done on";

/// Render the report for `cards`, one line per card in input order.
///
/// Every line, the header included, ends with `\n`.
pub fn cfd_report(cards: &[Card]) -> String {
    let mut out = String::with_capacity(CFD_HEADER.len() + 1 + cards.len() * 96);
    out.push_str(CFD_HEADER);
    out.push('\n');

    for card in cards {
        write_cfd_line(&mut out, card);
    }

    out
}

fn write_cfd_line(out: &mut String, card: &Card) {
    out.push_str(&card.number.to_string());
    out.push(';');
    out.push_str(&card.name);
    out.push(';');
    out.push_str(&card.card_type);

    if let Some(status) = card.status() {
        out.push(';');
        out.push_str(status.trimmed_value());
    }

    for stage in card.stage_transitions() {
        out.push(';');
        out.push_str(stage.trimmed_value());
    }

    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Property;

    fn card(number: u64, name: &str, card_type: &str, properties: Vec<Property>) -> Card {
        Card {
            number,
            name: name.to_string(),
            card_type: card_type.to_string(),
            properties,
        }
    }

    #[test]
    fn test_empty_report_is_header_only() {
        assert_eq!(cfd_report(&[]), format!("{CFD_HEADER}\n"));
    }

    #[test]
    fn test_status_then_stage_dates() {
        let cards = vec![card(
            42,
            "Fix bug",
            "Defect",
            vec![
                Property::new("Status", "  Done "),
                Property::new("Moved to Backlog on", "2021-01-01"),
                Property::new("Moved to Done on", "2021-02-01"),
            ],
        )];

        let report = cfd_report(&cards);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CFD_HEADER);
        assert_eq!(lines[1], "42;Fix bug;Defect;Done;2021-01-01;2021-02-01");
        assert!(report.ends_with('\n'));
    }

    #[test]
    fn test_status_comes_first_regardless_of_position() {
        let cards = vec![card(
            7,
            "Story",
            "Story",
            vec![
                Property::new("Moved to In Dev on", " 2021-03-05"),
                Property::new("Owner", "sam"),
                Property::new("Status", "In Dev"),
                Property::new("Moved to Backlog on", "2021-03-01 "),
            ],
        )];

        // Stage dates keep source order, not header order
        assert_eq!(
            cfd_report(&cards).lines().nth(1),
            Some("7;Story;Story;In Dev;2021-03-05;2021-03-01")
        );
    }

    #[test]
    fn test_missing_status_shortens_line() {
        let cards = vec![card(
            3,
            "No status",
            "Task",
            vec![Property::new("Moved to Backlog on", "2021-01-01")],
        )];
        assert_eq!(
            cfd_report(&cards).lines().nth(1),
            Some("3;No status;Task;2021-01-01")
        );
    }

    #[test]
    fn test_only_first_status_is_used() {
        let cards = vec![card(
            5,
            "Twice",
            "Task",
            vec![Property::new("Status", "New"), Property::new("Status", "Old")],
        )];
        assert_eq!(cfd_report(&cards).lines().nth(1), Some("5;Twice;Task;New"));
    }

    #[test]
    fn test_trims_spaces_only() {
        let cards = vec![card(
            9,
            "Tabs",
            "Task",
            vec![Property::new("Status", " \tReady\t ")],
        )];
        assert_eq!(
            cfd_report(&cards).lines().nth(1),
            Some("9;Tabs;Task;\tReady\t")
        );
    }

    #[test]
    fn test_name_is_not_escaped() {
        let cards = vec![card(1, "a;b", "Story", Vec::new())];
        assert_eq!(cfd_report(&cards), format!("{CFD_HEADER}\n1;a;b;Story\n"));
    }

    #[test]
    fn test_lines_follow_input_order() {
        let cards = vec![
            card(2, "second", "Story", Vec::new()),
            card(1, "first", "Story", Vec::new()),
        ];
        let report = cfd_report(&cards);
        let numbers: Vec<&str> = report
            .lines()
            .skip(1)
            .map(|l| l.split(';').next().unwrap())
            .collect();
        assert_eq!(numbers, vec!["2", "1"]);
    }
}
