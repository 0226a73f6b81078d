//! Plain aligned tables for terminal output.

const MIN_COLUMN: usize = 5;
const GAP: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render `rows` under `headers`. Numeric cells are right-aligned; columns
/// shrink (widest first) until the table fits `max_width`.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths = column_widths(headers, rows);
    if let Some(max_width) = options.max_width {
        shrink_to_fit(&mut widths, headers, max_width);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&clip(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join(GAP);
    let rule = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(rule);
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = clip(row.get(index).map_or("-", String::as_str), *width);
                let padded = pad(&cell, *width, is_numeric(&cell));
                if options.color {
                    highlight(&cell, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(GAP);
        lines.push(line);
    }
    lines.join("\n")
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN)
        })
        .collect()
}

fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let gaps = widths.len().saturating_sub(1) * GAP.len();
    while widths.iter().sum::<usize>() + gaps > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > headers[*index].chars().count().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let Some(index) = widest else {
            return;
        };
        widths[index] -= 1;
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.'))
}

/// Color well-known status words. `padded` is `cell` after alignment.
fn highlight(cell: &str, padded: String) -> String {
    let code = match cell.to_ascii_lowercase().as_str() {
        "true" | "ready" | "do_update" => "32",
        "probing" | "idle" | "do_nothing" => "33",
        "false" | "no_data" | "transport" | "server" | "protocol" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["686800706".into(), "France".into(), "2649.10".into()],
            vec!["1".into(), "Sao Tome and Principe".into(), "-12.5".into()],
        ]
    }

    #[test]
    fn numbers_align_right_and_text_left() {
        let table = render_table(&["order", "country", "profit"], &rows(), PLAIN);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("686800706  France "));
        assert!(lines[3].starts_with("        1  Sao Tome"));
        assert!(lines[3].ends_with("  -12.5"));
    }

    #[test]
    fn wide_columns_shrink_to_fit() {
        let options = TableOptions {
            max_width: Some(30),
            color: false,
        };
        let table = render_table(&["order", "country", "profit"], &rows(), options);
        for line in table.lines() {
            assert!(line.chars().count() <= 30, "line too wide: {line}");
        }
        assert!(table.contains('…'));
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let table = render_table(&["a", "b"], &[vec!["x".into()]], PLAIN);
        assert!(table.lines().nth(2).is_some_and(|line| line.contains('-')));
    }

    #[test]
    fn status_words_are_colored_only_when_enabled() {
        let options = TableOptions {
            max_width: None,
            color: true,
        };
        let table = render_table(&["phase"], &[vec!["ready".into()]], options);
        assert!(table.contains("\u{1b}[32m"));
        let plain = render_table(&["phase"], &[vec!["ready".into()]], PLAIN);
        assert!(!plain.contains('\u{1b}'));
    }
}
