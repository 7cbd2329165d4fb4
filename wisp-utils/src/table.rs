/// Pad rows of cells into aligned lines for a monospace code block.
///
/// Every column is left-aligned to its widest cell (counted in chars) and
/// cells are joined with `join`. Trailing whitespace is trimmed per line.
pub fn pad_code_block_from_rows<S: AsRef<str>>(rows: &[Vec<S>], join: &str) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0_usize; columns];

    for row in rows {
        for (column, cell) in row.iter().enumerate() {
            widths[column] = widths[column].max(cell.as_ref().chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            let last = row.len().saturating_sub(1);
            let line = row
                .iter()
                .enumerate()
                .map(|(column, cell)| {
                    let cell = cell.as_ref();
                    if column == last {
                        return cell.to_owned();
                    }
                    let padding = widths[column] - cell.chars().count();
                    format!("{}{}", cell, " ".repeat(padding))
                })
                .collect::<Vec<_>>()
                .join(join);
            line.trim_end().to_owned()
        })
        .collect()
}

/// Length in chars of the longest line.
pub fn widest_line(lines: &[String]) -> usize {
    lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}

/// Wrap `body` in a fenced code block tagged with `language`.
pub fn code_block(language: &str, body: &str) -> String {
    format!("```{}\n{}\n```", language, body)
}
