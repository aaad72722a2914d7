//! Plain-text tables for `husk context list` and `husk tag list`.

const MIN_COLUMN_WIDTH: usize = 12;

/// Render `rows` under `headers` as left-aligned columns.
///
/// Each column is as wide as its longest cell plus one space, but never
/// narrower than twelve characters. A dashed rule the full table width
/// separates the header from the rows.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let longest = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            MIN_COLUMN_WIDTH.max(longest + 1)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&render_line(headers.iter().copied(), &widths));
    out.push_str(&"-".repeat(widths.iter().sum()));
    out.push('\n');
    for row in rows {
        out.push_str(&render_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line: String = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

/// Display form for an optional path column.
pub fn display_path(path: Option<&str>) -> String {
    path.unwrap_or("-").to_string()
}
