//! Line-oriented CSV splitting for the spreadsheet export.
//!
//! Deliberately simpler than RFC 4180: rows are split on newlines first, so a
//! quoted field containing a newline ends up spread over two rows. Doubled
//! quotes inside a field are left as-is.

/// Split raw export text into rows of trimmed, unquoted cells.
///
/// Every line becomes one row, including a trailing blank line (which yields
/// `[""]`).
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    text.split('\n').map(parse_line).collect()
}

/// Split one line on commas that sit outside a quoted section.
///
/// A comma separates fields only when an even number of `"` follows it on the
/// same line. For lines with balanced quotes this is the same as an even
/// count before it; an unbalanced line keeps its leading commas together.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut remaining = line.matches('"').count();
    let mut start = 0;

    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => remaining -= 1,
            ',' if remaining % 2 == 0 => {
                cells.push(clean_cell(&line[start..idx]));
                start = idx + 1;
            }
            _ => {}
        }
    }
    cells.push(clean_cell(&line[start..]));
    cells
}

/// Drop one surrounding quote on each side, then trim whitespace.
fn clean_cell(raw: &str) -> String {
    let cell = raw.strip_prefix('"').unwrap_or(raw);
    let cell = cell.strip_suffix('"').unwrap_or(cell);
    cell.trim().to_string()
}
