//! Bordered text tables with multi-line cells.
//!
//! ```text
//! +----------+-------+
//! | PROPERTY | VALUE |
//! +----------+-------+
//! | Tag      | x     |
//! +----------+-------+
//! ```
//!
//! Headers are upper-cased and centred; cells are left-aligned and a rule is
//! drawn after every row. Cells may span several lines.

/// A table under construction.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|h| h.as_ref().to_uppercase())
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render empty; extra cells are dropped.
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        self
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let rule = rule(&widths);

        let mut out = String::new();
        out.push_str(&rule);
        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| centre(h, w))
            .collect();
        push_line(&mut out, &header);
        out.push_str(&rule);

        for row in &self.rows {
            let lines: Vec<Vec<&str>> = row.iter().map(|c| c.lines().collect()).collect();
            let height = lines.iter().map(Vec::len).max().unwrap_or(0).max(1);
            for i in 0..height {
                let cells: Vec<String> = lines
                    .iter()
                    .zip(&widths)
                    .map(|(cell, &w)| pad_right(cell.get(i).copied().unwrap_or(""), w))
                    .collect();
                push_line(&mut out, &cells);
            }
            out.push_str(&rule);
        }
        out
    }

    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .flat_map(|row| row[i].lines())
                    .map(width)
                    .chain(std::iter::once(width(h)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn rule(widths: &[usize]) -> String {
    let mut out = String::from("+");
    for &w in widths {
        out.push_str(&"-".repeat(w + 2));
        out.push('+');
    }
    out.push('\n');
    out
}

fn push_line(out: &mut String, cells: &[String]) {
    out.push('|');
    for cell in cells {
        out.push(' ');
        out.push_str(cell);
        out.push_str(" |");
    }
    out.push('\n');
}

fn pad_right(s: &str, w: usize) -> String {
    format!("{s}{}", " ".repeat(w.saturating_sub(width(s))))
}

fn centre(s: &str, w: usize) -> String {
    let gap = w.saturating_sub(width(s));
    let left = gap / 2;
    format!("{}{s}{}", " ".repeat(left), " ".repeat(gap - left))
}
