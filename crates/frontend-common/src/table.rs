//! Plain-text table rendering for list pages

use agendify_core::Pagination;
use agendify_core::constants::messages;
use std::fmt::Write;

/// How many page numbers the footer shows around the current page
const PAGE_WINDOW: u32 = 2;

/// A table whose rows are produced by a caller-supplied function
pub struct DataTable<'a, T> {
    columns: Vec<String>,
    rows: &'a [T],
    render_row: Box<dyn Fn(&T) -> Vec<String> + 'a>,
    pagination: Option<Pagination>,
}

impl<'a, T> DataTable<'a, T> {
    pub fn new<F>(columns: &[&str], rows: &'a [T], render_row: F) -> Self
    where
        F: Fn(&T) -> Vec<String> + 'a,
    {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            render_row: Box::new(render_row),
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: Option<Pagination>) -> Self {
        self.pagination = pagination;
        self
    }

    fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = (self.render_row)(row);
                cells.resize(self.columns.len(), String::new());
                cells
            })
            .collect()
    }

    /// Aligned columns with a header rule
    pub fn render(&self) -> String {
        let rows = self.cells();
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &self.columns, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);

        if rows.is_empty() {
            out.push_str(messages::NO_RECORDS);
            out.push('\n');
        }
        for row in &rows {
            push_line(&mut out, row, &widths);
        }

        self.push_footer(&mut out);
        out
    }

    /// One `Column: value` block per row, for narrow terminals
    pub fn render_cards(&self) -> String {
        let rows = self.cells();
        if rows.is_empty() {
            let mut out = format!("{}\n", messages::NO_RECORDS);
            self.push_footer(&mut out);
            return out;
        }

        let label_width = self
            .columns
            .iter()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(0);
        let mut out = String::new();
        for (index, row) in rows.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            for (column, cell) in self.columns.iter().zip(row) {
                let _ = writeln!(out, "{column:<label_width$}  {cell}");
            }
        }
        self.push_footer(&mut out);
        out
    }

    fn push_footer(&self, out: &mut String) {
        if let Some(pagination) = &self.pagination {
            out.push('\n');
            out.push_str(&footer(pagination));
            out.push('\n');
        }
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// `Page 2 of 5 · 42 records · 1 [2] 3 4`
pub fn footer(pagination: &Pagination) -> String {
    let total_pages = pagination.total_pages.max(1);
    let pages = page_window(pagination.page, total_pages)
        .into_iter()
        .map(|p| {
            if p == pagination.page {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let noun = if pagination.total == 1 { "record" } else { "records" };
    format!(
        "Page {} of {} · {} {} · {}",
        pagination.page, total_pages, pagination.total, noun, pages
    )
}

/// Page numbers within [`PAGE_WINDOW`] of `current`, clamped to `1..=total_pages`
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let start = current.saturating_sub(PAGE_WINDOW).max(1);
    let end = current.saturating_add(PAGE_WINDOW).min(total_pages);
    (start..=end).collect()
}
