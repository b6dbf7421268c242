//! Terminal rendering of grids, listings and notices

use colored::Colorize;
use gridkeeper_grid::{Notice, NoticeLevel};
use gridkeeper_schema::{Catalog, Cell, ColumnDefinition, OperationType, RelatedListing};

const OPERATIONS: [OperationType; 4] = [
    OperationType::List,
    OperationType::Create,
    OperationType::Update,
    OperationType::Delete,
];

/// Render rows as an aligned text table; hidden columns are left out
pub fn grid_table(columns: &[ColumnDefinition], rows: &[Vec<Cell>]) -> String {
    let shown: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.hidden)
        .map(|(i, _)| i)
        .collect();

    let header: Vec<String> = shown.iter().map(|&i| columns[i].header.clone()).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            shown
                .iter()
                .map(|&i| row.get(i).map(Cell::to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    table(&header, &body)
}

/// Render the entity types of a catalog
pub fn entity_table(catalog: &Catalog) -> String {
    let header = vec![
        "ENTITY".to_string(),
        "NAME".to_string(),
        "OPERATIONS".to_string(),
        "ACTIONS".to_string(),
    ];
    let body: Vec<Vec<String>> = catalog
        .entries()
        .map(|entry| {
            let descriptor = &entry.descriptor;
            let operations: Vec<&str> = OPERATIONS
                .iter()
                .filter(|op| descriptor.supports(**op))
                .map(OperationType::display_name)
                .collect();
            let actions: Vec<&str> = descriptor.actions.iter().map(|a| a.action.as_str()).collect();
            vec![
                descriptor.key.clone(),
                descriptor.name.clone(),
                operations.join(", "),
                actions.join(", "),
            ]
        })
        .collect();
    table(&header, &body)
}

/// Render a related-entities listing
pub fn listing_text(listing: &RelatedListing) -> String {
    let mut out = format!("{}\n", listing.title);
    for line in listing.lines() {
        out.push_str("  - ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Coloured one-line notice
pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info".blue(),
        NoticeLevel::Success => "ok".green(),
        NoticeLevel::Warning => "warning".yellow(),
        NoticeLevel::Error => "error".red().bold(),
    };
    format!("{}: {}", tag, notice.text)
}

fn table(header: &[String], body: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in body {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(header);
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(&rule));
    out.push('\n');
    for row in body {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}
