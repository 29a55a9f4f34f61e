use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use twm_core::DatasourceSummary;
use twm_model::{DatasourceReport, DatasourceStatus};

use crate::types::{InspectResult, MigrateResult, RenameEntry};

pub fn print_migrate_summary(result: &MigrateResult, show_renames: bool) {
    println!("Input: {}", result.input.display());
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    println!("{}", migrate_table(result));
    if show_renames && !result.renames.is_empty() {
        println!();
        println!("Renames:");
        println!("{}", rename_table(&result.renames));
    }
}

pub fn print_inspect_summary(result: &InspectResult) {
    println!("Input: {}", result.input.display());
    if result.datasources.is_empty() {
        println!("No datasources found.");
        return;
    }
    println!("{}", inspect_table(&result.datasources));
}

pub fn migrate_table(result: &MigrateResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Datasource"),
        header_cell("Status"),
        header_cell("Connections"),
        header_cell("Relations"),
        header_cell("Columns"),
        header_cell("Kept"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for datasource in &result.report.datasources {
        table.add_row(vec![
            Cell::new(datasource.display_name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            status_cell(datasource.status),
            connections_cell(datasource),
            count_cell(datasource.relations_renamed, Color::Green),
            count_cell(datasource.columns_renamed, Color::Green),
            count_cell(datasource.columns_kept, Color::Yellow),
        ]);
    }
    let report = &result.report;
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} migrated, {} skipped",
            report.migrated_count(),
            report.skipped_count()
        ))
        .add_attribute(Attribute::Bold),
        Cell::new(report.connections_rewritten()).add_attribute(Attribute::Bold),
        Cell::new(total(&report.datasources, |ds| ds.relations_renamed))
            .add_attribute(Attribute::Bold),
        Cell::new(total(&report.datasources, |ds| ds.columns_renamed))
            .add_attribute(Attribute::Bold),
        Cell::new(total(&report.datasources, |ds| ds.columns_kept))
            .add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn rename_table(renames: &[RenameEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Original"), header_cell("Snowflake")]);
    apply_table_style(&mut table);
    for entry in renames {
        table.add_row(vec![
            Cell::new(&entry.original),
            Cell::new(&entry.normalized).fg(Color::Green),
        ]);
    }
    table
}

pub fn inspect_table(datasources: &[DatasourceSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Datasource"),
        header_cell("Name"),
        header_cell("Action"),
        header_cell("Connections"),
        header_cell("Relations"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for datasource in datasources {
        let classes = if datasource.connection_classes.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(datasource.connection_classes.join(", "))
        };
        table.add_row(vec![
            Cell::new(datasource.caption.as_deref().unwrap_or("-"))
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(datasource.name.as_deref().unwrap_or("-")),
            action_cell(datasource),
            classes,
            Cell::new(datasource.relations),
            Cell::new(datasource.columns),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn total(datasources: &[DatasourceReport], field: impl Fn(&DatasourceReport) -> usize) -> usize {
    datasources.iter().map(field).sum()
}

fn status_cell(status: DatasourceStatus) -> Cell {
    match status {
        DatasourceStatus::Migrated => Cell::new(status.as_str()).fg(Color::Green),
        DatasourceStatus::SkippedNoConnection => dim_cell(status.as_str()),
    }
}

fn connections_cell(datasource: &DatasourceReport) -> Cell {
    if datasource.status == DatasourceStatus::SkippedNoConnection {
        return dim_cell("-");
    }
    let label = format!(
        "{}/{}",
        datasource.connections_rewritten, datasource.named_connections
    );
    if datasource.connections_rewritten > 0 {
        Cell::new(label).fg(Color::Green)
    } else {
        dim_cell(label)
    }
}

fn action_cell(datasource: &DatasourceSummary) -> Cell {
    if !datasource.embedded {
        dim_cell("skip (no connection)")
    } else if datasource.has_source_connection() {
        Cell::new("migrate")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("identifiers only").fg(Color::Yellow)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use twm_model::MigrationReport;

    fn result() -> MigrateResult {
        let mut orders = DatasourceReport::new(
            Some("federated.1".to_string()),
            Some("Orders".to_string()),
            DatasourceStatus::Migrated,
        );
        orders.named_connections = 2;
        orders.connections_rewritten = 1;
        orders.relations_renamed = 2;
        orders.columns_renamed = 6;
        orders.columns_kept = 1;
        let published = DatasourceReport::new(
            Some("sqlproxy.2".to_string()),
            None,
            DatasourceStatus::SkippedNoConnection,
        );
        MigrateResult {
            input: PathBuf::from("Sales.twbx"),
            output: None,
            dry_run: true,
            report: MigrationReport {
                datasources: vec![orders, published],
                rename_count: 5,
            },
            renames: vec![RenameEntry {
                original: "order_id".to_string(),
                normalized: "ORDER_ID".to_string(),
            }],
        }
    }

    #[test]
    fn migrate_table_has_a_row_per_datasource_plus_total() {
        let table = migrate_table(&result());
        assert_eq!(table.row_iter().count(), 3);
        let rendered = table.to_string();
        assert!(rendered.contains("Orders"));
        assert!(rendered.contains("sqlproxy.2"));
        assert!(rendered.contains("1/2"));
        assert!(rendered.contains("1 migrated, 1 skipped"));
    }

    #[test]
    fn rename_table_lists_pairs() {
        let rendered = rename_table(&result().renames).to_string();
        assert!(rendered.contains("order_id"));
        assert!(rendered.contains("ORDER_ID"));
    }
}
