//! Property tests for case folding and rename propagation.

use proptest::prelude::*;

use twm_core::{fold_identifier, migrate_xml};
use twm_model::MigrationConfig;

fn config() -> MigrationConfig {
    MigrationConfig {
        account: "acme".to_string(),
        username: "LOADER".to_string(),
        database: "ANALYTICS".to_string(),
        warehouse: "WH".to_string(),
        schema: "CORE".to_string(),
        role: "REPORTER".to_string(),
    }
}

fn workbook(columns: &[String]) -> String {
    let records: String = columns
        .iter()
        .map(|column| {
            format!(
                "<metadata-record class='column'><remote-name>{column}</remote-name>\
                 <parent-name>[orders]</parent-name><remote-alias>{column}</remote-alias>\
                 </metadata-record>"
            )
        })
        .collect();
    let formula: Vec<String> = columns.iter().map(|column| format!("[{column}]")).collect();
    format!(
        "<workbook><datasources><datasource name='federated.1'><connection class='federated'>\
         <relation connection='redshift.1' name='orders' table='[public].[orders]' type='table'/>\
         <metadata-records>{records}</metadata-records></connection>\
         <column name='[Calculation_1]'><calculation class='tableau' formula='{}'/></column>\
         </datasource></datasources></workbook>",
        formula.join(" + ")
    )
}

proptest! {
    #[test]
    fn folding_is_idempotent(raw in any::<String>()) {
        let once = fold_identifier(&raw).normalized;
        let twice = fold_identifier(&once).normalized;
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn identifiers_needing_quotes_are_unchanged(
        raw in "[A-Za-z0-9_]{0,8}[^A-Za-z0-9_][A-Za-z0-9_ .-]{0,8}"
    ) {
        let folded = fold_identifier(&raw);
        prop_assert!(!folded.eligible);
        prop_assert_eq!(folded.normalized, raw);
    }

    #[test]
    fn digit_leading_identifiers_are_unchanged(raw in "[0-9][A-Za-z0-9_]{0,12}") {
        let folded = fold_identifier(&raw);
        prop_assert!(!folded.eligible);
        prop_assert_eq!(folded.normalized, raw);
    }

    #[test]
    fn safe_identifiers_are_uppercased(raw in "[A-Za-z_][A-Za-z0-9_]{0,16}") {
        let folded = fold_identifier(&raw);
        prop_assert!(folded.eligible);
        prop_assert_eq!(folded.normalized, raw.to_ascii_uppercase());
    }

    #[test]
    fn every_recorded_rename_reaches_the_formula(
        columns in prop::collection::vec("[a-z][a-z0-9_]{0,6}", 1..6)
    ) {
        let outcome = migrate_xml(&workbook(&columns), &config()).expect("migrate");
        for column in &columns {
            let upper = column.to_ascii_uppercase();
            prop_assert_eq!(outcome.mapping.get(column), Some(upper.as_str()));
            let original_reference = format!("[{column}]");
            let upper_reference = format!("[{upper}]");
            prop_assert!(!outcome.text.contains(&original_reference));
            prop_assert!(outcome.text.contains(&upper_reference));
        }
        prop_assert_eq!(outcome.mapping.get("orders"), Some("ORDERS"));
    }
}
