//! Read-only survey of the datasources in a descriptor.

use twm_model::backend::SOURCE_CLASS;
use twm_xml::{Document, Element};

use crate::migrate::has_embedded_connection;
use crate::tags::{CLASS, COLUMN_CLASS, DATASOURCE, METADATA_RECORD, NAMED_CONNECTION, RELATION};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasourceSummary {
    pub name: Option<String>,
    pub caption: Option<String>,
    pub embedded: bool,
    /// `class` of every connection under a named connection, in document order.
    pub connection_classes: Vec<String>,
    pub relations: usize,
    pub columns: usize,
}

impl DatasourceSummary {
    /// Whether a migration would rewrite at least one connection.
    pub fn has_source_connection(&self) -> bool {
        self.embedded
            && self
                .connection_classes
                .iter()
                .any(|class| class == SOURCE_CLASS)
    }
}

/// Summarize every non-stub datasource, in document order.
pub fn inspect_document(document: &Document) -> Vec<DatasourceSummary> {
    let mut datasources = Vec::new();
    if document.root.is(DATASOURCE) {
        datasources.push(&document.root);
    }
    document.root.descendants(DATASOURCE, &[], &mut datasources);
    datasources
        .into_iter()
        .filter(|datasource| datasource.child_elements().next().is_some())
        .map(summarize)
        .collect()
}

fn summarize(datasource: &Element) -> DatasourceSummary {
    let prune = [DATASOURCE];

    let mut named = Vec::new();
    datasource.descendants(NAMED_CONNECTION, &prune, &mut named);
    let connection_classes = named
        .into_iter()
        .flat_map(Element::child_elements)
        .filter_map(|connection| connection.attr(CLASS))
        .map(str::to_string)
        .collect();

    let mut relations = Vec::new();
    datasource.descendants(RELATION, &prune, &mut relations);
    let relations = relations
        .iter()
        .filter(|relation| relation.attr("table").is_some())
        .count();

    let mut records = Vec::new();
    datasource.descendants(METADATA_RECORD, &prune, &mut records);
    let columns = records
        .iter()
        .filter(|record| record.attr(CLASS) == Some(COLUMN_CLASS))
        .count();

    DatasourceSummary {
        name: datasource.attr("name").map(str::to_string),
        caption: datasource.attr("caption").map(str::to_string),
        embedded: has_embedded_connection(datasource),
        connection_classes,
        relations,
        columns,
    }
}
