//! Cascading warehouse / catalog / schema / table pick lists.

use tablelog_contracts::error::TablelogResult;

use crate::workspace::Workspace;

/// The options a page offers for the current partial selection.
///
/// `schemas` stays empty until a catalog is picked and `tables` until both a
/// catalog and a schema are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choices {
    pub warehouses: Vec<String>,
    pub catalogs: Vec<String>,
    pub schemas: Vec<String>,
    pub tables: Vec<String>,
}

pub fn enumerate(
    workspace: &dyn Workspace,
    catalog: Option<&str>,
    schema: Option<&str>,
) -> TablelogResult<Choices> {
    let catalog = catalog.filter(|c| !c.is_empty());
    let schema = schema.filter(|s| !s.is_empty());

    let mut choices = Choices {
        warehouses: workspace
            .list_warehouses()?
            .into_iter()
            .map(|w| w.name)
            .collect(),
        catalogs: workspace.list_catalogs()?,
        ..Choices::default()
    };

    if let Some(catalog) = catalog {
        choices.schemas = workspace.list_schemas(catalog)?;
        if let Some(schema) = schema {
            choices.tables = workspace.list_tables(catalog, schema)?;
        }
    }

    Ok(choices)
}
