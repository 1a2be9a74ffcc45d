use serde::Deserialize;

/// Settings applied when building models.
///
/// Can be set programmatically or deserialized, e.g. from a section of an
/// application's config file:
///
/// ```toml
/// table_name_prefix = "app_"
/// strict_associations = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    /// Prepended to every table name
    pub table_name_prefix: Option<String>,

    /// Overrides the database name the entry type declares
    pub database_name: Option<String>,

    /// Fail the build when association keys cannot be inferred, rather than
    /// when the keys are first used.
    pub strict_associations: bool,
}

impl MappingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn database_name(&mut self, name: &str) -> &mut Self {
        self.database_name = Some(name.to_string());
        self
    }

    pub fn strict_associations(&mut self, strict: bool) -> &mut Self {
        self.strict_associations = strict;
        self
    }

    pub(crate) fn table_name(&self, name: &str) -> String {
        match &self.table_name_prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        }
    }
}
