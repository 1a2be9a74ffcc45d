use heck::ToSnakeCase;

/// A declared name split into its words, used for naming conventions.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn new(src: &str) -> Self {
        let parts = src
            .to_snake_case()
            .split('_')
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
        Self { parts }
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }

    /// The conventional foreign key member name referencing this name,
    /// e.g. `customer_id` for `Customer`.
    pub fn foreign_key(&self) -> String {
        format!("{}_id", self.snake_case())
    }

    /// Returns `true` if `candidate` spells this name in any case style.
    pub fn matches(&self, candidate: &str) -> bool {
        Name::new(candidate) == *self
    }
}

pub(crate) fn short_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names() {
        assert_eq!(short_type_name("shop::model::OrderLine"), "OrderLine");
        assert_eq!(short_type_name("shop::Wrapper<shop::Inner>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn conventions() {
        let name = Name::new(short_type_name("shop::OrderLine"));
        assert_eq!(name.snake_case(), "order_line");
        assert_eq!(name.foreign_key(), "order_line_id");

        let fk = Name::new(&name.foreign_key());
        assert!(fk.matches("OrderLineId"));
        assert!(fk.matches("order_line_id"));
        assert!(!fk.matches("order_id"));
    }
}
