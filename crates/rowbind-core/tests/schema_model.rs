mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use rowbind_core::schema::{AutoSync, MappingConfig, UpdateCheck};
use rowbind_core::stmt::Type;
use rowbind_core::{Database, DeclarativeMappingSource, MappingSource, MetaModel};
use std::sync::Arc;

fn shop() -> Arc<MetaModel> {
    DeclarativeMappingSource::new().model_for::<Shop>().unwrap()
}

fn member_names<T: 'static>(model: &MetaModel) -> Vec<&str> {
    model
        .get_meta_type::<T>()
        .unwrap()
        .data_members(model)
        .map(|member| member.name())
        .collect()
}

#[test]
fn tables_for_declared_and_reachable_types() {
    let model = shop();

    let tables: Vec<_> = model.tables().map(|table| table.name()).collect();
    assert_eq!(tables, ["customers", "orders", "order_lines"]);

    assert_eq!(model.get_table::<Order>().unwrap().name(), "orders");
    assert_eq!(
        model.get_table_by_name("order_lines").unwrap().row_type(&model).name,
        "OrderLine"
    );
    assert!(model.get_table_by_name("products").is_none());
    assert!(model.get_table::<Vehicle>().is_none());
    assert!(model.get_meta_type::<String>().is_none());
}

#[test]
fn database_name_and_entry() {
    let model = shop();

    assert_eq!(model.database_name(), "shop");
    assert_eq!(model.entry_type(), &Shop::entry_type());
    assert_eq!(model.entry_type().name(), "Shop");
}

#[test]
fn database_name_defaults_to_entry_name() {
    let model = DeclarativeMappingSource::new().model_for::<Fleet>().unwrap();
    assert_eq!(model.database_name(), "Fleet");
}

#[test]
fn config_prefix_and_database_name() {
    let mut config = MappingConfig::new();
    config.table_name_prefix("app_").database_name("north");

    let source = DeclarativeMappingSource::with_config(config);
    let model = source.model_for::<Shop>().unwrap();

    assert_eq!(model.database_name(), "north");
    assert_eq!(
        model.get_table::<Customer>().unwrap().name(),
        "app_customers"
    );
    assert!(model.get_table_by_name("app_orders").is_some());
    assert!(model.get_table_by_name("orders").is_none());
    assert_eq!(model.mapping_source(), source.id());
}

#[test]
fn members_in_declaration_order() {
    let model = shop();

    assert_eq!(
        member_names::<Customer>(&model),
        ["id", "name", "email", "row_version", "orders"]
    );
    assert_eq!(
        member_names::<Order>(&model),
        ["id", "customer_id", "placed_at", "total", "gift_message", "customer", "lines"]
    );

    let order = model.get_meta_type::<Order>().unwrap();
    for (ordinal, member) in order.data_members(&model).enumerate() {
        assert_eq!(member.ordinal, ordinal);
        assert_eq!(member.declaring_type, order.id);
    }
}

#[test]
fn transient_members_are_not_persistent() {
    let model = shop();
    let order = model.get_meta_type::<Order>().unwrap();

    let persistent: Vec<_> = order
        .persistent_data_members(&model)
        .map(|member| member.name())
        .collect();
    assert_eq!(
        persistent,
        ["id", "customer_id", "placed_at", "total", "customer", "lines"]
    );

    let gift = order.data_member(&model, "gift_message").unwrap();
    assert!(!gift.is_persistent());
    assert!(gift.nullable);
}

#[test]
fn column_names_and_types() {
    let model = shop();
    let customer = model.get_meta_type::<Customer>().unwrap();

    let name = customer.data_member(&model, "name").unwrap();
    assert_eq!(name.mapped_name(), "full_name");
    assert_eq!(name.member_ty(), Some(&Type::String));
    assert_eq!(
        name.scalar().unwrap().db_type.as_deref(),
        Some("VARCHAR(80) NOT NULL")
    );
    assert!(!name.nullable);

    // Lookup falls back to the column name.
    assert_eq!(
        customer.data_member(&model, "full_name").unwrap().id,
        name.id
    );

    let email = customer.data_member(&model, "email").unwrap();
    assert_eq!(email.member_ty(), Some(&Type::nullable(Type::String)));
    assert!(email.nullable);
}

#[test]
fn identity_and_version() {
    let model = shop();

    let customer = model.get_meta_type::<Customer>().unwrap();
    let identity: Vec<_> = customer
        .identity_members(&model)
        .map(|member| member.name())
        .collect();
    assert_eq!(identity, ["id"]);
    assert!(customer.is_entity());
    assert_eq!(
        customer.version_member(&model).map(|member| member.name()),
        Some("row_version")
    );

    let line = model.get_meta_type::<OrderLine>().unwrap();
    let identity: Vec<_> = line
        .identity_members(&model)
        .map(|member| member.name())
        .collect();
    assert_eq!(identity, ["order_id", "line_no"]);
    assert!(line.version_member(&model).is_none());
}

#[test]
fn auto_sync_and_update_check() {
    let model = shop();
    let customer = model.get_meta_type::<Customer>().unwrap();

    let id = customer.data_member(&model, "id").unwrap();
    assert!(id.is_db_generated());
    assert_eq!(id.auto_sync(), AutoSync::OnInsert);

    let version = customer.data_member(&model, "row_version").unwrap();
    assert_eq!(version.auto_sync(), AutoSync::Always);

    let name = customer.data_member(&model, "name").unwrap();
    assert_eq!(name.auto_sync(), AutoSync::Never);
    assert_eq!(name.update_check(), UpdateCheck::Always);
}

#[test]
fn types_without_inheritance() {
    let model = shop();
    let order = model.get_meta_type::<Order>().unwrap();

    assert!(!order.has_inheritance());
    assert!(order.is_inheritance_root());
    assert!(order.discriminator.is_none());
    assert!(order.inheritance_default(&model).is_none());
    assert_eq!(order.inheritance.types, [order.id]);
    assert!(order.can_instantiate);
}
