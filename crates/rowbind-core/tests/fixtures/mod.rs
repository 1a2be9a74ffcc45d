#![allow(dead_code)]

use chrono::NaiveDateTime;
use rowbind_core::schema::{AssociationDecl, ColumnDecl, Database, DatabaseDecl, Entity, EntityDecl};
use rust_decimal::Decimal;
use uuid::Uuid;

// Shop: customers, their orders and order lines.

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub row_version: i64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub placed_at: NaiveDateTime,
    pub total: Decimal,
    pub gift_message: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrderLine {
    pub order_id: i64,
    pub line_no: i16,
    pub sku: String,
    pub quantity: i32,
}

impl Entity for Customer {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .table("customers")
            .column(
                ColumnDecl::new("id", |c: &Customer| c.id, |c, v| c.id = v)
                    .primary_key()
                    .db_generated(),
            )
            .column(
                ColumnDecl::new("name", |c: &Customer| c.name.clone(), |c, v| c.name = v)
                    .column_name("full_name")
                    .db_type("VARCHAR(80) NOT NULL"),
            )
            .column(ColumnDecl::new(
                "email",
                |c: &Customer| c.email.clone(),
                |c, v| c.email = v,
            ))
            .column(
                ColumnDecl::new("row_version", |c: &Customer| c.row_version, |c, v| {
                    c.row_version = v
                })
                .version(),
            )
            .association(AssociationDecl::has_many::<Order>("orders"))
    }
}

impl Entity for Order {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .table("orders")
            .column(
                ColumnDecl::new("id", |o: &Order| o.id, |o, v| o.id = v)
                    .primary_key(),
            )
            .column(ColumnDecl::new(
                "customer_id",
                |o: &Order| o.customer_id,
                |o, v| o.customer_id = v,
            ))
            .column(ColumnDecl::new(
                "placed_at",
                |o: &Order| o.placed_at,
                |o, v| o.placed_at = v,
            ))
            .column(ColumnDecl::new(
                "total",
                |o: &Order| o.total,
                |o, v| o.total = v,
            ))
            .column(
                ColumnDecl::new(
                    "gift_message",
                    |o: &Order| o.gift_message.clone(),
                    |o, v| o.gift_message = v,
                )
                .transient(),
            )
            .association(AssociationDecl::belongs_to::<Customer>("customer"))
            .association(
                AssociationDecl::has_many::<OrderLine>("lines")
                    .delete_rule("CASCADE"),
            )
    }
}

impl Entity for OrderLine {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .table("order_lines")
            .column(
                ColumnDecl::new("order_id", |l: &OrderLine| l.order_id, |l, v| l.order_id = v)
                    .primary_key(),
            )
            .column(
                ColumnDecl::new("line_no", |l: &OrderLine| l.line_no, |l, v| l.line_no = v)
                    .primary_key(),
            )
            .column(ColumnDecl::new(
                "sku",
                |l: &OrderLine| l.sku.clone(),
                |l, v| l.sku = v,
            ))
            .column(ColumnDecl::new(
                "quantity",
                |l: &OrderLine| l.quantity,
                |l, v| l.quantity = v,
            ))
            .association(AssociationDecl::belongs_to::<Order>("order"))
    }
}

pub struct Shop;

impl Database for Shop {
    fn declare(db: &mut DatabaseDecl) {
        db.name("shop").table::<Customer>().table::<Order>();
    }
}

// Fleet: a vehicle hierarchy stored in one table.

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub kind: i16,
    pub wheels: u8,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Car {
    pub vehicle: Vehicle,
    pub seats: u8,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Truck {
    pub vehicle: Vehicle,
    pub payload_kg: u32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tanker {
    pub truck: Truck,
    pub capacity_l: u32,
}

impl Entity for Vehicle {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .table("vehicles")
            .column(
                ColumnDecl::new("id", |v: &Vehicle| v.id, |v, x| v.id = x)
                    .primary_key(),
            )
            .column(
                ColumnDecl::new("kind", |v: &Vehicle| v.kind, |v, x| v.kind = x).discriminator(),
            )
            .column(ColumnDecl::new(
                "wheels",
                |v: &Vehicle| v.wheels,
                |v, x| v.wheels = x,
            ))
            .inheritance_code(0i16)
            .inheritance_default()
            .derived::<Car>()
            .derived::<Truck>()
    }
}

impl Entity for Car {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<Vehicle>(|c: &Car| &c.vehicle, |c: &mut Car| &mut c.vehicle)
            .inheritance_code(1i64)
            .column(ColumnDecl::new(
                "seats",
                |c: &Car| c.seats,
                |c, v| c.seats = v,
            ))
    }
}

impl Entity for Truck {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<Vehicle>(|t: &Truck| &t.vehicle, |t: &mut Truck| &mut t.vehicle)
            .inheritance_code(2i16)
            .column(ColumnDecl::new(
                "payload_kg",
                |t: &Truck| t.payload_kg,
                |t, v| t.payload_kg = v,
            ))
            .derived::<Tanker>()
    }
}

impl Entity for Tanker {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<Truck>(|t: &Tanker| &t.truck, |t: &mut Tanker| &mut t.truck)
            .inheritance_code("3")
            .column(ColumnDecl::new(
                "capacity_l",
                |t: &Tanker| t.capacity_l,
                |t, v| t.capacity_l = v,
            ))
    }
}

pub struct Fleet;

impl Database for Fleet {
    fn declare(db: &mut DatabaseDecl) {
        db.table::<Vehicle>();
    }
}

// Staff: departments and employees, with a self reference.

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Department {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Employee {
    pub id: i32,
    pub department_id: i32,
    pub manager_id: Option<i32>,
}

impl Entity for Department {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(
                ColumnDecl::new("id", |d: &Department| d.id, |d, v| d.id = v)
                    .primary_key(),
            )
            .column(ColumnDecl::new(
                "name",
                |d: &Department| d.name.clone(),
                |d, v| d.name = v,
            ))
            .association(AssociationDecl::has_many::<Employee>("employees"))
    }
}

impl Entity for Employee {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(
                ColumnDecl::new("id", |e: &Employee| e.id, |e, v| e.id = v)
                    .primary_key(),
            )
            .column(ColumnDecl::new(
                "department_id",
                |e: &Employee| e.department_id,
                |e, v| e.department_id = v,
            ))
            .column(ColumnDecl::new(
                "manager_id",
                |e: &Employee| e.manager_id,
                |e, v| e.manager_id = v,
            ))
            .association(AssociationDecl::belongs_to::<Department>("department"))
            .association(
                AssociationDecl::belongs_to::<Employee>("manager")
                    .this_key(&["manager_id"])
                    .pair("reports"),
            )
            .association(
                AssociationDecl::has_many::<Employee>("reports").other_key(&["manager_id"]),
            )
    }
}

pub struct Staff;

impl Database for Staff {
    fn declare(db: &mut DatabaseDecl) {
        db.table::<Department>();
    }
}
