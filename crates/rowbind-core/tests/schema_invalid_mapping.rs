use rowbind_core::schema::{
    AssociationDecl, ColumnDecl, Database, DatabaseDecl, Entity, EntityDecl,
};
use rowbind_core::{DeclarativeMappingSource, MappingSource};

#[derive(Default)]
struct Fields {
    id: i64,
    label: String,
    blob: Vec<u8>,
    score: f64,
    stamp: i64,
    kind: i16,
}

trait Row: 'static {
    fn fields(&self) -> &Fields;
    fn fields_mut(&mut self) -> &mut Fields;
}

macro_rules! rows {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Default)]
            struct $name(Fields);

            impl Row for $name {
                fn fields(&self) -> &Fields {
                    &self.0
                }

                fn fields_mut(&mut self) -> &mut Fields {
                    &mut self.0
                }
            }
        )*
    };
}

macro_rules! derived_rows {
    ($($name:ident: $base:ident),* $(,)?) => {
        $(
            #[derive(Default)]
            struct $name {
                base: $base,
                own: Fields,
            }

            impl Row for $name {
                fn fields(&self) -> &Fields {
                    &self.own
                }

                fn fields_mut(&mut self) -> &mut Fields {
                    &mut self.own
                }
            }
        )*
    };
}

macro_rules! database {
    ($name:ident => $($table:ident),* $(,)?) => {
        struct $name;

        impl Database for $name {
            #[allow(unused_variables)]
            fn declare(db: &mut DatabaseDecl) {
                $( db.table::<$table>(); )*
            }
        }
    };
}

fn id<T: Row>() -> ColumnDecl<T> {
    ColumnDecl::new("id", |t: &T| t.fields().id, |t, v| t.fields_mut().id = v)
}

fn label<T: Row>() -> ColumnDecl<T> {
    ColumnDecl::new(
        "label",
        |t: &T| t.fields().label.clone(),
        |t, v| t.fields_mut().label = v,
    )
}

fn blob<T: Row>() -> ColumnDecl<T> {
    ColumnDecl::new(
        "blob",
        |t: &T| t.fields().blob.clone(),
        |t, v| t.fields_mut().blob = v,
    )
}

fn score<T: Row>() -> ColumnDecl<T> {
    ColumnDecl::new("score", |t: &T| t.fields().score, |t, v| t.fields_mut().score = v)
}

fn stamp<T: Row>() -> ColumnDecl<T> {
    ColumnDecl::new("stamp", |t: &T| t.fields().stamp, |t, v| t.fields_mut().stamp = v)
}

fn kind<T: Row>() -> ColumnDecl<T> {
    ColumnDecl::new("kind", |t: &T| t.fields().kind, |t, v| t.fields_mut().kind = v)
}

#[track_caller]
fn assert_invalid<D: Database>(expected: &str) {
    let err = DeclarativeMappingSource::new()
        .model_for::<D>()
        .unwrap_err();
    let message = err.to_string();

    assert!(err.is_invalid_mapping(), "unexpected error kind: {message}");
    assert!(
        message.contains(expected),
        "expected `{expected}` in `{message}`"
    );
}

// Entry and table declarations.

rows!(Lonely, ThingA, ThingB, Hollow);
database!(Empty =>);
database!(HollowDb => Hollow);
database!(SameTableName => ThingA, ThingB);

impl Entity for Lonely {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new().column(id().primary_key())
    }
}

impl Entity for ThingA {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new().table("things").column(id().primary_key())
    }
}

impl Entity for ThingB {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new().table("things").column(id().primary_key())
    }
}

impl Entity for Hollow {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
    }
}

struct Twice;

impl Database for Twice {
    fn declare(db: &mut DatabaseDecl) {
        db.table::<Lonely>().table_named::<Lonely>("lonely_again");
    }
}

#[test]
fn entry_without_tables() {
    assert_invalid::<Empty>("entry type `Empty` declares no tables");
}

#[test]
fn types_declare_members() {
    assert_invalid::<HollowDb>("`Hollow` declares no data members");
}

#[test]
fn table_names_are_unique() {
    assert_invalid::<SameTableName>("table name `things` is used by more than one type");
}

#[test]
fn table_declared_twice() {
    assert_invalid::<Twice>("declares a table for");
}

// Member declarations.

rows!(
    DupMember,
    BytesKey,
    FloatDiscriminator,
    TwoVersions,
    TextVersion,
    TransientKey
);
database!(DupMemberDb => DupMember);
database!(BytesKeyDb => BytesKey);
database!(FloatDiscriminatorDb => FloatDiscriminator);
database!(TwoVersionsDb => TwoVersions);
database!(TextVersionDb => TextVersion);
database!(TransientKeyDb => TransientKey);

impl Entity for DupMember {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .column(label())
            .column(label().column_name("label_2"))
    }
}

impl Entity for BytesKey {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new().column(blob().primary_key())
    }
}

impl Entity for FloatDiscriminator {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .column(score().discriminator())
    }
}

impl Entity for TwoVersions {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .column(stamp().version())
            .column(kind().version())
    }
}

impl Entity for TextVersion {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .column(label().version())
    }
}

impl Entity for TransientKey {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new().column(id().primary_key().transient())
    }
}

#[test]
fn member_declared_twice() {
    assert_invalid::<DupMemberDb>("member `DupMember::label` is declared twice");
}

#[test]
fn primary_key_type_must_be_supported() {
    assert_invalid::<BytesKeyDb>(
        "member `BytesKey::blob` has type bytes, which is not supported for a primary key",
    );
}

#[test]
fn discriminator_type_must_be_supported() {
    assert_invalid::<FloatDiscriminatorDb>(
        "has type f64, which is not supported for an inheritance discriminator",
    );
}

#[test]
fn at_most_one_version_member() {
    assert_invalid::<TwoVersionsDb>("`TwoVersions` declares more than one version member");
}

#[test]
fn version_type_must_be_supported() {
    assert_invalid::<TextVersionDb>("which is not supported for a row version");
}

#[test]
fn transient_members_cannot_be_keys() {
    assert_invalid::<TransientKeyDb>("transient member `TransientKey::id`");
}

// Inheritance declarations.

rows!(
    DupCodeRoot,
    BadCodeRoot,
    CodedAlone,
    NoDefaultRoot,
    TwoDefaultsRoot,
    KeyedRoot,
    StrayRoot,
    Stray,
    NoDiscriminatorRoot,
    LateDiscriminatorRoot,
    OrphanBase,
    OrphanOwner,
);

derived_rows!(
    DupCodeA: DupCodeRoot,
    DupCodeB: DupCodeRoot,
    NoDefaultChild: NoDefaultRoot,
    TwoDefaultsChild: TwoDefaultsRoot,
    KeyedChild: KeyedRoot,
    NoDiscriminatorChild: NoDiscriminatorRoot,
    LateDiscriminatorChild: LateDiscriminatorRoot,
    Orphan: OrphanBase,
);

database!(DupCodeDb => DupCodeRoot);
database!(BadCodeDb => BadCodeRoot);
database!(CodedAloneDb => CodedAlone);
database!(NoDefaultDb => NoDefaultRoot);
database!(TwoDefaultsDb => TwoDefaultsRoot);
database!(KeyedDb => KeyedRoot);
database!(StrayDb => StrayRoot);
database!(NoDiscriminatorDb => NoDiscriminatorRoot);
database!(LateDiscriminatorDb => LateDiscriminatorRoot);
database!(DerivedTableDb => DupCodeA);
database!(OrphanDb => OrphanBase, OrphanOwner);

/// A hierarchy root keyed by `id` and discriminated by `kind`.
fn root<T: Row + Entity>() -> EntityDecl<T> {
    EntityDecl::new()
        .column(id().primary_key())
        .column(kind().discriminator())
}

impl Entity for DupCodeRoot {
    fn mapping() -> EntityDecl<Self> {
        root()
            .inheritance_code(0i16)
            .inheritance_default()
            .derived::<DupCodeA>()
            .derived::<DupCodeB>()
    }
}

impl Entity for DupCodeA {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<DupCodeRoot>(|d: &Self| &d.base, |d: &mut Self| &mut d.base)
            .inheritance_code(1i16)
    }
}

impl Entity for DupCodeB {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<DupCodeRoot>(|d: &Self| &d.base, |d: &mut Self| &mut d.base)
            .inheritance_code(1i32)
    }
}

impl Entity for BadCodeRoot {
    fn mapping() -> EntityDecl<Self> {
        root().inheritance_code("zero").inheritance_default()
    }
}

impl Entity for CodedAlone {
    fn mapping() -> EntityDecl<Self> {
        root().inheritance_code(0i16)
    }
}

impl Entity for NoDefaultRoot {
    fn mapping() -> EntityDecl<Self> {
        root().inheritance_code(0i16).derived::<NoDefaultChild>()
    }
}

impl Entity for NoDefaultChild {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<NoDefaultRoot>(|d: &Self| &d.base, |d: &mut Self| &mut d.base)
            .inheritance_code(1i16)
    }
}

impl Entity for TwoDefaultsRoot {
    fn mapping() -> EntityDecl<Self> {
        root()
            .inheritance_code(0i16)
            .inheritance_default()
            .derived::<TwoDefaultsChild>()
    }
}

impl Entity for TwoDefaultsChild {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<TwoDefaultsRoot>(|d: &Self| &d.base, |d: &mut Self| &mut d.base)
            .inheritance_code(1i16)
            .inheritance_default()
    }
}

impl Entity for KeyedRoot {
    fn mapping() -> EntityDecl<Self> {
        root()
            .inheritance_code(0i16)
            .inheritance_default()
            .derived::<KeyedChild>()
    }
}

impl Entity for KeyedChild {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<KeyedRoot>(|d: &Self| &d.base, |d: &mut Self| &mut d.base)
            .inheritance_code(1i16)
            .column(stamp().primary_key())
    }
}

impl Entity for StrayRoot {
    fn mapping() -> EntityDecl<Self> {
        root()
            .inheritance_code(0i16)
            .inheritance_default()
            .derived::<Stray>()
    }
}

impl Entity for Stray {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new().inheritance_code(1i16)
    }
}

impl Entity for NoDiscriminatorRoot {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .inheritance_default()
            .derived::<NoDiscriminatorChild>()
    }
}

impl Entity for NoDiscriminatorChild {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<NoDiscriminatorRoot>(|d: &Self| &d.base, |d: &mut Self| &mut d.base)
    }
}

impl Entity for LateDiscriminatorRoot {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .inheritance_default()
            .derived::<LateDiscriminatorChild>()
    }
}

impl Entity for LateDiscriminatorChild {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<LateDiscriminatorRoot>(|d: &Self| &d.base, |d: &mut Self| &mut d.base)
            .column(kind().discriminator())
    }
}

impl Entity for OrphanBase {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new().column(id().primary_key())
    }
}

impl Entity for Orphan {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .extends::<OrphanBase>(|d: &Self| &d.base, |d: &mut Self| &mut d.base)
            .column(stamp())
    }
}

impl Entity for OrphanOwner {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .association(
                AssociationDecl::has_many::<Orphan>("orphans")
                    .other_key(&["stamp"]),
            )
    }
}

#[test]
fn inheritance_codes_are_unique() {
    assert_invalid::<DupCodeDb>("`DupCodeA` and `DupCodeB` share inheritance code I16(1)");
}

#[test]
fn inheritance_codes_cast_to_the_discriminator() {
    assert_invalid::<BadCodeDb>(
        "inheritance code String(\"zero\") of `BadCodeRoot` cannot be converted to discriminator type i16",
    );
}

#[test]
fn hierarchy_needs_a_default() {
    assert_invalid::<NoDefaultDb>("hierarchy of `NoDefaultRoot` has no inheritance default");
}

#[test]
fn coded_types_need_a_default() {
    assert_invalid::<CodedAloneDb>("hierarchy of `CodedAlone` has no inheritance default");
}

#[test]
fn hierarchy_has_one_default() {
    assert_invalid::<TwoDefaultsDb>("declares more than one default type");
}

#[test]
fn derived_types_inherit_identity() {
    assert_invalid::<KeyedDb>("derived type `KeyedChild` declares primary key member `stamp`");
}

#[test]
fn derived_types_must_extend_their_base() {
    assert_invalid::<StrayDb>(
        "`Stray` is listed as derived from `StrayRoot` but does not extend it",
    );
}

#[test]
fn derived_types_need_a_discriminator() {
    assert_invalid::<NoDiscriminatorDb>(
        "`NoDiscriminatorRoot` has derived types but no discriminator",
    );
}

#[test]
fn discriminator_is_declared_on_the_root() {
    assert_invalid::<LateDiscriminatorDb>(
        "discriminator `LateDiscriminatorChild::kind` must be declared on the hierarchy root",
    );
}

#[test]
fn tables_map_hierarchy_roots() {
    assert_invalid::<DerivedTableDb>("table declared for derived type `DupCodeA`");
}

#[test]
fn extending_requires_registration() {
    assert_invalid::<OrphanDb>("`Orphan` extends a type in the hierarchy of `OrphanBase`");
}

// Association declarations.

rows!(Left, Right, Wide, Narrow, Mismatched);
database!(BothForeignKeysDb => Left);
database!(KeyCountDb => Wide);
database!(KeyTypeDb => Mismatched);

impl Entity for Left {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .column(stamp())
            .association(
                AssociationDecl::belongs_to::<Right>("right")
                    .this_key(&["stamp"])
                    .pair("left"),
            )
    }
}

impl Entity for Right {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .column(stamp())
            .association(
                AssociationDecl::belongs_to::<Left>("left")
                    .this_key(&["stamp"]),
            )
    }
}

impl Entity for Wide {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .column(stamp())
            .column(kind())
            .association(
                AssociationDecl::belongs_to::<Narrow>("narrow")
                    .this_key(&["stamp", "kind"]),
            )
    }
}

impl Entity for Narrow {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new().column(id().primary_key())
    }
}

impl Entity for Mismatched {
    fn mapping() -> EntityDecl<Self> {
        EntityDecl::new()
            .column(id().primary_key())
            .column(label())
            .association(
                AssociationDecl::belongs_to::<Narrow>("narrow")
                    .this_key(&["label"]),
            )
    }
}

#[test]
fn paired_associations_cannot_both_hold_the_foreign_key() {
    assert_invalid::<BothForeignKeysDb>(
        "`Left::right` and `Right::left` both hold the foreign key",
    );
}

#[test]
fn key_lengths_match() {
    assert_invalid::<KeyCountDb>(
        "association `Wide::narrow` has 2 this_key members but 1 other_key members",
    );
}

#[test]
fn key_types_match() {
    assert_invalid::<KeyTypeDb>(
        "association `Mismatched::narrow` joins `label` and `id`, which have different types",
    );
}
