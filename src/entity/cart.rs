use sea_orm::entity::prelude::*;

/// One product line in a customer's cart. At most one row per (customer, product);
/// the reconciler keeps that invariant, the schema does not.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "Cart")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "CartId")]
    pub id: i32,
    #[sea_orm(column_name = "MaKH")]
    pub customer_id: i32,
    #[sea_orm(column_name = "ProductId")]
    pub product_id: i32,
    #[sea_orm(column_name = "Quantity")]
    pub quantity: i32,
    #[sea_orm(column_name = "CreatedDate")]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CustomerId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "Cascade"
    )]
    Products,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
