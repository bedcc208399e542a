use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "Product")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "Id")]
    pub id: i32,
    #[sea_orm(column_name = "Name")]
    pub name: String,
    #[sea_orm(column_name = "Price")]
    pub price: i64,
    #[sea_orm(column_name = "NhaXuatBan_Id")]
    pub publisher_id: Option<i32>,
    #[sea_orm(column_name = "ChuDe_Id")]
    pub category_id: Option<i32>,
    #[sea_orm(column_name = "Image")]
    pub image: String,
    /// Units currently in stock.
    #[sea_orm(column_name = "SoLuong")]
    pub stock: i32,
    /// Cumulative units sold.
    #[sea_orm(column_name = "SoLuongBan")]
    pub sold: i32,
    #[sea_orm(column_name = "MoTa")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::publishers::Entity",
        from = "Column::PublisherId",
        to = "super::publishers::Column::Id"
    )]
    Publishers,
    #[sea_orm(has_many = "super::cart::Entity")]
    Cart,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::publishers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publishers.def()
    }
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
