use sea_orm::entity::prelude::*;

/// Customer account, keyed by `MaKH` and looked up by login handle (`TaiKhoan`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "Users")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "MaKH")]
    pub id: i32,
    #[sea_orm(column_name = "HoTen")]
    pub full_name: String,
    #[sea_orm(column_name = "TaiKhoan", unique)]
    pub login: String,
    #[sea_orm(column_name = "MatKhau")]
    pub password_hash: String,
    #[sea_orm(column_name = "Email")]
    pub email: String,
    #[sea_orm(column_name = "DiaChi")]
    pub address: String,
    #[sea_orm(column_name = "DienThoai")]
    pub phone: String,
    #[sea_orm(column_name = "NgaySinh")]
    pub birth_date: Option<Date>,
    #[sea_orm(column_name = "Role")]
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cart::Entity")]
    Cart,
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
