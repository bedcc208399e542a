pub mod cart;
pub mod categories;
pub mod products;
pub mod publishers;
pub mod sliders;
pub mod users;

pub use cart::Entity as Cart;
pub use categories::Entity as Categories;
pub use products::Entity as Products;
pub use publishers::Entity as Publishers;
pub use sliders::Entity as Sliders;
pub use users::Entity as Users;
