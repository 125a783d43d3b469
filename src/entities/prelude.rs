pub use super::flipbooks::Entity as Flipbooks;
