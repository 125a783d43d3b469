pub mod flipbooks;
pub mod health;
