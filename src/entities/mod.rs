pub mod prelude;

pub mod flipbooks;
