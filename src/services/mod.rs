pub mod flipbook_service;
pub mod visibility;
