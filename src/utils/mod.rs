pub mod disposition;
pub mod format;
pub mod hash;
pub mod html;
pub mod pdf;
pub mod token;
