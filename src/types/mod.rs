mod character;
mod page;

pub use character::Character;
pub use page::{Page, PageInfo};
