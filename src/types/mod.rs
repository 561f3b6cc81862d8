mod error;
mod pagination;

pub mod form;
pub mod id;

pub use error::Error;
pub use pagination::{Pagination, Pager};
