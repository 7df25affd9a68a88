pub mod assignments;
pub mod batch;
pub mod categories;
pub mod fields;
pub mod forms;
pub mod http;
pub mod outcome;
pub mod pages;
pub mod path;
pub mod record;

pub use batch::{BatchOptions, Dispatch};
pub use outcome::*;
pub use record::Record;
