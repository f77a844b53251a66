// Request model exports
pub mod category;
pub mod params;

pub use category::{join_ids, Category, UnknownCategory};
pub use params::{Argument, ParamField, ParameterSet, UnknownField, DETAILS_UUID_ARG, FIELD_COUNT};
