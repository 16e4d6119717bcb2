pub mod conditions;
pub mod convert;
