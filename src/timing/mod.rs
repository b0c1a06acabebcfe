pub mod grouping;
pub mod model;
