pub mod error;
pub mod merge;
pub mod merger;
pub mod normalize;
pub mod reference;
pub mod schema;
