pub mod endpoints;
pub mod feed;
pub mod output;
pub mod station;
