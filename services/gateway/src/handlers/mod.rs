pub mod data;
pub mod publish;
pub mod schema;
