// Table model, expression grammar, pipeline stages, and error modeling.
pub mod aggregate;
pub mod compare;
pub mod error;
pub mod expr;
pub mod filter;
pub mod load;
pub mod order;
pub mod pipeline;
pub mod table;
