pub mod builder;
pub mod catalog;
pub mod connector;
pub mod quota;
pub mod sampler;
