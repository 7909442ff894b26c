pub mod aggregate;

pub use aggregate::Operation;
