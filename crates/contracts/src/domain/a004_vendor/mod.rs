pub mod aggregate;

pub use aggregate::Vendor;
