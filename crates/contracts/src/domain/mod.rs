pub mod a001_invoice;
pub mod a002_operation;
pub mod a003_client;
pub mod a004_vendor;
pub mod common;
