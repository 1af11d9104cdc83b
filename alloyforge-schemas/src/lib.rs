pub mod composition;
pub mod dosing;
pub mod file_formats;
pub mod material;
pub mod objective;
pub mod optimizer;
pub mod properties;
pub mod request;
