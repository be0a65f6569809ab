pub mod presign;
pub mod static_files;
