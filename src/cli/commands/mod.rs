pub mod init_db;
pub mod token;
