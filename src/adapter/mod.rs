pub mod datastore;
pub mod notification;
pub mod repository;
pub mod storage;
