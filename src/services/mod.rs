pub mod dictionary;
pub mod importer;
pub mod resolver;
pub mod review;
pub mod scheduler;
pub mod session_store;
pub mod users;
pub mod vocabulary;
