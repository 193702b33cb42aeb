// Library for tests to access modules

pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod normalizer;
pub mod render;
pub mod routes;
pub mod selection;
pub mod source;
pub mod version;
pub mod viewer;
