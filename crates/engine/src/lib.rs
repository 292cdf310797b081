pub mod catalog;
pub mod climate;
pub mod generator;
pub mod model;
pub mod summary;
pub mod validator;
