//! Registration and login endpoints

pub mod login;
pub mod register;
