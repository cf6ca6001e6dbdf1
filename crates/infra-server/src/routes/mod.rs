//! HTTP route handlers

pub mod applications;
pub mod projects;
pub mod search;
pub mod teams;
pub mod users;

#[cfg(test)]
mod tests;
