pub mod authors;
pub mod blogs;
pub mod health;
pub mod shared;
