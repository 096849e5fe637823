use serde::{Deserialize, Serialize};

pub mod browser;
pub mod pages;
pub mod resources;
pub mod users;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}
