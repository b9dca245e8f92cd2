pub mod catalog;
pub(crate) mod gateway;
pub(crate) mod recorded;
pub(crate) mod scripted;
