pub mod category;
pub mod create;
pub mod delete;
pub mod get;
pub mod health;
pub mod list;
pub mod not_found;
pub mod openapi;
pub mod update;

#[cfg(test)]
pub(crate) mod test_support;

pub use category::category_handler;
pub use create::create_handler;
pub use delete::delete_handler;
pub use get::get_handler;
pub use health::health_handler;
pub use list::list_handler;
pub use not_found::not_found_handler;
pub use openapi::openapi_handler;
pub use update::update_handler;
