pub mod api;
pub mod i18n;
pub use i18n::{Tr, current};

pub mod resp;
pub mod server;
pub use server::WebServer;
