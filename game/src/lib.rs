pub mod clock;
pub mod scene;
pub mod server;
pub mod settings;
pub mod store;
pub mod swing;
pub mod timing;
pub mod viewer;
