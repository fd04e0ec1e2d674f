pub mod bus;
pub mod error;
pub mod service;

pub use bus::Bus;
pub use error::RelayError;
pub use service::RelayService;
