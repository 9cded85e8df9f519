pub mod factory;
pub mod log_event;
pub mod property;
pub mod value;

pub use factory::{DefaultPropertyFactory, PropertyFactory};
pub use log_event::LogEvent;
pub use property::Property;
pub use value::{PropertyValue, Scalar};
