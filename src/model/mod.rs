pub mod color;
pub mod connection;
pub mod delivery;
pub mod funnel;
pub mod period;
pub mod segment;

pub use connection::{Connection, Side};
pub use delivery::{Delivery, DeliveryKind};
pub use funnel::Funnel;
pub use period::Period;
pub use segment::Segment;
