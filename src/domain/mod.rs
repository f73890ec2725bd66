pub mod addon;
pub mod booking;
pub mod coupon;
pub mod media;
pub mod payment;
pub mod plan;
pub mod trainer;

pub use addon::*;
pub use booking::*;
pub use coupon::*;
pub use media::*;
pub use payment::*;
pub use plan::*;
pub use trainer::*;
