pub mod addons;
pub mod bookings;
pub mod coupons;
pub mod media;
pub mod payments;
pub mod plans;
pub mod root;
pub mod trainers;
