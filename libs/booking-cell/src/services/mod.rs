pub mod booking;
pub mod upcoming;

pub use booking::BookingService;
