pub mod availability;
pub mod slots;

pub use slots::SlotService;
