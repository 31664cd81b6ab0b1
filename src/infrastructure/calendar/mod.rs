pub mod holiday_client;
pub mod jalali;

pub use holiday_client::{HolidayClient, HolidayDto};
pub use jalali::JalaliDay;
