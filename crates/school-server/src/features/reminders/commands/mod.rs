pub mod send;

pub use send::{ReminderSummary, SendFeeRemindersCommand, SendFeeRemindersError};
