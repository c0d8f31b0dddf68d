pub mod list;

pub use list::{InchargeDetail, ListInchargesError, ListInchargesQuery};
