use crate::types::period::Month;
use crate::types::rows::measurements::Measurements;

#[derive(Debug, PartialEq, Clone)]
pub struct MonthlyRow {
    pub state: String, // state
    pub month: Month,  // year, month
    pub stats: Measurements,
}
