use crate::types::period::Year;
use crate::types::rows::measurements::Measurements;

#[derive(Debug, PartialEq, Clone)]
pub struct YearlyRow {
    pub state: String, // state
    pub year: Year,    // year
    pub stats: Measurements,
}
