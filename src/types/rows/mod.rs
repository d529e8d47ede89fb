pub mod daily;
pub mod measurements;
pub mod monthly;
pub mod yearly;
