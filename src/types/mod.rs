pub mod dataset;
pub mod location;
pub mod period;
pub mod rows;
pub mod view;
