pub mod favorite;
pub mod predict;
pub mod stats;
pub mod status;
