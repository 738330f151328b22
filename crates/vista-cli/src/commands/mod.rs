pub mod backup;
pub mod entries;
pub mod events;
pub mod maintenance;
