pub mod directory;
pub mod slots;
