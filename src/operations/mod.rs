pub mod offset;
pub mod split;
