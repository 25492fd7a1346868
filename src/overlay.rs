pub mod gesture;
pub mod hit;
pub mod sticker;
