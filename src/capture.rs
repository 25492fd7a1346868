pub mod camera;
pub mod roll;
pub mod upload;
