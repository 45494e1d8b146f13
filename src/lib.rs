pub mod image_plate;
pub mod logger;
