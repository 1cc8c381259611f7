pub mod health;
pub mod image_to_speech;
