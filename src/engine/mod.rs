pub mod animation;
pub mod input;
pub mod sensor;
pub mod time;
