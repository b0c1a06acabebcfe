pub mod crop;
pub mod ffmpeg;
pub mod probe;
