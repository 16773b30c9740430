pub mod download;
pub mod encoder;

pub use self::download::{export_filename, save_csv};
pub use self::encoder::encode_csv;
