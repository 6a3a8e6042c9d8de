//! Session token encoding and validation.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::SessionTokenDecoder;
pub use encoder::SessionTokenEncoder;
