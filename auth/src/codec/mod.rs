pub mod cipher;
pub mod errors;

pub use cipher::CredentialCodec;
pub use errors::DecodeError;
pub use errors::EncodeError;
