pub mod fingerprint;
pub mod replay;
pub mod taxonomy;
pub mod verify;
