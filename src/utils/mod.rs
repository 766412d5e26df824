pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{absolutize, host_of, is_valid_url};
