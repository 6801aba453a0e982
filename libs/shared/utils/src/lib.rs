pub mod time;
pub mod test_utils;
