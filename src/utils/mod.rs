pub mod host;
pub mod shell;

#[cfg(test)]
pub mod test_utils;
