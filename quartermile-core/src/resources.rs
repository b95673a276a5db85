//! Data files compiled into the crate, see `quartermile-core/resources`

#![cfg(feature = "resources")]

use include_dir::{include_dir, Dir};

pub const RESOURCES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources");

/// Sorted file names directly under `subdir`; "" or an unknown `subdir`
/// lists the top level
pub fn list_resources(subdir: &str) -> Vec<String> {
    let dir = match RESOURCES_DIR.get_dir(subdir) {
        Some(dir) => dir,
        None => &RESOURCES_DIR,
    };
    let mut names: Vec<String> = dir
        .files()
        .filter_map(|file| file.path().file_name())
        .filter_map(|name| name.to_str())
        .map(String::from)
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_resources() {
        assert_eq!(list_resources(""), vec![String::from("cars.yaml")]);
        assert_eq!(list_resources("missing"), list_resources(""));
    }
}
