/// Like `dbg!`, but returns the `[file:line] expr: value` text instead of
/// printing it. Several expressions are joined with `, `; no argument gives
/// just the location.
#[macro_export]
macro_rules! format_dbg {
    () => {
        format!("[{}:{}]", file!(), line!())
    };
    ($($dbg_expr:expr),+ $(,)?) => {{
        let values: Vec<String> = vec![$(
            format!("{}: {:?}", stringify!($dbg_expr), $dbg_expr)
        ),+];
        format!("[{}:{}] {}", file!(), line!(), values.join(", "))
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_format_dbg() {
        let dt_s = 0.01;
        let steps = 3;
        assert!(format_dbg!().contains("macros.rs:"));
        assert!(format_dbg!(dt_s).ends_with("] dt_s: 0.01"));
        assert!(format_dbg!(dt_s, steps).ends_with("] dt_s: 0.01, steps: 3"));
    }
}
