use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `PRODUCTS_QUIET=1` silences status lines; tables and JSON are still printed.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("PRODUCTS_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
