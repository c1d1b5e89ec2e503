//! Rendering of command results.

pub mod json;
pub mod pretty;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Renders `value` as compact JSON, or through `pretty` for terminal output.
pub fn render<T, F>(value: &T, format: OutputFormat, pretty: F) -> String
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => pretty(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekit_core::WriteResponse;

    #[test]
    fn test_render_picks_renderer_by_format() {
        let response = WriteResponse::default();

        assert_eq!(
            render(&response, OutputFormat::Json, |_| String::from("pretty")),
            "{}"
        );
        assert_eq!(
            render(&response, OutputFormat::Pretty, |r| pretty::format_write("Stored", r)),
            "Stored"
        );
    }
}
