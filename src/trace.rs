//! Tracing hooks for template preparation, rendering and query emission.
//!
//! Enable the `tracing` feature (on by default) to emit `debug` events via
//! the `tracing` crate. With the feature off these macros expand to nothing.

/// Emit a debug event after a template has been prepared.
///
/// ```ignore
/// sqlstencil_trace_prepare!(dialect, text.len(), has_dynamic);
/// ```
#[macro_export]
macro_rules! sqlstencil_trace_prepare {
    ($dialect:expr, $len:expr, $dynamic:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(
            dialect = %$dialect,
            template_len = $len,
            dynamic = $dynamic,
            "sqlstencil.prepare"
        );
    };
}

/// Emit a debug event with the SQL produced by a render call.
#[macro_export]
macro_rules! sqlstencil_trace_render {
    ($sql:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(sql = %$sql, "sqlstencil.render");
    };
}

/// Emit a debug event with the SQL text and parameter count of a built query.
#[macro_export]
macro_rules! sqlstencil_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(sql = %$sql, params = $param_count, "sqlstencil.query");
    };
}
