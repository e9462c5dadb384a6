//! Audit trail of every font decision.
//!
//! The walker reports each decision and each slide boundary to an
//! [`AuditSink`]. The CLI writes them to a per-file log with timestamps; tests
//! collect them with [`MemorySink`].

/// Receives audit messages in the order they are produced.
pub trait AuditSink {
    /// Record one message, optionally tagged with the text it concerns.
    fn emit(&mut self, message: &str, excerpt: Option<&str>);
}

impl<S: AuditSink + ?Sized> AuditSink for &mut S {
    fn emit(&mut self, message: &str, excerpt: Option<&str>) {
        (**self).emit(message, excerpt);
    }
}

/// Build a log line: `<timestamp> [<excerpt>] <message>`.
///
/// The bracketed excerpt is left out entirely when there is none; an empty
/// excerpt still prints as `[]`.
pub fn format_line(timestamp: &str, message: &str, excerpt: Option<&str>) -> String {
    match excerpt {
        Some(text) => format!("{timestamp} [{text}] {message}"),
        None => format!("{timestamp} {message}"),
    }
}

/// Boundary marker logged before a slide's shapes (1-based).
pub fn slide_marker(number: usize) -> String {
    format!("--- Slide {number} ---")
}

/// Boundary marker logged before a slide master's styles (1-based).
pub fn slide_master_marker(number: usize) -> String {
    format!("--- Slide Master {number} ---")
}

/// In-memory sink keeping lines without timestamps.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Collected lines, `[<excerpt>] <message>` or `<message>`.
    pub lines: Vec<String>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl AuditSink for MemorySink {
    fn emit(&mut self, message: &str, excerpt: Option<&str>) {
        self.lines.push(match excerpt {
            Some(text) => format!("[{text}] {message}"),
            None => message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("2025-10-17 09:30:00", "--- Slide 1 ---", None),
            "2025-10-17 09:30:00 --- Slide 1 ---"
        );
        assert_eq!(
            format_line(
                "2025-10-17 09:30:00",
                "Replace minor latin font from Arial to +mn-lt",
                Some("Hello")
            ),
            "2025-10-17 09:30:00 [Hello] Replace minor latin font from Arial to +mn-lt"
        );
        assert_eq!(
            format_line("t", "Replace minor latin font from Arial to +mn-lt", Some("")),
            "t [] Replace minor latin font from Arial to +mn-lt"
        );
    }

    #[test]
    fn test_markers() {
        assert_eq!(slide_marker(3), "--- Slide 3 ---");
        assert_eq!(slide_master_marker(1), "--- Slide Master 1 ---");
    }

    #[test]
    fn test_memory_sink_through_reference() {
        fn emit_both<S: AuditSink>(mut sink: S) {
            sink.emit("--- Slide 1 ---", None);
            sink.emit("Preserve minor latin font as Consolas", Some("let x = 1;"));
        }

        let mut sink = MemorySink::new();
        emit_both(&mut sink);

        assert_eq!(
            sink.lines,
            vec![
                "--- Slide 1 ---",
                "[let x = 1;] Preserve minor latin font as Consolas",
            ]
        );
        assert!(sink.contains("as Consolas"));
    }
}
