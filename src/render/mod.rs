//! Container list rendering.
//!
//! One call runs validate, fetch, header, rows, align in that order and
//! either returns the whole table or the first error; nothing is written
//! anywhere before that. Each cell's color markers are compiled as the
//! cell is written, so the aligner only ever sees ANSI sequences.

pub mod align;
pub mod columns;
pub mod error;
pub mod fields;
pub mod filter;
pub mod options;

use std::io::{self, Write};

use chrono::Utc;
use tracing::debug;

use crate::color::{Color, Delimiters, Painter};
use crate::docker::{ContainerRecord, ContainerSource};
use crate::markup::{self, Mode};

use columns::Layout;
use fields::FieldContext;

pub use error::RenderError;
pub use options::{NameFilter, RenderOptions};

/// Fetches containers from `source` and renders them as an aligned table.
pub async fn compile_output<S>(source: &S, options: &RenderOptions) -> Result<String, RenderError>
where
    S: ContainerSource + ?Sized,
{
    let layout = Layout::resolve(options)?;
    debug!(columns = ?layout.columns, show_sizes = layout.show_sizes, "columns resolved");

    if options.show_sizes && !options.quiet && !layout.show_sizes {
        debug!("size option ignored: SIZE is not among the requested columns");
    }

    let request = options.list_request(layout.show_sizes);
    let containers = source
        .list_containers(request)
        .await
        .map_err(|source| RenderError::UpstreamFetch { source })?;
    debug!(count = containers.len(), ?request, "containers fetched");

    render_containers(&containers, options, Utc::now().timestamp())
}

/// Renders an already fetched container list. `now` is epoch seconds.
pub fn render_containers(
    containers: &[ContainerRecord],
    options: &RenderOptions,
    now: i64,
) -> Result<String, RenderError> {
    let layout = Layout::resolve(options)?;
    ListRenderer::new(options, layout, now).render(containers)
}

// ======================================================
// RENDERER
// ======================================================

struct ListRenderer<'a> {
    options: &'a RenderOptions,
    layout: Layout,
    painter: Painter,
    mode: Mode,
    now: i64,
}

impl<'a> ListRenderer<'a> {
    fn new(options: &'a RenderOptions, layout: Layout, now: i64) -> Self {
        let mode = match options.colorize {
            true => Mode::Ansi,
            false => Mode::Strip,
        };
        Self {
            options,
            layout,
            painter: Painter::new(options.colorize, Delimiters::default()),
            mode,
            now,
        }
    }

    fn render(&self, containers: &[ContainerRecord]) -> Result<String, RenderError> {
        let mut out = align::aligner();

        if !self.options.quiet {
            self.write_header(&mut out)?;
        }

        let mut shown = 0;
        for container in containers {
            if let Some(filter) = &self.options.name_filter {
                if !filter.matches(&container.names) {
                    debug!(id = %container.id, pattern = filter.pattern(), "skipped by name filter");
                    continue;
                }
            }
            self.write_row(&mut out, container)?;
            shown += 1;
        }
        debug!(shown, total = containers.len(), "rows written");

        align::finish(out).map_err(|source| RenderError::WriteFailure {
            context: "aligned columns".to_string(),
            source,
        })
    }

    /// Compiles one painted cell and writes it, preceded by a column
    /// separator unless it is the first cell of the line.
    fn write_cell<W, F>(&self, out: &mut W, index: usize, cell: &str, context: F) -> Result<(), RenderError>
    where
        W: Write,
        F: Fn() -> String,
    {
        let compiled = markup::compile(cell, self.painter.delimiters(), self.mode)?;
        let failure = |source: io::Error| RenderError::WriteFailure {
            context: context(),
            source,
        };

        if index > 0 {
            out.write_all(b"\t").map_err(failure)?;
        }
        out.write_all(compiled.as_bytes()).map_err(failure)
    }

    fn write_header<W: Write>(&self, out: &mut W) -> Result<(), RenderError> {
        let context = || "columns header".to_string();
        let failure = |source: io::Error| RenderError::WriteFailure {
            context: context(),
            source,
        };

        for (i, column) in self.layout.columns.iter().enumerate() {
            let mut cell = Vec::new();
            self.painter
                .write(&mut cell, Color::LightBlue, column.name())
                .map_err(failure)?;
            self.write_cell(out, i, &String::from_utf8_lossy(&cell), context)?;
        }
        out.write_all(b"\n").map_err(failure)
    }

    fn write_row<W: Write>(&self, out: &mut W, container: &ContainerRecord) -> Result<(), RenderError> {
        let ctx = FieldContext {
            options: self.options,
            painter: &self.painter,
            now: self.now,
        };

        for (i, column) in self.layout.columns.iter().enumerate() {
            let cell = (column.formatter())(container, &ctx);
            self.write_cell(out, i, &cell, || format!("container's field \"{}\"", column))?;
        }

        out.write_all(b"\n").map_err(|source| RenderError::WriteFailure {
            context: "container info".to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::{ListRequest, PublishedPort, SourceError};
    use crate::units::{DAY_SECS, GIGABYTE, HOUR_SECS};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    const NOW: i64 = 1_700_000_000;

    fn web1() -> ContainerRecord {
        ContainerRecord {
            id: "abcdef0123456789".to_string(),
            image: "nginx:latest".to_string(),
            command: "nginx -g daemon".to_string(),
            created: NOW - HOUR_SECS,
            status: "Up 2 hours".to_string(),
            ports: vec![PublishedPort::new(80, "tcp")],
            names: vec!["/web1".to_string()],
            ..Default::default()
        }
    }

    fn cache() -> ContainerRecord {
        ContainerRecord {
            id: "0123456789abcdef".to_string(),
            image: "redis".to_string(),
            command: "redis-server".to_string(),
            created: NOW - 15 * DAY_SECS,
            status: "Exited (0) 1 week ago".to_string(),
            ports: vec![
                PublishedPort::new(6380, "tcp"),
                PublishedPort::new(6379, "tcp").published(Some("0.0.0.0"), 6379),
            ],
            names: vec!["/cache".to_string()],
            size_rw: 2 * GIGABYTE,
            size_root_fs: 3 * GIGABYTE,
        }
    }

    fn plain() -> RenderOptions {
        RenderOptions::default()
    }

    /// Removes `ESC [ ... m` sequences.
    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    struct FakeSource {
        containers: Vec<ContainerRecord>,
        requests: Mutex<Vec<ListRequest>>,
    }

    impl FakeSource {
        fn new(containers: Vec<ContainerRecord>) -> Self {
            Self {
                containers,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ListRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContainerSource for FakeSource {
        async fn list_containers(&self, request: ListRequest) -> Result<Vec<ContainerRecord>, SourceError> {
            self.requests.lock().unwrap().push(request);
            Ok(self.containers.clone())
        }
    }

    struct UnreachableDaemon;

    #[async_trait]
    impl ContainerSource for UnreachableDaemon {
        async fn list_containers(&self, _: ListRequest) -> Result<Vec<ContainerRecord>, SourceError> {
            Err("connection refused".into())
        }
    }

    #[test]
    fn renders_aligned_table_without_color() {
        let out = render_containers(&[web1(), cache()], &plain(), NOW).unwrap();

        let expected = concat!(
            "CONTAINER ID     IMAGE            COMMAND               CREATED         STATUS                    PORTS                                NAMES\n",
            "abcdef012345     nginx:latest     \"nginx -g daemon\"     1 hour ago      Up 2 hours                80/tcp                               web1\n",
            "0123456789ab     redis            \"redis-server\"        2 weeks ago     Exited (0) 1 week ago     0.0.0.0:6379->6379/tcp, 6380/tcp     cache\n",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn row_cells_match_the_documented_example() {
        let out = render_containers(&[web1()], &plain(), NOW).unwrap();
        let row = out.lines().nth(1).unwrap();
        let cells: Vec<&str> = row
            .split("  ")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();

        assert_eq!(
            cells,
            vec![
                "abcdef012345",
                "nginx:latest",
                "\"nginx -g daemon\"",
                "1 hour ago",
                "Up 2 hours",
                "80/tcp",
                "web1",
            ]
        );
    }

    #[test]
    fn quiet_mode_lists_only_identifiers() {
        let options = RenderOptions {
            quiet: true,
            show_sizes: true,
            colorize: true,
            columns: vec!["NAMES".to_string()],
            ..Default::default()
        };
        let out = render_containers(&[web1(), cache()], &options, NOW).unwrap();
        assert_eq!(strip_ansi(&out), "abcdef012345\n0123456789ab\n");
    }

    #[test]
    fn quiet_mode_honours_no_trunc() {
        let options = RenderOptions {
            quiet: true,
            no_trunc: true,
            ..Default::default()
        };
        let out = render_containers(&[web1()], &options, NOW).unwrap();
        assert_eq!(out, "abcdef0123456789\n");
    }

    #[test]
    fn colorized_output_brackets_the_same_text() {
        let colored = RenderOptions {
            colorize: true,
            ..Default::default()
        };
        let with_color = render_containers(&[web1(), cache()], &colored, NOW).unwrap();
        let without = render_containers(&[web1(), cache()], &plain(), NOW).unwrap();

        assert!(with_color.contains("\x1b[90mabcdef012345\x1b[0m"));
        assert!(with_color.contains("\x1b[94mCONTAINER ID\x1b[0m"));
        assert!(!without.contains('\x1b'));
        assert_eq!(strip_ansi(&with_color), without);
    }

    #[test]
    fn explicit_columns_render_in_requested_order() {
        let options = RenderOptions {
            columns: vec!["names".to_string(), "IMAGE".to_string()],
            ..Default::default()
        };
        let out = render_containers(&[web1()], &options, NOW).unwrap();
        assert_eq!(out, "NAMES     IMAGE\nweb1      nginx:latest\n");
    }

    #[test]
    fn size_column_renders_when_requested() {
        let options = RenderOptions {
            show_sizes: true,
            columns: vec!["NAMES".to_string(), "SIZE".to_string()],
            ..Default::default()
        };
        let out = render_containers(&[cache()], &options, NOW).unwrap();
        assert_eq!(out, "NAMES     SIZE\ncache     2.0 GB (virtual 3.0 GB)\n");
    }

    #[test]
    fn name_filter_skips_non_matching_containers() {
        let options = RenderOptions {
            quiet: true,
            name_filter: Some(NameFilter::CaseInsensitive("WEB".to_string())),
            ..Default::default()
        };
        let out = render_containers(&[web1(), cache()], &options, NOW).unwrap();
        assert_eq!(out, "abcdef012345\n");
    }

    #[test]
    fn empty_list_renders_header_only() {
        let options = RenderOptions {
            columns: vec!["CONTAINER ID".to_string(), "NAMES".to_string()],
            ..Default::default()
        };
        let out = render_containers(&[], &options, NOW).unwrap();
        assert_eq!(out, "CONTAINER ID     NAMES\n");
    }

    #[test]
    fn marker_delimiters_in_field_values_are_rendered_harmlessly() {
        let container = ContainerRecord {
            command: "printf '\u{3}'".to_string(),
            names: vec!["/odd\u{2}name".to_string()],
            ..web1()
        };
        let options = RenderOptions {
            columns: vec!["COMMAND".to_string(), "NAMES".to_string()],
            ..Default::default()
        };

        let out = render_containers(&[container.clone()], &options, NOW).unwrap();
        assert_eq!(
            out,
            "COMMAND          NAMES\n\"printf '\u{FFFD}'\"     odd\u{FFFD}name\n"
        );

        let colored = RenderOptions {
            colorize: true,
            ..options
        };
        let with_color = render_containers(&[container], &colored, NOW).unwrap();
        assert_eq!(strip_ansi(&with_color), out);
    }

    #[test]
    fn tabs_in_field_values_do_not_add_columns() {
        let container = ContainerRecord {
            command: "a\tb".to_string(),
            ..web1()
        };
        let options = RenderOptions {
            columns: vec!["COMMAND".to_string(), "NAMES".to_string()],
            ..Default::default()
        };

        let out = render_containers(&[container], &options, NOW).unwrap();
        assert_eq!(out, "COMMAND     NAMES\n\"a b\"       web1\n");
    }

    #[test]
    fn invalid_columns_fail_before_rendering() {
        let options = RenderOptions {
            columns: vec!["IMAGE".to_string(), "LABELS".to_string()],
            ..Default::default()
        };
        let err = render_containers(&[web1()], &options, NOW).unwrap_err();
        assert!(matches!(err, RenderError::InvalidColumnName { ref name } if name == "LABELS"));
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn compile_output_passes_options_to_the_engine() {
        let source = FakeSource::new(vec![cache()]);
        let options = RenderOptions {
            all: true,
            show_sizes: true,
            ..Default::default()
        };

        let out = compile_output(&source, &options).await.unwrap();

        assert_eq!(
            source.requests(),
            vec![ListRequest {
                include_stopped: true,
                include_sizes: true,
            }]
        );
        assert!(out.lines().next().unwrap().ends_with("SIZE"));
    }

    #[tokio::test]
    async fn degraded_size_option_is_not_requested_from_engine() {
        let source = FakeSource::new(vec![web1()]);
        let options = RenderOptions {
            show_sizes: true,
            columns: vec!["NAMES".to_string()],
            ..Default::default()
        };

        compile_output(&source, &options).await.unwrap();

        assert_eq!(source.requests(), vec![ListRequest::default()]);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn degraded_size_option_stays_quiet_at_warn_level() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let source = FakeSource::new(vec![web1()]);
        let options = RenderOptions {
            show_sizes: true,
            columns: vec!["NAMES".to_string()],
            ..Default::default()
        };
        compile_output(&source, &options).await.unwrap();

        assert!(log.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn configuration_errors_skip_the_fetch() {
        let source = FakeSource::new(vec![web1()]);
        let options = RenderOptions {
            columns: vec!["SIZE".to_string()],
            ..Default::default()
        };

        let err = compile_output(&source, &options).await.unwrap_err();

        assert!(matches!(err, RenderError::SizeColumnWithoutSizeOption));
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn upstream_failures_are_wrapped() {
        let err = compile_output(&UnreachableDaemon, &plain()).await.unwrap_err();

        assert!(matches!(err, RenderError::UpstreamFetch { .. }));
        assert_eq!(err.to_string(), "could not get container list: connection refused");
        assert!(!err.is_configuration());
    }
}
