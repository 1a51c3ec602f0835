use crate::color::{Color, Painter};
use crate::docker::{ContainerRecord, PublishedPort};
use crate::render::filter::strip_name_prefix;
use crate::render::options::RenderOptions;
use crate::units::{self, GIGABYTE, MEGABYTE, MONTH_SECS, WEEK_SECS};

pub const ID_WIDTH: usize = 12;
pub const IMAGE_TAG_WIDTH: usize = 12;
pub const COMMAND_WIDTH: usize = 20;

const ELLIPSIS: char = '…';

/// Renders one column of one container.
pub type CellFormatter = fn(&ContainerRecord, &FieldContext<'_>) -> String;

pub struct FieldContext<'a> {
    pub options: &'a RenderOptions,
    pub painter: &'a Painter,
    /// Epoch seconds the ages are measured against.
    pub now: i64,
}

/// Tabs and line breaks would open a column or a row; they show as spaces.
fn single_line(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

/// First `width` characters of `s`, if it is longer than that.
fn truncated(s: &str, width: usize) -> Option<&str> {
    s.char_indices().nth(width).map(|(end, _)| &s[..end])
}

// ======================================================
// IDENTIFIER / IMAGE / COMMAND
// ======================================================

pub fn format_id(id: &str, ctx: &FieldContext<'_>) -> String {
    let shown = match ctx.options.no_trunc {
        true => id,
        false => truncated(id, ID_WIDTH).unwrap_or(id),
    };
    ctx.painter.paint(Color::DarkGray, shown)
}

pub fn format_image(image: &str, ctx: &FieldContext<'_>) -> String {
    let image = single_line(image);
    let (repository, tag) = match image.split_once(':') {
        Some((repository, tag)) => (repository, Some(tag)),
        None => (image.as_str(), None),
    };

    let mut out = ctx.painter.paint(Color::LightYellow, repository);

    if let Some(tag) = tag {
        let tag = match truncated(tag, IMAGE_TAG_WIDTH) {
            Some(head) if !ctx.options.no_trunc => format!("{}{}", head, ELLIPSIS),
            _ => tag.to_string(),
        };
        out.push_str(&ctx.painter.paint_fmt(Color::LightGreen, format_args!(":{}", tag)));
    }

    out
}

pub fn format_command(command: &str, ctx: &FieldContext<'_>) -> String {
    let command = single_line(command);
    let command = match truncated(&command, COMMAND_WIDTH) {
        Some(head) if !ctx.options.no_trunc => format!("{}{}", head, ELLIPSIS),
        _ => command.clone(),
    };
    ctx.painter.paint_fmt(Color::DarkGray, format_args!("\"{}\"", command))
}

// ======================================================
// CREATED / STATUS
// ======================================================

pub fn created_color(elapsed_secs: i64) -> Color {
    if elapsed_secs > MONTH_SECS {
        Color::Red
    } else if elapsed_secs > WEEK_SECS {
        Color::Yellow
    } else {
        Color::LightGreen
    }
}

pub fn format_created(created: i64, ctx: &FieldContext<'_>) -> String {
    let color = created_color(ctx.now - created);
    ctx.painter.paint(color, &units::relative_time(created, ctx.now))
}

pub fn format_status(status: &str, ctx: &FieldContext<'_>) -> String {
    let color = match status.starts_with("Up") {
        true => Color::LightGreen,
        false => Color::Default,
    };
    ctx.painter.paint(color, &single_line(status))
}

// ======================================================
// PORTS
// ======================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCell {
    pub display: String,
    /// `display` without markers; ordering uses this.
    pub sort_key: String,
}

pub fn format_port(port: &PublishedPort, ctx: &FieldContext<'_>) -> PortCell {
    let mut host = port.ip.clone().unwrap_or_default();
    if let Some(public_port) = port.public_port {
        if !host.is_empty() {
            host.push(':');
        }
        host.push_str(&public_port.to_string());
    }

    let private = format!("{}/{}", port.private_port, port.typ);
    // Unpainted, but still scrubbed of marker delimiters.
    let plain = ctx.painter.paint(Color::NoColor, &private);

    if host.is_empty() {
        return PortCell {
            display: plain,
            sort_key: private,
        };
    }

    let mapping = format!("{}->", host);
    PortCell {
        display: format!("{}{}", ctx.painter.paint(Color::LightCyan, &mapping), plain),
        sort_key: format!("{}{}", mapping, private),
    }
}

pub fn format_ports(ports: &[PublishedPort], ctx: &FieldContext<'_>) -> String {
    let mut cells: Vec<PortCell> = ports.iter().map(|p| format_port(p, ctx)).collect();
    cells.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));

    cells
        .into_iter()
        .map(|cell| cell.display)
        .collect::<Vec<_>>()
        .join(", ")
}

// ======================================================
// NAMES / SIZE
// ======================================================

pub fn format_names(names: &[String], ctx: &FieldContext<'_>) -> String {
    let names: Vec<String> = names.iter().map(|n| single_line(strip_name_prefix(n))).collect();
    ctx.painter.paint(Color::Default, &names.join(", "))
}

pub fn size_color(size: i64) -> Color {
    if (0..500 * MEGABYTE).contains(&size) {
        Color::Default
    } else if (500 * MEGABYTE..GIGABYTE).contains(&size) {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// `sizeRw (virtual sizeRootFs)`.
pub fn format_size(size_rw: i64, size_root_fs: i64, ctx: &FieldContext<'_>) -> String {
    // The virtual part is bucketed by the writable size as well.
    let color = size_color(size_rw);
    let human = |size: i64| units::human_bytes(u64::try_from(size).unwrap_or_default());

    format!(
        "{} ({})",
        ctx.painter.paint(color, &human(size_rw)),
        ctx.painter.paint_fmt(color, format_args!("virtual {}", human(size_root_fs))),
    )
}
