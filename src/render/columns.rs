use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::render::error::RenderError;
use crate::render::fields::{self, CellFormatter};
use crate::render::options::RenderOptions;

// ======================================================
// COLUMN REGISTRY
// ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ContainerId,
    Image,
    Command,
    Created,
    Status,
    Ports,
    Names,
    Size,
}

impl Column {
    /// Every column, in canonical display order.
    pub const ALL: [Column; 8] = [
        Column::ContainerId,
        Column::Image,
        Column::Command,
        Column::Created,
        Column::Status,
        Column::Ports,
        Column::Names,
        Column::Size,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::ContainerId => "CONTAINER ID",
            Column::Image => "IMAGE",
            Column::Command => "COMMAND",
            Column::Created => "CREATED",
            Column::Status => "STATUS",
            Column::Ports => "PORTS",
            Column::Names => "NAMES",
            Column::Size => "SIZE",
        }
    }

    pub fn formatter(self) -> CellFormatter {
        match self {
            Column::ContainerId => |c, ctx| fields::format_id(&c.id, ctx),
            Column::Image => |c, ctx| fields::format_image(&c.image, ctx),
            Column::Command => |c, ctx| fields::format_command(&c.command, ctx),
            Column::Created => |c, ctx| fields::format_created(c.created, ctx),
            Column::Status => |c, ctx| fields::format_status(&c.status, ctx),
            Column::Ports => |c, ctx| fields::format_ports(&c.ports, ctx),
            Column::Names => |c, ctx| fields::format_names(&c.names, ctx),
            Column::Size => |c, ctx| fields::format_size(c.size_rw, c.size_root_fs, ctx),
        }
    }

    pub(crate) fn known_names() -> String {
        Self::ALL.map(Column::name).join(", ")
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = RenderError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| RenderError::InvalidColumnName { name: s.trim().to_string() })
    }
}

pub fn is_recognized_column(name: &str) -> bool {
    name.parse::<Column>().is_ok()
}

pub fn default_columns(show_sizes: bool) -> Vec<Column> {
    Column::ALL
        .into_iter()
        .filter(|c| show_sizes || *c != Column::Size)
        .collect()
}

/// Parses a user-supplied column list, rejecting unknown and repeated names.
/// An unknown name anywhere in the list is reported ahead of any repeat.
pub fn parse_columns<S: AsRef<str>>(names: &[S]) -> Result<Vec<Column>, RenderError> {
    if let Some(unknown) = names.iter().find(|n| !is_recognized_column(n.as_ref())) {
        return Err(RenderError::InvalidColumnName {
            name: unknown.as_ref().trim().to_string(),
        });
    }

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(names.len());

    for name in names {
        let column: Column = name.as_ref().parse()?;
        if !seen.insert(column) {
            return Err(RenderError::DuplicateColumn { name: column.name().to_string() });
        }
        columns.push(column);
    }

    Ok(columns)
}

// ======================================================
// EFFECTIVE LAYOUT
// ======================================================

/// Columns a rendering will actually show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub columns: Vec<Column>,
    /// `show_sizes` after reconciling it with an explicit column list.
    pub show_sizes: bool,
}

impl Layout {
    pub fn resolve(options: &RenderOptions) -> Result<Self, RenderError> {
        if options.quiet {
            return Ok(Self {
                columns: vec![Column::ContainerId],
                show_sizes: false,
            });
        }

        if options.columns.is_empty() {
            return Ok(Self {
                columns: default_columns(options.show_sizes),
                show_sizes: options.show_sizes,
            });
        }

        let columns = parse_columns(&options.columns)?;
        let has_size = columns.contains(&Column::Size);

        if has_size && !options.show_sizes {
            return Err(RenderError::SizeColumnWithoutSizeOption);
        }

        Ok(Self {
            columns,
            show_sizes: has_size,
        })
    }
}
