use crate::model::{Registry, SaveRecord};

pub const COLUMNS: [&str; 2] = ["Game Name", "Path"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub game_name: String,
    pub path: String,
}

/// What a front-end draws: headers plus one row per record, registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: [&'static str; 2],
    pub rows: Vec<TableRow>,
}

pub fn render(registry: &Registry) -> TableView {
    TableView {
        columns: COLUMNS,
        rows: registry
            .iter()
            .map(|r| TableRow {
                game_name: r.game_name.clone(),
                path: r.path.clone(),
            })
            .collect(),
    }
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain-text layout with both columns padded to the same width.
    pub fn to_text(&self) -> String {
        let width = self
            .rows
            .iter()
            .flat_map(|r| [r.game_name.chars().count(), r.path.chars().count()])
            .chain(self.columns.iter().map(|c| c.chars().count()))
            .max()
            .unwrap_or(0);
        let index_width = self.rows.len().to_string().len().max(1);
        let mut out = format!(
            "{:>iw$}  {:<w$}  {}\n",
            "#",
            self.columns[0],
            self.columns[1],
            iw = index_width,
            w = width
        );
        for (i, row) in self.rows.iter().enumerate() {
            out.push_str(&format!(
                "{:>iw$}  {:<w$}  {}\n",
                i + 1,
                row.game_name,
                row.path,
                iw = index_width,
                w = width
            ));
        }
        out
    }
}

/// At most one selected row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection(Option<usize>);

impl Selection {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn row(index: usize) -> Self {
        Self(Some(index))
    }

    pub fn index(&self) -> Option<usize> {
        self.0
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.0 == Some(index)
    }

    pub fn select(&mut self, index: usize) {
        self.0 = Some(index);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn resolve<'a>(&self, registry: &'a Registry) -> Option<&'a SaveRecord> {
        self.0.and_then(|i| registry.get(i))
    }

    /// Keeps the selection inside `0..len`, dropping it when the table is empty.
    pub fn clamp(&mut self, len: usize) {
        if let Some(i) = self.0 {
            self.0 = if len == 0 { None } else { Some(i.min(len - 1)) };
        }
    }
}
