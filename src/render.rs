use crate::grid::{COLS, CellAddress, Grid, ROWS, column_letter};

/// One element of the rendered sheet, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridNode {
    /// Blank top-left placeholder.
    Corner,
    ColumnHeader(char),
    RowHeader(usize),
    /// Editable text input pre-filled with the cell value.
    Input { address: CellAddress, value: String },
}

impl GridNode {
    /// Text shown by header nodes.
    pub fn label(&self) -> Option<String> {
        match self {
            GridNode::ColumnHeader(letter) => Some(letter.to_string()),
            GridNode::RowHeader(number) => Some(number.to_string()),
            GridNode::Corner | GridNode::Input { .. } => None,
        }
    }
}

/// Something the sheet can be drawn onto.
///
/// A render always starts with `clear` and then appends every node of
/// [`layout`]; surfaces never see partial updates.
pub trait Surface {
    fn clear(&mut self);
    fn append(&mut self, node: GridNode);
}

/// Full description of the sheet: corner, column headers, then each row
/// header followed by that row's inputs.
pub fn layout(grid: &Grid) -> Vec<GridNode> {
    let mut nodes = Vec::with_capacity(1 + COLS + ROWS * (COLS + 1));
    nodes.push(GridNode::Corner);
    nodes.extend((0..COLS).map(|col| GridNode::ColumnHeader(column_letter(col))));

    let mut addresses = CellAddress::all().peekable();
    for row in 0..ROWS {
        nodes.push(GridNode::RowHeader(row + 1));
        while let Some(address) = addresses.next_if(|a| a.row() == row) {
            nodes.push(GridNode::Input {
                address,
                value: grid.get(address).to_string(),
            });
        }
    }
    nodes
}

/// Rebuild the surface from scratch. A missing surface is a no-op.
pub fn render<S: Surface + ?Sized>(surface: Option<&mut S>, grid: &Grid) {
    let Some(surface) = surface else {
        log::debug!("no render target, skipping render");
        return;
    };
    surface.clear();
    for node in layout(grid) {
        surface.append(node);
    }
}

/// In-memory surface holding the nodes of the last render.
///
/// Input values can be edited in place with [`MemorySurface::type_into`],
/// mirroring a user typing into the page before the next rebuild.
#[derive(Debug, Default)]
pub struct MemorySurface {
    nodes: Vec<GridNode>,
    renders: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        MemorySurface::default()
    }

    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    /// Number of full rebuilds so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn input_value(&self, address: CellAddress) -> Option<&str> {
        self.nodes.iter().find_map(|node| match node {
            GridNode::Input { address: a, value } if *a == address => Some(value.as_str()),
            _ => None,
        })
    }

    /// Change the transient value of one input. Returns false if the input is not on the surface.
    pub fn type_into(&mut self, address: CellAddress, text: &str) -> bool {
        for node in &mut self.nodes {
            if let GridNode::Input { address: a, value } = node {
                if *a == address {
                    *value = text.to_string();
                    return true;
                }
            }
        }
        false
    }
}

impl Surface for MemorySurface {
    fn clear(&mut self) {
        self.nodes.clear();
        self.renders += 1;
    }

    fn append(&mut self, node: GridNode) {
        self.nodes.push(node);
    }
}
