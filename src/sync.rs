use crate::codec;
use crate::config::SheetConfig;
use crate::error::AddressError;
use crate::grid::{CellAddress, Grid};
use crate::location::{Location, WriteMode, write_hash};
use crate::render::{Surface, render};
use crate::scheduler::{Debouncer, Scheduler, TimerHandle};

/// Everything the controller reacts to. All of it arrives on one event loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetEvent {
    /// An input inside the sheet changed. `row`/`col` are the raw `data-row`
    /// and `data-col` attribute values of the input.
    Input {
        row: Option<String>,
        col: Option<String>,
        value: String,
    },
    /// A timer handed out by the scheduler came due.
    TimerFired(TimerHandle),
    /// The URL fragment was changed from outside (navigation, address bar).
    HashChanged,
}

impl SheetEvent {
    /// Convenience constructor for an edit at known coordinates.
    pub fn edit(row: usize, col: usize, value: impl Into<String>) -> Self {
        SheetEvent::Input {
            row: Some(row.to_string()),
            col: Some(col.to_string()),
            value: value.into(),
        }
    }
}

/// Owns the grid and keeps it, the rendered surface and the URL fragment in step.
///
/// Edits mutate the grid and schedule a debounced URL write. External fragment
/// changes replace the grid and rebuild the surface without going through the
/// debouncer.
pub struct SyncController<S, L, T> {
    config: SheetConfig,
    grid: Grid,
    surface: Option<S>,
    location: L,
    scheduler: T,
    debounce: Debouncer,
}

impl<S: Surface, L: Location, T: Scheduler> SyncController<S, L, T> {
    /// Load the grid from the current fragment (or start empty) and render once.
    ///
    /// Nothing is written to the URL until the first edit.
    pub fn start(config: SheetConfig, surface: Option<S>, location: L, scheduler: T) -> Self {
        let grid = match codec::decode_hash(&location.hash()) {
            Some(grid) => {
                log::info!("Loaded sheet from URL fragment");
                grid
            }
            None => Grid::create_empty(),
        };
        let debounce = Debouncer::new(config.debounce_ms);

        let mut controller = SyncController {
            config,
            grid,
            surface,
            location,
            scheduler,
            debounce,
        };
        controller.render();
        controller
    }

    pub fn dispatch(&mut self, event: SheetEvent) {
        match event {
            SheetEvent::Input { row, col, value } => {
                self.handle_input(row.as_deref(), col.as_deref(), value)
            }
            SheetEvent::TimerFired(handle) => self.handle_timer(handle),
            SheetEvent::HashChanged => self.handle_hash_change(),
        }
    }

    /// Write the current grid to the URL now, dropping any pending timer.
    pub fn flush(&mut self) -> WriteMode {
        self.debounce.cancel(&mut self.scheduler);
        self.write_url()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Value of the cell named like its header labels, e.g. `C4`.
    pub fn cell_value(&self, name: &str) -> Result<&str, AddressError> {
        let address: CellAddress = name.parse()?;
        Ok(self.grid.get(address))
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    pub fn has_pending_write(&self) -> bool {
        self.debounce.is_pending()
    }

    fn handle_input(&mut self, row: Option<&str>, col: Option<&str>, value: String) {
        let address = parse_index(row)
            .zip(parse_index(col))
            .and_then(|(row, col)| CellAddress::new(row, col));
        let Some(address) = address else {
            log::debug!("ignoring input with coordinates {:?}/{:?}", row, col);
            return;
        };

        log::debug!("{} edited", address);
        self.grid.set(address, value);
        self.debounce.trigger(&mut self.scheduler);
    }

    fn handle_timer(&mut self, handle: TimerHandle) {
        if self.debounce.fire(handle) {
            self.write_url();
        } else {
            log::debug!("ignoring superseded timer {:?}", handle);
        }
    }

    fn handle_hash_change(&mut self) {
        if let Some(grid) = codec::decode_hash(&self.location.hash()) {
            if grid != self.grid {
                log::info!("Adopted sheet from external URL change");
            }
            self.grid = grid;
        }
        // Re-render even when decoding failed so the view matches the model.
        self.render();
    }

    fn write_url(&mut self) -> WriteMode {
        let encoded = codec::encode(&self.grid);
        let mode = write_hash(&mut self.location, &encoded);
        log::debug!("wrote {} bytes to URL fragment ({:?})", encoded.len() + 1, mode);
        mode
    }

    fn render(&mut self) {
        render(self.surface.as_mut(), &self.grid);
    }
}

fn parse_index(attr: Option<&str>) -> Option<usize> {
    attr?.trim().parse().ok()
}
