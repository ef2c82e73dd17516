/*!
# Hashsheet

A tiny browser spreadsheet whose entire state lives in the URL fragment.
Copying the link shares the sheet; there is no server and no storage backend.

## Overview

The sheet is a fixed 10×10 grid of plain strings. Every edit is mirrored into
the part of the URL after `#`, and opening a link restores the grid from it.
There are no formulas, formatting, undo or multiple sheets.

## Architecture

### Grid Model
- `ROWS` × `COLS` strings, owned by the sync controller and replaced wholesale
  when a fragment is loaded.
- `CellAddress` gives each coordinate its display alias (`C4`) and accessible
  label (`Cell C4`).

### State Codec
- `encode`: JSON array of arrays, percent-encoded for the fragment.
- `decode`: strict on the number of rows, lenient on each row (a damaged row
  becomes empty). Failures yield `None` and a warning, never an error.

### View Renderer
- Full rebuild on every render: corner, column headers `A`–`J`, then a row
  header and ten inputs per row. No diffing.

### Sync Controller
- Edits update the grid and schedule a debounced URL write (200 ms by default,
  at most one pending timer).
- External fragment changes reload the grid and re-render immediately.
- URL writes replace the current history entry when the host supports it.

## Modules

- **grid**: grid model and cell addresses
- **codec**: fragment encoding and decoding
- **render**: surface abstraction and layout
- **location**: URL fragment access and write policy
- **scheduler**: cancellable timers, debouncer and a fake clock
- **sync**: the controller and its events
- **config**: runtime settings
- **error**: error types
- **web**: browser bindings (`web` feature)
*/

pub mod codec;
pub mod config;
pub mod error;
pub mod grid;
pub mod location;
pub mod render;
pub mod scheduler;
pub mod sync;
#[cfg(feature = "web")]
pub mod web;

/// Re-export everything from these modules to make it easier to use
pub use codec::*;
pub use config::*;
pub use error::*;
pub use grid::*;
pub use location::*;
pub use render::*;
pub use scheduler::*;
pub use sync::*;
