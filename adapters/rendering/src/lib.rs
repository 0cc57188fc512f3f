#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Wavefront Chase adapters.

use std::{error::Error, fmt, io::Write};

use anyhow::Result as AnyResult;
use wavefront_chase_core::{BoardDimensions, CellCoord, Occupant, OccupancyView};

/// ANSI sequence that clears the terminal and homes the cursor.
const ANSI_CLEAR: &str = "\x1b[2J\x1b[H";
/// Spacer emitted instead of clearing when clearing is disabled.
const NEWLINE_SPACER: &str = "\n\n\n";

/// Characters used to draw each kind of cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
    empty: char,
    player: char,
    enemy: char,
}

impl Glyphs {
    /// Creates a glyph set, rejecting sets that would make cells indistinguishable.
    pub fn new(empty: char, player: char, enemy: char) -> Result<Self, RenderingError> {
        if empty == player || empty == enemy || player == enemy {
            return Err(RenderingError::AmbiguousGlyphs {
                empty,
                player,
                enemy,
            });
        }

        Ok(Self {
            empty,
            player,
            enemy,
        })
    }

    /// Character drawn for the provided marker.
    #[must_use]
    pub const fn glyph(&self, occupant: Occupant) -> char {
        match occupant {
            Occupant::Empty => self.empty,
            Occupant::Player => self.player,
            Occupant::Enemy => self.enemy,
        }
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            empty: '.',
            player: 'C',
            enemy: '&',
        }
    }
}

/// Owned snapshot of the board handed to rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    dimensions: BoardDimensions,
    tick: u64,
    cells: Vec<Occupant>,
}

impl Frame {
    /// Captures a frame by querying `occupant_at` for every cell in row-major order.
    pub fn from_accessor<F>(dimensions: BoardDimensions, tick: u64, mut occupant_at: F) -> Self
    where
        F: FnMut(CellCoord) -> Occupant,
    {
        let mut cells = Vec::with_capacity(dimensions.cell_count());
        for row in 0..dimensions.rows() {
            for column in 0..dimensions.columns() {
                cells.push(occupant_at(CellCoord::new(row, column)));
            }
        }

        Self {
            dimensions,
            tick,
            cells,
        }
    }

    /// Captures a frame from a read-only occupancy view.
    #[must_use]
    pub fn capture(view: OccupancyView<'_>, tick: u64) -> Self {
        Self::from_accessor(view.dimensions(), tick, |cell| {
            view.occupant(cell).unwrap_or_default()
        })
    }

    /// Size of the captured board.
    #[must_use]
    pub const fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }

    /// Tick the frame was captured after.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Rows of the board, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Occupant]> {
        let width = usize::try_from(self.dimensions.columns())
            .unwrap_or(1)
            .max(1);
        self.cells.chunks(width)
    }

    /// Draws the frame as text: each cell padded by one space on both sides,
    /// one board row per line.
    #[must_use]
    pub fn to_text(&self, glyphs: &Glyphs) -> String {
        let mut text = String::new();
        for row in self.rows() {
            for occupant in row {
                text.push(' ');
                text.push(glyphs.glyph(*occupant));
                text.push(' ');
            }
            text.push('\n');
        }
        text
    }
}

/// How a text backend separates consecutive frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearMode {
    /// Clear the terminal before each frame.
    Clear,
    /// Print a few blank lines before each frame.
    Newlines,
}

/// Rendering backend capable of presenting Wavefront Chase frames.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Backend that writes frames as plain text.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
    glyphs: Glyphs,
    clear_mode: ClearMode,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend that draws frames into `writer`.
    pub fn new(writer: W, glyphs: Glyphs, clear_mode: ClearMode) -> Self {
        Self {
            writer,
            glyphs,
            clear_mode,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, frame: &Frame) -> AnyResult<()> {
        let separator = match self.clear_mode {
            ClearMode::Clear => ANSI_CLEAR,
            ClearMode::Newlines => NEWLINE_SPACER,
        };
        write!(self.writer, "{separator}{}\n\n", frame.to_text(&self.glyphs))?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Two cell kinds would be drawn with the same character.
    AmbiguousGlyphs {
        /// Character requested for empty cells.
        empty: char,
        /// Character requested for the player.
        player: char,
        /// Character requested for the enemy.
        enemy: char,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousGlyphs {
                empty,
                player,
                enemy,
            } => {
                write!(
                    f,
                    "glyphs must be distinct (empty '{empty}', player '{player}', enemy '{enemy}')"
                )
            }
        }
    }
}

impl Error for RenderingError {}
