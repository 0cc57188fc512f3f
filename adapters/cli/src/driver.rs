//! Terminal driver loop and board-size prompt.

use std::{
    io::{BufRead, Write},
    thread,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use log::warn;
use wavefront_chase_rendering::{Frame, RenderingBackend};
use wavefront_chase_simulation::Simulation;

/// How a driven chase came to an end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The player reached the enemy.
    Caught {
        /// Ticks it took.
        ticks: u64,
    },
    /// The tick cap ran out first.
    Stopped {
        /// Ticks processed before stopping.
        ticks: u64,
    },
}

/// Renders the opening board, then ticks and renders until the chase ends.
pub(crate) fn run<B>(
    simulation: &mut Simulation,
    backend: &mut B,
    delay: Duration,
    max_ticks: Option<u64>,
) -> Result<Outcome>
where
    B: RenderingBackend,
{
    present(simulation, backend)?;

    while !simulation.is_terminal() {
        if let Some(limit) = max_ticks {
            if simulation.tick_index() >= limit {
                warn!("stopping after {limit} ticks without a capture");
                return Ok(Outcome::Stopped {
                    ticks: simulation.tick_index(),
                });
            }
        }

        if !delay.is_zero() {
            thread::sleep(delay);
        }
        let _ = simulation
            .tick()
            .with_context(|| format!("tick {} failed", simulation.tick_index() + 1))?;
        present(simulation, backend)?;
    }

    Ok(Outcome::Caught {
        ticks: simulation.tick_index(),
    })
}

fn present<B>(simulation: &Simulation, backend: &mut B) -> Result<()>
where
    B: RenderingBackend,
{
    let frame = Frame::capture(simulation.occupancy_view(), simulation.tick_index());
    backend.present(&frame).context("failed to render board")
}

/// Asks for the board width and height until two integers have been read.
pub(crate) fn prompt_dimensions<R, W>(mut input: R, mut output: W) -> Result<(i64, i64)>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Enter the width and the height of the board:")?;
    output.flush()?;

    let mut values = Vec::with_capacity(2);
    let mut line = String::new();
    while values.len() < 2 {
        line.clear();
        if input.read_line(&mut line).context("failed to read board size")? == 0 {
            bail!("input ended before the board width and height were given");
        }

        for token in line.split_whitespace() {
            let value: i64 = token
                .parse()
                .with_context(|| format!("'{token}' is not a whole number"))?;
            values.push(value);
            if values.len() == 2 {
                break;
            }
        }
    }

    Ok((values[0], values[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result as AnyResult;
    use wavefront_chase_core::Occupant;
    use wavefront_chase_simulation::Config;

    #[derive(Default)]
    struct RecordingBackend {
        frames: Vec<Frame>,
    }

    impl RenderingBackend for RecordingBackend {
        fn present(&mut self, frame: &Frame) -> AnyResult<()> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    #[test]
    fn prompt_reads_values_across_lines() {
        let mut output = Vec::new();

        let dimensions = prompt_dimensions(&b"7\n  4\n"[..], &mut output).expect("two integers");

        assert_eq!(dimensions, (7, 4));
        assert_eq!(
            String::from_utf8(output).expect("utf-8"),
            "Enter the width and the height of the board:\n"
        );
    }

    #[test]
    fn prompt_rejects_non_numeric_input() {
        let error = prompt_dimensions(&b"wide 3\n"[..], Vec::new()).expect_err("not a number");

        assert!(error.to_string().contains("'wide'"));
    }

    #[test]
    fn prompt_fails_on_truncated_input() {
        assert!(prompt_dimensions(&b"5"[..], Vec::new()).is_err());
    }

    #[test]
    fn run_renders_opening_board_and_every_tick() {
        let mut simulation =
            Simulation::new(Config::new(5, 1).with_seed(3)).expect("valid dimensions");
        let mut backend = RecordingBackend::default();

        let outcome =
            run(&mut simulation, &mut backend, Duration::ZERO, None).expect("chase completes");

        assert_eq!(outcome, Outcome::Caught { ticks: 2 });
        let ticks: Vec<u64> = backend.frames.iter().map(Frame::tick).collect();
        assert_eq!(ticks, vec![0, 1, 2]);
        let opening = backend.frames[0].rows().next().expect("one row").to_vec();
        assert_eq!(opening[0], Occupant::Player);
        assert_eq!(opening[4], Occupant::Enemy);
    }

    #[test]
    fn run_stops_at_tick_cap() {
        let mut simulation =
            Simulation::new(Config::new(9, 9).with_seed(11)).expect("valid dimensions");
        let mut backend = RecordingBackend::default();

        let outcome =
            run(&mut simulation, &mut backend, Duration::ZERO, Some(1)).expect("capped run");

        assert_eq!(outcome, Outcome::Stopped { ticks: 1 });
        assert_eq!(backend.frames.len(), 2);
    }

    #[test]
    fn run_on_adjacent_start_only_renders_once() {
        let mut simulation = Simulation::new(Config::new(2, 1)).expect("valid dimensions");
        let mut backend = RecordingBackend::default();

        let outcome =
            run(&mut simulation, &mut backend, Duration::ZERO, None).expect("already caught");

        assert_eq!(outcome, Outcome::Caught { ticks: 0 });
        assert_eq!(backend.frames.len(), 1);
    }
}
