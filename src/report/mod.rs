//! Output collaborators for the step loop.
//!
//! A [`Reporter`] sees the initial state once, then the post-step state
//! after every step. Both implementations write to any `io::Write`.

use std::io::{self, Write};

use crate::simulation::states::System;

pub trait Reporter {
    fn initial(&mut self, sys: &System) -> io::Result<()>;

    /// `step` is 1-indexed
    fn step(&mut self, step: usize, sys: &System) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Human readable listing:
///
/// ```text
/// Initial State:
/// Body 1 : (0.400000, 0.500000, 0.500000) | (0.000000, 0.000000, 0.000000)
///
/// Cycle 1
/// Body 1 : ...
/// ```
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn list(&mut self, sys: &System) -> io::Result<()> {
        for (i, b) in sys.bodies.iter().enumerate() {
            writeln!(
                self.out,
                "Body {} : ({:.6}, {:.6}, {:.6}) | ({:.6}, {:.6}, {:.6})",
                i + 1,
                b.x.x,
                b.x.y,
                b.x.z,
                b.v.x,
                b.v.y,
                b.v.z
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn initial(&mut self, sys: &System) -> io::Result<()> {
        writeln!(self.out, "Initial State:")?;
        self.list(sys)
    }

    fn step(&mut self, step: usize, sys: &System) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Cycle {step}")?;
        self.list(sys)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Tabular trace, one row per body per step. The initial state is not
/// written.
pub struct CsvTrace<W: Write> {
    out: W,
}

pub const CSV_HEADER: &str = "time,body,x,y,z,vx,vy,vz";

impl<W: Write> CsvTrace<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for CsvTrace<W> {
    fn initial(&mut self, _sys: &System) -> io::Result<()> {
        writeln!(self.out, "{CSV_HEADER}")
    }

    fn step(&mut self, step: usize, sys: &System) -> io::Result<()> {
        for (i, b) in sys.bodies.iter().enumerate() {
            writeln!(
                self.out,
                "{},{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
                step,
                i + 1,
                b.x.x,
                b.x.y,
                b.x.z,
                b.v.x,
                b.v.y,
                b.v.z
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
