//! Fixed-timestep subdivision of variable frame times.

use crate::Fp;

/// Hands out fixed sub-steps until a frame's time budget is spent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stepper {
    /// Time budget exhausted.
    Idle,
    Stepping { remaining: Fp, taken: usize },
}

impl Default for Stepper {
    fn default() -> Self {
        Stepper::Idle
    }
}

impl Stepper {
    pub fn begin(frame_time: Fp) -> Stepper {
        //! Non-positive and non-finite frame times leave the stepper idle.
        if frame_time.is_finite() && frame_time > 0.0 {
            Stepper::Stepping { remaining: frame_time, taken: 0 }
        } else {
            Stepper::Idle
        }
    }

    pub fn next_dt(&mut self, fixed_dt: Fp, max_substeps: usize) -> Option<Fp> {
        //! Returns the next sub-step duration, `min(remaining, fixed_dt)`.
        //!
        //! Once `max_substeps` have been handed out the stepper stops; the rest of the
        //! budget is left in place for `finish` to report.
        let Stepper::Stepping { remaining, taken } = self else { return None };
        if *taken >= max_substeps {
            return None;
        }

        // a residue too small to be worth its own step is folded into this one
        let dt = if *remaining - fixed_dt <= fixed_dt * 1e-3 { *remaining } else { fixed_dt };
        *remaining -= dt;
        *taken += 1;
        if *remaining <= 0.0 {
            *self = Stepper::Idle;
        }
        Some(dt)
    }

    pub fn finish(&mut self) -> Fp {
        //! Returns to idle, returning the time that was not simulated.
        match std::mem::take(self) {
            Stepper::Idle => 0.0,
            Stepper::Stepping { remaining, .. } => remaining.max(0.0),
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Stepper::Idle)
    }
}
