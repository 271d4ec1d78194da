//! Section navigation.
//!
//! Exactly one of four sections can be active. Switching runs an explicit
//! lifecycle `Idle -> Closing -> Opening -> Shown`; each phase ends when the
//! caller reports that its transition completed (a frame tick past the phase
//! duration), never on a fixed deferred delay.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Home,
    Students,
    Subjects,
    Grades,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Home, Section::Students, Section::Subjects, Section::Grades];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Home => "Home",
            Section::Students => "Students",
            Section::Subjects => "Subjects",
            Section::Grades => "Grades",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// `from` has been torn down and plays its exit; no section is active.
    Closing { from: Section, next: Section },
    Opening(Section),
    Shown(Section),
}

/// What the owner of the router must do after a transition step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterEvent {
    /// Drop the page state (modals, drafts) of this section.
    Unmount(Section),
    /// Build fresh page state for this section and issue its fetch.
    Mount(Section),
    /// Enter animation finished.
    Settled(Section),
}

#[derive(Debug, Clone)]
pub struct SectionRouter {
    phase: Phase,
    duration: Duration,
    phase_started: Option<Instant>,
}

impl SectionRouter {
    pub fn new(duration: Duration) -> Self {
        Self { phase: Phase::Idle, duration, phase_started: None }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Section whose page state is alive.
    pub fn active(&self) -> Option<Section> {
        match self.phase {
            Phase::Opening(section) | Phase::Shown(section) => Some(section),
            Phase::Idle | Phase::Closing { .. } => None,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Closing { .. } | Phase::Opening(_))
    }

    pub fn select(&mut self, section: Section, now: Instant) -> Option<RouterEvent> {
        match self.phase {
            Phase::Idle => {
                self.enter(Phase::Opening(section), now);
                Some(RouterEvent::Mount(section))
            }
            Phase::Opening(current) | Phase::Shown(current) => {
                self.enter(Phase::Closing { from: current, next: section }, now);
                Some(RouterEvent::Unmount(current))
            }
            Phase::Closing { from, .. } => {
                self.phase = Phase::Closing { from, next: section };
                None
            }
        }
    }

    /// Exit animation completed: the pending section mounts.
    pub fn closing_finished(&mut self, now: Instant) -> Option<RouterEvent> {
        let Phase::Closing { next, .. } = self.phase else {
            return None;
        };
        self.enter(Phase::Opening(next), now);
        Some(RouterEvent::Mount(next))
    }

    /// Enter animation completed.
    pub fn opening_finished(&mut self) -> Option<RouterEvent> {
        let Phase::Opening(section) = self.phase else {
            return None;
        };
        self.phase = Phase::Shown(section);
        self.phase_started = None;
        Some(RouterEvent::Settled(section))
    }

    /// Frame callback. Completes the current phase once its duration elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<RouterEvent> {
        if !self.is_animating() || self.progress(now) < 1.0 {
            return None;
        }
        match self.phase {
            Phase::Closing { .. } => self.closing_finished(now),
            Phase::Opening(_) => self.opening_finished(),
            Phase::Idle | Phase::Shown(_) => None,
        }
    }

    /// Completion of the current phase in `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f32 {
        let Some(started) = self.phase_started else {
            return 1.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Opacity of the section panel.
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Closing { .. } => 1.0 - self.progress(now),
            Phase::Opening(_) => self.progress(now),
            Phase::Shown(_) => 1.0,
        }
    }

    fn enter(&mut self, phase: Phase, now: Instant) {
        tracing::debug!(from = ?self.phase, to = ?phase, "section transition");
        self.phase = phase;
        self.phase_started = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(100);

    /// Runs one select and lets every phase complete, recording phases seen.
    fn select_and_settle(router: &mut SectionRouter, section: Section, t: &mut Instant) -> Vec<Phase> {
        let mut seen = Vec::new();
        router.select(section, *t);
        seen.push(router.phase());
        while router.is_animating() {
            *t += STEP;
            router.tick(*t);
            seen.push(router.phase());
        }
        seen
    }

    #[test]
    fn first_selection_opens_directly() {
        let mut router = SectionRouter::new(STEP);
        let t = Instant::now();
        assert_eq!(router.select(Section::Home, t), Some(RouterEvent::Mount(Section::Home)));
        assert_eq!(router.active(), Some(Section::Home));
        assert_eq!(router.tick(t + STEP / 2), None);
        assert_eq!(router.tick(t + STEP), Some(RouterEvent::Settled(Section::Home)));
        assert_eq!(router.phase(), Phase::Shown(Section::Home));
    }

    #[test]
    fn switching_passes_through_no_section_state() {
        let mut router = SectionRouter::new(STEP);
        let mut t = Instant::now();
        select_and_settle(&mut router, Section::Students, &mut t);

        let seen = select_and_settle(&mut router, Section::Grades, &mut t);
        assert_eq!(
            seen,
            vec![
                Phase::Closing { from: Section::Students, next: Section::Grades },
                Phase::Opening(Section::Grades),
                Phase::Shown(Section::Grades),
            ]
        );
    }

    #[test]
    fn reselecting_the_active_section_remounts_it() {
        let mut router = SectionRouter::new(STEP);
        let mut t = Instant::now();
        select_and_settle(&mut router, Section::Subjects, &mut t);

        assert_eq!(router.select(Section::Subjects, t), Some(RouterEvent::Unmount(Section::Subjects)));
        assert_eq!(router.active(), None);
        t += STEP;
        assert_eq!(router.tick(t), Some(RouterEvent::Mount(Section::Subjects)));
        t += STEP;
        assert_eq!(router.tick(t), Some(RouterEvent::Settled(Section::Subjects)));
    }

    #[test]
    fn selection_during_close_retargets_without_second_unmount() {
        let mut router = SectionRouter::new(STEP);
        let mut t = Instant::now();
        select_and_settle(&mut router, Section::Home, &mut t);

        router.select(Section::Students, t);
        assert_eq!(router.select(Section::Grades, t + STEP / 4), None);
        assert_eq!(router.closing_finished(t + STEP), Some(RouterEvent::Mount(Section::Grades)));
    }

    #[test]
    fn selection_during_open_closes_the_opening_section() {
        let mut router = SectionRouter::new(STEP);
        let t = Instant::now();
        router.select(Section::Home, t);
        assert_eq!(router.select(Section::Grades, t), Some(RouterEvent::Unmount(Section::Home)));
    }

    #[test]
    fn stray_callbacks_are_ignored() {
        let mut router = SectionRouter::new(STEP);
        let t = Instant::now();
        assert_eq!(router.closing_finished(t), None);
        assert_eq!(router.opening_finished(), None);
        assert_eq!(router.tick(t), None);
    }

    #[test]
    fn opacity_follows_the_phase() {
        let mut router = SectionRouter::new(STEP);
        let t = Instant::now();
        assert_eq!(router.opacity(t), 0.0);
        router.select(Section::Home, t);
        assert!((router.opacity(t + STEP / 2) - 0.5).abs() < 0.01);
        router.tick(t + STEP);
        assert_eq!(router.opacity(t + STEP), 1.0);
    }

    #[test]
    fn zero_duration_completes_on_next_tick() {
        let mut router = SectionRouter::new(Duration::ZERO);
        let t = Instant::now();
        router.select(Section::Home, t);
        assert_eq!(router.tick(t), Some(RouterEvent::Settled(Section::Home)));
    }
}
