use crate::{
    AllocationError, buffer,
    file::{MidiFile, Timing, meta::{DEFAULT_MICROS_PER_QUARTER_NOTE, MetaMessage, Tempo}},
    prelude::TrackMessage,
};
use alloc::vec::Vec;

/// A Set Tempo event located at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TempoChange {
    /// Ticks from the start of the track that declared it
    pub tick: u64,
    /// Microseconds per quarter note from this tick on
    pub micros_per_quarter_note: u32,
    /// Beats per minute, derived from `micros_per_quarter_note`
    pub bpm: f64,
}

impl TempoChange {
    /// Create a tempo change at `tick`
    pub fn new(tick: u64, tempo: Tempo) -> Self {
        Self {
            tick,
            micros_per_quarter_note: tempo.micros_per_quarter_note(),
            bpm: tempo.bpm(),
        }
    }
}

#[doc = r#"
The tick ordered tempo changes of a file.

Never empty: a file without Set Tempo events gets a single 120 BPM entry at
tick 0. Tempo changes are collected from every track and ordered only by
tick. Two changes on the same tick keep the order they were found in
(earlier track first); the later one governs from that tick on.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TempoMap {
    changes: Vec<TempoChange>,
}

impl Default for TempoMap {
    fn default() -> Self {
        Self {
            changes: alloc::vec![TempoChange::new(0, Tempo::default())],
        }
    }
}

impl TempoMap {
    /// Scan every track of `file` for Set Tempo events
    pub fn build(file: &MidiFile) -> Result<Self, AllocationError> {
        let mut changes = Vec::new();
        for track in file.tracks() {
            for (tick, event) in track.ticked_events() {
                if let TrackMessage::Meta(MetaMessage::Tempo(tempo)) = event.message() {
                    buffer::try_push(&mut changes, TempoChange::new(tick, *tempo))?;
                }
            }
        }
        Self::from_changes(changes)
    }

    /// Build a map from tempo changes in any order
    pub fn from_changes(mut changes: Vec<TempoChange>) -> Result<Self, AllocationError> {
        if changes.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "No tempo events, assuming {DEFAULT_MICROS_PER_QUARTER_NOTE}us per quarter note"
            );
            buffer::try_push(&mut changes, TempoChange::new(0, Tempo::default()))?;
        }
        // stable: equal ticks keep discovery order
        changes.sort_by_key(|change| change.tick);
        Ok(Self { changes })
    }

    /// The tempo changes, ascending by tick
    pub fn changes(&self) -> &[TempoChange] {
        &self.changes
    }

    /// Number of entries, at least one
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Always false
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Convert an absolute tick to milliseconds from the start of the file.
    ///
    /// With SMPTE timing the rate is fixed by the header and the map is not
    /// consulted. With metrical timing the time is integrated piecewise over
    /// every tempo change before `tick`.
    pub fn tick_to_ms(&self, tick: u64, timing: &Timing) -> f64 {
        match timing {
            Timing::Smpte(smpte) => {
                if tick == 0 {
                    return 0.;
                }
                let ticks_per_second = smpte.ticks_per_second() as f64;
                tick as f64 / ticks_per_second * 1000.
            }
            Timing::TicksPerQuarterNote(tpqn) => {
                self.metrical_ms(tick, tpqn.ticks_per_quarter_note())
            }
        }
    }

    fn metrical_ms(&self, tick: u64, ticks_per_quarter_note: u16) -> f64 {
        if tick == 0 {
            return 0.;
        }
        let interval_ms = |delta_ticks: u64, micros_per_quarter_note: u32| {
            (delta_ticks as f64 * micros_per_quarter_note as f64)
                / (ticks_per_quarter_note as f64 * 1000.)
        };

        let mut elapsed_ms = 0.;
        let mut boundary = 0u64;
        let mut governing = self
            .changes
            .first()
            .map_or(DEFAULT_MICROS_PER_QUARTER_NOTE, |c| c.micros_per_quarter_note);

        for change in self.changes.iter().take_while(|c| c.tick < tick) {
            if change.tick > boundary {
                elapsed_ms += interval_ms(change.tick - boundary, governing);
            }
            boundary = change.tick;
            governing = change.micros_per_quarter_note;
        }

        elapsed_ms + interval_ms(tick - boundary, governing)
    }
}

#[cfg(test)]
fn change(tick: u64, micros_per_quarter_note: u32) -> TempoChange {
    TempoChange::new(tick, Tempo::new(micros_per_quarter_note).unwrap())
}

#[test]
fn empty_map_gets_default_tempo() {
    use pretty_assertions::assert_eq;
    let map = TempoMap::from_changes(Vec::new()).unwrap();
    assert_eq!(map.changes(), &[change(0, 500_000)]);
    assert_eq!(map.changes()[0].bpm, 120.);
    assert_eq!(map, TempoMap::default());
}

#[test]
fn changes_are_sorted_stably() {
    use pretty_assertions::assert_eq;
    let map = TempoMap::from_changes(alloc::vec![
        change(960, 400_000),
        change(0, 600_000),
        change(960, 300_000),
    ])
    .unwrap();
    let ordered: Vec<(u64, u32)> = map
        .changes()
        .iter()
        .map(|c| (c.tick, c.micros_per_quarter_note))
        .collect();
    assert_eq!(ordered, [(0, 600_000), (960, 400_000), (960, 300_000)]);
}

#[test]
fn metrical_conversion_at_default_tempo() {
    let map = TempoMap::default();
    let timing = Timing::new_ticks_per_quarter_note(480);
    assert_eq!(map.tick_to_ms(0, &timing), 0.);
    assert!((map.tick_to_ms(10, &timing) - 10.416_666).abs() < 1e-3);
    assert!((map.tick_to_ms(480, &timing) - 500.).abs() < 1e-9);
}

#[test]
fn metrical_conversion_across_tempo_changes() {
    // 480 ticks at 120 BPM, then 60 BPM
    let map = TempoMap::from_changes(alloc::vec![change(0, 500_000), change(480, 1_000_000)]).unwrap();
    let timing = Timing::new_ticks_per_quarter_note(480);

    assert!((map.tick_to_ms(480, &timing) - 500.).abs() < 1e-9);
    assert!((map.tick_to_ms(960, &timing) - 1500.).abs() < 1e-9);
    assert!((map.tick_to_ms(720, &timing) - 1000.).abs() < 1e-9);
}

#[test]
fn first_change_governs_from_tick_zero() {
    // a change that only starts at tick 480 still sets the rate before it
    let map = TempoMap::from_changes(alloc::vec![change(480, 1_000_000)]).unwrap();
    let timing = Timing::new_ticks_per_quarter_note(480);
    assert!((map.tick_to_ms(240, &timing) - 500.).abs() < 1e-9);
    assert!((map.tick_to_ms(960, &timing) - 2000.).abs() < 1e-9);
}

#[test]
fn smpte_conversion_ignores_tempo() {
    let map = TempoMap::from_changes(alloc::vec![change(0, 250_000)]).unwrap();
    // 25 fps, 40 ticks per frame: 1000 ticks per second
    let timing = Timing::new_smpte(-25, 40);
    assert_eq!(map.tick_to_ms(0, &timing), 0.);
    assert!((map.tick_to_ms(1000, &timing) - 1000.).abs() < 1e-9);
    assert!((map.tick_to_ms(1, &timing) - 1.).abs() < 1e-9);
}

#[test]
fn conversion_is_monotonic() {
    let map = TempoMap::from_changes(alloc::vec![
        change(0, 500_000),
        change(100, 250_000),
        change(100, 2_000_000),
        change(700, 800_000),
    ])
    .unwrap();
    let timing = Timing::new_ticks_per_quarter_note(96);
    let mut last = 0.;
    for tick in 0..2000 {
        let ms = map.tick_to_ms(tick, &timing);
        assert!(ms >= last, "tick {tick}: {ms} < {last}");
        last = ms;
    }
}
