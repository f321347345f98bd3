//! Engine behaviour driven by a hand-advanced clock.

use std::{thread, time::Duration};

use chiptone::{
    backend::{AudioClock, ManualClock, ManualDevice, OutputDevice},
    sequencing::{Part, MELODY},
    synth::voice::{Bus, Voice},
    Effect, Engine, EngineConfig, Flavor, ParamError, TimerMode, TransportState,
};

const TICK: f64 = 0.025;

fn manual_engine(config: EngineConfig) -> (Engine, ManualClock) {
    let clock = ManualClock::new();
    let engine = Engine::new(config.timer(TimerMode::Manual), Box::new(clock.clone()), None);
    (engine, clock)
}

fn melody_voices(clock: &ManualClock) -> Vec<Voice> {
    clock
        .voices()
        .into_iter()
        .filter(|v| v.bus() == Bus::Music && v.waveform() == MELODY.waveform)
        .collect()
}

/// Advance in polling-tick steps, polling after each.
fn run_for(engine: &Engine, clock: &ManualClock, seconds: f64) {
    let ticks = (seconds / TICK).round() as usize;
    for _ in 0..ticks {
        clock.advance(TICK);
        engine.poll();
    }
}

#[test]
fn ten_seconds_of_melody() {
    let (mut engine, clock) = manual_engine(EngineConfig::default().bpm(110.0));
    engine.start_music();
    run_for(&engine, &clock, 10.0);

    let horizon = clock.now() + 0.1;
    let step = 60.0 / 110.0 / 4.0;
    let mut expected = 0;
    let mut t = 0.05;
    let mut index = 0;
    while t < horizon {
        expected += 1;
        t += f64::from(MELODY.note(index).duration_steps) * step;
        index += 1;
    }

    let melody = melody_voices(&clock);
    assert_eq!(melody.len(), expected);
    assert_eq!(clock.late_count(), 0);
    for (i, voice) in melody.iter().enumerate() {
        assert_eq!(voice.frequency().value_at(0.0), MELODY.note(i).frequency);
    }
}

#[test]
fn silent_success_still_schedules_four_voices() {
    let (mut engine, clock) = manual_engine(EngineConfig::default());
    engine.set_volumes(0.0, 0.0).unwrap();
    engine.trigger_effect(Effect::Success);

    let voices = clock.voices();
    assert_eq!(voices.len(), 4);
    for voice in voices {
        assert_eq!(voice.bus(), Bus::Effects);
        assert_eq!(voice.gain().peak(), 0.0);
    }
}

#[test]
fn restart_begins_from_the_top() {
    let (mut engine, clock) = manual_engine(EngineConfig::default());
    engine.start_music();
    run_for(&engine, &clock, 3.0);
    engine.stop_music();
    assert!(engine.cursor(Part::Melody).is_none());

    clock.advance(1.0);
    clock.clear();
    let restart = clock.now();
    engine.start_music();

    let first = &melody_voices(&clock)[0];
    assert_eq!(first.frequency().value_at(0.0), MELODY.note(0).frequency);
    assert!((first.start() - (restart + 0.05)).abs() < 1e-9);

    let cursor = engine.cursor(Part::Bass).unwrap();
    assert_eq!(cursor.track_index, 1);
    assert_eq!(cursor.notes_issued, 1);
}

#[test]
fn starting_twice_keeps_one_polling_loop() {
    let clock = ManualClock::new();
    let config = EngineConfig::default().tick_interval(Duration::from_millis(5));
    let mut engine = Engine::new(config, Box::new(clock.clone()), None);

    engine.start_music();
    engine.start_music();
    assert_eq!(engine.transport_state(), TransportState::Running);
    assert_eq!(engine.polling_loops(), 1);

    // the thread keeps polling on its own
    thread::sleep(Duration::from_millis(50));
    assert!(engine.session_polls() > 1);

    engine.stop_music();
    assert_eq!(engine.polling_loops(), 0);
    assert_eq!(engine.transport_state(), TransportState::Stopped);
}

#[test]
fn tempo_change_only_reaches_new_notes() {
    let (mut engine, clock) = manual_engine(EngineConfig::default().bpm(60.0));
    engine.start_music();
    run_for(&engine, &clock, 1.0);

    let before: Vec<(f64, f64)> = clock.voices().iter().map(|v| (v.start(), v.stop())).collect();
    let next = engine.cursor(Part::Melody).unwrap();

    engine.set_tempo(240.0).unwrap();
    run_for(&engine, &clock, 1.0);

    let after: Vec<(f64, f64)> = clock.voices().iter().map(|v| (v.start(), v.stop())).collect();
    assert_eq!(after[..before.len()], before[..]);

    let melody = melody_voices(&clock);
    let resumed = melody
        .iter()
        .find(|v| v.start() >= next.next_schedule_time)
        .unwrap();
    assert_eq!(resumed.start(), next.next_schedule_time);
    let steps = f64::from(MELODY.note(next.track_index).duration_steps);
    assert!((resumed.duration() - steps * 60.0 / 240.0 / 4.0).abs() < 1e-9);
}

#[test]
fn invalid_parameters_are_rejected() {
    let (engine, _clock) = manual_engine(EngineConfig::default());

    assert_eq!(engine.set_tempo(0.0), Err(ParamError::InvalidTempo(0.0)));
    assert!(engine.set_tempo(-40.0).is_err());
    assert_eq!(engine.tempo(), 110.0);

    assert!(matches!(
        engine.set_volumes(-0.1, 0.5),
        Err(ParamError::InvalidVolume { name: "sfx", .. })
    ));
    assert!(matches!(
        engine.set_volumes(0.5, 1.01),
        Err(ParamError::InvalidVolume { name: "music", .. })
    ));
    assert_eq!(engine.volumes(), (0.5, 0.3));
}

#[test]
fn effect_volume_is_fixed_at_trigger_time() {
    let (mut engine, clock) = manual_engine(EngineConfig::default());
    engine.set_volumes(0.5, 0.3).unwrap();
    engine.trigger_effect(Effect::Error);
    engine.set_volumes(1.0, 0.3).unwrap();
    engine.trigger_effect(Effect::Error);

    let voices = clock.voices();
    let ratio = voices[1].gain().peak() / voices[0].gain().peak();
    assert!((ratio - 2.0).abs() < 1e-5);
}

#[test]
fn music_volume_change_leaves_committed_notes_alone() {
    let (mut engine, clock) = manual_engine(EngineConfig::default());
    engine.start_music();
    run_for(&engine, &clock, 0.5);

    let peaks: Vec<f32> = clock.voices().iter().map(|v| v.gain().peak()).collect();
    engine.set_volumes(0.5, 0.9).unwrap();
    let after: Vec<f32> = clock.voices().iter().map(|v| v.gain().peak()).collect();
    assert_eq!(peaks, after);

    let ramp = *clock.music_ramps().last().unwrap();
    assert_eq!(ramp.target, 0.9);
    assert!((ramp.at - clock.now()).abs() < 1e-12);
    assert_eq!(ramp.ramp, 0.1);
}

#[test]
fn every_flavor_sounds_different() {
    let (mut engine, clock) = manual_engine(EngineConfig::default());
    for flavor in Flavor::ALL {
        engine.trigger_effect(Effect::BuildItem(flavor));
    }

    let voices = clock.voices();
    assert_eq!(voices.len(), Flavor::ALL.len());
    for (voice, flavor) in voices.iter().zip(Flavor::ALL) {
        let profile = flavor.profile();
        assert_eq!(voice.waveform(), profile.waveform);
        assert_eq!(voice.frequency().value_at(0.0), profile.frequency);
    }
}

#[test]
fn suspended_device_is_resumed_on_demand() {
    let clock = ManualClock::new();
    let device = ManualDevice::suspended();
    let config = EngineConfig::default().timer(TimerMode::Manual);
    let mut engine = Engine::new(config, Box::new(clock.clone()), Some(Box::new(device.clone())));

    engine.start_music();
    assert!(!device.is_suspended());
    assert_eq!(engine.transport_state(), TransportState::Running);
    assert_eq!(clock.voices().len(), 2);
}

#[test]
fn muted_engine_ignores_everything() {
    let mut engine = Engine::muted(EngineConfig::default());
    assert!(engine.is_muted());

    engine.start_music();
    engine.trigger_effect(Effect::SessionEnd);
    assert_eq!(engine.transport_state(), TransportState::Stopped);
    assert_eq!(engine.polling_loops(), 0);
    assert_eq!(engine.poll().issued(), 0);
    assert!(engine.now().is_none());

    // validation still applies
    assert!(engine.set_tempo(f64::NAN).is_err());
    assert!(engine.set_volumes(0.2, 0.2).is_ok());
    engine.stop_music();
}

#[test]
fn late_music_notes_are_dropped_not_shifted() {
    let (mut engine, clock) = manual_engine(EngineConfig::default());
    engine.start_music();

    // stall the polling tick well past the lookahead
    clock.advance(0.6);
    engine.poll();

    assert!(clock.late_count() > 0);
    let now = clock.now();
    for voice in clock.voices() {
        // only the notes from before the stall may start long ago
        if voice.start() > 0.1 {
            assert!(voice.start() >= now - 0.02);
        }
    }
    assert!(engine.cursor(Part::Melody).unwrap().next_schedule_time >= now);
}

#[test]
fn extreme_tempo_survives_a_stall() {
    let (mut engine, clock) = manual_engine(EngineConfig::default());
    engine.start_music();
    engine.set_tempo(1e300).unwrap();

    clock.advance(0.5);
    engine.poll();
    engine.poll();
    assert!(engine.transport_state().is_playing());
    let cursor = engine.cursor(Part::Melody).unwrap();
    assert!(cursor.next_schedule_time >= clock.now());

    engine.set_tempo(110.0).unwrap();
    let before = melody_voices(&clock).len();
    run_for(&engine, &clock, 1.0);
    assert!(melody_voices(&clock).len() > before);
}
