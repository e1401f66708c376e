//! Fixed timestep simulation tick
//!
//! Core game loop step that advances the simulation deterministically and
//! reports the side effects (audio cues, quit) for the caller to perform.

use serde::{Deserialize, Serialize};

use super::collision::{Collision, collides};
use super::obstacles::{recycle_ground, recycle_pairs, scroll_ground, scroll_pairs};
use super::physics::{advance_animation, impulse, integrate};
use super::scoring::update_score;
use super::state::{GamePhase, GameState};

/// Discrete input tags delivered by the input provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Jump,
    Quit,
    Restart,
    Cancel,
}

/// Fire-and-forget audio requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    Jump,
    Collision,
}

/// Input commands for a single tick, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn jump() -> Self {
        Self::new([InputEvent::Jump])
    }
}

/// Side effects requested by one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub cues: Vec<AudioCue>,
    /// Set when the round ended this tick
    pub collision: Option<Collision>,
    /// Stop the loop: nothing else in this tick was simulated
    pub quit: bool,
}

/// What can move the phase machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Input(InputEvent),
    Collision,
    /// The automatic step out of Ended
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Phase(GamePhase),
    Quit,
}

/// Transition table; `None` means the trigger is ignored in that phase
fn next_phase(phase: GamePhase, trigger: Trigger) -> Option<Next> {
    use GamePhase::*;
    use InputEvent as Ev;

    match (phase, trigger) {
        // Quit always wins
        (_, Trigger::Input(Ev::Quit)) => Some(Next::Quit),

        // From Begin
        (Begin, Trigger::Input(Ev::Jump)) => Some(Next::Phase(Playing)),

        // From Playing
        (Playing, Trigger::Input(Ev::Jump)) => Some(Next::Phase(Playing)),
        (Playing, Trigger::Collision) => Some(Next::Phase(Ended)),

        // From Ended
        (Ended, Trigger::Settle) => Some(Next::Phase(AwaitingRestart)),

        // From AwaitingRestart
        (AwaitingRestart, Trigger::Input(Ev::Restart)) => Some(Next::Phase(Begin)),
        (AwaitingRestart, Trigger::Input(Ev::Cancel)) => Some(Next::Quit),

        _ => None,
    }
}

/// Advance the game state by one fixed timestep
///
/// Input is applied first, in arrival order. The per-phase update then
/// runs for the phase the tick started in, so the jump that leaves Begin
/// does not also integrate that tick.
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    let started_in = state.phase;
    state.time_ticks += 1;

    for &event in &input.events {
        match next_phase(state.phase, Trigger::Input(event)) {
            None => log::trace!("Ignored {:?} in {:?}", event, state.phase),
            Some(Next::Quit) => {
                log::info!("Quit requested in {:?}", state.phase);
                outcome.quit = true;
                return outcome;
            }
            Some(Next::Phase(next)) => apply_input(state, event, next, &mut outcome),
        }
    }

    match started_in {
        GamePhase::Begin => update_begin(state),
        GamePhase::Playing if state.phase == GamePhase::Playing => {
            update_playing(state, &mut outcome)
        }
        GamePhase::Ended => {
            if let Some(Next::Phase(next)) = next_phase(state.phase, Trigger::Settle) {
                finish_round(state, next);
            }
        }
        _ => {}
    }

    outcome
}

fn apply_input(
    state: &mut GameState,
    event: InputEvent,
    next: GamePhase,
    outcome: &mut TickOutcome,
) {
    match event {
        InputEvent::Jump => {
            impulse(&mut state.round.actor, state.tuning.jump_speed);
            outcome.cues.push(AudioCue::Jump);
            if state.phase != next {
                log::info!("Round {} started", state.rounds);
            }
            state.phase = next;
        }
        InputEvent::Restart => state.new_round(),
        InputEvent::Quit | InputEvent::Cancel => {}
    }
}

/// Title screen: the actor flutters in place while the ground rolls by
fn update_begin(state: &mut GameState) {
    let tuning = &state.tuning;
    let round = &mut state.round;
    advance_animation(
        &mut round.actor,
        tuning.animation_threshold,
        tuning.animation_frames,
    );
    recycle_ground(&mut round.ground, tuning);
    scroll_ground(&mut round.ground, tuning.scroll_step());
}

fn update_playing(state: &mut GameState, outcome: &mut TickOutcome) {
    let tuning = &state.tuning;
    let round = &mut state.round;

    recycle_ground(&mut round.ground, tuning);
    recycle_pairs(&mut round.pairs, &mut state.rng, tuning);

    integrate(&mut round.actor, tuning.gravity, tuning.dt);
    advance_animation(
        &mut round.actor,
        tuning.animation_threshold,
        tuning.animation_frames,
    );
    scroll_ground(&mut round.ground, tuning.scroll_step());
    scroll_pairs(&mut round.pairs, tuning.scroll_step());

    if let Some(hit) = collides(&round.actor, &round.pairs, &round.ground, &state.shapes) {
        if let Some(Next::Phase(next)) = next_phase(state.phase, Trigger::Collision) {
            log::info!("Collision with {:?}, score {}", hit, round.score);
            state.phase = next;
            outcome.collision = Some(hit);
            outcome.cues.push(AudioCue::Collision);
            return;
        }
    }

    round.score = update_score(&round.actor, &mut round.pairs, round.score);
}

/// Ended lasts exactly one tick: lock in the score and show the result
fn finish_round(state: &mut GameState, next: GamePhase) {
    let score = state.round.score;
    state.final_score = Some(score);
    if let Some(rank) = state.session.record(score) {
        log::info!("Score {score} ranks #{rank} this session");
    }
    state.phase = next;
}
