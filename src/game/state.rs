use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    ring::{MAX_TOKENS, TokenId, TokenRing},
    snapshot::{TokenSnapshot, project},
    types::{ActionType, Actor, DeathCause, Phase, Verdict},
};

use super::{
    action::{ActionPayload, GameAction},
    info::{DisinformationQueue, MAX_NEIGHBOR_COUNT, ValueError, recompute},
    roles::{RoleAssignment, SelectionError},
    win,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u64,
    pub tokens_count: usize,
    pub red_count: usize,
    /// Pick red tokens and the demon at random instead of asking the moderator.
    pub random_roles: bool,
    /// Fill red information at random instead of asking the moderator.
    pub random_disinformation: bool,
    /// Offer the moderator a chance to refresh red information after each
    /// execution. When off, an execution goes straight to the kill phase.
    pub reentry_after_execution: bool,
    /// Same after each night kill. The victim stays hidden from the player
    /// view until the refresh is done or skipped.
    pub reentry_after_kill: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tokens_count: 16,
            red_count: 4,
            random_roles: false,
            random_disinformation: false,
            reentry_after_execution: true,
            reentry_after_kill: true,
        }
    }
}

#[derive(Debug, Clone)]
pub enum GamePhase {
    Setup,
    AssigningRoles(RoleAssignment),
    AssigningInfo(DisinformationQueue),
    AwaitingPlayerExecution,
    AwaitingNeighborReentry(Reentry),
    AwaitingModeratorKill,
    GameOver { verdict: Verdict },
}

/// Red information refresh that follows a death.
#[derive(Debug, Clone)]
pub struct Reentry {
    pub queue: DisinformationQueue,
    pub after: DeathCause,
    /// Night victim still shown alive to the players.
    pub concealed: Option<TokenId>,
}

impl Reentry {
    fn next_phase(&self) -> GamePhase {
        match self.after {
            DeathCause::Execution => GamePhase::AwaitingModeratorKill,
            DeathCause::Kill => GamePhase::AwaitingPlayerExecution,
        }
    }
}

impl GamePhase {
    pub fn tag(&self) -> Phase {
        match self {
            GamePhase::Setup => Phase::Setup,
            GamePhase::AssigningRoles(_) => Phase::AssigningRoles,
            GamePhase::AssigningInfo(_) => Phase::AssigningInfo,
            GamePhase::AwaitingPlayerExecution => Phase::AwaitingPlayerExecution,
            GamePhase::AwaitingNeighborReentry(_) => Phase::AwaitingModeratorNeighborReentry,
            GamePhase::AwaitingModeratorKill => Phase::AwaitingModeratorKill,
            GamePhase::GameOver { .. } => Phase::GameOver,
        }
    }

    /// Roles are on the ring and the game has not ended.
    fn in_play(&self) -> bool {
        matches!(
            self,
            GamePhase::AssigningInfo(_)
                | GamePhase::AwaitingPlayerExecution
                | GamePhase::AwaitingNeighborReentry(_)
                | GamePhase::AwaitingModeratorKill
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("token and red counts must be positive (got {tokens_count} and {red_count})")]
    NonPositive {
        tokens_count: usize,
        red_count: usize,
    },
    #[error("red count {red_count} must be below token count {tokens_count}")]
    TooManyRed {
        tokens_count: usize,
        red_count: usize,
    },
    #[error("a table seats at most 65535 tokens (got {0})")]
    TooManyTokens(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token {0} is not seated at this table")]
    UnknownToken(TokenId),
    #[error("token {0} is already dead")]
    AlreadyDead(TokenId),
    #[error("{action} is not accepted during {phase}")]
    WrongPhase { phase: Phase, action: ActionType },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("{action} must be issued by the {expected}, not the {actual}")]
    WrongActor {
        action: ActionType,
        expected: Actor,
        actual: Actor,
    },
    #[error("missing or invalid payload: {0}")]
    InvalidPayload(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    SetupStarted {
        session: Uuid,
        seed: u64,
        tokens_count: usize,
        red_count: usize,
    },
    RedSelected {
        token: TokenId,
    },
    DemonSelected {
        token: TokenId,
    },
    DisinformationSet {
        token: TokenId,
        value: u8,
    },
    ReentrySkipped,
    IntoxicationChanged {
        token: TokenId,
        intoxicated: bool,
    },
    TokenRemoved {
        token: TokenId,
        cause: DeathCause,
    },
    GameOver {
        verdict: Verdict,
    },
}

/// Result of an execution or a kill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub verdict: Verdict,
    pub snapshot: Vec<TokenSnapshot>,
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub events: Vec<GameEvent>,
    pub verdict: Verdict,
    pub done: bool,
}

/// The one active game session: owns the ring, the phase and the round count.
/// Every public mutator validates its input completely before touching state,
/// so a rejected call leaves the session exactly as it was.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    session_id: Uuid,
    ring: TokenRing,
    phase: GamePhase,
    round: u32,
    events: Vec<GameEvent>,
    actions: Vec<GameAction>,
    available_actions: Vec<GameAction>,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let mut state = Self {
            config,
            session_id: Uuid::new_v4(),
            ring: TokenRing::default(),
            phase: GamePhase::Setup,
            round: 0,
            events: Vec::new(),
            actions: Vec::new(),
            available_actions: Vec::new(),
            rng,
        };
        state.refresh_available_actions();
        state
    }

    pub fn reset(&mut self) {
        info!(session = %self.session_id, "session reset");
        *self = GameState::new(self.config.clone());
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn phase(&self) -> Phase {
        self.phase.tag()
    }

    pub fn game_phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn ring(&self) -> &TokenRing {
        &self.ring
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn action_log(&self) -> &[GameAction] {
        &self.actions
    }

    pub fn legal_actions(&self) -> &[GameAction] {
        &self.available_actions
    }

    /// Who the session is waiting on.
    pub fn current_actor(&self) -> Actor {
        match self.phase {
            GamePhase::AwaitingPlayerExecution => Actor::Player,
            _ => Actor::Moderator,
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self.phase {
            GamePhase::GameOver { verdict } => verdict,
            _ => Verdict::None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    /// Next red token the moderator should give information to, if any.
    pub fn pending_red(&self) -> Option<TokenId> {
        match &self.phase {
            GamePhase::AssigningInfo(queue)
            | GamePhase::AwaitingNeighborReentry(Reentry { queue, .. }) => {
                queue.next()
            }
            _ => None,
        }
    }

    /// Night victim the players have not been shown yet.
    pub fn concealed_kill(&self) -> Option<TokenId> {
        match &self.phase {
            GamePhase::AwaitingNeighborReentry(reentry) => reentry.concealed,
            _ => None,
        }
    }

    pub fn snapshot(&self, viewer: Actor) -> Vec<TokenSnapshot> {
        project(&self.ring, viewer, self.concealed_kill())
    }

    pub fn start_setup(&mut self, tokens_count: usize, red_count: usize) -> Result<(), SetupError> {
        if tokens_count == 0 || red_count == 0 {
            return Err(SetupError::NonPositive {
                tokens_count,
                red_count,
            });
        }
        if tokens_count > MAX_TOKENS {
            return Err(SetupError::TooManyTokens(tokens_count));
        }
        if red_count >= tokens_count {
            return Err(SetupError::TooManyRed {
                tokens_count,
                red_count,
            });
        }
        let assignment = RoleAssignment::new(tokens_count, red_count).map_err(|_| {
            SetupError::TooManyRed {
                tokens_count,
                red_count,
            }
        })?;

        self.session_id = Uuid::new_v4();
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.ring = TokenRing::new(tokens_count);
        self.phase = GamePhase::AssigningRoles(assignment);
        self.round = 0;
        self.events.clear();
        self.actions.clear();
        self.events.push(GameEvent::SetupStarted {
            session: self.session_id,
            seed: self.config.seed,
            tokens_count,
            red_count,
        });
        info!(
            session = %self.session_id,
            tokens_count, red_count, "table seated"
        );
        self.refresh_available_actions();
        if self.config.random_roles {
            if let Err(err) = self.assign_random_roles() {
                warn!(%err, "random role assignment failed; waiting for manual selection");
            }
        }
        Ok(())
    }

    pub fn select_red_token(&mut self, id: TokenId) -> Result<(), SelectionError> {
        let GamePhase::AssigningRoles(assignment) = &mut self.phase else {
            return Err(SelectionError::WrongPhase {
                phase: self.phase.tag(),
            });
        };
        assignment.select_red(&mut self.ring, id)?;
        self.events.push(GameEvent::RedSelected { token: id });
        self.refresh_available_actions();
        Ok(())
    }

    pub fn select_demon(&mut self, id: TokenId) -> Result<(), SelectionError> {
        let GamePhase::AssigningRoles(assignment) = &self.phase else {
            return Err(SelectionError::WrongPhase {
                phase: self.phase.tag(),
            });
        };
        assignment.select_demon(&mut self.ring, id)?;
        self.events.push(GameEvent::DemonSelected { token: id });
        self.finish_role_assignment();
        Ok(())
    }

    pub fn assign_random_roles(&mut self) -> Result<(), SelectionError> {
        let GamePhase::AssigningRoles(assignment) = &mut self.phase else {
            return Err(SelectionError::WrongPhase {
                phase: self.phase.tag(),
            });
        };
        let before = assignment.selected().len();
        let demon = assignment.assign_random(&mut self.ring, &mut self.rng)?;
        let picked = assignment.selected()[before..].to_vec();
        self.events
            .extend(picked.into_iter().map(|token| GameEvent::RedSelected { token }));
        self.events.push(GameEvent::DemonSelected { token: demon });
        self.finish_role_assignment();
        Ok(())
    }

    pub fn set_red_disinformation(&mut self, id: TokenId, value: u8) -> Result<(), ValueError> {
        let queue = match &mut self.phase {
            GamePhase::AssigningInfo(queue)
            | GamePhase::AwaitingNeighborReentry(Reentry { queue, .. }) => queue,
            other => {
                return Err(ValueError::WrongPhase { phase: other.tag() });
            }
        };
        queue.submit(&mut self.ring, id, value)?;
        let done = queue.is_empty();
        self.events
            .push(GameEvent::DisinformationSet { token: id, value });
        debug!(token = id, value, "red information set");
        if done {
            self.finish_info_entry();
        } else {
            self.refresh_available_actions();
        }
        Ok(())
    }

    pub fn randomize_disinformation(&mut self) -> Result<(), ValueError> {
        let queue = match &mut self.phase {
            GamePhase::AssigningInfo(queue)
            | GamePhase::AwaitingNeighborReentry(Reentry { queue, .. }) => queue,
            other => {
                return Err(ValueError::WrongPhase { phase: other.tag() });
            }
        };
        let assigned = queue.fill_random(&mut self.ring, &mut self.rng);
        self.record_disinformation(assigned);
        self.finish_info_entry();
        Ok(())
    }

    pub fn skip_reentry(&mut self) -> Result<(), TokenError> {
        let GamePhase::AwaitingNeighborReentry(reentry) = &self.phase else {
            return Err(TokenError::WrongPhase {
                phase: self.phase.tag(),
                action: ActionType::SkipReentry,
            });
        };
        let next = reentry.next_phase();
        self.events.push(GameEvent::ReentrySkipped);
        self.transition(next);
        Ok(())
    }

    pub fn execute_token(&mut self, id: TokenId) -> Result<RoundOutcome, TokenError> {
        if !matches!(self.phase, GamePhase::AwaitingPlayerExecution) {
            return Err(TokenError::WrongPhase {
                phase: self.phase.tag(),
                action: ActionType::Execute,
            });
        }
        self.remove_token(id, DeathCause::Execution)?;
        Ok(RoundOutcome {
            verdict: self.verdict(),
            snapshot: self.snapshot(Actor::Player),
        })
    }

    pub fn kill_token(&mut self, id: TokenId) -> Result<RoundOutcome, TokenError> {
        if !matches!(self.phase, GamePhase::AwaitingModeratorKill) {
            return Err(TokenError::WrongPhase {
                phase: self.phase.tag(),
                action: ActionType::Kill,
            });
        }
        self.remove_token(id, DeathCause::Kill)?;
        Ok(RoundOutcome {
            verdict: self.verdict(),
            snapshot: self.snapshot(Actor::Moderator),
        })
    }

    /// Freezes (or unfreezes) a token's information. Unfreezing brings a blue
    /// token straight back in line with the ring.
    pub fn set_intoxicated(&mut self, id: TokenId, intoxicated: bool) -> Result<(), TokenError> {
        if !self.phase.in_play() {
            return Err(TokenError::WrongPhase {
                phase: self.phase.tag(),
                action: ActionType::SetIntoxicated,
            });
        }
        let token = self.ring.get_mut(id).ok_or(TokenError::UnknownToken(id))?;
        if !token.alive {
            return Err(TokenError::AlreadyDead(id));
        }
        token.intoxicated = intoxicated;
        if !intoxicated {
            recompute(&mut self.ring);
        }
        self.events
            .push(GameEvent::IntoxicationChanged { token: id, intoxicated });
        Ok(())
    }

    pub fn step(&mut self, action: GameAction) -> Result<StepOutcome, GameError> {
        let expected = action.action_type.actor();
        if action.actor != expected {
            return Err(GameError::WrongActor {
                action: action.action_type,
                expected,
                actual: action.actor,
            });
        }

        let events_before = self.events.len();
        match (action.action_type, &action.payload) {
            (
                ActionType::StartSetup,
                ActionPayload::Counts {
                    tokens_count,
                    red_count,
                },
            ) => self.start_setup(*tokens_count, *red_count)?,
            (ActionType::StartSetup, _) => {
                return Err(GameError::InvalidPayload("expected token and red counts"));
            }
            (ActionType::SelectRed, ActionPayload::Token(id)) => self.select_red_token(*id)?,
            (ActionType::SelectDemon, ActionPayload::Token(id)) => self.select_demon(*id)?,
            (ActionType::RandomRoles, _) => self.assign_random_roles()?,
            (ActionType::SetDisinformation, ActionPayload::Disinformation { token, value }) => {
                self.set_red_disinformation(*token, *value)?
            }
            (ActionType::SetDisinformation, _) => {
                return Err(GameError::InvalidPayload("expected token and value"));
            }
            (ActionType::RandomDisinformation, _) => self.randomize_disinformation()?,
            (ActionType::SkipReentry, _) => self.skip_reentry()?,
            (ActionType::Execute, ActionPayload::Token(id)) => {
                self.execute_token(*id)?;
            }
            (ActionType::Kill, ActionPayload::Token(id)) => {
                self.kill_token(*id)?;
            }
            (
                ActionType::SetIntoxicated,
                ActionPayload::Intoxication { token, intoxicated },
            ) => self.set_intoxicated(*token, *intoxicated)?,
            (ActionType::SetIntoxicated, _) => {
                return Err(GameError::InvalidPayload("expected token and flag"));
            }
            (ActionType::Reset, _) => {
                self.reset();
                return Ok(StepOutcome {
                    events: Vec::new(),
                    verdict: Verdict::None,
                    done: false,
                });
            }
            (_, _) => return Err(GameError::InvalidPayload("expected token id")),
        }

        let events = match action.action_type {
            // setup clears the log, so everything in it is new
            ActionType::StartSetup => self.events.clone(),
            _ => self.events[events_before..].to_vec(),
        };
        self.actions.push(action);
        self.refresh_available_actions();
        Ok(StepOutcome {
            events,
            verdict: self.verdict(),
            done: self.is_over(),
        })
    }

    fn remove_token(&mut self, id: TokenId, cause: DeathCause) -> Result<(), TokenError> {
        let token = self.ring.get(id).ok_or(TokenError::UnknownToken(id))?;
        if !token.alive {
            return Err(TokenError::AlreadyDead(id));
        }
        let was_demon = token.is_demon();

        self.ring.mark_dead(id);
        self.events.push(GameEvent::TokenRemoved { token: id, cause });
        info!(token = id, ?cause, "token removed");
        recompute(&mut self.ring);

        if was_demon {
            self.finish(Verdict::BlueWin);
            return Ok(());
        }
        self.check_win(id, cause);
        Ok(())
    }

    fn check_win(&mut self, id: TokenId, after: DeathCause) {
        let verdict = win::evaluate(self.ring.tokens());
        if verdict.is_decided() {
            self.finish(verdict);
            return;
        }
        let (wanted, concealed) = match after {
            DeathCause::Execution => (self.config.reentry_after_execution, None),
            DeathCause::Kill => {
                self.round += 1;
                (self.config.reentry_after_kill, Some(id))
            }
        };
        let reentry = Reentry {
            queue: DisinformationQueue::for_living_reds(&self.ring),
            after,
            concealed,
        };
        let next = reentry.next_phase();
        if !wanted || reentry.queue.is_empty() {
            self.transition(next);
        } else if self.config.random_disinformation {
            let Reentry { mut queue, .. } = reentry;
            let assigned = queue.fill_random(&mut self.ring, &mut self.rng);
            self.record_disinformation(assigned);
            self.transition(next);
        } else {
            self.transition(GamePhase::AwaitingNeighborReentry(reentry));
        }
    }

    fn finish(&mut self, verdict: Verdict) {
        self.events.push(GameEvent::GameOver { verdict });
        info!(session = %self.session_id, %verdict, "game over");
        self.transition(GamePhase::GameOver { verdict });
    }

    fn finish_role_assignment(&mut self) {
        recompute(&mut self.ring);
        let verdict = win::evaluate(self.ring.tokens());
        if verdict.is_decided() {
            self.finish(verdict);
            return;
        }
        let mut queue = DisinformationQueue::for_living_reds(&self.ring);
        if self.config.random_disinformation {
            let assigned = queue.fill_random(&mut self.ring, &mut self.rng);
            self.record_disinformation(assigned);
            self.transition(GamePhase::AwaitingPlayerExecution);
        } else {
            self.transition(GamePhase::AssigningInfo(queue));
        }
    }

    fn record_disinformation(&mut self, assigned: Vec<(TokenId, u8)>) {
        self.events.extend(
            assigned
                .into_iter()
                .map(|(token, value)| GameEvent::DisinformationSet { token, value }),
        );
    }

    fn finish_info_entry(&mut self) {
        let next = match &self.phase {
            GamePhase::AwaitingNeighborReentry(reentry) => reentry.next_phase(),
            _ => GamePhase::AwaitingPlayerExecution,
        };
        self.transition(next);
    }

    fn transition(&mut self, next: GamePhase) {
        debug!(from = %self.phase.tag(), to = %next.tag(), "phase transition");
        self.phase = next;
        self.refresh_available_actions();
    }

    fn refresh_available_actions(&mut self) {
        self.available_actions = self.compute_available_actions();
    }

    fn compute_available_actions(&self) -> Vec<GameAction> {
        match &self.phase {
            GamePhase::Setup => vec![GameAction::start_setup(
                self.config.tokens_count,
                self.config.red_count,
            )],
            GamePhase::AssigningRoles(assignment) => {
                let mut actions = vec![GameAction::new(ActionType::RandomRoles)];
                if assignment.awaiting_demon() {
                    actions.extend(assignment.selected().iter().map(|id| GameAction::select_demon(*id)));
                } else {
                    actions.extend(assignment.candidates().map(GameAction::select_red));
                }
                actions
            }
            GamePhase::AssigningInfo(queue)
            | GamePhase::AwaitingNeighborReentry(Reentry { queue, .. }) => {
                let mut actions = vec![GameAction::new(ActionType::RandomDisinformation)];
                if matches!(self.phase, GamePhase::AwaitingNeighborReentry(_)) {
                    actions.push(GameAction::new(ActionType::SkipReentry));
                }
                for id in queue.iter() {
                    for value in 0..=MAX_NEIGHBOR_COUNT {
                        actions.push(GameAction::set_disinformation(id, value));
                    }
                }
                actions
            }
            GamePhase::AwaitingPlayerExecution => self
                .ring
                .living()
                .map(|token| GameAction::execute(token.id))
                .collect(),
            GamePhase::AwaitingModeratorKill => self
                .ring
                .living()
                .map(|token| GameAction::kill(token.id))
                .collect(),
            GamePhase::GameOver { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::info::stale_tokens;
    use crate::types::Character;

    fn seated(tokens: usize, reds: &[TokenId], demon: TokenId) -> GameState {
        let mut state = GameState::new(GameConfig::default());
        state.start_setup(tokens, reds.len()).unwrap();
        for id in reds {
            state.select_red_token(*id).unwrap();
        }
        state.select_demon(demon).unwrap();
        state
    }

    fn playing(tokens: usize, reds: &[TokenId], demon: TokenId) -> GameState {
        let mut state = seated(tokens, reds, demon);
        for id in reds {
            state.set_red_disinformation(*id, 1).unwrap();
        }
        state
    }

    #[test]
    fn setup_rejects_bad_counts_without_leaving_setup() {
        let mut state = GameState::new(GameConfig::default());
        assert_eq!(
            state.start_setup(0, 1),
            Err(SetupError::NonPositive {
                tokens_count: 0,
                red_count: 1
            })
        );
        assert_eq!(
            state.start_setup(5, 0),
            Err(SetupError::NonPositive {
                tokens_count: 5,
                red_count: 0
            })
        );
        assert_eq!(
            state.start_setup(3, 4),
            Err(SetupError::TooManyRed {
                tokens_count: 3,
                red_count: 4
            })
        );
        assert_eq!(state.phase(), Phase::Setup);
        assert!(state.ring().is_empty());
    }

    #[test]
    fn setup_seats_an_all_blue_table() {
        let mut state = GameState::new(GameConfig::default());
        state.start_setup(6, 2).unwrap();
        assert_eq!(state.phase(), Phase::AssigningRoles);
        assert_eq!(state.ring().len(), 6);
        assert_eq!(state.ring().red_count(), 0);
        assert!(state.ring().iter().all(|t| t.alive));
    }

    #[test]
    fn demon_selection_moves_to_info_entry_in_seating_order() {
        let state = seated(7, &[5, 3], 5);
        assert_eq!(state.phase(), Phase::AssigningInfo);
        assert_eq!(state.pending_red(), Some(3));
        assert_eq!(state.ring().get(4).unwrap().displayed_count, 2);
    }

    #[test]
    fn info_entry_rejects_values_and_keeps_waiting() {
        let mut state = seated(7, &[3, 5], 5);
        assert_eq!(
            state.set_red_disinformation(3, 7),
            Err(ValueError::OutOfRange(7))
        );
        assert_eq!(
            state.set_red_disinformation(4, 1),
            Err(ValueError::NotRed(4))
        );
        assert_eq!(state.phase(), Phase::AssigningInfo);
        state.set_red_disinformation(3, 2).unwrap();
        assert_eq!(state.pending_red(), Some(5));
        state.set_red_disinformation(5, 0).unwrap();
        assert_eq!(state.phase(), Phase::AwaitingPlayerExecution);
        assert_eq!(state.ring().get(3).unwrap().displayed_count, 2);
    }

    #[test]
    fn calls_outside_their_phase_are_rejected() {
        let mut state = GameState::new(GameConfig::default());
        assert_eq!(
            state.execute_token(1).unwrap_err(),
            TokenError::WrongPhase {
                phase: Phase::Setup,
                action: ActionType::Execute
            }
        );
        assert!(matches!(
            state.select_red_token(1),
            Err(SelectionError::WrongPhase { phase: Phase::Setup })
        ));
        assert!(matches!(
            state.set_red_disinformation(1, 0),
            Err(ValueError::WrongPhase { phase: Phase::Setup })
        ));

        let mut state = playing(7, &[3, 5], 5);
        assert!(matches!(
            state.kill_token(1),
            Err(TokenError::WrongPhase { .. })
        ));
        assert!(matches!(
            state.skip_reentry(),
            Err(TokenError::WrongPhase { .. })
        ));
    }

    #[test]
    fn execution_then_reentry_then_kill() {
        let mut state = playing(8, &[2, 6], 6);
        let outcome = state.execute_token(1).unwrap();
        assert_eq!(outcome.verdict, Verdict::None);
        assert_eq!(state.phase(), Phase::AwaitingModeratorNeighborReentry);
        assert_eq!(state.pending_red(), Some(2));

        state.set_red_disinformation(2, 0).unwrap();
        state.set_red_disinformation(6, 2).unwrap();
        assert_eq!(state.phase(), Phase::AwaitingModeratorKill);

        let outcome = state.kill_token(4).unwrap();
        assert_eq!(outcome.verdict, Verdict::None);
        assert_eq!(state.phase(), Phase::AwaitingModeratorNeighborReentry);
        assert_eq!(state.round(), 1);
        assert_eq!(state.pending_red(), Some(2));
        assert!(stale_tokens(state.ring()).is_empty());

        state.set_red_disinformation(6, 1).unwrap();
        state.set_red_disinformation(2, 1).unwrap();
        assert_eq!(state.phase(), Phase::AwaitingPlayerExecution);
        assert_eq!(state.round(), 1);
    }

    #[test]
    fn night_kill_opens_reentry_and_skip_returns_to_the_day() {
        let mut state = playing(9, &[3, 7], 7);
        state.execute_token(1).unwrap();
        state.skip_reentry().unwrap();
        state.kill_token(5).unwrap();
        assert_eq!(state.phase(), Phase::AwaitingModeratorNeighborReentry);
        assert_eq!(state.pending_red(), Some(3));
        assert!(state
            .legal_actions()
            .iter()
            .any(|a| a.action_type == ActionType::SkipReentry));

        state.skip_reentry().unwrap();
        assert_eq!(state.phase(), Phase::AwaitingPlayerExecution);
        assert!(state.concealed_kill().is_none());
    }

    #[test]
    fn night_victim_is_hidden_from_players_until_reentry_ends() {
        let mut state = playing(9, &[3, 7], 7);
        state.execute_token(1).unwrap();
        state.skip_reentry().unwrap();
        let outcome = state.kill_token(5).unwrap();
        assert!(!outcome.snapshot[4].alive);

        assert_eq!(state.concealed_kill(), Some(5));
        assert!(state.snapshot(Actor::Player)[4].alive);
        assert!(!state.snapshot(Actor::Moderator)[4].alive);
        assert!(!state.snapshot(Actor::Player)[0].alive);

        state.set_red_disinformation(3, 0).unwrap();
        assert!(state.snapshot(Actor::Player)[4].alive);
        state.set_red_disinformation(7, 2).unwrap();
        assert!(!state.snapshot(Actor::Player)[4].alive);
    }

    #[test]
    fn night_reentry_can_be_disabled() {
        let config = GameConfig {
            reentry_after_kill: false,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config);
        state.start_setup(8, 1).unwrap();
        state.select_red_token(4).unwrap();
        state.select_demon(4).unwrap();
        state.set_red_disinformation(4, 0).unwrap();
        state.execute_token(1).unwrap();
        state.skip_reentry().unwrap();
        state.kill_token(6).unwrap();
        assert_eq!(state.phase(), Phase::AwaitingPlayerExecution);
        assert_eq!(state.round(), 1);
    }

    #[test]
    fn a_table_decided_at_seating_ends_immediately() {
        let mut state = GameState::new(GameConfig::default());
        state.start_setup(2, 1).unwrap();
        state.select_red_token(1).unwrap();
        state.select_demon(1).unwrap();
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.verdict(), Verdict::RedWin);
        assert!(state.legal_actions().is_empty());
    }

    #[test]
    fn every_setup_restarts_the_random_stream() {
        let config = GameConfig {
            random_roles: true,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config);
        state.start_setup(12, 3).unwrap();
        let first = state.snapshot(Actor::Moderator);
        state.randomize_disinformation().unwrap();
        state.start_setup(12, 3).unwrap();
        assert_eq!(state.snapshot(Actor::Moderator), first);
        assert!(matches!(
            state.events()[0],
            GameEvent::SetupStarted { seed: 42, .. }
        ));
    }

    #[test]
    fn reentry_can_be_skipped() {
        let mut state = playing(8, &[2, 6], 6);
        state.execute_token(1).unwrap();
        state.skip_reentry().unwrap();
        assert_eq!(state.phase(), Phase::AwaitingModeratorKill);
        assert_eq!(state.ring().get(2).unwrap().displayed_count, 1);
    }

    #[test]
    fn reentry_can_be_disabled() {
        let config = GameConfig {
            reentry_after_execution: false,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config);
        state.start_setup(6, 1).unwrap();
        state.select_red_token(4).unwrap();
        state.select_demon(4).unwrap();
        state.set_red_disinformation(4, 0).unwrap();
        state.execute_token(1).unwrap();
        assert_eq!(state.phase(), Phase::AwaitingModeratorKill);
    }

    #[test]
    fn dead_and_unknown_tokens_are_rejected() {
        let mut state = playing(6, &[3], 3);
        assert_eq!(
            state.execute_token(9).unwrap_err(),
            TokenError::UnknownToken(9)
        );
        state.execute_token(1).unwrap();
        state.skip_reentry().unwrap();
        assert_eq!(state.kill_token(1).unwrap_err(), TokenError::AlreadyDead(1));
        assert_eq!(state.phase(), Phase::AwaitingModeratorKill);
    }

    #[test]
    fn moderator_killing_the_demon_ends_the_game() {
        let mut state = playing(6, &[2, 5], 2);
        state.execute_token(1).unwrap();
        state.skip_reentry().unwrap();
        let outcome = state.kill_token(2).unwrap();
        assert_eq!(outcome.verdict, Verdict::BlueWin);
        assert!(state.is_over());
        assert!(state.legal_actions().is_empty());
        assert!(outcome.snapshot.iter().any(|t| t.character == Some(Character::Demon)));
    }

    #[test]
    fn execution_outcome_uses_the_player_view() {
        let mut state = playing(6, &[2, 5], 2);
        let outcome = state.execute_token(4).unwrap();
        assert!(outcome.snapshot.iter().all(|t| t.character.is_none()));
    }

    #[test]
    fn intoxication_freezes_information() {
        let mut state = playing(7, &[3, 5], 5);
        state.set_intoxicated(4, true).unwrap();
        state.execute_token(3).unwrap();
        assert_eq!(state.ring().get(4).unwrap().displayed_count, 2);
        state.skip_reentry().unwrap();
        state.set_intoxicated(4, false).unwrap();
        assert_eq!(state.ring().get(4).unwrap().displayed_count, 1);
        assert!(stale_tokens(state.ring()).is_empty());
    }

    #[test]
    fn step_checks_the_actor() {
        let mut state = playing(6, &[3], 3);
        let err = state
            .step(GameAction::execute(1).by(Actor::Moderator))
            .unwrap_err();
        assert!(matches!(err, GameError::WrongActor { .. }));
        let outcome = state.step(GameAction::execute(1)).unwrap();
        assert!(outcome
            .events
            .contains(&GameEvent::TokenRemoved { token: 1, cause: DeathCause::Execution }));
        assert_eq!(state.action_log().len(), 1);
    }

    #[test]
    fn step_records_only_accepted_actions() {
        let mut state = GameState::new(GameConfig::default());
        state.step(GameAction::start_setup(5, 2)).unwrap();
        assert!(state.step(GameAction::select_red(9)).is_err());
        state.step(GameAction::select_red(1)).unwrap();
        assert_eq!(state.action_log().len(), 2);
    }

    #[test]
    fn random_paths_reach_play() {
        let mut state = GameState::new(GameConfig::default());
        state.start_setup(10, 3).unwrap();
        state.assign_random_roles().unwrap();
        assert_eq!(state.ring().red_count(), 3);
        state.randomize_disinformation().unwrap();
        assert_eq!(state.phase(), Phase::AwaitingPlayerExecution);
        assert!(stale_tokens(state.ring()).is_empty());
    }

    #[test]
    fn fully_random_config_goes_straight_to_execution() {
        let config = GameConfig {
            random_roles: true,
            random_disinformation: true,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config);
        state.start_setup(8, 2).unwrap();
        assert_eq!(state.phase(), Phase::AwaitingPlayerExecution);
        assert_eq!(state.ring().red_count(), 2);
        assert!(state.ring().demon().is_some());

        let blue = state.ring().iter().find(|t| !t.is_red()).map(|t| t.id).unwrap();
        state.execute_token(blue).unwrap();
        if !state.is_over() {
            assert_eq!(state.phase(), Phase::AwaitingModeratorKill);
        }
    }

    #[test]
    fn setup_from_game_over_starts_a_new_session() {
        let mut state = playing(5, &[2], 2);
        state.execute_token(2).unwrap();
        assert!(state.is_over());
        let old = state.session_id();
        state.start_setup(5, 1).unwrap();
        assert_ne!(state.session_id(), old);
        assert_eq!(state.phase(), Phase::AssigningRoles);
        assert!(state.ring().iter().all(|t| t.alive));
    }
}
