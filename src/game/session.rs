use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use super::deck::{AdvancePolicy, Deck, DeckStatus, FrozenCatalog};
use super::error::{GameError, GameResult, Precondition};
use super::roster::Roster;
use super::scoreboard::{ActionKind, Scoreboard};
use super::turn::TurnTracker;
use crate::models::{Card, Player, PlayerId, RawEntry, Team};

/// Round lifecycle. Turn and action operations are only accepted in `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Idle,
    InProgress,
}

/// Session tunables, taken from the game config at startup
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub default_time_limit: u32,
    pub max_time_limit: u32,
    /// Fixed shuffle seed; `None` seeds from the OS
    pub shuffle_seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_time_limit: 60,
            max_time_limit: 600,
            shuffle_seed: None,
        }
    }
}

/// Final result of a round that ran out of cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundOutcome {
    pub scores: Scoreboard,
    pub winner: Option<Team>,
}

/// Per-requester snapshot of the round. `card` is only filled in for the
/// clue-giver and the opposing team.
#[derive(Debug, Clone, Serialize)]
pub struct RoundView {
    pub phase: RoundPhase,
    pub active_player: Option<Player>,
    pub opposing_team: Option<Team>,
    pub can_see_word: bool,
    pub card: Option<Card>,
    pub scores: Scoreboard,
    pub time_limit_seconds: u32,
    pub cards_remaining: usize,
    pub you: Option<Player>,
    pub last_round: Option<RoundOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LobbyView {
    pub players: Vec<Player>,
    pub can_start: bool,
    pub started: bool,
    pub time_limit_seconds: u32,
    pub you: Option<Player>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub action: ActionKind,
    pub team: Team,
    pub team_score: u32,
    pub passes: u32,
    pub cards_remaining: usize,
    pub round_over: bool,
}

/// The single game session: roster, deck, turn and score, composed into one
/// round lifecycle. Not synchronised on its own; see `SharedSession`.
pub struct Session {
    settings: SessionSettings,
    roster: Roster,
    deck: Deck,
    catalog: FrozenCatalog,
    scoreboard: Scoreboard,
    turn: TurnTracker,
    time_limit_seconds: u32,
    phase: RoundPhase,
    last_round: Option<RoundOutcome>,
    rng: StdRng,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        let rng = match settings.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        Self {
            settings,
            roster: Roster::new(),
            deck: Deck::default(),
            catalog: FrozenCatalog::default(),
            scoreboard: Scoreboard::default(),
            turn: TurnTracker::default(),
            time_limit_seconds: settings.default_time_limit,
            phase: RoundPhase::Idle,
            last_round: None,
            rng,
        }
    }

    pub fn register(&mut self, name: &str, team: &str) -> GameResult<Player> {
        if self.phase == RoundPhase::InProgress {
            return Err(Precondition::RoundInProgress.into());
        }
        let team = team.parse::<Team>().map_err(|e| {
            GameError::invalid(format!("Unknown team '{}'. Choose red or blue.", e.0))
        })?;

        let player = self.roster.register(name, team)?;
        tracing::info!(
            "Player {} ({}) joined team {}",
            player.name,
            player.id,
            player.team
        );
        Ok(player)
    }

    /// Start a round from a freshly loaded catalog. Nothing changes unless
    /// every check passes.
    pub fn start_round(
        &mut self,
        entries: &[RawEntry],
        time_limit_seconds: Option<u32>,
    ) -> GameResult<()> {
        if self.phase == RoundPhase::InProgress {
            return Err(Precondition::RoundInProgress.into());
        }

        let time_limit = time_limit_seconds.unwrap_or(self.settings.default_time_limit);
        if time_limit == 0 || time_limit > self.settings.max_time_limit {
            return Err(GameError::invalid(format!(
                "Time limit must be between 1 and {} seconds.",
                self.settings.max_time_limit
            )));
        }

        if self.roster.len() < 2 {
            return Err(Precondition::NotEnoughPlayers.into());
        }
        if !self.roster.can_start() {
            return Err(Precondition::TeamsUnbalanced.into());
        }

        let (catalog, deck) = Deck::build_round(entries, &mut self.rng)?;

        tracing::info!(
            "Round started with {} players, {} cards, {}s turns",
            self.roster.len(),
            deck.len(),
            time_limit
        );

        self.catalog = catalog;
        self.deck = deck;
        self.scoreboard.reset();
        self.turn.reset();
        self.time_limit_seconds = time_limit;
        self.last_round = None;
        self.phase = RoundPhase::InProgress;
        Ok(())
    }

    /// Snapshot for `requester`. Unknown or absent requesters get the
    /// redacted view.
    pub fn view_state(&self, requester: Option<PlayerId>) -> GameResult<RoundView> {
        let you = requester.and_then(|id| self.roster.get(id)).cloned();

        let mut view = RoundView {
            phase: self.phase,
            active_player: None,
            opposing_team: None,
            can_see_word: false,
            card: None,
            scores: self.scoreboard,
            time_limit_seconds: self.time_limit_seconds,
            cards_remaining: self.deck.len(),
            you,
            last_round: self.last_round.clone(),
        };

        if self.phase == RoundPhase::Idle {
            return Ok(view);
        }

        let active = self.turn.current(&self.roster)?;
        let opposing = active.team.other();
        let can_see_word = view
            .you
            .as_ref()
            .is_some_and(|me| me.id == active.id || me.team == opposing);

        if can_see_word {
            view.card = self
                .deck
                .peek_current()
                .ok()
                .and_then(|word| self.catalog.get(word))
                .cloned();
        }

        view.active_player = Some(active.clone());
        view.opposing_team = Some(opposing);
        view.can_see_word = can_see_word;
        Ok(view)
    }

    pub fn lobby(&self, requester: Option<PlayerId>) -> LobbyView {
        LobbyView {
            players: self.roster.players().to_vec(),
            can_start: self.roster.can_start(),
            started: self.phase == RoundPhase::InProgress,
            time_limit_seconds: self.time_limit_seconds,
            you: requester.and_then(|id| self.roster.get(id)).cloned(),
        }
    }

    /// Score the current card for the clue-giver's team and move the deck on.
    /// Emptying the deck ends the round.
    pub fn record_action(
        &mut self,
        requester: PlayerId,
        kind: ActionKind,
    ) -> GameResult<ActionOutcome> {
        self.require_in_progress()?;
        self.deck.peek_current()?;
        let team = self.require_active(requester)?.team;

        let team_score = self.scoreboard.record(team, kind);
        let policy = match kind {
            ActionKind::Pass => AdvancePolicy::Recycle,
            ActionKind::Correct | ActionKind::Taboo => AdvancePolicy::Discard,
        };
        let status = self.deck.advance(policy);
        let round_over = status == DeckStatus::Exhausted;

        tracing::info!(
            "Player {} recorded {:?} for team {} (score {})",
            requester,
            kind,
            team,
            team_score
        );

        if round_over {
            self.finish_round();
        }

        Ok(ActionOutcome {
            action: kind,
            team,
            team_score,
            passes: self.scoreboard.passes,
            cards_remaining: self.deck.len(),
            round_over,
        })
    }

    /// Hand the clue-giver role to the next player in join order
    pub fn advance_turn(&mut self, requester: PlayerId) -> GameResult<Player> {
        self.require_in_progress()?;
        self.require_active(requester)?;

        self.turn.advance(&self.roster);
        let next = self.turn.current(&self.roster)?.clone();
        tracing::info!("Turn passed from {} to {} ({})", requester, next.name, next.id);
        Ok(next)
    }

    /// Back to an empty session. Every previously issued player id becomes
    /// unknown.
    pub fn reset(&mut self) {
        self.roster.reset();
        self.deck.clear();
        self.catalog = FrozenCatalog::default();
        self.scoreboard.reset();
        self.turn.reset();
        self.time_limit_seconds = self.settings.default_time_limit;
        self.phase = RoundPhase::Idle;
        self.last_round = None;
        tracing::info!("Session reset");
    }

    fn finish_round(&mut self) {
        let outcome = RoundOutcome {
            scores: self.scoreboard,
            winner: self.scoreboard.leader(),
        };
        tracing::info!(
            "Round over: red {} - blue {}",
            outcome.scores.red,
            outcome.scores.blue
        );
        self.deck.clear();
        self.catalog = FrozenCatalog::default();
        self.phase = RoundPhase::Idle;
        self.last_round = Some(outcome);
    }

    fn require_in_progress(&self) -> GameResult<()> {
        match self.phase {
            RoundPhase::InProgress => Ok(()),
            RoundPhase::Idle => Err(Precondition::RoundNotStarted.into()),
        }
    }

    fn require_active(&self, requester: PlayerId) -> GameResult<&Player> {
        let active = self.turn.current(&self.roster)?;
        if active.id == requester {
            return Ok(active);
        }
        if self.roster.get(requester).is_none() {
            return Err(GameError::UnknownPlayer);
        }
        tracing::debug!(
            "Player {} tried to act during {}'s turn",
            requester,
            active.name
        );
        Err(GameError::Forbidden)
    }
}

#[cfg(test)]
impl Session {
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn turn_index(&self) -> usize {
        self.turn.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn seeded() -> Session {
        Session::new(SessionSettings {
            shuffle_seed: Some(7),
            ..SessionSettings::default()
        })
    }

    fn cards(n: usize) -> Vec<RawEntry> {
        (0..n)
            .map(|i| RawEntry::new(&format!("word{}", i), &["a", "b"]))
            .collect()
    }

    /// A/red, B/blue, started with `n` cards
    fn started(n: usize) -> (Session, Player, Player) {
        let mut session = seeded();
        let a = session.register("A", "red").unwrap();
        let b = session.register("B", "blue").unwrap();
        session.start_round(&cards(n), Some(60)).unwrap();
        (session, a, b)
    }

    #[test]
    fn test_full_turn_scenario() {
        let (mut session, a, b) = started(5);
        assert_eq!(session.phase(), RoundPhase::InProgress);
        assert_eq!(session.turn_index(), 0);
        let view = session.view_state(Some(a.id)).unwrap();
        assert_eq!(view.active_player.as_ref(), Some(&a));

        let outcome = session.record_action(a.id, ActionKind::Correct).unwrap();
        assert_eq!(outcome.team_score, 1);
        assert_eq!(session.scoreboard().red, 1);
        assert_eq!(session.deck().len(), 4);

        let front = session.deck().peek_current().unwrap().clone();
        session.record_action(a.id, ActionKind::Pass).unwrap();
        assert_eq!(session.scoreboard().passes, 1);
        assert_eq!(session.deck().len(), 4);
        assert_eq!(session.deck().words().last(), Some(&front));

        let next = session.advance_turn(a.id).unwrap();
        assert_eq!(next, b);
        let view = session.view_state(Some(b.id)).unwrap();
        assert_eq!(view.active_player, Some(b));
    }

    #[test]
    fn test_register_rejected_during_round() {
        let (mut session, _, _) = started(3);
        assert_eq!(
            session.register("Late", "red").unwrap_err(),
            GameError::Precondition(Precondition::RoundInProgress)
        );
        assert_eq!(session.roster().len(), 2);
    }

    #[test]
    fn test_register_rejects_unknown_team() {
        let mut session = seeded();
        match session.register("A", "green") {
            Err(GameError::InvalidInput(message)) => assert!(message.contains("'green'")),
            other => panic!("expected invalid input, got {:?}", other),
        }
        assert!(session.roster().is_empty());

        let player = session.register("B", " BLUE ").unwrap();
        assert_eq!(player.team, Team::Blue);
    }

    #[test]
    fn test_start_round_precondition_order() {
        let mut session = seeded();
        assert_eq!(
            session.start_round(&cards(3), None).unwrap_err(),
            GameError::Precondition(Precondition::NotEnoughPlayers)
        );

        session.register("A", "red").unwrap();
        session.register("B", "red").unwrap();
        assert_eq!(
            session.start_round(&cards(3), None).unwrap_err(),
            GameError::Precondition(Precondition::TeamsUnbalanced)
        );

        session.register("C", "blue").unwrap();
        assert_eq!(
            session.start_round(&[RawEntry::new("X", &[])], None).unwrap_err(),
            GameError::Precondition(Precondition::EmptyCatalog)
        );
        assert_eq!(session.phase(), RoundPhase::Idle);
        assert!(session.deck().is_empty());

        session.start_round(&cards(3), None).unwrap();
        assert_eq!(
            session.start_round(&cards(3), None).unwrap_err(),
            GameError::Precondition(Precondition::RoundInProgress)
        );
    }

    #[test]
    fn test_start_round_validates_time_limit() {
        let mut session = seeded();
        session.register("A", "red").unwrap();
        session.register("B", "blue").unwrap();

        assert!(matches!(
            session.start_round(&cards(3), Some(0)),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            session.start_round(&cards(3), Some(601)),
            Err(GameError::InvalidInput(_))
        ));
        assert_eq!(session.phase(), RoundPhase::Idle);

        session.start_round(&cards(3), None).unwrap();
        assert_eq!(session.view_state(None).unwrap().time_limit_seconds, 60);
    }

    #[test]
    fn test_start_round_zeroes_previous_scores() {
        let (mut session, a, _) = started(1);
        session.record_action(a.id, ActionKind::Correct).unwrap();
        assert_eq!(session.phase(), RoundPhase::Idle);

        session.start_round(&cards(2), None).unwrap();
        assert_eq!(session.scoreboard(), Scoreboard::default());
        assert!(session.view_state(None).unwrap().last_round.is_none());
    }

    #[test]
    fn test_word_visibility() {
        let mut session = seeded();
        let a = session.register("A", "red").unwrap();
        let b = session.register("B", "blue").unwrap();
        let teammate = session.register("C", "red").unwrap();
        session.start_round(&cards(3), None).unwrap();

        let clue_giver = session.view_state(Some(a.id)).unwrap();
        assert!(clue_giver.can_see_word);
        assert!(clue_giver.card.is_some());

        let opponent = session.view_state(Some(b.id)).unwrap();
        assert!(opponent.can_see_word);
        assert_eq!(opponent.card, clue_giver.card);
        assert_eq!(opponent.opposing_team, Some(Team::Blue));

        let guesser = session.view_state(Some(teammate.id)).unwrap();
        assert!(!guesser.can_see_word);
        assert!(guesser.card.is_none());
        assert_eq!(guesser.scores, clue_giver.scores);
        assert_eq!(guesser.active_player, Some(a.clone()));

        let stranger = session.view_state(Some(Uuid::new_v4())).unwrap();
        assert!(stranger.card.is_none());
        assert!(stranger.you.is_none());
        assert!(session.view_state(None).unwrap().card.is_none());
    }

    #[test]
    fn test_non_clue_giver_cannot_mutate() {
        let (mut session, _a, b) = started(3);
        let deck_before: Vec<String> = session.deck().words().cloned().collect();

        assert_eq!(
            session.record_action(b.id, ActionKind::Correct).unwrap_err(),
            GameError::Forbidden
        );
        assert_eq!(
            session.advance_turn(b.id).unwrap_err(),
            GameError::Forbidden
        );
        assert_eq!(
            session.record_action(Uuid::new_v4(), ActionKind::Pass).unwrap_err(),
            GameError::UnknownPlayer
        );

        assert_eq!(session.scoreboard(), Scoreboard::default());
        assert_eq!(session.turn_index(), 0);
        assert_eq!(
            session.deck().words().cloned().collect::<Vec<_>>(),
            deck_before
        );
    }

    #[test]
    fn test_deck_exhaustion_ends_round() {
        let (mut session, a, _) = started(2);
        session.record_action(a.id, ActionKind::Taboo).unwrap();
        let outcome = session.record_action(a.id, ActionKind::Correct).unwrap();

        assert!(outcome.round_over);
        assert_eq!(session.phase(), RoundPhase::Idle);
        assert_eq!(session.scoreboard().red, 1);

        let view = session.view_state(Some(a.id)).unwrap();
        assert_eq!(view.scores.red, 1);
        assert!(view.card.is_none());
        assert_eq!(
            view.last_round,
            Some(RoundOutcome {
                scores: session.scoreboard(),
                winner: Some(Team::Red),
            })
        );

        assert_eq!(
            session.record_action(a.id, ActionKind::Correct).unwrap_err(),
            GameError::Precondition(Precondition::RoundNotStarted)
        );
    }

    #[test]
    fn test_advance_turn_rejected_when_idle() {
        let (mut session, a, _) = started(1);
        session.record_action(a.id, ActionKind::Correct).unwrap();
        assert_eq!(
            session.advance_turn(a.id).unwrap_err(),
            GameError::Precondition(Precondition::RoundNotStarted)
        );
    }

    #[test]
    fn test_passing_only_card_keeps_round_alive() {
        let (mut session, a, _) = started(1);
        let outcome = session.record_action(a.id, ActionKind::Pass).unwrap();
        assert!(!outcome.round_over);
        assert_eq!(outcome.passes, 1);
        assert_eq!(session.phase(), RoundPhase::InProgress);
    }

    #[test]
    fn test_reset_invalidates_players() {
        let (mut session, a, _) = started(3);
        session.record_action(a.id, ActionKind::Correct).unwrap();
        session.reset();

        assert_eq!(session.phase(), RoundPhase::Idle);
        assert!(session.roster().is_empty());
        assert_eq!(session.scoreboard(), Scoreboard::default());
        assert!(session.deck().is_empty());
        assert_eq!(session.turn_index(), 0);

        let c = session.register("C", "red").unwrap();
        session.register("D", "blue").unwrap();
        session.start_round(&cards(3), None).unwrap();

        assert_eq!(
            session.record_action(a.id, ActionKind::Correct).unwrap_err(),
            GameError::UnknownPlayer
        );
        assert_eq!(
            session.advance_turn(a.id).unwrap_err(),
            GameError::UnknownPlayer
        );
        assert!(session.view_state(Some(a.id)).unwrap().card.is_none());
        assert!(session.record_action(c.id, ActionKind::Correct).is_ok());
    }

    #[test]
    fn test_lobby_view() {
        let mut session = seeded();
        let a = session.register("A", "red").unwrap();
        let lobby = session.lobby(Some(a.id));
        assert_eq!(lobby.players.len(), 1);
        assert!(!lobby.can_start);
        assert!(!lobby.started);
        assert_eq!(lobby.you, Some(a));
        assert_eq!(lobby.time_limit_seconds, 60);
    }
}
