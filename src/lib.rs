pub mod action;
pub mod card;
pub mod observation;
pub mod player;
pub mod record;

pub use action::Action;
pub use card::{Card, Character};
pub use observation::{CardView, Observation, PlayerView};
pub use player::Player;
pub use record::{GameRecorder, RecordError, RecordRow};

use std::fmt::{Debug, Display, Formatter};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::card::{CHARACTER_VARIANTS, COPIES_PER_CHARACTER};
use crate::Character::{Ambassador, Assassin, Captain, Contessa, Duke};

pub const NUM_PLAYERS: usize = 2;
pub const CARDS_PER_PLAYER: usize = 2;
pub const STARTING_COINS: u8 = 2;
// the player going first in a two player game starts one coin short
pub const FIRST_PLAYER_COINS: u8 = 1;

const INCOME: i8 = 1;
const FOREIGN_AID: i8 = 2;
const TAX: i8 = 3;
const ASSASSINATE_COST: u8 = 3;
const COUP_COST: u8 = 7;
const FORCED_COUP_COINS: u8 = 10;
const MAX_STEAL: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoupError {
    /// The game reached a combination of turn, action and pending decision that no sequence of
    /// legal actions can produce.
    #[error("invalid action progression: {0}")]
    InvalidActionProgression(String),

    /// An action was applied while its requirements did not hold.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
}

/// An action the turn owner has announced and the opponent has yet to answer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proposal {
    ForeignAid,
    Tax,
    Exchange,
    Steal,
    Assassinate,
    Coup,
}

impl Proposal {
    /// Characters the proposer claims to hold. Empty when the proposal can't be challenged.
    pub fn claims(self) -> &'static [Character] {
        match self {
            Proposal::Tax => &[Duke],
            Proposal::Exchange => &[Ambassador],
            Proposal::Steal => &[Captain],
            Proposal::Assassinate => &[Assassin],
            Proposal::ForeignAid | Proposal::Coup => &[],
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Blockable {
    ForeignAid,
    Assassinate,
    Steal,
}

impl Blockable {
    /// Characters that may block this action, in the order a challenge checks them.
    pub fn claims(self) -> &'static [Character] {
        match self {
            Blockable::ForeignAid => &[Duke],
            Blockable::Assassinate => &[Contessa],
            Blockable::Steal => &[Captain, Ambassador],
        }
    }
}

/// The decision the game is waiting on within the current turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pending {
    Proposal { proposer: usize, proposal: Proposal },
    Block { blocker: usize, blocked: Blockable },
    // proposer holds four cards and has to return two
    Exchange { proposer: usize },
}

/// Where in the turn protocol the acting player is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Context {
    StartOfTurn,
    AwaitingReaction(Proposal),
    AwaitingBlockResponse(Blockable),
    AwaitingCardLoss,
    MidExchange,
    GameOver,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub first_player: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn rng(&self) -> Pcg64 {
        match self.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::seed_from_u64(rand::random()),
        }
    }
}

#[derive(Clone, Eq, PartialEq)]
pub struct Coup {
    turn: usize,
    whose_turn: usize,
    whose_action: usize,
    is_turn_begin: bool,
    game_over: bool,
    pending: Option<Pending>,
    deck: Vec<Character>,
    players: Vec<Player>,
}

impl Debug for Coup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("T {} | P {} | P* {} | {:?}\n", self.turn, self.whose_turn, self.whose_action, self.pending).as_str())?;
        for (player_idx, player) in self.players.iter().enumerate() {
            f.write_str(format!("\tP {player_idx}: ${} | {:?} | {:?}\n", player.coins, player.cards, player.last_action).as_str())?;
        }
        Ok(())
    }
}

impl Display for Coup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Turn {}", self.turn)?;
        write!(f, "Player: Cards | IsCardFaceUp | Coins | LastAction")?;
        for player in &self.players {
            write!(f, "\nP{}: ", player.id + 1)?;
            for card in &player.cards {
                write!(f, "{} ", card.character)?;
            }
            f.write_str("| ")?;
            for card in &player.cards {
                write!(f, "{} ", card.face_up)?;
            }
            match player.last_action {
                None => write!(f, "| {} | _", player.coins)?,
                Some(action) => write!(f, "| {} | {action}", player.coins)?,
            }
        }
        Ok(())
    }
}

impl Coup {
    pub fn new<R: Rng + Sized>(first_player: usize, rng: &mut R) -> Result<Self, CoupError> {
        if first_player >= NUM_PLAYERS {
            return Err(CoupError::PreconditionViolation(format!("there is no player {first_player} to go first")));
        }

        let mut deck: Vec<Character> = CHARACTER_VARIANTS.iter()
            .flat_map(|&card| std::iter::repeat(card).take(COPIES_PER_CHARACTER))
            .collect();
        deck.shuffle(rng);

        let mut players: Vec<Player> = (0..NUM_PLAYERS)
            .map(|id| Player::new(id, if id == first_player { FIRST_PLAYER_COINS } else { STARTING_COINS }))
            .collect();

        // deal one card at a time around the table
        for _ in 0..CARDS_PER_PLAYER {
            for player in players.iter_mut() {
                player.add_card(Card::new(deck.remove(0)));
            }
        }
        for player in players.iter_mut() {
            player.sort_cards();
        }

        Ok(Self {
            turn: 0,
            whose_turn: first_player,
            whose_action: first_player,
            is_turn_begin: true,
            game_over: false,
            pending: None,
            deck,
            players,
        })
    }

    pub fn from_config<R: Rng + Sized>(config: &GameConfig, rng: &mut R) -> Result<Self, CoupError> {
        Self::new(config.first_player, rng)
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn whose_turn(&self) -> usize {
        self.whose_turn
    }

    pub fn whose_action(&self) -> usize {
        self.whose_action
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_idx: usize) -> Option<&Player> {
        self.players.get(player_idx)
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn winner(&self) -> Option<usize> {
        if !self.game_over {
            return None;
        }

        self.players
            .iter()
            .position(|player| !player.is_eliminated())
    }

    fn acting_player(&self) -> &Player {
        &self.players[self.whose_action]
    }

    fn opponent_idx(&self) -> usize {
        1 - self.whose_action
    }

    fn next_player_turn(&mut self) {
        self.whose_turn = 1 - self.whose_turn;
        // a turn always opens with its owner acting
        self.whose_action = self.whose_turn;
        self.turn += 1;
        self.is_turn_begin = true;
        self.pending = None;
    }

    fn next_player_action(&mut self) {
        self.whose_action = 1 - self.whose_action;
        self.is_turn_begin = false;
    }

    pub fn context(&self) -> Result<Context, CoupError> {
        if self.game_over {
            return Ok(Context::GameOver);
        }

        if self.is_turn_begin {
            return Ok(Context::StartOfTurn);
        }

        if self.acting_player().lost_challenge {
            return Ok(Context::AwaitingCardLoss);
        }

        let owns_turn = self.whose_action == self.whose_turn;
        match self.pending {
            Some(Pending::Proposal { proposal, .. }) if !owns_turn => Ok(Context::AwaitingReaction(proposal)),
            Some(Pending::Exchange { .. }) if owns_turn => Ok(Context::MidExchange),
            Some(Pending::Block { blocked, .. }) if owns_turn => Ok(Context::AwaitingBlockResponse(blocked)),
            pending => Err(CoupError::InvalidActionProgression(format!(
                "player {} to act on the turn of player {} while {:?} is pending",
                self.whose_action, self.whose_turn, pending
            ))),
        }
    }

    pub fn actions(&self) -> Result<Vec<Action>, CoupError> {
        let mut actions = Vec::with_capacity(6);
        let actor = self.acting_player();

        match self.context()? {
            Context::GameOver => {}
            Context::StartOfTurn => {
                if actor.coins >= FORCED_COUP_COINS {
                    actions.push(Action::Coup);
                } else {
                    actions.extend([Action::Income, Action::ForeignAid, Action::Tax, Action::Exchange]);
                    if actor.coins >= ASSASSINATE_COST {
                        actions.push(Action::Assassinate);
                    }
                    if actor.coins >= COUP_COST {
                        actions.push(Action::Coup);
                    }
                    if self.players[self.opponent_idx()].coins > 0 {
                        actions.push(Action::Steal);
                    }
                }
            }
            Context::AwaitingCardLoss => {
                self.push_lose_card_options(&mut actions);
            }
            Context::AwaitingReaction(proposal) => match proposal {
                Proposal::ForeignAid => actions.extend([Action::PassForeignAid, Action::BlockForeignAid]),
                Proposal::Tax => actions.extend([Action::PassTax, Action::ChallengeTax]),
                Proposal::Exchange => actions.extend([Action::PassExchange, Action::ChallengeExchange]),
                Proposal::Steal => actions.extend([Action::PassSteal, Action::BlockSteal, Action::ChallengeSteal]),
                Proposal::Assassinate => {
                    self.push_lose_card_options(&mut actions);
                    actions.extend([Action::BlockAssassinate, Action::ChallengeAssassinate]);
                }
                // a coup can't be blocked or challenged
                Proposal::Coup => self.push_lose_card_options(&mut actions),
            },
            Context::AwaitingBlockResponse(blocked) => match blocked {
                Blockable::ForeignAid => actions.extend([Action::PassForeignAidBlock, Action::ChallengeForeignAidBlock]),
                Blockable::Assassinate => actions.extend([Action::PassAssassinateBlock, Action::ChallengeAssassinateBlock]),
                Blockable::Steal => actions.extend([Action::PassStealBlock, Action::ChallengeStealBlock]),
            },
            Context::MidExchange => {
                if actor.cards.len() != 2 * CARDS_PER_PLAYER {
                    return Err(CoupError::PreconditionViolation(format!(
                        "player {} is mid exchange with {} cards", actor.id, actor.cards.len()
                    )));
                }

                // handing back both drawn cards is always possible
                actions.push(Action::ExchangeReturn34);
                if !actor.cards[0].face_up {
                    actions.extend([Action::ExchangeReturn13, Action::ExchangeReturn14]);
                }
                if !actor.cards[1].face_up {
                    actions.extend([Action::ExchangeReturn23, Action::ExchangeReturn24]);
                }
                if !actor.cards[0].face_up && !actor.cards[1].face_up {
                    actions.push(Action::ExchangeReturn12);
                }
            }
        }

        Ok(actions)
    }

    fn push_lose_card_options(&self, actions: &mut Vec<Action>) {
        let cards = &self.acting_player().cards;
        if cards.first().is_some_and(|card| !card.face_up) {
            actions.push(Action::LoseCard1);
        }
        if cards.get(1).is_some_and(|card| !card.face_up) {
            actions.push(Action::LoseCard2);
        }
    }

    /// Returns a copy of the game with `action` applied, leaving this one untouched.
    pub fn apply_action<R: Rng + Sized>(&self, action: Action, rng: &mut R) -> Result<Coup, CoupError> {
        let mut game = self.clone();
        game.step(action, rng)?;
        Ok(game)
    }

    /// Applies `action` for the acting player. The action must be one of [`Coup::actions`].
    pub fn step<R: Rng + Sized>(&mut self, action: Action, rng: &mut R) -> Result<(), CoupError> {
        let legal = self.actions()?;
        if !legal.contains(&action) {
            return Err(CoupError::PreconditionViolation(format!(
                "{action} is not available to player {}, expected one of {legal:?}", self.whose_action
            )));
        }

        debug!("P{} -> {action} | {:?}", self.whose_action, self);

        let actor = self.whose_action;
        let opponent = self.opponent_idx();
        self.players[actor].last_action = Some(action);

        match action {
            Action::Income => {
                self.players[actor].adjust_coins(INCOME)?;
                self.next_player_turn();
            }
            Action::ForeignAid => self.propose(Proposal::ForeignAid),
            Action::Tax => self.propose(Proposal::Tax),
            Action::Exchange => self.propose(Proposal::Exchange),
            Action::Steal => self.propose(Proposal::Steal),
            Action::Coup => {
                if self.players[actor].coins < COUP_COST {
                    return Err(CoupError::PreconditionViolation(format!(
                        "player {actor} cannot coup with {} coins", self.players[actor].coins
                    )));
                }
                self.players[actor].adjust_coins(-(COUP_COST as i8))?;
                self.propose(Proposal::Coup);
            }
            Action::Assassinate => {
                // paid up front whether or not the assassination goes through
                self.players[actor].adjust_coins(-(ASSASSINATE_COST as i8))?;
                self.propose(Proposal::Assassinate);
            }
            Action::PassForeignAid | Action::PassTax | Action::PassExchange | Action::PassSteal => {
                self.next_player_action();
                self.resolve_proposal()?;
            }
            Action::PassForeignAidBlock | Action::PassAssassinateBlock | Action::PassStealBlock => {
                // the block stands
                self.next_player_turn();
            }
            Action::BlockForeignAid => self.block(Blockable::ForeignAid),
            Action::BlockAssassinate => self.block(Blockable::Assassinate),
            Action::BlockSteal => self.block(Blockable::Steal),
            Action::ChallengeForeignAidBlock => {
                if !self.challenge(Blockable::ForeignAid.claims(), rng)? {
                    // the block falls, so the aid goes through
                    self.players[actor].adjust_coins(FOREIGN_AID)?;
                    self.next_player_action();
                }
            }
            Action::ChallengeTax => {
                if self.challenge(Proposal::Tax.claims(), rng)? {
                    self.players[opponent].adjust_coins(TAX)?;
                } else {
                    self.next_player_action();
                }
            }
            Action::ChallengeExchange => {
                let genuine = self.challenge(Proposal::Exchange.claims(), rng)?;
                // the proposer acts next either way, to exchange or to give up a card
                self.next_player_action();
                if genuine {
                    self.draw_exchange()?;
                }
            }
            Action::ChallengeAssassinate => {
                let claims = Proposal::Assassinate.claims();
                if claims.iter().any(|&character| self.players[opponent].has_face_down_card(character)) {
                    // one card for the assassination and one for the challenge
                    self.eliminate(actor);
                } else {
                    self.players[opponent].lost_challenge = true;
                    // the only challenge that gives coins back
                    self.players[opponent].adjust_coins(ASSASSINATE_COST as i8)?;
                    self.next_player_action();
                }
            }
            Action::ChallengeAssassinateBlock => {
                let held = Blockable::Assassinate.claims()
                    .iter()
                    .copied()
                    .find(|&character| self.players[opponent].has_face_down_card(character));
                if let Some(character) = held {
                    self.players[actor].lost_challenge = true;
                    self.replace_card(opponent, character, rng)?;
                } else {
                    // one card for the assassination and one for the challenge
                    self.eliminate(opponent);
                }
            }
            Action::ChallengeSteal => {
                if self.challenge(Proposal::Steal.claims(), rng)? {
                    self.transfer_steal(actor, opponent)?;
                } else {
                    self.next_player_action();
                }
            }
            Action::ChallengeStealBlock => {
                if !self.challenge(Blockable::Steal.claims(), rng)? {
                    self.transfer_steal(opponent, actor)?;
                    self.next_player_action();
                }
            }
            Action::LoseCard1 => self.lose_card(0)?,
            Action::LoseCard2 => self.lose_card(1)?,
            Action::ExchangeReturn12
            | Action::ExchangeReturn13
            | Action::ExchangeReturn14
            | Action::ExchangeReturn23
            | Action::ExchangeReturn24
            | Action::ExchangeReturn34 => self.exchange_return(action, rng)?,
        }

        Ok(())
    }

    fn propose(&mut self, proposal: Proposal) {
        self.pending = Some(Pending::Proposal { proposer: self.whose_action, proposal });
        self.next_player_action();
    }

    fn block(&mut self, blocked: Blockable) {
        self.pending = Some(Pending::Block { blocker: self.whose_action, blocked });
        self.next_player_action();
    }

    // the opponent let the proposal through, the proposer is acting again
    fn resolve_proposal(&mut self) -> Result<(), CoupError> {
        let proposal = match self.pending {
            Some(Pending::Proposal { proposal, .. }) => proposal,
            pending => {
                return Err(CoupError::InvalidActionProgression(format!("no proposal to resolve, {pending:?} is pending")));
            }
        };

        let proposer = self.whose_action;
        match proposal {
            Proposal::ForeignAid => {
                self.players[proposer].adjust_coins(FOREIGN_AID)?;
                self.next_player_turn();
            }
            Proposal::Tax => {
                self.players[proposer].adjust_coins(TAX)?;
                self.next_player_turn();
            }
            Proposal::Steal => {
                self.transfer_steal(self.opponent_idx(), proposer)?;
                self.next_player_turn();
            }
            Proposal::Exchange => self.draw_exchange()?,
            Proposal::Assassinate | Proposal::Coup => {
                return Err(CoupError::InvalidActionProgression(format!(
                    "{proposal:?} is resolved by its target losing a card, not by a pass"
                )));
            }
        }

        Ok(())
    }

    /// Settles a challenge by the acting player against the opponent's claim to one of `claims`.
    ///
    /// Returns `true` when the claim was genuine: the shown card is swapped for a fresh one and the
    /// challenger owes a card. Otherwise the claimant owes a card.
    fn challenge<R: Rng + Sized>(&mut self, claims: &[Character], rng: &mut R) -> Result<bool, CoupError> {
        let challenger = self.whose_action;
        let claimant = self.opponent_idx();

        match claims.iter().copied().find(|&character| self.players[claimant].has_face_down_card(character)) {
            Some(character) => {
                self.players[challenger].lost_challenge = true;
                self.replace_card(claimant, character, rng)?;
                Ok(true)
            }
            None => {
                info!("player {claimant} was bluffing {claims:?}");
                self.players[claimant].lost_challenge = true;
                Ok(false)
            }
        }
    }

    // a card shown to win a challenge goes back in the deck for a fresh one
    fn replace_card<R: Rng + Sized>(&mut self, player_idx: usize, character: Character, rng: &mut R) -> Result<(), CoupError> {
        let card_idx = self.players[player_idx].find_face_down_card(character).ok_or_else(|| {
            CoupError::PreconditionViolation(format!("player {player_idx} has no face down {character} to replace"))
        })?;

        info!("player {player_idx} shows and replaces {character}");
        self.deck.push(character);
        self.deck.shuffle(rng);

        let drawn = self.draw()?;
        self.players[player_idx].cards[card_idx] = Card::new(drawn);
        self.players[player_idx].sort_cards();
        Ok(())
    }

    fn draw(&mut self) -> Result<Character, CoupError> {
        if self.deck.is_empty() {
            return Err(CoupError::PreconditionViolation("cannot draw from an empty deck".to_string()));
        }
        Ok(self.deck.remove(0))
    }

    fn draw_exchange(&mut self) -> Result<(), CoupError> {
        let proposer = self.whose_action;
        for _ in 0..CARDS_PER_PLAYER {
            let drawn = self.draw()?;
            self.players[proposer].add_card(Card::new(drawn));
        }
        // turn and action stay put until the proposer hands two cards back
        self.pending = Some(Pending::Exchange { proposer });
        Ok(())
    }

    fn exchange_return<R: Rng + Sized>(&mut self, action: Action, rng: &mut R) -> Result<(), CoupError> {
        let slots = action.returned_slots().ok_or_else(|| {
            CoupError::PreconditionViolation(format!("{action} does not return any cards"))
        })?;

        let actor = self.whose_action;
        let player = &mut self.players[actor];
        if player.cards.len() != 2 * CARDS_PER_PLAYER {
            return Err(CoupError::PreconditionViolation(format!(
                "player {actor} is mid exchange with {} cards", player.cards.len()
            )));
        }
        if slots.iter().any(|&slot| player.cards[slot].face_up) {
            return Err(CoupError::PreconditionViolation(format!("player {actor} cannot return a face up card")));
        }

        for &slot in slots.iter().rev() {
            let card = player.cards.remove(slot);
            self.deck.push(card.character);
        }
        player.sort_cards();
        self.deck.shuffle(rng);
        self.pending = None;

        if self.players[self.opponent_idx()].lost_challenge {
            // the challenger still has to give up a card
            self.next_player_action();
        } else {
            self.next_player_turn();
        }
        Ok(())
    }

    fn transfer_steal(&mut self, from: usize, to: usize) -> Result<(), CoupError> {
        let amount = self.players[from].coins.min(MAX_STEAL) as i8;
        self.players[from].adjust_coins(-amount)?;
        self.players[to].adjust_coins(amount)?;
        Ok(())
    }

    fn eliminate(&mut self, player_idx: usize) {
        for card in self.players[player_idx].cards.iter_mut() {
            card.face_up = true;
        }
        self.game_over = true;
        info!("game over, player {player_idx} lost both cards at once");
    }

    fn lose_card(&mut self, card_idx: usize) -> Result<(), CoupError> {
        let actor = self.whose_action;
        let player = &mut self.players[actor];
        let card = player.cards.get_mut(card_idx).ok_or_else(|| {
            CoupError::PreconditionViolation(format!("player {actor} has no card {}", card_idx + 1))
        })?;
        if card.face_up {
            return Err(CoupError::PreconditionViolation(format!("player {actor} already lost card {}", card_idx + 1)));
        }

        // 'losing' an influence means the card is flipped up for good
        card.face_up = true;
        player.lost_challenge = false;
        player.sort_cards();

        self.game_over = player.is_eliminated();
        if self.game_over {
            info!("game over, player {actor} has no influence left");
        }

        self.next_player_turn();
        Ok(())
    }

    /// Snapshot from `perspective`'s seat, with the opponent's face down cards hidden.
    pub fn observe(&self, perspective: usize) -> Result<Observation, CoupError> {
        Observation::new(self, perspective, true)
    }

    /// Snapshot from `perspective`'s seat with every card visible.
    pub fn observe_full(&self, perspective: usize) -> Result<Observation, CoupError> {
        Observation::new(self, perspective, false)
    }

    /// Writes the human readable dump to the log.
    pub fn render(&self) {
        for line in self.to_string().lines() {
            info!("{line}");
        }
    }
}
