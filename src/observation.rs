//! Structured snapshot of a game from one player's seat, for encoders and loggers.

use serde::{Deserialize, Serialize};
use crate::action::Action;
use crate::card::{Card, Character};
use crate::player::Player;
use crate::{Coup, CoupError, NUM_PLAYERS};

/// A card as seen from the observing seat. `character` is `None` when the card is hidden.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub character: Option<Character>,
    pub face_up: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: usize,
    pub cards: Vec<CardView>,
    pub coins: u8,
    pub last_action: Option<Action>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub me: PlayerView,
    pub opponent: PlayerView,
    pub whose_action: usize,
}

impl PlayerView {
    fn new(player: &Player, hide_face_down: bool) -> Self {
        Self {
            id: player.id(),
            cards: player.cards().iter().map(|card| view_card(card, hide_face_down)).collect(),
            coins: player.coins(),
            last_action: player.last_action(),
        }
    }
}

// face up cards are public knowledge
fn view_card(card: &Card, hide_face_down: bool) -> CardView {
    CardView {
        character: if hide_face_down && !card.face_up { None } else { Some(card.character) },
        face_up: card.face_up,
    }
}

impl Observation {
    pub(crate) fn new(game: &Coup, perspective: usize, masked: bool) -> Result<Self, CoupError> {
        if perspective >= NUM_PLAYERS {
            return Err(CoupError::PreconditionViolation(format!("there is no seat {perspective} to observe from")));
        }

        let players = game.players();
        Ok(Self {
            me: PlayerView::new(&players[perspective], false),
            opponent: PlayerView::new(&players[1 - perspective], masked),
            whose_action: game.whose_action(),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::action::Action;
    use crate::observation::Observation;
    use crate::{Coup, CoupError};

    #[test]
    fn opponent_cards_hidden() {
        let mut rng = Pcg64::seed_from_u64(3);
        let coup = Coup::new(0, &mut rng).unwrap();

        let obs = coup.observe(0).unwrap();
        assert_eq!(obs.me.id, 0);
        assert_eq!(obs.opponent.id, 1);
        assert_eq!(obs.me.coins, 1);
        assert_eq!(obs.opponent.coins, 2);
        assert_eq!(obs.whose_action, 0);
        assert!(obs.me.cards.iter().all(|c| c.character.is_some() && !c.face_up));
        assert!(obs.opponent.cards.iter().all(|c| c.character.is_none() && !c.face_up));
        assert_eq!(obs.me.last_action, None);

        let full = coup.observe_full(1).unwrap();
        assert_eq!(full.me.id, 1);
        assert!(full.opponent.cards.iter().all(|c| c.character.is_some()));
        assert_eq!(full.opponent.cards[0].character, Some(coup.players()[0].cards()[0].character));
    }

    #[test]
    fn face_up_cards_are_visible() {
        let mut rng = Pcg64::seed_from_u64(3);
        let mut coup = Coup::new(0, &mut rng).unwrap();
        coup.players[1].coins = 7;
        coup = coup.apply_action(Action::Income, &mut rng).unwrap();
        coup = coup.apply_action(Action::Coup, &mut rng).unwrap();
        coup = coup.apply_action(Action::LoseCard1, &mut rng).unwrap();

        let obs = coup.observe(1).unwrap();
        let revealed: Vec<_> = obs.opponent.cards.iter().filter(|c| c.face_up).collect();
        assert_eq!(revealed.len(), 1);
        assert!(revealed[0].character.is_some());
        assert_eq!(obs.me.last_action, Some(Action::Coup));
        assert_eq!(obs.opponent.last_action, Some(Action::LoseCard1));
    }

    #[test]
    fn json_round_trip() {
        let mut rng = Pcg64::seed_from_u64(3);
        let coup = Coup::new(1, &mut rng).unwrap();
        let obs = coup.observe(1).unwrap();

        let json = obs.to_json().unwrap();
        assert!(json.contains("\"whose_action\":1"));
        assert_eq!(serde_json::from_str::<Observation>(&json).unwrap(), obs);
    }

    #[test]
    fn unknown_seat() {
        let mut rng = Pcg64::seed_from_u64(3);
        let coup = Coup::new(0, &mut rng).unwrap();
        assert!(matches!(coup.observe(2), Err(CoupError::PreconditionViolation(_))));
    }
}
