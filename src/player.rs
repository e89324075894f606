use crate::action::Action;
use crate::card::{Card, Character};
use crate::CoupError;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Player {
    pub(crate) id: usize,
    pub(crate) coins: u8,
    // two at rest, four while choosing which to return from an exchange
    pub(crate) cards: Vec<Card>,
    pub(crate) last_action: Option<Action>,
    // lost a challenge and still owes a card
    pub(crate) lost_challenge: bool,
}

impl Player {
    pub fn new(id: usize, coins: u8) -> Self {
        Self {
            id,
            coins,
            cards: Vec::with_capacity(4),
            last_action: None,
            lost_challenge: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn coins(&self) -> u8 {
        self.coins
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    pub fn lost_challenge(&self) -> bool {
        self.lost_challenge
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn adjust_coins(&mut self, delta: i8) -> Result<(), CoupError> {
        self.coins = self.coins.checked_add_signed(delta).ok_or_else(|| {
            CoupError::PreconditionViolation(format!(
                "player {} cannot adjust {} coins by {delta}", self.id, self.coins
            ))
        })?;
        Ok(())
    }

    pub fn has_face_down_card(&self, character: Character) -> bool {
        self.cards.iter().any(|card| card.is_face_down_as(character))
    }

    pub(crate) fn find_face_down_card(&self, character: Character) -> Option<usize> {
        self.cards.iter().position(|card| card.is_face_down_as(character))
    }

    pub fn sort_cards(&mut self) {
        self.cards.sort();
    }

    pub fn face_up_count(&self) -> usize {
        self.cards.iter().filter(|card| card.face_up).count()
    }

    pub fn is_eliminated(&self) -> bool {
        self.cards.iter().all(|card| card.face_up)
    }
}

#[cfg(test)]
mod tests {
    use crate::card::{Card, Character};
    use crate::player::Player;
    use crate::CoupError;

    #[test]
    fn coins_never_go_negative() {
        let mut player = Player::new(0, 2);
        player.adjust_coins(3).unwrap();
        assert_eq!(player.coins(), 5);

        player.adjust_coins(-5).unwrap();
        assert_eq!(player.coins(), 0);

        assert!(matches!(player.adjust_coins(-1), Err(CoupError::PreconditionViolation(_))));
        assert_eq!(player.coins(), 0);
    }

    #[test]
    fn face_down_queries() {
        let mut player = Player::new(1, 2);
        player.add_card(Card::new(Character::Duke));
        player.add_card(Card { character: Character::Captain, face_up: true });

        assert!(player.has_face_down_card(Character::Duke));
        assert!(!player.has_face_down_card(Character::Captain));
        assert_eq!(player.face_up_count(), 1);
        assert!(!player.is_eliminated());

        player.sort_cards();
        assert_eq!(player.cards()[0].character, Character::Captain);
        assert_eq!(player.find_face_down_card(Character::Duke), Some(1));

        player.cards[1].face_up = true;
        assert!(player.is_eliminated());
    }
}
