use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

// declaration order is the canonical hand order
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Character {
    Assassin,
    Ambassador,
    Captain,
    Contessa,
    Duke,
}

pub static CHARACTER_VARIANTS: [Character; 5] = [
    Character::Assassin,
    Character::Ambassador,
    Character::Captain,
    Character::Contessa,
    Character::Duke,
];

pub const COPIES_PER_CHARACTER: usize = 3;
pub const DECK_SIZE: usize = CHARACTER_VARIANTS.len() * COPIES_PER_CHARACTER;

impl Character {
    pub fn name(&self) -> &'static str {
        match self {
            Character::Assassin => "Assassin",
            Character::Ambassador => "Ambassador",
            Character::Captain => "Captain",
            Character::Contessa => "Contessa",
            Character::Duke => "Duke",
        }
    }
}

impl Display for Character {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An influence card held in a hand. Once `face_up` is set it stays set: the card is lost.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub character: Character,
    pub face_up: bool,
}

impl Card {
    pub fn new(character: Character) -> Self {
        Self { character, face_up: false }
    }

    pub fn is_face_down_as(&self, character: Character) -> bool {
        !self.face_up && self.character == character
    }
}

#[cfg(test)]
mod tests {
    use crate::card::{Card, Character, DECK_SIZE};

    #[test]
    fn cards_sort_by_rank_then_face_down_first() {
        let mut hand = vec![
            Card { character: Character::Duke, face_up: false },
            Card { character: Character::Captain, face_up: true },
            Card { character: Character::Captain, face_up: false },
            Card { character: Character::Assassin, face_up: true },
        ];
        hand.sort();

        assert_eq!(hand, vec![
            Card { character: Character::Assassin, face_up: true },
            Card { character: Character::Captain, face_up: false },
            Card { character: Character::Captain, face_up: true },
            Card { character: Character::Duke, face_up: false },
        ]);
    }

    #[test]
    fn face_down_match() {
        let mut card = Card::new(Character::Contessa);
        assert!(card.is_face_down_as(Character::Contessa));
        assert!(!card.is_face_down_as(Character::Duke));

        card.face_up = true;
        assert!(!card.is_face_down_as(Character::Contessa));
    }

    #[test]
    fn deck_size() {
        assert_eq!(DECK_SIZE, 15);
    }
}
