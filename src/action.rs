use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Every move either player can make. The acting player is implied by the game state.
///
/// The discriminants are the stable action ids (0 to 31) used by encoders and logs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Income = 0,
    ForeignAid = 1,
    Coup = 2,
    Tax = 3,
    Assassinate = 4,
    Exchange = 5,
    Steal = 6,
    #[serde(rename = "lose_card_1")]
    LoseCard1 = 7,
    #[serde(rename = "lose_card_2")]
    LoseCard2 = 8,
    #[serde(rename = "pass_fa")]
    PassForeignAid = 9,
    #[serde(rename = "pass_fa_block")]
    PassForeignAidBlock = 10,
    PassTax = 11,
    PassExchange = 12,
    PassAssassinateBlock = 13,
    PassSteal = 14,
    PassStealBlock = 15,
    #[serde(rename = "block_fa")]
    BlockForeignAid = 16,
    BlockAssassinate = 17,
    BlockSteal = 18,
    #[serde(rename = "challenge_fa_block")]
    ChallengeForeignAidBlock = 19,
    ChallengeTax = 20,
    ChallengeExchange = 21,
    ChallengeAssassinate = 22,
    ChallengeAssassinateBlock = 23,
    ChallengeSteal = 24,
    ChallengeStealBlock = 25,
    #[serde(rename = "exchange_return_12")]
    ExchangeReturn12 = 26,
    #[serde(rename = "exchange_return_13")]
    ExchangeReturn13 = 27,
    #[serde(rename = "exchange_return_14")]
    ExchangeReturn14 = 28,
    #[serde(rename = "exchange_return_23")]
    ExchangeReturn23 = 29,
    #[serde(rename = "exchange_return_24")]
    ExchangeReturn24 = 30,
    #[serde(rename = "exchange_return_34")]
    ExchangeReturn34 = 31,
}

pub static ACTION_VARIANTS: [Action; 32] = [
    Action::Income,
    Action::ForeignAid,
    Action::Coup,
    Action::Tax,
    Action::Assassinate,
    Action::Exchange,
    Action::Steal,
    Action::LoseCard1,
    Action::LoseCard2,
    Action::PassForeignAid,
    Action::PassForeignAidBlock,
    Action::PassTax,
    Action::PassExchange,
    Action::PassAssassinateBlock,
    Action::PassSteal,
    Action::PassStealBlock,
    Action::BlockForeignAid,
    Action::BlockAssassinate,
    Action::BlockSteal,
    Action::ChallengeForeignAidBlock,
    Action::ChallengeTax,
    Action::ChallengeExchange,
    Action::ChallengeAssassinate,
    Action::ChallengeAssassinateBlock,
    Action::ChallengeSteal,
    Action::ChallengeStealBlock,
    Action::ExchangeReturn12,
    Action::ExchangeReturn13,
    Action::ExchangeReturn14,
    Action::ExchangeReturn23,
    Action::ExchangeReturn24,
    Action::ExchangeReturn34,
];

impl Action {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        ACTION_VARIANTS.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Income => "income",
            Action::ForeignAid => "foreign_aid",
            Action::Coup => "coup",
            Action::Tax => "tax",
            Action::Assassinate => "assassinate",
            Action::Exchange => "exchange",
            Action::Steal => "steal",
            Action::LoseCard1 => "lose_card_1",
            Action::LoseCard2 => "lose_card_2",
            Action::PassForeignAid => "pass_fa",
            Action::PassForeignAidBlock => "pass_fa_block",
            Action::PassTax => "pass_tax",
            Action::PassExchange => "pass_exchange",
            Action::PassAssassinateBlock => "pass_assassinate_block",
            Action::PassSteal => "pass_steal",
            Action::PassStealBlock => "pass_steal_block",
            Action::BlockForeignAid => "block_fa",
            Action::BlockAssassinate => "block_assassinate",
            Action::BlockSteal => "block_steal",
            Action::ChallengeForeignAidBlock => "challenge_fa_block",
            Action::ChallengeTax => "challenge_tax",
            Action::ChallengeExchange => "challenge_exchange",
            Action::ChallengeAssassinate => "challenge_assassinate",
            Action::ChallengeAssassinateBlock => "challenge_assassinate_block",
            Action::ChallengeSteal => "challenge_steal",
            Action::ChallengeStealBlock => "challenge_steal_block",
            Action::ExchangeReturn12 => "exchange_return_12",
            Action::ExchangeReturn13 => "exchange_return_13",
            Action::ExchangeReturn14 => "exchange_return_14",
            Action::ExchangeReturn23 => "exchange_return_23",
            Action::ExchangeReturn24 => "exchange_return_24",
            Action::ExchangeReturn34 => "exchange_return_34",
        }
    }

    /// Hand slots (0-based) handed back to the deck by an exchange return.
    pub fn returned_slots(self) -> Option<[usize; 2]> {
        match self {
            Action::ExchangeReturn12 => Some([0, 1]),
            Action::ExchangeReturn13 => Some([0, 2]),
            Action::ExchangeReturn14 => Some([0, 3]),
            Action::ExchangeReturn23 => Some([1, 2]),
            Action::ExchangeReturn24 => Some([1, 3]),
            Action::ExchangeReturn34 => Some([2, 3]),
            _ => None,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action \"{0}\"")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACTION_VARIANTS
            .iter()
            .find(|action| action.name() == s)
            .copied()
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
