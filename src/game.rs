use core::fmt::{Display, Formatter};
use serde::Deserialize;

/// Which half of the matchup a team occupies. The home team is always the site of the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Away,
    Home,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Away, Side::Home];

    pub fn opponent(self) -> Self {
        match self {
            Self::Away => Self::Home,
            Self::Home => Self::Away,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Away => 0,
            Self::Home => 1,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match *self {
            Self::Away => "away",
            Self::Home => "home",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Single,
    Double,
    Triple,
    HomeRun,
    Strikeout,
    Walk,
    IntentionalWalk,
    HitByPitch,
    Error,
    FieldersChoice,
    GenericOut,
    StolenBase,
    CaughtStealing,
    WildPitch,
    PassedBall,
    Balk,
    #[serde(other)]
    Other,
}

impl EventKind {
    pub fn is_hit(self) -> bool {
        matches!(self, Self::Single | Self::Double | Self::Triple | Self::HomeRun)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Substitution {
    pub side: Side,
    pub position: u8,
    pub player: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PlayEvent {
    pub kind: EventKind,
    pub batting_side: Side,
    pub batter: String,
    #[serde(default)]
    pub text: String,
    /// Lineup changes made immediately after this play.
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
}

impl PlayEvent {
    pub const NO_PLAY: &'static str = "NP";

    pub fn is_no_play(&self) -> bool {
        self.text == Self::NO_PLAY
    }

    pub fn has_substitution(&self) -> bool {
        !self.substitutions.is_empty()
    }

    pub fn fielding_side(&self) -> Side {
        self.batting_side.opponent()
    }
}

/// Doubleheader position of a game within its day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum GameNumber {
    #[default]
    Single,
    First,
    Second,
}

impl GameNumber {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Single => "   ",
            Self::First => "(1)",
            Self::Second => "(2)",
        }
    }
}

impl TryFrom<u8> for GameNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Single),
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            n => Err(format!("Invalid doubleheader number '{n}'")),
        }
    }
}

impl Display for GameNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

pub trait Game {
    /// `YYYY/MM/DD`, compared as text wherever games are ordered.
    fn date(&self) -> &str;

    fn number(&self) -> GameNumber;

    fn team(&self, side: Side) -> &str;

    /// A fresh cursor positioned on the first play.
    fn cursor(&self) -> Box<dyn GameCursor + '_>;

    fn site(&self) -> &str {
        self.team(Side::Home)
    }

    fn involves(&self, team: &str) -> bool {
        Side::BOTH.iter().any(|&side| self.team(side) == team)
    }
}

pub trait GameCursor {
    /// `None` once every play has been visited.
    fn event(&self) -> Option<&PlayEvent>;

    fn next_event(&mut self);

    /// Who is playing `position` (1 = pitcher .. 9 = right field) for `side` at the current play.
    fn fielder(&self, side: Side, position: u8) -> Option<&str>;
}
