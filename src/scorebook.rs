use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fxhash::FxHashMap;
use serde::Deserialize;

use crate::game::{Game, GameCursor, GameNumber, PlayEvent, Side};
use crate::registry::PlayerRegistry;

pub const DATE_FORMAT: &str = "%Y/%m/%d";

#[derive(Clone, Debug, Deserialize)]
pub struct Player {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
}

impl Player {
    pub fn sort_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Defense {
    #[serde(default)]
    pub away: Vec<String>,
    #[serde(default)]
    pub home: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScoredGame {
    pub date: String,
    #[serde(default)]
    pub number: GameNumber,
    pub away: String,
    pub home: String,
    /// Starting fielders for each side, pitcher first.
    #[serde(default)]
    pub defense: Defense,
    #[serde(default)]
    pub events: Vec<PlayEvent>,
}

impl Game for ScoredGame {
    fn date(&self) -> &str {
        &self.date
    }

    fn number(&self) -> GameNumber {
        self.number
    }

    fn team(&self, side: Side) -> &str {
        match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        }
    }

    fn cursor(&self) -> Box<dyn GameCursor + '_> {
        Box::new(ScoredGameCursor {
            events: &self.events,
            idx: 0,
            fielders: [self.defense.away.clone(), self.defense.home.clone()],
        })
    }
}

pub struct ScoredGameCursor<'a> {
    events: &'a [PlayEvent],
    idx: usize,
    fielders: [Vec<String>; 2],
}

impl GameCursor for ScoredGameCursor<'_> {
    fn event(&self) -> Option<&PlayEvent> {
        self.events.get(self.idx)
    }

    fn next_event(&mut self) {
        let events = self.events;
        let Some(event) = events.get(self.idx) else { return };
        for sub in &event.substitutions {
            let Some(slot) = (sub.position as usize).checked_sub(1) else { continue };
            let fielders = &mut self.fielders[sub.side.index()];
            // pinch hitters and runners don't take the field
            if slot >= 9 {
                continue;
            }
            if fielders.len() <= slot {
                fielders.resize(slot + 1, String::new());
            }
            fielders[slot] = sub.player.clone();
        }
        self.idx += 1;
    }

    fn fielder(&self, side: Side, position: u8) -> Option<&str> {
        let slot = (position as usize).checked_sub(1)?;
        self.fielders[side.index()].get(slot).map(String::as_str).filter(|id| !id.is_empty())
    }
}

#[derive(Deserialize)]
struct RawScorebook {
    #[serde(default)]
    players: Vec<Player>,
    #[serde(default)]
    games: Vec<ScoredGame>,
}

#[derive(Clone, Debug, Default)]
pub struct Scorebook {
    players: FxHashMap<String, Player>,
    games: Vec<ScoredGame>,
}

impl Scorebook {
    pub fn new(players: Vec<Player>, games: Vec<ScoredGame>) -> Self {
        Self {
            players: players.into_iter().map(|player| (player.id.clone(), player)).collect(),
            games,
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).with_context(|| format!("Could not read scorebook '{}'", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Scorebook '{}' was not valid", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let RawScorebook { players, games } = serde_json::from_str(raw).context("Scorebook was not valid json")?;
        Ok(Self::new(players, games))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let RawScorebook { players, games } = serde_json::from_value(value).context("Scorebook was not valid json")?;
        Ok(Self::new(players, games))
    }

    pub fn games(&self) -> &[ScoredGame] {
        &self.games
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    /// Latest game date that parses; unparseable dates are skipped.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.games
            .iter()
            .filter_map(|game| NaiveDate::parse_from_str(&game.date, DATE_FORMAT).ok())
            .max()
    }
}

impl PlayerRegistry for Scorebook {
    fn sort_name(&self, id: &str) -> Option<String> {
        self.player(id).map(Player::sort_name)
    }
}
